use std::{
    io::Write,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::instrument;

use crate::domain::common::entities::app_errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Heic,
}

impl ImageFormat {
    /// Picks the format from the file extension, defaulting to JPEG.
    pub fn from_filename(filename: Option<&str>) -> Self {
        let extension = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => ImageFormat::Png,
            Some("webp") => ImageFormat::Webp,
            Some("heic") | Some("heif") => ImageFormat::Heic,
            _ => ImageFormat::Jpeg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Heic => "heic",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Heic => "image/heic",
        }
    }
}

/// An uploaded image written to the upload directory under a random name.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    format: ImageFormat,
}

impl StagedImage {
    #[instrument(skip(data), fields(size = data.len()))]
    pub async fn stage(
        directory: &Path,
        filename: Option<&str>,
        data: Bytes,
    ) -> Result<Self, CoreError> {
        let format = ImageFormat::from_filename(filename);
        let directory: PathBuf = directory.to_path_buf();

        let file = tokio::task::spawn_blocking(move || -> Result<NamedTempFile, CoreError> {
            let mut file = tempfile::Builder::new()
                .prefix("meal-")
                .suffix(&format!(".{}", format.extension()))
                .rand_bytes(16)
                .tempfile_in(&directory)?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| {
            tracing::error!("Image staging task failed: {}", e);
            CoreError::InternalServerError
        })??;

        tracing::debug!(path = %file.path().display(), "Staged uploaded image");

        Ok(Self { file, format })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImageFormat::from_filename(Some("lunch.PNG")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_filename(Some("a.heif")), ImageFormat::Heic);
        assert_eq!(ImageFormat::from_filename(Some("photo")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_filename(None), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn staged_file_ignores_client_name_and_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let staged = StagedImage::stage(
            dir.path(),
            Some("../../etc/photo.jpg"),
            Bytes::from_static(b"jpeg-bytes"),
        )
        .await
        .unwrap();

        let path = staged.path().to_path_buf();
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(!path.to_string_lossy().contains("photo"));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg-bytes");
        assert_eq!(staged.mime_type(), "image/jpeg");

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn same_client_name_gets_distinct_files() {
        let dir = tempfile::tempdir().unwrap();

        let first = StagedImage::stage(dir.path(), Some("photo.jpg"), Bytes::from_static(b"one"))
            .await
            .unwrap();
        let second = StagedImage::stage(dir.path(), Some("photo.jpg"), Bytes::from_static(b"two"))
            .await
            .unwrap();

        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"one");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"two");
    }

    #[tokio::test]
    async fn staging_into_missing_directory_fails() {
        let err = StagedImage::stage(
            Path::new("/nonexistent/uploads"),
            None,
            Bytes::from_static(b"x"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CoreError::Io(_)));
    }
}
