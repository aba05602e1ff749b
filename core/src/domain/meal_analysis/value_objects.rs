use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct AnalyzeMealInput {
    /// Client-supplied name. Only its extension is ever used.
    pub filename: Option<String>,
    pub image_data: Bytes,
}
