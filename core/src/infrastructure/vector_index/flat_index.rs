use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    vector_index::{
        entities::{DistanceMetric, ScoredItem},
        ports::VectorIndex,
    },
};

pub const SUPPORTED_INDEX_VERSION: u32 = 1;

/// On-disk layout of the index artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedIndex {
    pub version: u32,
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub items: Vec<PersistedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedItem {
    pub id: String,
    pub vector: Vec<f32>,
}

/// Exact nearest-neighbour index held fully in memory.
#[derive(Debug, Clone)]
pub struct FlatVectorIndex {
    dimension: usize,
    metric: DistanceMetric,
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl FlatVectorIndex {
    /// Loads the persisted artifact at `path`.
    ///
    /// Fails when the file is missing or unreadable, when it does not parse,
    /// and when its dimensionality disagrees with `expected_dimension`.
    #[instrument(skip_all, fields(path = %path.display(), expected_dimension))]
    pub async fn load(path: &Path, expected_dimension: usize) -> Result<Self, CoreError> {
        let raw = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read vector index: {}", e);
            CoreError::IndexLoad(format!("cannot read {}: {}", path.display(), e))
        })?;

        let persisted: PersistedIndex = serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!("Failed to parse vector index: {}", e);
            CoreError::IndexLoad(format!("corrupt index {}: {}", path.display(), e))
        })?;

        if persisted.version != SUPPORTED_INDEX_VERSION {
            return Err(CoreError::IndexLoad(format!(
                "unsupported index version {} (expected {})",
                persisted.version, SUPPORTED_INDEX_VERSION
            )));
        }

        if persisted.dimension != expected_dimension {
            return Err(CoreError::DimensionMismatch {
                expected: expected_dimension,
                actual: persisted.dimension,
            });
        }

        let items = persisted
            .items
            .into_iter()
            .map(|item| (item.id, item.vector))
            .collect();

        let index = Self::from_items(persisted.metric, persisted.dimension, items)?;

        tracing::info!(
            items = index.ids.len(),
            dimension = index.dimension,
            metric = ?index.metric,
            "Vector index loaded"
        );

        Ok(index)
    }

    pub fn from_items(
        metric: DistanceMetric,
        dimension: usize,
        items: Vec<(String, Vec<f32>)>,
    ) -> Result<Self, CoreError> {
        if dimension == 0 {
            return Err(CoreError::IndexLoad(
                "index dimension must be positive".to_string(),
            ));
        }

        let mut ids = Vec::with_capacity(items.len());
        let mut vectors = Vec::with_capacity(items.len());

        for (id, vector) in items {
            if vector.len() != dimension {
                return Err(CoreError::IndexLoad(format!(
                    "item '{}' has {} components, index dimension is {}",
                    id,
                    vector.len(),
                    dimension
                )));
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(CoreError::IndexLoad(format!(
                    "item '{}' contains non-finite components",
                    id
                )));
            }
            ids.push(id);
            vectors.push(vector);
        }

        Ok(Self {
            dimension,
            metric,
            ids,
            vectors,
        })
    }
}

impl VectorIndex for FlatVectorIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn item_count(&self) -> usize {
        self.ids.len()
    }

    fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredItem>, CoreError> {
        if embedding.len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, self.metric.score(embedding, vector)))
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(position, score)| ScoredItem {
                item_id: self.ids[position].clone(),
                score,
            })
            .collect())
    }
}
