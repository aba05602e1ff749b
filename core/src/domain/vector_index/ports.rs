use crate::domain::{
    common::entities::app_errors::CoreError,
    vector_index::entities::{DistanceMetric, ScoredItem},
};

/// Read-only nearest-neighbour access to a persisted embedding index.
#[cfg_attr(test, mockall::automock)]
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    fn metric(&self) -> DistanceMetric;

    fn item_count(&self) -> usize;

    /// Returns at most `k` items ordered by non-increasing score.
    fn query(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredItem>, CoreError>;
}
