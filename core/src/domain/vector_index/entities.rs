use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Distance metric the persisted index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Cosine,
    L2,
}

impl DistanceMetric {
    /// Similarity between two vectors of equal length, higher is closer.
    ///
    /// L2 is reported as the negated euclidean distance so both metrics rank
    /// the same way.
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => {
                let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
                for (x, y) in a.iter().zip(b) {
                    dot += x * y;
                    norm_a += x * x;
                    norm_b += y * y;
                }
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 0.0;
                }
                dot / (norm_a.sqrt() * norm_b.sqrt())
            }
            DistanceMetric::L2 => {
                let squared: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                -squared.sqrt()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredItem {
    pub item_id: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let score = DistanceMetric::Cosine.score(&[1.0, 2.0], &[2.0, 4.0]);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        assert_eq!(DistanceMetric::Cosine.score(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn l2_closer_vectors_score_higher() {
        let near = DistanceMetric::L2.score(&[0.0, 0.0], &[1.0, 0.0]);
        let far = DistanceMetric::L2.score(&[0.0, 0.0], &[3.0, 4.0]);
        assert!(near > far);
        assert!((far + 5.0).abs() < 1e-6);
    }
}
