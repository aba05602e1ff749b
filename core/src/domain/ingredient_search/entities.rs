use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::vector_index::entities::ScoredItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientMatch {
    pub name: String,
    pub score: f32,
}

impl From<ScoredItem> for IngredientMatch {
    fn from(item: ScoredItem) -> Self {
        Self {
            name: item.item_id,
            score: item.score,
        }
    }
}
