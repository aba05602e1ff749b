pub mod chat;
pub mod common;
pub mod ingredient_search;
pub mod meal_analysis;
pub mod vector_index;
