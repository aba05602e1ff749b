pub mod chat;
pub mod health;
pub mod ingredient_search;
pub mod meal_analysis;
pub mod server;
