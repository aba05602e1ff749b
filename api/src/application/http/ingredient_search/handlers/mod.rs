pub mod search_ingredients;
