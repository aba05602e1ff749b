use serde_json::json;

pub const MEAL_EXTRACTION_PROMPT: &str = "Identify every food ingredient visible in this meal \
photo. For each ingredient estimate its weight in grams and its nutrients for that weight: \
calories (kcal), protein_g, carbohydrates_g, fat_g, fiber_g, sugar_g and sodium_mg. \
Return an empty ingredients array if the image does not show food.";

/// Returns the JSON schema for meal extraction LLM responses
pub fn get_meal_extraction_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "grams": { "type": "number" },
                        "calories": { "type": "number" },
                        "protein_g": { "type": "number" },
                        "carbohydrates_g": { "type": "number" },
                        "fat_g": { "type": "number" },
                        "fiber_g": { "type": "number" },
                        "sugar_g": { "type": "number" },
                        "sodium_mg": { "type": "number" }
                    },
                    "required": [
                        "name", "grams", "calories", "protein_g",
                        "carbohydrates_g", "fat_g"
                    ]
                }
            }
        },
        "required": ["ingredients"]
    })
}
