use serde::{Deserialize, Serialize};

/// Per-serving nutrition estimate.
///
/// An absent field means the value is genuinely unknown (no source supplied
/// it and no ingredient contributed it), not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: Option<u32>,
    pub protein_g: Option<u32>,
    pub carbs_g: Option<u32>,
    pub fat_g: Option<u32>,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<u32>,
    pub saturated_fat_g: Option<f64>,
}

impl NutritionFacts {
    /// Whether the source supplied enough of the core macros to trust these
    /// values over the computed estimate.
    pub fn has_macros(&self) -> bool {
        self.calories.is_some() || self.protein_g.is_some() || self.carbs_g.is_some()
    }
}

/// The pipeline's output contract: one extracted recipe per request.
///
/// Serialized field names are the wire names consumed by the calling
/// application, which persists this record as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub source_url: String,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(flatten)]
    pub nutrition: NutritionFacts,
}

impl ExtractedRecipe {
    /// An extraction attempt is usable only if it carries a non-empty title
    /// and at least one ingredient or instruction.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
            && (!self.ingredients.is_empty() || !self.instructions.is_empty())
    }
}

/// Incoming request body.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recipe_is_invalid() {
        let recipe = ExtractedRecipe::default();
        assert!(!recipe.is_valid());
    }

    #[test]
    fn test_title_alone_is_invalid() {
        let recipe = ExtractedRecipe {
            title: "Pancakes".to_string(),
            ..Default::default()
        };
        assert!(!recipe.is_valid());
    }

    #[test]
    fn test_title_and_ingredients_is_valid() {
        let recipe = ExtractedRecipe {
            title: "Pancakes".to_string(),
            ingredients: vec!["1 cup flour".to_string()],
            ..Default::default()
        };
        assert!(recipe.is_valid());
    }

    #[test]
    fn test_title_and_instructions_is_valid() {
        let recipe = ExtractedRecipe {
            title: "Pancakes".to_string(),
            instructions: vec!["Mix and fry.".to_string()],
            ..Default::default()
        };
        assert!(recipe.is_valid());
    }

    #[test]
    fn test_nutrition_fields_flatten_onto_recipe() {
        let recipe = ExtractedRecipe {
            title: "Pancakes".to_string(),
            source_url: "https://example.com".to_string(),
            ingredients: vec!["1 cup flour".to_string()],
            nutrition: NutritionFacts {
                calories: Some(250),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["calories"], 250);
        assert_eq!(json["title"], "Pancakes");
        assert!(json["protein_g"].is_null());
        assert!(json.get("nutrition").is_none());
    }

    #[test]
    fn test_fiber_alone_does_not_count_as_macros() {
        assert!(!NutritionFacts::default().has_macros());
        assert!(NutritionFacts {
            calories: Some(100),
            ..Default::default()
        }
        .has_macros());
        assert!(!NutritionFacts {
            fiber_g: Some(1.0),
            ..Default::default()
        }
        .has_macros());
    }
}
