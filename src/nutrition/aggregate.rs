use std::collections::HashMap;

use super::fdc::{Nutrient, NutrientValues};
use super::parser::ParsedIngredient;
use crate::model::NutritionFacts;

/// Parse a free-text servings value ("4", "4-6", "Makes 8 pancakes").
///
/// A range becomes its arithmetic mean, an embedded integer is used
/// directly, anything else defaults to 1.
pub fn parse_servings(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 1.0;
    };

    let numbers = integer_runs(text);
    let servings = if text.contains('-') && numbers.len() >= 2 {
        (numbers[0] + numbers[1]) / 2.0
    } else if let Some(first) = numbers.first() {
        *first
    } else {
        return 1.0;
    };

    if servings > 0.0 {
        servings
    } else {
        1.0
    }
}

fn integer_runs(text: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(value) = current.parse::<f64>() {
                numbers.push(value);
            }
            current.clear();
        }
    }
    if let Ok(value) = current.parse::<f64>() {
        numbers.push(value);
    }
    numbers
}

/// Combine parsed ingredient weights with per-100g nutrient densities into
/// one per-serving `NutritionFacts` record.
///
/// A nutrient is reported only if at least one ingredient contributed it;
/// ingredients with failed lookups contribute nothing. This is the fallback
/// path, used only when the source page supplied no explicit nutrition.
pub fn aggregate(
    ingredients: &[(ParsedIngredient, Option<NutrientValues>)],
    servings: Option<&str>,
) -> NutritionFacts {
    let servings = parse_servings(servings);

    let mut totals: HashMap<Nutrient, (f64, u32)> = HashMap::new();
    for (ingredient, nutrients) in ingredients {
        let Some(nutrients) = nutrients else {
            continue;
        };
        let scale = ingredient.gram_weight / 100.0;
        for (&nutrient, &per_100g) in nutrients {
            let entry = totals.entry(nutrient).or_insert((0.0, 0));
            entry.0 += per_100g * scale;
            entry.1 += 1;
        }
    }

    let per_serving = |nutrient: Nutrient| -> Option<f64> {
        totals
            .get(&nutrient)
            .filter(|(_, count)| *count > 0)
            .map(|(sum, _)| sum / servings)
    };
    let whole = |nutrient: Nutrient| per_serving(nutrient).map(|v| v.round() as u32);
    let tenth = |nutrient: Nutrient| per_serving(nutrient).map(|v| (v * 10.0).round() / 10.0);

    NutritionFacts {
        calories: whole(Nutrient::Calories),
        protein_g: whole(Nutrient::Protein),
        carbs_g: whole(Nutrient::Carbs),
        fat_g: whole(Nutrient::Fat),
        fiber_g: tenth(Nutrient::Fiber),
        sugar_g: tenth(Nutrient::Sugar),
        sodium_mg: whole(Nutrient::Sodium),
        saturated_fat_g: tenth(Nutrient::SaturatedFat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(grams: f64, name: &str) -> ParsedIngredient {
        ParsedIngredient {
            gram_weight: grams,
            food_name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_servings_range_mean() {
        assert_eq!(parse_servings(Some("4-6")), 5.0);
        assert_eq!(parse_servings(Some("4-6 servings")), 5.0);
    }

    #[test]
    fn test_parse_servings_embedded_integer() {
        assert_eq!(parse_servings(Some("4 servings")), 4.0);
        assert_eq!(parse_servings(Some("Makes 8 pancakes")), 8.0);
    }

    #[test]
    fn test_parse_servings_default() {
        assert_eq!(parse_servings(None), 1.0);
        assert_eq!(parse_servings(Some("a family")), 1.0);
        assert_eq!(parse_servings(Some("0")), 1.0);
    }

    #[test]
    fn test_aggregate_scales_and_divides() {
        // 250 g of flour at 364 kcal/100g plus 200 g of sugar at 387 kcal/100g,
        // split over 4 servings: (910 + 774) / 4 = 421
        let flour = NutrientValues::from([
            (Nutrient::Calories, 364.0),
            (Nutrient::Protein, 10.3),
            (Nutrient::Fiber, 2.7),
        ]);
        let sugar = NutrientValues::from([(Nutrient::Calories, 387.0)]);

        let facts = aggregate(
            &[
                (ingredient(250.0, "flour"), Some(flour)),
                (ingredient(200.0, "sugar"), Some(sugar)),
            ],
            Some("4 servings"),
        );

        assert_eq!(facts.calories, Some(421));
        // protein contributed by flour only: 25.75 / 4 = 6.4375 → 6
        assert_eq!(facts.protein_g, Some(6));
        // fiber rounds to tenths: 6.75 / 4 = 1.6875 → 1.7
        assert_eq!(facts.fiber_g, Some(1.7));
    }

    #[test]
    fn test_uncontributed_nutrients_stay_absent() {
        let flour = NutrientValues::from([(Nutrient::Calories, 364.0)]);
        let facts = aggregate(&[(ingredient(100.0, "flour"), Some(flour))], None);

        assert_eq!(facts.calories, Some(364));
        assert_eq!(facts.fat_g, None);
        assert_eq!(facts.sodium_mg, None);
        assert_eq!(facts.sugar_g, None);
    }

    #[test]
    fn test_failed_lookups_contribute_nothing() {
        let facts = aggregate(
            &[
                (ingredient(100.0, "unicorn dust"), None),
                (ingredient(50.0, "dragon scale"), None),
            ],
            Some("2"),
        );
        assert_eq!(facts, NutritionFacts::default());
    }

    #[test]
    fn test_empty_ingredient_list() {
        let facts = aggregate(&[], Some("4"));
        assert_eq!(facts, NutritionFacts::default());
    }
}
