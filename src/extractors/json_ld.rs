//! Strategy 1: embedded structured markup (schema.org Recipe in JSON-LD).
//!
//! Works directly on the raw fetched markup: script blocks are located with
//! a byte scan, so the common success path never pays for DOM construction.

use log::debug;
use serde_json::Value;

use super::{coerce_float, coerce_int, decode_html_symbols, humanize_duration, normalize_whitespace};
use crate::model::{ExtractedRecipe, NutritionFacts};

/// Scan raw HTML for a schema.org Recipe object in any script block and
/// build a recipe from the first match.
pub fn extract_from_html(html: &str, url: &str) -> Option<ExtractedRecipe> {
    for block in script_blocks(html) {
        let cleaned = sanitize_json(block);
        let Ok(json) = serde_json::from_str::<Value>(&cleaned) else {
            continue;
        };
        if let Some(recipe) = find_recipe(&json) {
            debug!("Found schema.org Recipe node in script block");
            return Some(build_recipe(recipe, url));
        }
    }
    None
}

/// Case-insensitive substring search over ASCII bytes.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Inner text of every `<script>` element, typed or not. Untyped blocks are
/// kept because some sites embed recipe JSON without the ld+json type.
fn script_blocks(html: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut cursor = 0;
    while let Some(open) = find_ci(html, "<script", cursor) {
        let Some(tag_end) = html[open..].find('>').map(|i| open + i + 1) else {
            break;
        };
        let Some(close) = find_ci(html, "</script", tag_end) else {
            break;
        };
        blocks.push(&html[tag_end..close]);
        cursor = close + 1;
    }
    blocks
}

/// Clean common JSON-LD damage before parsing.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str.trim().to_string();

    // Leading junk before the first object/array
    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find('{') {
            cleaned = cleaned[start..].to_string();
        }
    }

    // Trailing commas and stray HTML comments
    cleaned = cleaned.replace(",]", "]").replace(",}", "}");
    cleaned = cleaned.replace("<!--", "").replace("-->", "");

    cleaned
}

fn is_recipe_type(type_value: Option<&Value>) -> bool {
    match type_value {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(s) if s.eq_ignore_ascii_case("recipe"))),
        _ => false,
    }
}

/// Depth-first search for a Recipe node: directly, inside an array, or
/// nested under an `@graph` collection. Early exit on first match.
fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if is_recipe_type(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_recipe)
        }
        Value::Array(items) => items.iter().find_map(find_recipe),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| normalize_whitespace(&decode_html_symbols(s)))
        .filter(|s| !s.is_empty())
}

/// Image fields come as a bare string, an array, or an object with a `url`
/// member; recurse until a string surfaces.
fn resolve_image(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(resolve_image),
        Value::Object(map) => map.get("url").and_then(resolve_image),
        _ => None,
    }
}

fn ingredient_lines(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(|s| normalize_whitespace(&decode_html_symbols(s)))
        .filter(|s| !s.is_empty())
        .collect()
}

/// One instruction step's text, from a bare string or a HowToStep object.
fn step_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("description"))
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    let cleaned = normalize_whitespace(&decode_html_symbols(text));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Flatten `recipeInstructions` into ordered step strings. A HowToSection's
/// steps are concatenated into a single string; empty entries are dropped.
fn instruction_lines(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match value {
        Value::String(_) => step_text(value).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                if let Some(Value::Array(steps)) = item.get("itemListElement") {
                    let section: Vec<String> = steps.iter().filter_map(step_text).collect();
                    if section.is_empty() {
                        None
                    } else {
                        Some(section.join(" "))
                    }
                } else {
                    step_text(item)
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `recipeYield` is a string, a number, or a list (first element wins).
fn yield_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => yield_text(items.first()),
        _ => None,
    }
}

fn nutrition_facts(value: Option<&Value>) -> NutritionFacts {
    let Some(nutrition) = value else {
        return NutritionFacts::default();
    };
    // Sites emit nutrition values as strings ("240 calories") or bare
    // JSON numbers; both forms coerce.
    let text_of = |key: &str| match nutrition.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    let int_of = |key: &str| text_of(key).as_deref().and_then(coerce_int);
    let float_of = |key: &str| text_of(key).as_deref().and_then(coerce_float);

    NutritionFacts {
        calories: int_of("calories"),
        protein_g: int_of("proteinContent"),
        carbs_g: int_of("carbohydrateContent"),
        fat_g: int_of("fatContent"),
        fiber_g: float_of("fiberContent"),
        sugar_g: float_of("sugarContent"),
        sodium_mg: int_of("sodiumContent"),
        saturated_fat_g: float_of("saturatedFatContent"),
    }
}

fn build_recipe(recipe: &Value, url: &str) -> ExtractedRecipe {
    ExtractedRecipe {
        title: str_field(recipe, "name").unwrap_or_else(|| "Untitled Recipe".to_string()),
        description: str_field(recipe, "description"),
        image_url: recipe.get("image").and_then(resolve_image),
        source_url: url.to_string(),
        servings: yield_text(recipe.get("recipeYield")),
        prep_time: str_field(recipe, "prepTime").map(|t| humanize_duration(&t)),
        cook_time: str_field(recipe, "cookTime").map(|t| humanize_duration(&t)),
        ingredients: ingredient_lines(recipe.get("recipeIngredient")),
        instructions: instruction_lines(recipe.get("recipeInstructions")),
        nutrition: nutrition_facts(recipe.get("nutrition")),
    }
}
