//! Strategy 3: hard-coded selector sets for common recipe-plugin markup.
//!
//! Four publishing-platform conventions, tried in a fixed sub-order:
//! WP Recipe Maker (itemized amount/unit/name/notes per line), Tasty
//! Recipes, Mediavine Create, and legacy hRecipe microformat classes.

use log::debug;
use scraper::{ElementRef, Selector};

use super::{normalize_whitespace, Extractor, ParsingContext};
use crate::model::ExtractedRecipe;

pub struct HtmlClassExtractor;

/// Selector set for one recipe plugin's markup convention.
struct PluginSelectors {
    name: &'static str,
    title: &'static str,
    description: Option<&'static str>,
    ingredient_items: &'static str,
    /// Sub-selectors assembling one ingredient line from parts
    /// (amount, unit, name, notes). WPRM itemizes lines this way.
    ingredient_parts: Option<[&'static str; 4]>,
    instruction_items: &'static str,
    servings: Option<&'static str>,
    prep_time: Option<&'static str>,
    cook_time: Option<&'static str>,
    image: Option<&'static str>,
}

static PLUGINS: &[PluginSelectors] = &[
    PluginSelectors {
        name: "wprm",
        title: ".wprm-recipe-name",
        description: Some(".wprm-recipe-summary"),
        ingredient_items: ".wprm-recipe-ingredient",
        ingredient_parts: Some([
            ".wprm-recipe-ingredient-amount",
            ".wprm-recipe-ingredient-unit",
            ".wprm-recipe-ingredient-name",
            ".wprm-recipe-ingredient-notes",
        ]),
        instruction_items: ".wprm-recipe-instruction-text",
        servings: Some(".wprm-recipe-servings"),
        prep_time: Some(".wprm-recipe-prep-time"),
        cook_time: Some(".wprm-recipe-cook-time"),
        image: Some(".wprm-recipe-image img"),
    },
    PluginSelectors {
        name: "tasty",
        title: ".tasty-recipes-title",
        description: Some(".tasty-recipes-description"),
        ingredient_items: ".tasty-recipes-ingredients li",
        ingredient_parts: None,
        instruction_items: ".tasty-recipes-instructions li",
        servings: Some(".tasty-recipes-yield"),
        prep_time: Some(".tasty-recipes-prep-time"),
        cook_time: Some(".tasty-recipes-cook-time"),
        image: None,
    },
    PluginSelectors {
        name: "mv-create",
        title: ".mv-create-title",
        description: None,
        ingredient_items: ".mv-create-ingredients li",
        ingredient_parts: None,
        instruction_items: ".mv-create-instructions li",
        servings: Some(".mv-create-yield"),
        prep_time: Some(".mv-create-time-prep"),
        cook_time: Some(".mv-create-time-active"),
        image: None,
    },
    PluginSelectors {
        name: "hrecipe",
        title: ".hrecipe .fn",
        description: Some(".hrecipe .summary"),
        ingredient_items: ".hrecipe .ingredient",
        ingredient_parts: None,
        instruction_items: ".hrecipe .instructions li, .hrecipe .instruction",
        servings: Some(".hrecipe .yield"),
        prep_time: None,
        cook_time: None,
        image: None,
    },
];

fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn select_text(context: &ParsingContext, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    context
        .document
        .select(&selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn select_all_text(context: &ParsingContext, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    context
        .document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Ingredient lines for a plugin: assembled from itemized parts when the
/// plugin splits amount/unit/name/notes, plain element text otherwise.
fn ingredient_lines(context: &ParsingContext, plugin: &PluginSelectors) -> Vec<String> {
    let Ok(item_selector) = Selector::parse(plugin.ingredient_items) else {
        return Vec::new();
    };

    context
        .document
        .select(&item_selector)
        .filter_map(|item| {
            let line = match plugin.ingredient_parts {
                Some(parts) => {
                    let assembled = parts
                        .iter()
                        .filter_map(|part| Selector::parse(part).ok())
                        .filter_map(|part| item.select(&part).next())
                        .map(element_text)
                        .filter(|text| !text.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if assembled.is_empty() {
                        element_text(item)
                    } else {
                        assembled
                    }
                }
                None => element_text(item),
            };
            if line.is_empty() {
                None
            } else {
                Some(line)
            }
        })
        .collect()
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe> {
        for plugin in PLUGINS {
            let Some(title) = select_text(context, plugin.title) else {
                continue;
            };

            let ingredients = ingredient_lines(context, plugin);
            let instructions = select_all_text(context, plugin.instruction_items);
            if ingredients.is_empty() && instructions.is_empty() {
                continue;
            }

            debug!("Matched recipe-plugin markup: {}", plugin.name);

            let image_url = plugin.image.and_then(|selector| {
                let selector = Selector::parse(selector).ok()?;
                context
                    .document
                    .select(&selector)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .map(str::to_string)
            });

            return Some(ExtractedRecipe {
                title,
                description: plugin
                    .description
                    .and_then(|selector| select_text(context, selector)),
                image_url,
                source_url: context.url.clone(),
                servings: plugin
                    .servings
                    .and_then(|selector| select_text(context, selector)),
                prep_time: plugin
                    .prep_time
                    .and_then(|selector| select_text(context, selector)),
                cook_time: plugin
                    .cook_time
                    .and_then(|selector| select_text(context, selector)),
                ingredients,
                instructions,
                nutrition: Default::default(),
            });
        }
        None
    }
}
