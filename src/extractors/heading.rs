//! Strategy 4: heading heuristic for pages with no machine-readable markup.
//!
//! Finds "Ingredients"/"Instructions" headings and collects the nearest
//! following list. Purely structural, so it is the last non-LLM resort.

use log::debug;
use scraper::{ElementRef, Selector};

use super::{normalize_whitespace, Extractor, ParsingContext};
use crate::model::ExtractedRecipe;

pub struct HeadingExtractor;

/// How many sibling elements to walk past a matched heading before giving
/// up on finding its list.
const MAX_SIBLING_HOPS: usize = 10;

const INSTRUCTION_WORDS: &[&str] = &["instruction", "direction", "step", "method", "how to"];

impl HeadingExtractor {
    /// Best-guess page title: open-graph title, then the first heading,
    /// then the title element.
    fn page_title(&self, context: &ParsingContext) -> Option<String> {
        let og = Selector::parse("meta[property='og:title']").unwrap();
        if let Some(title) = context
            .document
            .select(&og)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(normalize_whitespace)
            .filter(|t| !t.is_empty())
        {
            return Some(title);
        }

        let h1 = Selector::parse("h1").unwrap();
        if let Some(title) = context
            .document
            .select(&h1)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
        {
            return Some(title);
        }

        let title = Selector::parse("title").unwrap();
        context
            .document
            .select(&title)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    /// Walk forward through the heading's siblings looking for a list,
    /// either directly or nested inside a sibling.
    fn list_after_heading(&self, heading: ElementRef) -> Vec<String> {
        let li = Selector::parse("li").unwrap();
        let nested_list = Selector::parse("ul, ol").unwrap();

        for sibling in heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take(MAX_SIBLING_HOPS)
        {
            let is_list = matches!(sibling.value().name(), "ul" | "ol");
            if !is_list && sibling.select(&nested_list).next().is_none() {
                continue;
            }
            let items: Vec<String> = sibling
                .select(&li)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();
            if !items.is_empty() {
                return items;
            }
        }
        Vec::new()
    }
}

fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

impl Extractor for HeadingExtractor {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe> {
        let headings = Selector::parse("h1, h2, h3, h4").unwrap();

        let mut ingredients = Vec::new();
        let mut instructions = Vec::new();

        for heading in context.document.select(&headings) {
            let text = element_text(heading).to_lowercase();
            if ingredients.is_empty() && text.contains("ingredient") {
                ingredients = self.list_after_heading(heading);
            } else if instructions.is_empty()
                && INSTRUCTION_WORDS.iter().any(|word| text.contains(word))
            {
                instructions = self.list_after_heading(heading);
            }
        }

        // Too weak a signal below this threshold.
        if ingredients.len() < 2 && instructions.is_empty() {
            return None;
        }

        let title = self
            .page_title(context)
            .unwrap_or_else(|| "Untitled Recipe".to_string());
        debug!(
            "Heading heuristic matched: {} ingredients, {} instructions",
            ingredients.len(),
            instructions.len()
        );

        Some(ExtractedRecipe {
            title,
            source_url: context.url.clone(),
            ingredients,
            instructions,
            ..Default::default()
        })
    }
}
