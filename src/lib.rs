//! Recipe-extraction and nutrition-estimation pipeline.
//!
//! Given a recipe URL, fetches the page, tries five extraction strategies
//! in priority order, and attaches a per-serving nutrition estimate —
//! either the page's own nutrition facts or an estimate computed from the
//! ingredient list via a food-composition API.
//!
//! The pipeline is stateless: every request builds its result fresh and
//! owns no persistence.

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod model;
pub mod nutrition;

use std::time::Duration;

use futures::future::join_all;
use log::{debug, info};
use scraper::Html;
use serde_json::json;

use crate::config::PipelineConfig;
use crate::error::ExtractError;
use crate::extractors::{
    json_ld, llm, Extractor, HeadingExtractor, HtmlClassExtractor, MicroDataExtractor,
    ParsingContext,
};
use crate::fetch::PageFetcher;
use crate::model::{ExtractRequest, ExtractedRecipe, NutritionFacts};
use crate::nutrition::{aggregate, parse_ingredient, FdcClient};

/// Extract a recipe from a URL.
///
/// Strategies run strictly in priority order; the structured-markup
/// strategy runs against the raw fetched markup so the common success path
/// skips DOM construction entirely.
pub async fn extract_recipe(
    url: &str,
    config: &PipelineConfig,
) -> Result<ExtractedRecipe, ExtractError> {
    if url.trim().is_empty() {
        return Err(ExtractError::MissingUrl);
    }

    let fetcher = PageFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let body = fetcher.fetch(url).await?;

    let mut recipe = match extract_from_body(&body, url, config).await {
        Some(recipe) => recipe,
        None => return Err(ExtractError::NoRecipeFound),
    };

    if recipe.nutrition.has_macros() {
        debug!("Using nutrition facts supplied by the page");
    } else {
        recipe.nutrition = estimate_nutrition(&recipe, config).await;
    }

    if recipe.title.trim().is_empty() {
        recipe.title = "Untitled Recipe".to_string();
    }
    Ok(recipe)
}

/// First-success-wins fold over the five strategies.
async fn extract_from_body(
    body: &str,
    url: &str,
    config: &PipelineConfig,
) -> Option<ExtractedRecipe> {
    // Strategy 1 works on the raw markup; most pages succeed here.
    if let Some(recipe) = json_ld::extract_from_html(body, url).filter(ExtractedRecipe::is_valid) {
        info!("Extracted via structured markup: {url}");
        return Some(recipe);
    }

    // The DOM lives in this block only; it is built once and dropped
    // before the async fallback.
    let from_dom = {
        let context = ParsingContext {
            url: url.to_string(),
            document: Html::parse_document(body),
        };
        let strategies: [&dyn Extractor; 3] =
            [&MicroDataExtractor, &HtmlClassExtractor, &HeadingExtractor];
        strategies.iter().find_map(|strategy| {
            let recipe = strategy
                .extract(&context)
                .filter(ExtractedRecipe::is_valid)?;
            info!("Extracted via {} strategy: {url}", strategy.name());
            Some(recipe)
        })
    };
    if from_dom.is_some() {
        return from_dom;
    }

    llm::extract(body, url, config)
        .await
        .filter(ExtractedRecipe::is_valid)
}

/// Fallback nutrition path: parse ingredient lines, look each food up
/// concurrently, and aggregate per serving. Lines that cannot be parsed
/// and lookups that fail contribute nothing.
async fn estimate_nutrition(recipe: &ExtractedRecipe, config: &PipelineConfig) -> NutritionFacts {
    let Some(api_key) = config.fdc_api_key.clone() else {
        debug!("No food-composition API key configured; skipping nutrition estimate");
        return NutritionFacts::default();
    };

    let parsed: Vec<_> = recipe
        .ingredients
        .iter()
        .filter_map(|line| parse_ingredient(line))
        .collect();
    if parsed.is_empty() {
        return NutritionFacts::default();
    }

    let client = FdcClient::new(reqwest::Client::new(), api_key, config.fdc_base_url.clone());
    let lookups = join_all(
        parsed
            .iter()
            .map(|ingredient| client.nutrients_per_100g(&ingredient.food_name)),
    )
    .await;

    let pairs: Vec<_> = parsed.into_iter().zip(lookups).collect();
    aggregate(&pairs, recipe.servings.as_deref())
}

/// Handle one `{ "url": ... }` request body and produce the response body.
///
/// The response is always either the full recipe object or
/// `{ "error": string }` — never both, never neither. Transport status is
/// the embedder's concern.
pub async fn handle_request(body: &str, config: &PipelineConfig) -> serde_json::Value {
    let url = serde_json::from_str::<ExtractRequest>(body)
        .ok()
        .and_then(|request| request.url)
        .unwrap_or_default();
    if url.trim().is_empty() {
        return json!({ "error": ExtractError::MissingUrl.user_message() });
    }

    match extract_recipe(&url, config).await {
        Ok(recipe) => serde_json::to_value(&recipe)
            .unwrap_or_else(|err| json!({ "error": format!("Internal error: {err}") })),
        Err(err) => json!({ "error": err.user_message() }),
    }
}
