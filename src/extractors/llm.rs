//! Strategy 5: text-generation fallback, used only after strategies 1-4
//! have all failed. Strips the page down to visible text, sends it with a
//! strict-JSON instruction, and tolerantly parses the reply.

use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use super::{decode_html_symbols, normalize_whitespace};
use crate::config::PipelineConfig;
use crate::model::ExtractedRecipe;

const PROMPT: &str = r#"You extract recipes from messy webpage text.
Given the text, output ONLY a JSON object with exactly these keys and no other characters:

{
  "title": "<recipe title>",
  "description": "<short description>",
  "ingredients": ["<one ingredient per entry>"],
  "instructions": ["<one step per entry>"],
  "servings": "<servings text>",
  "prep_time": "<prep time text>",
  "cook_time": "<cook time text>",
  "image_url": "<main image url>"
}

Use an empty string or empty array for anything the text does not contain.
If the text contains no recipe at all, return {"title": "", "ingredients": [], "instructions": []}."#;

/// Page text sent to the model is truncated to this many characters.
const MAX_CHARS: usize = 12_000;

/// Best-effort extraction via the configured text-generation API.
///
/// Skipped entirely (returns `None`) when no API key is configured; any
/// request or parse failure also degrades to `None`.
pub async fn extract(html: &str, url: &str, config: &PipelineConfig) -> Option<ExtractedRecipe> {
    let api_key = config.openai_api_key.as_deref()?;
    info!("Falling back to LLM extraction for {url}");

    let text = truncate_chars(&visible_text(html), MAX_CHARS);
    if text.trim().is_empty() {
        return None;
    }

    let endpoint = format!("{}/v1/chat/completions", config.openai_base_url);
    let response = Client::new()
        .post(&endpoint)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&serde_json::json!({
            "model": config.openai_model,
            "messages": [
                {"role": "system", "content": PROMPT},
                {"role": "user", "content": text}
            ]
        }))
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        debug!("LLM request failed with status {}", response.status());
        return None;
    }

    let body: Value = response.json().await.ok()?;
    let content = body["choices"][0]["message"]["content"].as_str()?;
    let json: Value = serde_json::from_str(first_json_object(content)?).ok()?;
    Some(build_recipe(&json, url))
}

/// Visible page text: script/style/navigation/header/footer/iframe blocks
/// removed, remaining tags stripped, entities decoded, whitespace collapsed.
fn visible_text(html: &str) -> String {
    let mut cleaned = html.to_string();
    for tag in ["script", "style", "nav", "header", "footer", "iframe"] {
        cleaned = remove_tag_blocks(&cleaned, tag);
    }

    let mut text = String::with_capacity(cleaned.len() / 4);
    let mut in_tag = false;
    for ch in cleaned.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    normalize_whitespace(&decode_html_symbols(&text))
}

/// Remove every `<tag ...>...</tag>` block, case-insensitively. An
/// unclosed block swallows the rest of the input.
fn remove_tag_blocks(html: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut result = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(start) = find_ci(html, &open, cursor) {
        // Reject prefix matches like "<nav" inside "<navigation-bar>"
        let after = html.as_bytes().get(start + open.len());
        if !matches!(after, None | Some(b' ') | Some(b'>') | Some(b'/') | Some(b'\t') | Some(b'\n'))
        {
            result.push_str(&html[cursor..start + open.len()]);
            cursor = start + open.len();
            continue;
        }

        result.push_str(&html[cursor..start]);
        match find_ci(html, &close, start) {
            Some(end) => {
                cursor = match html[end..].find('>') {
                    Some(gt) => end + gt + 1,
                    None => html.len(),
                };
            }
            None => return result,
        }
    }
    result.push_str(&html[cursor..]);
    result
}

fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

/// First balanced JSON object in the reply, tolerant of surrounding prose
/// and markdown fencing.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn optional_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn build_recipe(json: &Value, url: &str) -> ExtractedRecipe {
    ExtractedRecipe {
        title: optional_string(&json["title"]).unwrap_or_else(|| "Untitled Recipe".to_string()),
        description: optional_string(&json["description"]),
        image_url: optional_string(&json["image_url"]),
        source_url: url.to_string(),
        servings: optional_string(&json["servings"]),
        prep_time: optional_string(&json["prep_time"]),
        cook_time: optional_string(&json["cook_time"]),
        ingredients: string_list(&json["ingredients"]),
        instructions: string_list(&json["instructions"]),
        nutrition: Default::default(),
    }
}
