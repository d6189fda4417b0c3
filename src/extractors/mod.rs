//! Five ranked extraction strategies.
//!
//! Strategy 1 (JSON-LD) works on raw markup so the common case never builds
//! a DOM; strategies 2-4 share the synchronous [`Extractor`] trait over a
//! parsed document; strategy 5 (LLM fallback) is async and works on raw
//! markup again. The orchestrator in `lib.rs` tries them strictly in order.

use html_escape::decode_html_entities;
use scraper::Html;

use crate::model::ExtractedRecipe;

pub mod heading;
pub mod html_class;
pub mod json_ld;
pub mod llm;
pub mod microdata;

pub use heading::HeadingExtractor;
pub use html_class::HtmlClassExtractor;
pub use microdata::MicroDataExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

/// A DOM-based extraction strategy. `None` means "no match here, try the
/// next strategy" — strategies never fail the pipeline.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe>;
}

/// Decode HTML entities. Sources double-encode often enough that decoding
/// twice is required to get the correct string.
pub(crate) fn decode_html_symbols(text: &str) -> String {
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tolerant integer coercion: strip units and separators before parsing,
/// so "240 calories" and "1,200" both resolve. Decimal values round to the
/// nearest whole number.
pub(crate) fn coerce_int(text: &str) -> Option<u32> {
    coerce_float(text).map(|value| value.round() as u32)
}

/// Tolerant float coercion: like [`coerce_int`] but the decimal point is
/// kept, then the value is rounded to one decimal.
pub(crate) fn coerce_float(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 10.0).round() / 10.0)
}

/// Convert an ISO-8601 duration ("PT1H30M") to human text ("1h 30m").
/// Non-ISO strings pass through unchanged.
pub(crate) fn humanize_duration(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix('P') else {
        return trimmed.to_string();
    };

    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut number = String::new();
    let mut in_time = false;
    let mut matched = false;

    for ch in rest.chars() {
        match ch {
            'T' => {
                in_time = true;
                number.clear();
            }
            '0'..='9' => number.push(ch),
            'D' => {
                if let Ok(days) = number.parse::<u32>() {
                    hours += days * 24;
                    matched = true;
                }
                number.clear();
            }
            'H' if in_time => {
                if let Ok(h) = number.parse::<u32>() {
                    hours += h;
                    matched = true;
                }
                number.clear();
            }
            'M' if in_time => {
                if let Ok(m) = number.parse::<u32>() {
                    minutes += m;
                    matched = true;
                }
                number.clear();
            }
            _ => number.clear(),
        }
    }

    if !matched {
        return trimmed.to_string();
    }
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_strips_units() {
        assert_eq!(coerce_int("240 calories"), Some(240));
        assert_eq!(coerce_int("1,200"), Some(1200));
        assert_eq!(coerce_int("about 35 g"), Some(35));
        assert_eq!(coerce_int("9.5 g"), Some(10));
        assert_eq!(coerce_int("none"), None);
    }

    #[test]
    fn test_coerce_float_keeps_decimal_point() {
        assert_eq!(coerce_float("3.5 g"), Some(3.5));
        assert_eq!(coerce_float("0.25"), Some(0.3));
        assert_eq!(coerce_float("12"), Some(12.0));
        assert_eq!(coerce_float("trace"), None);
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration("PT1H30M"), "1h 30m");
        assert_eq!(humanize_duration("PT45M"), "45m");
        assert_eq!(humanize_duration("PT2H"), "2h");
        assert_eq!(humanize_duration("P0DT1H15M"), "1h 15m");
        assert_eq!(humanize_duration("PT0M"), "0m");
    }

    #[test]
    fn test_non_iso_duration_passes_through() {
        assert_eq!(humanize_duration("30 minutes"), "30 minutes");
        assert_eq!(humanize_duration(" 1 hour "), "1 hour");
    }

    #[test]
    fn test_decode_double_encoded_entities() {
        assert_eq!(decode_html_symbols("Mac &amp;amp; Cheese"), "Mac & Cheese");
        assert_eq!(decode_html_symbols("Fish &amp; Chips"), "Fish & Chips");
    }
}
