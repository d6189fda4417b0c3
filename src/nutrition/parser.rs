use log::debug;

use super::units::{
    density_per_cup, lookup_two_word_unit, lookup_unit, UnitDef, ML_PER_CUP, PIECE_GRAMS,
};

/// A free-text ingredient line resolved to a gram weight and a cleaned food
/// name. Produced per line, consumed immediately by nutrition lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub gram_weight: f64,
    pub food_name: String,
}

/// Phrases that mark an ingredient as unquantifiable. Such lines are
/// excluded from nutrition computation rather than guessed at.
const SKIP_PHRASES: &[&str] = &["to taste", "as needed", "optional"];

/// Parse a free-text ingredient line into a gram weight and food name.
///
/// Returns `None` for unquantifiable lines ("salt to taste"), lines without
/// a leading quantity, and lines where nothing but the quantity remains.
/// Callers treat `None` as "contributes nothing", not as an error.
pub fn parse_ingredient(line: &str) -> Option<ParsedIngredient> {
    let lower = line.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if SKIP_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        debug!("Skipping unquantifiable ingredient: {line}");
        return None;
    }

    if let Some(parsed) = parse_canned(&lower) {
        return Some(parsed);
    }

    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let (quantity, consumed) = parse_quantity_tokens(&tokens)?;
    let rest = &tokens[consumed..];

    let (unit, unit_tokens) = match_unit(rest);
    let food_name = clean_food_name(&rest[unit_tokens..].join(" "));
    if food_name.is_empty() {
        return None;
    }

    let gram_weight = to_grams(quantity, unit, &food_name);
    Some(ParsedIngredient {
        gram_weight,
        food_name,
    })
}

/// Parse a bare quantity expression ("1 1/2", "1-2", "3").
pub fn parse_quantity(text: &str) -> Option<f64> {
    let tokens: Vec<&str> = text.trim().split_whitespace().collect();
    parse_quantity_tokens(&tokens).map(|(value, _)| value)
}

/// Ordered quantity grammar over the line's leading tokens. Returns the
/// value and how many tokens it consumed.
fn parse_quantity_tokens(tokens: &[&str]) -> Option<(f64, usize)> {
    let first = *tokens.first()?;

    // "1-2" → arithmetic mean
    if let Some((low, high)) = first.split_once('-') {
        if let (Some(low), Some(high)) = (parse_number(low), parse_number(high)) {
            return Some(((low + high) / 2.0, 1));
        }
    }

    // "1 to 2" → arithmetic mean
    if tokens.len() >= 3 && tokens[1] == "to" {
        if let (Some(low), Some(high)) = (parse_number(first), parse_number(tokens[2])) {
            return Some(((low + high) / 2.0, 3));
        }
    }

    // "1 1/2" → whole + fraction
    if tokens.len() >= 2 {
        if let (Some(whole), Some(fraction)) = (parse_number(first), parse_fraction(tokens[1])) {
            if first.parse::<u32>().is_ok() {
                return Some((whole + fraction, 2));
            }
        }
    }

    // "1/2"
    if let Some(fraction) = parse_fraction(first) {
        return Some((fraction, 1));
    }

    // "3", "0.75"
    parse_number(first).map(|value| (value, 1))
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_fraction(token: &str) -> Option<f64> {
    let (numerator, denominator) = token.split_once('/')?;
    let numerator = numerator.parse::<f64>().ok()?;
    let denominator = denominator.parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Look ahead past the quantity for a two-word unit, then a one-word unit.
/// No match means a count-based food ("2 eggs").
fn match_unit(tokens: &[&str]) -> (Option<UnitDef>, usize) {
    if tokens.len() >= 2 {
        if let Some(unit) = lookup_two_word_unit(tokens[0], tokens[1]) {
            return (Some(unit), 2);
        }
    }
    if let Some(first) = tokens.first() {
        if let Some(unit) = lookup_unit(first) {
            return (Some(unit), 1);
        }
    }
    (None, 0)
}

fn to_grams(quantity: f64, unit: Option<UnitDef>, food_name: &str) -> f64 {
    let Some(unit) = unit else {
        return quantity * PIECE_GRAMS;
    };
    // Volume measurements of dense or light ingredients get an
    // ingredient-specific grams-per-cup factor instead of water density.
    if let (Some(ml), Some(density)) = (unit.volume_ml, density_per_cup(food_name)) {
        return quantity * ml / ML_PER_CUP * density;
    }
    quantity * unit.grams
}

/// Drop parenthetical remarks ("(packed)"), truncate at the first comma or
/// semicolon (strips prep notes like ", diced"), and collapse whitespace.
fn clean_food_name(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }
    stripped
        .split([',', ';'])
        .next()
        .unwrap_or("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parenthetical can/jar pattern: `<count> (<size> <unit>) can <food>`.
fn parse_canned(line: &str) -> Option<ParsedIngredient> {
    let open = line.find('(')?;
    let close = line[open..].find(')')? + open;

    let count = parse_quantity(line[..open].trim())?;

    let inner: Vec<&str> = line[open + 1..close].split_whitespace().collect();
    let size = parse_number(inner.first()?)?;
    let (unit, unit_tokens) = match_unit(&inner[1..]);
    let unit = unit?;
    if 1 + unit_tokens != inner.len() {
        return None;
    }

    let mut after = line[close + 1..].trim().split_whitespace();
    let container = after.next()?;
    if !matches!(container, "can" | "cans" | "jar" | "jars" | "bottle" | "bottles") {
        return None;
    }

    let food_name = clean_food_name(&after.collect::<Vec<_>>().join(" "));
    if food_name.is_empty() {
        return None;
    }

    let gram_weight = to_grams(count * size, Some(unit), &food_name);
    Some(ParsedIngredient {
        gram_weight,
        food_name,
    })
}
