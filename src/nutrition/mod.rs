//! Ingredient parsing, food-composition lookup, and per-serving aggregation.
//!
//! This is the fallback nutrition path: it runs only when the source page
//! supplied no explicit nutrition facts.

mod aggregate;
mod fdc;
mod parser;
mod units;

pub use aggregate::{aggregate, parse_servings};
pub use fdc::{FdcClient, Nutrient, NutrientValues};
pub use parser::{parse_ingredient, parse_quantity, ParsedIngredient};
