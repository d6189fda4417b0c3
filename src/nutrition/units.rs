/// Gram weight assumed for count-based foods ("2 eggs", "3 apples") when no
/// unit token follows the quantity.
pub const PIECE_GRAMS: f64 = 100.0;

/// Milliliters per US cup, the reference volume for the density table.
pub const ML_PER_CUP: f64 = 240.0;

/// A measurement unit: grams per unit assuming water density, plus the
/// milliliter volume when the unit is volumetric (eligible for density
/// correction).
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    pub grams: f64,
    pub volume_ml: Option<f64>,
}

const fn volume(ml: f64) -> UnitDef {
    UnitDef {
        grams: ml,
        volume_ml: Some(ml),
    }
}

const fn weight(grams: f64) -> UnitDef {
    UnitDef {
        grams,
        volume_ml: None,
    }
}

/// Two-word units, matched before the one-word table.
static TWO_WORD_UNITS: &[(&str, UnitDef)] = &[
    ("fl oz", volume(29.57)),
    ("fluid ounce", volume(29.57)),
    ("fluid ounces", volume(29.57)),
];

static UNITS: &[(&str, UnitDef)] = &[
    ("cup", volume(240.0)),
    ("cups", volume(240.0)),
    ("tablespoon", volume(15.0)),
    ("tablespoons", volume(15.0)),
    ("tbsp", volume(15.0)),
    ("tbsps", volume(15.0)),
    ("teaspoon", volume(5.0)),
    ("teaspoons", volume(5.0)),
    ("tsp", volume(5.0)),
    ("tsps", volume(5.0)),
    ("ml", volume(1.0)),
    ("milliliter", volume(1.0)),
    ("milliliters", volume(1.0)),
    ("l", volume(1000.0)),
    ("liter", volume(1000.0)),
    ("liters", volume(1000.0)),
    ("litre", volume(1000.0)),
    ("litres", volume(1000.0)),
    ("pint", volume(473.0)),
    ("pints", volume(473.0)),
    ("quart", volume(946.0)),
    ("quarts", volume(946.0)),
    ("oz", weight(28.35)),
    ("ounce", weight(28.35)),
    ("ounces", weight(28.35)),
    ("lb", weight(453.59)),
    ("lbs", weight(453.59)),
    ("pound", weight(453.59)),
    ("pounds", weight(453.59)),
    ("g", weight(1.0)),
    ("gram", weight(1.0)),
    ("grams", weight(1.0)),
    ("kg", weight(1000.0)),
    ("kilogram", weight(1000.0)),
    ("kilograms", weight(1000.0)),
    ("stick", weight(113.0)),
    ("sticks", weight(113.0)),
    ("clove", weight(5.0)),
    ("cloves", weight(5.0)),
    ("pinch", weight(0.3)),
    ("pinches", weight(0.3)),
    ("dash", weight(0.6)),
    ("dashes", weight(0.6)),
];

/// Grams per cup for ingredients whose weight diverges from water density.
/// Order is significant: more specific names come before their substrings,
/// and the first substring match against a food name wins.
static DENSITY_PER_CUP: &[(&str, f64)] = &[
    ("all-purpose flour", 125.0),
    ("all purpose flour", 125.0),
    ("bread flour", 127.0),
    ("cake flour", 114.0),
    ("whole wheat flour", 120.0),
    ("almond flour", 96.0),
    ("flour", 125.0),
    ("powdered sugar", 120.0),
    ("confectioners sugar", 120.0),
    ("brown sugar", 220.0),
    ("granulated sugar", 200.0),
    ("sugar", 200.0),
    ("peanut butter", 258.0),
    ("buttermilk", 245.0),
    ("butter", 227.0),
    ("coconut oil", 218.0),
    ("olive oil", 216.0),
    ("vegetable oil", 218.0),
    ("oil", 218.0),
    ("honey", 340.0),
    ("maple syrup", 322.0),
    ("corn syrup", 328.0),
    ("molasses", 337.0),
    ("rolled oats", 90.0),
    ("oats", 90.0),
    ("rice", 185.0),
    ("quinoa", 170.0),
    ("cornmeal", 138.0),
    ("cornstarch", 120.0),
    ("cocoa powder", 85.0),
    ("heavy cream", 238.0),
    ("sour cream", 230.0),
    ("cream cheese", 232.0),
    ("yogurt", 245.0),
    ("milk", 244.0),
    ("parmesan", 100.0),
    ("cheese", 113.0),
];

/// Resolve a one-word unit token. Trailing periods are stripped ("tbsp.").
pub fn lookup_unit(token: &str) -> Option<UnitDef> {
    let token = token.trim_end_matches('.');
    UNITS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, def)| *def)
}

/// Resolve a two-word unit ("fl oz") from two consecutive tokens.
pub fn lookup_two_word_unit(first: &str, second: &str) -> Option<UnitDef> {
    let joined = format!("{} {}", first, second.trim_end_matches('.'));
    TWO_WORD_UNITS
        .iter()
        .find(|(name, _)| *name == joined)
        .map(|(_, def)| *def)
}

/// First density-table entry whose key occurs in the food name.
pub fn density_per_cup(food_name: &str) -> Option<f64> {
    DENSITY_PER_CUP
        .iter()
        .find(|(key, _)| food_name.contains(key))
        .map(|(_, grams)| *grams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_common_units() {
        assert_eq!(lookup_unit("cup").unwrap().grams, 240.0);
        assert_eq!(lookup_unit("oz").unwrap().grams, 28.35);
        assert_eq!(lookup_unit("tbsp.").unwrap().grams, 15.0);
        assert!(lookup_unit("handful").is_none());
    }

    #[test]
    fn test_volume_units_carry_ml() {
        assert_eq!(lookup_unit("cup").unwrap().volume_ml, Some(240.0));
        assert_eq!(lookup_unit("oz").unwrap().volume_ml, None);
    }

    #[test]
    fn test_two_word_unit() {
        let def = lookup_two_word_unit("fl", "oz").unwrap();
        assert_eq!(def.volume_ml, Some(29.57));
        assert!(lookup_two_word_unit("fl", "cup").is_none());
    }

    #[test]
    fn test_specific_density_beats_generic() {
        // "brown sugar" must match before the generic "sugar" entry
        assert_eq!(density_per_cup("brown sugar"), Some(220.0));
        assert_eq!(density_per_cup("sugar"), Some(200.0));
        assert_eq!(density_per_cup("cake flour"), Some(114.0));
        assert_eq!(density_per_cup("flour"), Some(125.0));
    }

    #[test]
    fn test_density_substring_match() {
        assert_eq!(density_per_cup("unsalted butter"), Some(227.0));
        assert_eq!(density_per_cup("whole milk"), Some(244.0));
        assert_eq!(density_per_cup("black beans"), None);
    }
}
