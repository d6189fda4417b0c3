//! Strategy 2: schema.org microdata read via itemscope/itemprop attributes.

use log::debug;
use scraper::{ElementRef, Selector};

use super::{
    coerce_float, coerce_int, humanize_duration, normalize_whitespace, Extractor, ParsingContext,
};
use crate::model::{ExtractedRecipe, NutritionFacts};

pub struct MicroDataExtractor;

impl MicroDataExtractor {
    /// The element scoped to a Recipe item-type. Matching is strict: global
    /// itemprop searches pick up unrelated page content (site title, author
    /// bio) when not scoped to a Recipe item.
    fn find_recipe_scope<'a>(&self, document: &'a scraper::Html) -> Option<ElementRef<'a>> {
        let selector = Selector::parse("[itemscope]").unwrap();
        document.select(&selector).find(|element| {
            element
                .value()
                .attr("itemtype")
                .is_some_and(|itemtype| itemtype.contains("Recipe"))
        })
    }

    /// One itemprop's value, preferring the `content` attribute over the
    /// element text (meta-style annotations carry the clean value there).
    fn prop(&self, scope: ElementRef, prop: &str) -> Option<String> {
        let selector = Selector::parse(&format!("[itemprop='{prop}']")).unwrap();
        scope.select(&selector).next().and_then(|el| {
            let value = match el.value().attr("content") {
                Some(content) => content.to_string(),
                None => el.text().collect::<Vec<_>>().join(" "),
            };
            let value = normalize_whitespace(&value);
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        })
    }

    fn prop_list(&self, scope: ElementRef, prop: &str) -> Vec<String> {
        let selector = Selector::parse(&format!("[itemprop='{prop}']")).unwrap();
        scope
            .select(&selector)
            .filter_map(|el| {
                let value = match el.value().attr("content") {
                    Some(content) => content.to_string(),
                    None => el.text().collect::<Vec<_>>().join(" "),
                };
                let value = normalize_whitespace(&value);
                if value.is_empty() {
                    None
                } else {
                    Some(value)
                }
            })
            .collect()
    }

    /// Images annotate the URL on src, content, or href depending on tag.
    fn image(&self, scope: ElementRef) -> Option<String> {
        let selector = Selector::parse("[itemprop='image']").unwrap();
        scope.select(&selector).next().and_then(|el| {
            el.value()
                .attr("src")
                .or_else(|| el.value().attr("content"))
                .or_else(|| el.value().attr("href"))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    fn nutrition(&self, scope: ElementRef) -> NutritionFacts {
        let int_of = |prop: &str| self.prop(scope, prop).as_deref().and_then(coerce_int);
        let float_of = |prop: &str| self.prop(scope, prop).as_deref().and_then(coerce_float);

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
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &'static str {
        "microdata"
    }

    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe> {
        let scope = self.find_recipe_scope(&context.document)?;
        debug!("Found microdata Recipe scope");

        let title = self.prop(scope, "name")?;

        let mut ingredients = self.prop_list(scope, "recipeIngredient");
        if ingredients.is_empty() {
            // pre-2013 vocabulary
            ingredients = self.prop_list(scope, "ingredients");
        }
        let instructions = self.prop_list(scope, "recipeInstructions");

        Some(ExtractedRecipe {
            title,
            description: self.prop(scope, "description"),
            image_url: self.image(scope),
            source_url: context.url.clone(),
            servings: self.prop(scope, "recipeYield"),
            prep_time: self.prop(scope, "prepTime").map(|t| humanize_duration(&t)),
            cook_time: self.prop(scope, "cookTime").map(|t| humanize_duration(&t)),
            ingredients,
            instructions,
            nutrition: self.nutrition(scope),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn context(html: &str) -> ParsingContext {
        ParsingContext {
            url: "https://example.com/recipe".to_string(),
            document: Html::parse_document(html),
        }
    }

    const FIXTURE: &str = r#"
        <html><body>
        <div itemscope itemtype="https://schema.org/Recipe">
            <h1 itemprop="name">Beef Stew</h1>
            <p itemprop="description">Hearty winter stew.</p>
            <img itemprop="image" src="https://example.com/stew.jpg">
            <meta itemprop="prepTime" content="PT20M">
            <meta itemprop="cookTime" content="PT2H">
            <span itemprop="recipeYield">6 servings</span>
            <ul>
                <li itemprop="recipeIngredient">2 lbs beef chuck</li>
                <li itemprop="recipeIngredient">4 carrots, chopped</li>
            </ul>
            <ol>
                <li itemprop="recipeInstructions">Brown the beef.</li>
                <li itemprop="recipeInstructions">Simmer for two hours.</li>
            </ol>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_full_recipe() {
        let extractor = MicroDataExtractor;
        let recipe = extractor.extract(&context(FIXTURE)).unwrap();

        assert_eq!(recipe.title, "Beef Stew");
        assert_eq!(recipe.description.as_deref(), Some("Hearty winter stew."));
        assert_eq!(recipe.image_url.as_deref(), Some("https://example.com/stew.jpg"));
        assert_eq!(recipe.servings.as_deref(), Some("6 servings"));
        assert_eq!(recipe.prep_time.as_deref(), Some("20m"));
        assert_eq!(recipe.cook_time.as_deref(), Some("2h"));
        assert_eq!(
            recipe.ingredients,
            vec!["2 lbs beef chuck", "4 carrots, chopped"]
        );
        assert_eq!(
            recipe.instructions,
            vec!["Brown the beef.", "Simmer for two hours."]
        );
        assert!(recipe.is_valid());
    }

    #[test]
    fn test_content_attribute_preferred_over_text() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="name" content="Clean Title">Messy<br>Title</span>
                <li itemprop="recipeIngredient">1 egg</li>
            </div>
        "#;
        let extractor = MicroDataExtractor;
        let recipe = extractor.extract(&context(html)).unwrap();
        assert_eq!(recipe.title, "Clean Title");
    }

    #[test]
    fn test_legacy_ingredients_prop() {
        let html = r#"
            <div itemscope itemtype="http://data-vocabulary.org/Recipe">
                <span itemprop="name">Old Markup</span>
                <li itemprop="ingredients">1 cup rice</li>
            </div>
        "#;
        let extractor = MicroDataExtractor;
        let recipe = extractor.extract(&context(html)).unwrap();
        assert_eq!(recipe.ingredients, vec!["1 cup rice"]);
    }

    #[test]
    fn test_nutrition_props() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="name">With Facts</span>
                <li itemprop="recipeIngredient">1 thing</li>
                <span itemprop="calories">320 calories</span>
                <span itemprop="proteinContent">14 g</span>
                <span itemprop="fiberContent">3.5 g</span>
            </div>
        "#;
        let extractor = MicroDataExtractor;
        let recipe = extractor.extract(&context(html)).unwrap();
        assert_eq!(recipe.nutrition.calories, Some(320));
        assert_eq!(recipe.nutrition.protein_g, Some(14));
        assert_eq!(recipe.nutrition.fiber_g, Some(3.5));
    }

    #[test]
    fn test_no_recipe_scope_returns_none() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Article">
                <span itemprop="name">Not a recipe</span>
            </div>
        "#;
        let extractor = MicroDataExtractor;
        assert!(extractor.extract(&context(html)).is_none());
    }

    #[test]
    fn test_missing_name_returns_none() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <li itemprop="recipeIngredient">1 egg</li>
            </div>
        "#;
        let extractor = MicroDataExtractor;
        assert!(extractor.extract(&context(html)).is_none());
    }
}
