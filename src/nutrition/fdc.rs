use std::collections::HashMap;

use log::debug;
use reqwest::Client;
use serde::Deserialize;

/// Nutrients tracked by the pipeline, keyed by FoodData Central nutrient ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbs,
    Fiber,
    Sugar,
    Sodium,
    SaturatedFat,
}

impl Nutrient {
    fn from_id(id: u64) -> Option<Self> {
        match id {
            1008 => Some(Nutrient::Calories),
            1003 => Some(Nutrient::Protein),
            1004 => Some(Nutrient::Fat),
            1005 => Some(Nutrient::Carbs),
            1079 => Some(Nutrient::Fiber),
            2000 => Some(Nutrient::Sugar),
            1093 => Some(Nutrient::Sodium),
            1258 => Some(Nutrient::SaturatedFat),
            _ => None,
        }
    }
}

/// Nutrient amounts per 100 g of food.
pub type NutrientValues = HashMap<Nutrient, f64>;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodHit>,
}

#[derive(Debug, Deserialize)]
struct FoodHit {
    #[serde(rename = "dataType", default)]
    data_type: String,
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrient {
    #[serde(rename = "nutrientId")]
    nutrient_id: Option<u64>,
    value: Option<f64>,
}

/// Client for the FoodData Central food-composition API.
pub struct FdcClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FdcClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Resolve a food name to per-100g nutrient values.
    ///
    /// Network errors, non-success statuses, and empty result sets all
    /// degrade to `None` — a failed lookup means the ingredient contributes
    /// nothing to the total, never that the request fails.
    pub async fn nutrients_per_100g(&self, food_name: &str) -> Option<NutrientValues> {
        let url = format!("{}/fdc/v1/foods/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", food_name),
                ("dataType", "Foundation,SR Legacy"),
                ("pageSize", "3"),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!(
                "FDC search for '{food_name}' returned status {}",
                response.status()
            );
            return None;
        }

        let search: SearchResponse = response.json().await.ok()?;
        let food = search
            .foods
            .iter()
            .find(|food| food.data_type != "Branded")
            .or_else(|| search.foods.first())?;

        let mut values = NutrientValues::new();
        for nutrient in &food.food_nutrients {
            let (Some(id), Some(value)) = (nutrient.nutrient_id, nutrient.value) else {
                continue;
            };
            if value < 0.0 {
                continue;
            }
            if let Some(key) = Nutrient::from_id(id) {
                values.entry(key).or_insert(value);
            }
        }

        if values.is_empty() {
            debug!("FDC match for '{food_name}' carried no tracked nutrients");
            return None;
        }
        Some(values)
    }
}
