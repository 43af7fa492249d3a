//! Recipe provider proxy.
//!
//! The frontend never talks to the provider directly; search queries go
//! through this client so the credentials stay server-side and the payload
//! shrinks to the [`RecipeRecord`] subset. A failed provider call degrades to
//! an empty result set with a logged diagnostic instead of an error response,
//! so the search box never breaks on provider hiccups.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    config::Config,
    recipe::{derive_id, RecipeRecord},
};

pub struct RecipeSearchClient {
    http: Client,
    search_url: String,
    app_id: String,
    app_key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    recipe: ProviderRecipe,
}

/// Provider-shaped recipe hit, prior to id derivation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRecipe {
    uri: String,
    #[serde(default)]
    url: String,
    label: String,
    #[serde(default)]
    images: Value,
    #[serde(default)]
    health_labels: Vec<String>,
    #[serde(default)]
    ingredient_lines: Vec<String>,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    cuisine_type: Vec<String>,
    #[serde(default)]
    meal_type: Vec<String>,
    #[serde(default)]
    dish_type: Vec<String>,
    #[serde(default)]
    total_nutrients: Value,
}

impl RecipeSearchClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            search_url: config.search_url.clone(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
        }
    }

    /// Searches the provider by free-text ingredients.
    ///
    /// An empty query short-circuits to `[]` without a provider round trip.
    /// Provider and transport failures also yield `[]`; the diagnostic goes
    /// to the log, never to the caller.
    pub async fn search(&self, ingredients: &str) -> Vec<RecipeRecord> {
        if ingredients.is_empty() {
            info!("Empty ingredient query, skipping provider call");
            return Vec::new();
        }

        info!("Searching recipes for: {ingredients}");

        let request = self
            .http
            .get(&self.search_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("type", "public"),
                ("q", ingredients),
                ("app_id", &self.app_id),
                ("app_key", &self.app_key),
            ]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Recipe provider unreachable: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let url = response.url().clone();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("message")?.as_str().map(str::to_owned))
                .unwrap_or_default();

            error!("Status code: {status} Error: {message} Url: {url}");
            return Vec::new();
        }

        match response.json::<SearchResponse>().await {
            Ok(body) => body.hits.into_iter().map(normalize).collect(),
            Err(e) => {
                error!("Malformed provider response: {e}");
                Vec::new()
            }
        }
    }
}

fn normalize(hit: Hit) -> RecipeRecord {
    let recipe = hit.recipe;

    RecipeRecord {
        id: derive_id(&recipe.uri),
        uri: recipe.uri,
        url: recipe.url,
        label: recipe.label,
        images: recipe.images,
        health_labels: recipe.health_labels,
        ingredient_lines: recipe.ingredient_lines,
        calories: recipe.calories,
        cuisine_type: recipe.cuisine_type,
        meal_type: recipe.meal_type,
        dish_type: recipe.dish_type,
        total_nutrients: recipe.total_nutrients,
        image: None,
    }
}
