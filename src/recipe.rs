//! Recipe records as served to the frontend.
//!
//! The provider returns far more per hit than the frontend needs; only the
//! fields below survive normalization. `images` and `total_nutrients` stay as
//! raw JSON because the frontend consumes them verbatim and their nested
//! shapes are owned by the provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized recipe, either fresh from a search or saved to a user.
///
/// `image` is the local materialized path and is only present on saved
/// copies; cached search results never carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub id: String,
    pub uri: String,
    pub url: String,
    pub label: String,
    #[serde(default)]
    pub images: Value,
    #[serde(default)]
    pub health_labels: Vec<String>,
    #[serde(default)]
    pub ingredient_lines: Vec<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub cuisine_type: Vec<String>,
    #[serde(default)]
    pub meal_type: Vec<String>,
    #[serde(default)]
    pub dish_type: Vec<String>,
    #[serde(default)]
    pub total_nutrients: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RecipeRecord {
    /// Best remote image URL for materialization, largest size first.
    pub fn remote_image_url(&self) -> Option<&str> {
        ["REGULAR", "SMALL", "THUMBNAIL"]
            .iter()
            .find_map(|size| self.images.get(size)?.get("url")?.as_str())
    }

    pub fn with_local_image(mut self, path: Option<String>) -> Self {
        self.image = path;
        self
    }
}

/// Derives the stable recipe id from the provider URI.
///
/// Edamam URIs end in `#recipe_<hex>`; the fragment minus the `recipe_`
/// prefix is the id. Anything unexpected falls back to the sanitized URI so
/// the id stays usable as a filename stem.
pub fn derive_id(uri: &str) -> String {
    let fragment = uri.rsplit_once('#').map(|(_, f)| f).unwrap_or(uri);
    let raw = fragment.strip_prefix("recipe_").unwrap_or(fragment);

    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Fully populated record for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn sample() -> RecipeRecord {
    use serde_json::json;

    RecipeRecord {
        id: "r1".into(),
        uri: "http://www.edamam.com/ontologies/recipe.owl#recipe_r1".into(),
        url: "http://example.com/r1".into(),
        label: "Lentil Soup".into(),
        images: json!({
            "THUMBNAIL": {"url": "http://img/thumb.jpg"},
            "REGULAR": {"url": "http://img/regular.jpg"},
        }),
        health_labels: vec!["Vegan".into()],
        ingredient_lines: vec!["1 cup lentils".into()],
        calories: 320.5,
        cuisine_type: vec!["mediterranean".into()],
        meal_type: vec!["lunch/dinner".into()],
        dish_type: vec!["soup".into()],
        total_nutrients: json!({"ENERC_KCAL": {"label": "Energy", "quantity": 320.5, "unit": "kcal"}}),
        image: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_comes_from_uri_fragment() {
        let uri = "http://www.edamam.com/ontologies/recipe.owl#recipe_b79327d05b8e5b838ad6cfd9576b30b6";
        assert_eq!(derive_id(uri), "b79327d05b8e5b838ad6cfd9576b30b6");
    }

    #[test]
    fn id_fallback_is_filename_safe() {
        assert_eq!(derive_id("http://x/y"), "http___x_y");
        assert_eq!(derive_id("plain#abc-1"), "abc_1");
    }

    #[test]
    fn prefers_largest_image_size() {
        let mut record = sample();
        assert_eq!(record.remote_image_url(), Some("http://img/regular.jpg"));

        record.images = json!({"THUMBNAIL": {"url": "http://img/thumb.jpg"}});
        assert_eq!(record.remote_image_url(), Some("http://img/thumb.jpg"));

        record.images = Value::Null;
        assert_eq!(record.remote_image_url(), None);
    }

    #[test]
    fn saved_copy_carries_local_path() {
        let record = sample();
        assert!(record.image.is_none());

        let saved = record.with_local_image(Some("data/images/r1.jpg".into()));
        assert_eq!(saved.image.as_deref(), Some("data/images/r1.jpg"));
    }
}
