use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub search_url: String,
    pub app_id: String,
    pub app_key: String,
    pub image_dir: PathBuf,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            search_url: try_load("RECIPE_SEARCH_URL", "https://api.edamam.com/api/recipes/v2"),
            app_id: require("APPLICATION_ID"),
            app_key: require("APPLICATION_KEY"),
            image_dir: try_load("IMAGE_DIR", "data/images"),
            cache_ttl_secs: try_load("CACHE_TTL_SECS", "600"),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            port: 0,
            search_url: "http://127.0.0.1:1/v2".into(),
            app_id: "test_app_id".into(),
            app_key: "test_app_key".into(),
            image_dir: PathBuf::from("data/images"),
            cache_ttl_secs: 600,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Provider credentials misconfigured!")
}
