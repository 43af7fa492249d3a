use std::{sync::Arc, time::Duration};

use reqwest::Client;

use crate::{
    auth::Sessions,
    cache::SearchCache,
    config::Config,
    image::ImageMaterializer,
    search::RecipeSearchClient,
    store::UserStore,
};

pub struct AppState {
    pub config: Config,
    pub search: RecipeSearchClient,
    pub cache: SearchCache,
    pub users: UserStore,
    pub sessions: Sessions,
    pub images: ImageMaterializer,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Self::with_config(Config::load())
    }

    pub fn with_config(config: Config) -> Arc<Self> {
        let http = Client::new();

        let search = RecipeSearchClient::new(http.clone(), &config);
        let cache = SearchCache::new(Duration::from_secs(config.cache_ttl_secs));
        let images = ImageMaterializer::new(http, config.image_dir.clone());

        Arc::new(Self {
            config,
            search,
            cache,
            users: UserStore::new(),
            sessions: Sessions::new(),
            images,
        })
    }
}
