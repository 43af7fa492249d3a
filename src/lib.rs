//! Recipe finder backend.
//!
//! A thin HTTP service in front of a recipe-search provider: the frontend
//! searches by free-text ingredients, the backend proxies the query with its
//! server-side credentials and trims each hit down to the fields the pages
//! actually render. Authenticated users can toggle-save recipes; a save
//! resolves the full record from the ephemeral search cache, downloads the
//! recipe image to local disk, and appends a copy to the user's saved list.
//! Unsaving removes the entry and best-effort deletes the image.
//!
//!
//!
//! # Request flow
//!
//! - `GET /search` → provider call → normalized records → result cache
//! - `POST /toggle-save-recipe` → cache lookup by id → image materialization
//!   → atomic push/pull on the user document
//! - `POST /get-saved-recipes` → user's saved list as stored
//! - `POST /signup`, `/login`, `/logout` → bcrypt-backed credentials plus a
//!   per-user session set
//!
//! Handler failures always render as a `{status: "error", message}` body on
//! a 200 response; the frontend branches on `status`, not on HTTP codes.
//!
//!
//!
//! # Configuration
//!
//! Environment variables, defaults logged at startup:
//! - `RUST_PORT`: listen port (default 1111)
//! - `RECIPE_SEARCH_URL`: provider endpoint
//! - `APPLICATION_ID`, `APPLICATION_KEY`: provider credentials (required)
//! - `IMAGE_DIR`: where saved recipe images land (default `data/images`)
//! - `CACHE_TTL_SECS`: search result cache lifetime (default 600)

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod image;
pub mod recipe;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;

use routes::{
    get_saved_recipes_handler, login_handler, logout_handler, search_handler, signup_handler,
    toggle_save_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/search", get(search_handler))
        .route("/toggle-save-recipe", post(toggle_save_handler))
        .route("/get-saved-recipes", post(get_saved_recipes_handler))
        .route("/login", post(login_handler))
        .route("/signup", post(signup_handler))
        .route("/logout", post(logout_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
