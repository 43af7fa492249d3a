//! HTTP surface: typed request/response payloads and the axum handlers.
//!
//! Every endpoint keeps the frontend's existing contract: search returns the
//! bare record list, everything else wraps its outcome in a `{status,
//! message, ...}` envelope and errors never escape as non-200 responses.

use std::{path::Path, sync::Arc};

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    auth::{login, logout, signup},
    error::AppError,
    recipe::RecipeRecord,
    state::AppState,
};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub ingredients: String,
}

#[derive(Deserialize)]
pub struct ToggleSaveRequest {
    pub username: String,
    pub id: String,
}

#[derive(Serialize)]
pub struct ToggleSaveResponse {
    pub status: &'static str,
    pub saved: bool,
    pub message: String,
}

#[derive(Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

/// Outcome of one toggle-save call.
pub enum Toggle {
    Saved(RecipeRecord),
    Unsaved,
    NotFound,
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<RecipeRecord>> {
    let results = state.search.search(&params.ingredients).await;
    state.cache.store(&results);

    Json(results)
}

pub async fn toggle_save_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleSaveRequest>,
) -> Result<Json<ToggleSaveResponse>, AppError> {
    let response = match toggle_save(&state, &request.username, &request.id).await? {
        Toggle::Saved(record) => ToggleSaveResponse {
            status: "success",
            saved: true,
            message: format!("Saved {}", record.label),
        },
        Toggle::Unsaved => ToggleSaveResponse {
            status: "success",
            saved: false,
            message: "Recipe removed from saved recipes".to_string(),
        },
        Toggle::NotFound => ToggleSaveResponse {
            status: "error",
            saved: false,
            message: format!("Recipe {} is not in the current search results", request.id),
        },
    };

    Ok(Json(response))
}

/// The toggle-save flow: unsave if saved, otherwise resolve the record from
/// the search cache, materialize its image and save a copy.
///
/// An id the cache does not know yields [`Toggle::NotFound`] with no
/// mutation. A failed image download aborts the save; a record with no
/// remote image saves without a local one.
pub async fn toggle_save(
    state: &AppState,
    username: &str,
    recipe_id: &str,
) -> Result<Toggle, AppError> {
    if let Some(previous) = state.users.pull_saved(username, recipe_id) {
        if let Some(path) = &previous.image {
            state.images.remove(Path::new(path)).await;
        }
        info!("User {username} unsaved recipe {recipe_id}");
        return Ok(Toggle::Unsaved);
    }

    // Fail on an unknown user before the cache or any image work is touched.
    if state.users.get(username).is_none() {
        return Err(AppError::UserNotFound(username.to_string()));
    }

    let Some(record) = state.cache.lookup(recipe_id) else {
        info!("Recipe {recipe_id} not in cached search results");
        return Ok(Toggle::NotFound);
    };

    let local_path = match record.remote_image_url() {
        Some(url) => {
            let path = state.images.persist(recipe_id, url).await?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let saved = record.with_local_image(local_path);

    // A lost race means a concurrent toggle already saved this id; the copy
    // and its materialized path are identical either way.
    state.users.push_saved_if_absent(username, saved.clone())?;
    info!("User {username} saved recipe {recipe_id}");

    Ok(Toggle::Saved(saved))
}

pub async fn get_saved_recipes_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UsernameRequest>,
) -> Json<Vec<RecipeRecord>> {
    Json(state.users.saved_recipes(&request.username))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = login(&state.users, &state.sessions, &request.username, &request.password)?;

    Ok(Json(AuthResponse {
        status: "success",
        message: format!("Welcome back, {}", session.firstname),
        username: Some(session.username),
        firstname: Some(session.firstname),
        password: Some(session.password_hash),
    }))
}

pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = signup(
        &state.users,
        &state.sessions,
        &request.username,
        &request.password,
        &request.firstname,
        &request.lastname,
    )?;

    Ok(Json(AuthResponse {
        status: "success",
        message: format!("Account created for {}", session.username),
        username: Some(session.username),
        firstname: Some(session.firstname),
        password: Some(session.password_hash),
    }))
}

pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UsernameRequest>,
) -> Json<StatusResponse> {
    logout(&state.sessions, &request.username);

    Json(StatusResponse {
        status: "success",
        message: format!("{} logged out", request.username),
    })
}
