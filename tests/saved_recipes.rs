use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use recipe_finder::auth::{login, logout, signup};
use recipe_finder::config::Config;
use recipe_finder::error::AppError;
use recipe_finder::recipe::RecipeRecord;
use recipe_finder::routes::{toggle_save, Toggle};
use recipe_finder::state::AppState;

fn state_with_image_dir(dir: &Path) -> Arc<AppState> {
    AppState::with_config(Config {
        port: 0,
        search_url: "http://127.0.0.1:1/v2".into(),
        app_id: "test_app_id".into(),
        app_key: "test_app_key".into(),
        image_dir: dir.to_path_buf(),
        cache_ttl_secs: 600,
    })
}

fn record(id: &str, label: &str) -> RecipeRecord {
    RecipeRecord {
        id: id.into(),
        uri: format!("http://www.edamam.com/ontologies/recipe.owl#recipe_{id}"),
        url: format!("http://example.com/{id}"),
        label: label.into(),
        // No remote image, so saving needs no network.
        images: Value::Null,
        health_labels: vec!["Vegan".into()],
        ingredient_lines: vec!["1 cup lentils".into()],
        calories: 320.5,
        cuisine_type: vec!["mediterranean".into()],
        meal_type: vec!["lunch/dinner".into()],
        dish_type: vec!["soup".into()],
        total_nutrients: json!({"ENERC_KCAL": {"quantity": 320.5}}),
        image: None,
    }
}

#[tokio::test]
async fn signup_search_save_list_unsave_flow() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let state = state_with_image_dir(tmp.path());

    let session = signup(
        &state.users,
        &state.sessions,
        "ada",
        "correct horse",
        "Ada",
        "Lovelace",
    )?;
    assert_eq!(session.username, "ada");
    assert!(state.sessions.is_active("ada"));

    // A search lands its results in the cache.
    state
        .cache
        .store(&[record("r1", "Lentil Soup"), record("r2", "Falafel")]);

    // Save both, then unsave one.
    for id in ["r1", "r2"] {
        match toggle_save(&state, "ada", id).await {
            Ok(Toggle::Saved(copy)) => assert_eq!(copy.id, id),
            other => panic!("expected save of {id}, got {}", outcome_name(&other)),
        }
    }
    match toggle_save(&state, "ada", "r1").await {
        Ok(Toggle::Unsaved) => {}
        other => panic!("expected unsave, got {}", outcome_name(&other)),
    }

    let saved = state.users.saved_recipes("ada");
    let ids: Vec<&str> = saved.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r2"]);

    // An id no search produced is NOT_FOUND and mutates nothing.
    match toggle_save(&state, "ada", "r99").await {
        Ok(Toggle::NotFound) => {}
        other => panic!("expected not-found, got {}", outcome_name(&other)),
    }
    assert_eq!(state.users.saved_recipes("ada").len(), 1);

    Ok(())
}

#[tokio::test]
async fn save_materializes_image_from_remote_host() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let state = state_with_image_dir(tmp.path());

    signup(&state.users, &state.sessions, "ada", "pw", "Ada", "Lovelace")?;

    // A local stand-in for the provider's image CDN.
    let app = axum::Router::new().route(
        "/r1.jpg",
        axum::routing::get(|| async { &b"jpeg bytes from cdn"[..] }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut cached = record("r1", "Lentil Soup");
    cached.images = json!({"REGULAR": {"url": format!("http://{addr}/r1.jpg")}});
    state.cache.store(&[cached]);

    let copy = match toggle_save(&state, "ada", "r1").await {
        Ok(Toggle::Saved(copy)) => copy,
        other => panic!("expected save, got {}", outcome_name(&other)),
    };

    // The saved copy carries a local image path and the file holds the
    // downloaded bytes; the cached record stays image-free.
    let image_path = PathBuf::from(copy.image.as_deref().expect("saved copy has a local image"));
    assert!(image_path.exists());
    assert_eq!(std::fs::read(&image_path)?, b"jpeg bytes from cdn");
    assert!(state.cache.lookup("r1").unwrap().image.is_none());

    let saved = state.users.saved_recipes("ada");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].image, copy.image);

    Ok(())
}

#[tokio::test]
async fn unsave_removes_the_image_file() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let state = state_with_image_dir(tmp.path());

    signup(&state.users, &state.sessions, "ada", "pw", "Ada", "Lovelace")?;

    let image_path: PathBuf = state.images.write("r1", b"jpeg bytes").await?;
    assert!(image_path.exists());

    let saved = record("r1", "Lentil Soup").with_local_image(Some(image_path.display().to_string()));
    state.users.push_saved_if_absent("ada", saved)?;

    match toggle_save(&state, "ada", "r1").await {
        Ok(Toggle::Unsaved) => {}
        other => panic!("expected unsave, got {}", outcome_name(&other)),
    }
    assert!(!image_path.exists());
    assert!(state.users.saved_recipes("ada").is_empty());

    Ok(())
}

#[tokio::test]
async fn login_logout_round_trip() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let state = state_with_image_dir(tmp.path());

    signup(&state.users, &state.sessions, "ada", "pw", "Ada", "Lovelace")?;
    logout(&state.sessions, "ada");
    assert!(!state.sessions.is_active("ada"));

    assert!(matches!(
        login(&state.users, &state.sessions, "ada", "wrong"),
        Err(AppError::WrongPassword)
    ));
    assert!(matches!(
        login(&state.users, &state.sessions, "ghost", "pw"),
        Err(AppError::UserNotFound(_))
    ));

    let session = login(&state.users, &state.sessions, "ada", "pw")?;
    assert_eq!(session.username, "ada");
    assert_eq!(session.firstname, "Ada");
    assert!(state.sessions.is_active("ada"));

    Ok(())
}

fn outcome_name<T>(outcome: &Result<Toggle, T>) -> &'static str {
    match outcome {
        Ok(Toggle::Saved(_)) => "saved",
        Ok(Toggle::Unsaved) => "unsaved",
        Ok(Toggle::NotFound) => "not-found",
        Err(_) => "error",
    }
}
