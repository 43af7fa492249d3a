//! Credential handling and session tracking.
//!
//! Passwords are stored as bcrypt hashes only; verification goes through the
//! same primitive, which is slow and salted by construction. Successful
//! logins re-hash the password for the response payload; the stored hash is
//! never rewritten by a login. Sessions are a per-user flag set: login and
//! signup mark a username active, logout clears it. There is no token or
//! expiry model.

use std::{
    collections::HashSet,
    sync::Mutex,
};

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::info;

use crate::{
    error::AppError,
    store::{User, UserStore},
};

/// Active usernames. Replaces the old process-wide "someone is logged in"
/// flag with one entry per user.
#[derive(Default)]
pub struct Sessions {
    active: Mutex<HashSet<String>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, username: &str) {
        self.active.lock().unwrap().insert(username.to_string());
    }

    pub fn close(&self, username: &str) {
        self.active.lock().unwrap().remove(username);
    }

    pub fn is_active(&self, username: &str) -> bool {
        self.active.lock().unwrap().contains(username)
    }
}

/// Successful signup/login payload: the profile plus the hash the response
/// exposes (stored hash on signup, a fresh response-only re-hash on login).
pub struct AuthSession {
    pub username: String,
    pub firstname: String,
    pub password_hash: String,
}

pub fn signup(
    users: &UserStore,
    sessions: &Sessions,
    username: &str,
    password: &str,
    firstname: &str,
    lastname: &str,
) -> Result<AuthSession, AppError> {
    let password_hash = hash(password, DEFAULT_COST)?;

    users.create(User {
        username: username.to_string(),
        password: password_hash.clone(),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        saved_recipes: Vec::new(),
    })?;

    info!("User {username} signed up");
    sessions.open(username);

    Ok(AuthSession {
        username: username.to_string(),
        firstname: firstname.to_string(),
        password_hash,
    })
}

pub fn login(
    users: &UserStore,
    sessions: &Sessions,
    username: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let user = users
        .get(username)
        .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

    if !verify(password, &user.password)? {
        return Err(AppError::WrongPassword);
    }

    // Response-only re-hash; the stored hash stays as signed up.
    let password_hash = hash(password, DEFAULT_COST)?;

    info!("User {username} logged in");
    sessions.open(username);

    Ok(AuthSession {
        username: user.username,
        firstname: user.firstname,
        password_hash,
    })
}

pub fn logout(sessions: &Sessions, username: &str) {
    info!("User {username} logged out");
    sessions.close(username);
}
