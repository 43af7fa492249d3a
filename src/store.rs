//! Per-user document store.
//!
//! One document per user, keyed by username, holding the profile and the
//! saved recipe list. All mutations are single conditional updates taken
//! under the store lock, so a toggle commits exactly one state transition
//! even when the same (user, recipe) pair races: the loser of a save race
//! sees `push_saved_if_absent` return `false` instead of inserting a
//! duplicate.

use std::{collections::HashMap, sync::RwLock};

use serde::{Deserialize, Serialize};

use crate::{error::AppError, recipe::RecipeRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub saved_recipes: Vec<RecipeRecord>,
}

#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new user document. Username uniqueness is the only
    /// validation performed.
    pub fn create(&self, user: User) -> Result<(), AppError> {
        let mut users = self.users.write().unwrap();

        if users.contains_key(&user.username) {
            return Err(AppError::DuplicateUser(user.username));
        }

        users.insert(user.username.clone(), user);
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<User> {
        self.users.read().unwrap().get(username).cloned()
    }

    /// The user's saved recipes, in save order. Unknown users read as empty
    /// rather than erroring, matching the list endpoint contract.
    pub fn saved_recipes(&self, username: &str) -> Vec<RecipeRecord> {
        self.users
            .read()
            .unwrap()
            .get(username)
            .map(|user| user.saved_recipes.clone())
            .unwrap_or_default()
    }

    /// Removes and returns the saved entry with this recipe id, if present.
    pub fn pull_saved(&self, username: &str, recipe_id: &str) -> Option<RecipeRecord> {
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(username)?;
        let index = user
            .saved_recipes
            .iter()
            .position(|record| record.id == recipe_id)?;

        Some(user.saved_recipes.remove(index))
    }

    /// Appends the record unless an entry with its id is already saved.
    /// Returns whether the insert happened; `false` means a concurrent save
    /// won the race and the list is unchanged.
    pub fn push_saved_if_absent(&self, username: &str, record: RecipeRecord) -> Result<bool, AppError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(username)
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        if user.saved_recipes.iter().any(|saved| saved.id == record.id) {
            return Ok(false);
        }

        user.saved_recipes.push(record);
        Ok(true)
    }
}
