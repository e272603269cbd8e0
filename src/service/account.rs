//! Account service
//!
//! Registration and credential checks against the users dataset.

use std::sync::Arc;

use crate::auth::{hash_password, verify_password};
use crate::data::{RecordStore, User};
use crate::error::AppError;
use crate::metrics::USERS_TOTAL;

/// Account service
pub struct AccountService {
    store: Arc<RecordStore>,
}

impl AccountService {
    /// Create new account service
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Register a new user
    ///
    /// # Errors
    /// `Validation` if either field is empty, `Conflict` if the username
    /// is taken. Nothing is written in either case.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".to_string(),
            ));
        }

        // Fast-path guard before the expensive hash.
        if self.user_exists(username).await? {
            return Err(AppError::Conflict("username is already taken".to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        let total = self
            .store
            .update(|users: &mut Vec<User>| {
                if users.iter().any(|user| user.username == username) {
                    return Err(AppError::Conflict("username is already taken".to_string()));
                }
                users.push(User {
                    username: username.to_string(),
                    password_hash,
                });
                Ok(users.len())
            })
            .await?;

        USERS_TOTAL.set(total as i64);
        tracing::info!(username = %username, "User registered");
        Ok(())
    }

    /// Check a username/password pair
    ///
    /// # Errors
    /// `Unauthorized` unless a user with exactly this username exists and
    /// the password verifies.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(), AppError> {
        let users = self.store.load::<User>().await?;
        let Some(user) = users.into_iter().find(|user| user.username == username) else {
            tracing::debug!(username = %username, "Login for unknown user");
            return Err(AppError::Unauthorized);
        };

        let password = password.to_string();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &user.password_hash))
                .await
                .map_err(|e| AppError::Internal(e.into()))?;

        if !verified {
            tracing::debug!(username = %username, "Login with wrong password");
            return Err(AppError::Unauthorized);
        }

        Ok(())
    }

    /// Whether a username is registered
    pub async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        let users = self.store.load::<User>().await?;
        Ok(users.iter().any(|user| user.username == username))
    }
}
