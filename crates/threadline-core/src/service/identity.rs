//! User registration and API key authentication.
//!
//! Keys are shown exactly once, at creation. Only their hash is persisted.

use std::sync::Arc;

use chrono::Utc;
use threadline_types::error::{IdentityError, RepositoryError};
use threadline_types::user::{User, UserId};
use tracing::{debug, info, warn};

use crate::repository::user::UserRepository;
use crate::service::keys::ApiKeyIssuer;

/// Name recorded for the key issued alongside a new user.
const INITIAL_KEY_NAME: &str = "default";

/// A freshly registered user and the only copy of their plaintext key.
#[derive(Debug, Clone)]
pub struct IssuedUser {
    pub user: User,
    pub api_key: String,
}

pub struct IdentityService<U: UserRepository, K: ApiKeyIssuer> {
    repo: Arc<U>,
    issuer: K,
}

impl<U: UserRepository, K: ApiKeyIssuer> IdentityService<U, K> {
    pub fn new(repo: Arc<U>, issuer: K) -> Self {
        Self { repo, issuer }
    }

    /// Register `email` and issue its first API key.
    pub async fn create_user(&self, email: &str) -> Result<IssuedUser, IdentityError> {
        let email = normalize_email(email)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(IdentityError::EmailTaken(email));
        }

        let user = User {
            id: UserId::new(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        let api_key = self.issuer.generate();
        let user = self
            .repo
            .create_user_with_key(&user, &self.issuer.hash(&api_key), INITIAL_KEY_NAME)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => IdentityError::EmailTaken(email.clone()),
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User created");
        Ok(IssuedUser { user, api_key })
    }

    /// Resolve a presented plaintext key to its user.
    pub async fn authenticate(&self, api_key: &str) -> Result<User, IdentityError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(IdentityError::InvalidKey);
        }

        let key_hash = self.issuer.hash(api_key);
        let user = self
            .repo
            .find_user_by_key_hash(&key_hash)
            .await?
            .ok_or(IdentityError::InvalidKey)?;

        if let Err(e) = self.repo.touch_api_key(&key_hash).await {
            warn!(user_id = %user.id, error = %e, "Failed to update API key last_used_at");
        }
        debug!(user_id = %user.id, "Authenticated");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<User, IdentityError> {
        self.repo
            .get_user(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, IdentityError> {
        let email = normalize_email(email)?;
        self.repo
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }
}

/// Trim and lowercase, then check for a `local@domain.tld` shape.
pub fn normalize_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(IdentityError::InvalidEmail(email))
    }
}
