//! Identity service: anonymous registration and caller resolution

use crate::cache::IdentityCache;
use crate::error::{IdentityError, Result};
use crate::generator::IdentityGenerator;
use chat_core::{AccessToken, User, UserId, UserStore};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

/// Fresh ids are generated again when a write hits a uniqueness conflict,
/// up to this many attempts in total
const MAX_REGISTRATION_ATTEMPTS: u32 = 3;

/// Orchestrates the generator, the cache and the store
///
/// This is the only identity component other modules call directly.
pub struct IdentityService {
    cache: Arc<IdentityCache>,
    store: Arc<dyn UserStore>,
    generator: Arc<dyn IdentityGenerator>,
}

impl IdentityService {
    pub fn new(
        cache: Arc<IdentityCache>,
        store: Arc<dyn UserStore>,
        generator: Arc<dyn IdentityGenerator>,
    ) -> Self {
        Self {
            cache,
            store,
            generator,
        }
    }

    /// The cache backing this service
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Create, persist and cache a new anonymous user
    ///
    /// The user is only cached once the store has committed it, so a
    /// failed registration leaves no trace anywhere.
    ///
    /// # Errors
    /// - `IdentityError::Generation` if no access token could be generated
    /// - `IdentityError::PersistenceUnavailable` if the store rejected the write
    pub async fn register_anonymous_user(&self) -> Result<User> {
        let mut attempt = 1;

        loop {
            let user = self.new_user()?;

            match self.store.insert(&user).await {
                Ok(()) => {
                    self.cache.insert(user.clone());
                    tracing::info!(user_id = %user.id, "Registered anonymous user");
                    return Ok(user);
                }
                Err(e) if e.is_duplicate() && attempt < MAX_REGISTRATION_ATTEMPTS => {
                    tracing::warn!(attempt, "Generated identity collided, retrying: {}", e);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Unable to persist new user: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Resolve a user by id, cache first
    ///
    /// On a cache miss the store is consulted and a hit is cached under the
    /// id only. Store failures are logged and reported as absence.
    pub async fn resolve_by_id(&self, id: &UserId) -> Option<User> {
        if let Some(user) = self.cache.get_by_id(id) {
            return Some(user);
        }

        tracing::debug!(user_id = %id, "Identity cache miss by id");

        match self.store.find_by_id(id).await {
            Ok(Some(user)) => {
                self.cache.set_by_id(id.clone(), user.clone());
                Some(user)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(user_id = %id, "User lookup by id failed: {}", e);
                None
            }
        }
    }

    /// Resolve a user by access token, cache first
    ///
    /// Symmetric to [`IdentityService::resolve_by_id`]; a store hit is cached
    /// under the token.
    pub async fn resolve_by_token(&self, token: &AccessToken) -> Option<User> {
        if let Some(user) = self.cache.get_by_token(token) {
            return Some(user);
        }

        tracing::debug!("Identity cache miss by token");

        match self.store.find_by_token(token).await {
            Ok(Some(user)) => {
                self.cache.set_by_token(token.clone(), user.clone());
                Some(user)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("User lookup by token failed: {}", e);
                None
            }
        }
    }

    /// Soft-disable a user
    ///
    /// The store keeps the row; the cache ends up holding the user with the
    /// same timestamp so lookups by id and by token agree.
    ///
    /// # Errors
    /// - `IdentityError::UnknownUser` if the store has no such user
    /// - `IdentityError::PersistenceUnavailable` if the update failed
    pub async fn disable(&self, user: &User) -> Result<User> {
        let disabled_at = self
            .store
            .disable(&user.id)
            .await?
            .ok_or_else(|| IdentityError::UnknownUser(user.id.clone()))?;

        let mut disabled = user.clone();
        disabled.disabled_at = Some(disabled_at);

        // Caching the disabled copy on a miss means a lookup still in flight
        // cannot reinstate the active user
        if !self.cache.mark_disabled(&user.id, disabled_at) {
            self.cache.insert(disabled.clone());
        }
        tracing::info!(user_id = %user.id, "Disabled user");

        Ok(disabled)
    }

    fn new_user(&self) -> Result<User> {
        let id = self.generator.generate_id();
        let access_token = self.generator.generate_access_token().map_err(|e| {
            tracing::error!("Unable to create access token for new user: {}", e);
            e
        })?;

        Ok(User::new(
            id,
            access_token,
            self.generator.generate_display_name(),
            self.generator.generate_display_color(),
            // Millisecond precision matches what the store keeps
            Utc::now().trunc_subsecs(3),
        ))
    }
}
