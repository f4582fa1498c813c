//! In-memory identity cache
//!
//! Users live in a single LRU arena keyed by id. A second map points access
//! tokens at arena keys, so a user reached by token and the same user reached
//! by id are always the same entry, and an in-place update such as
//! [`IdentityCache::mark_disabled`] is visible through both paths.
//!
//! ## Storage policy
//!
//! The arena holds at most `capacity` users. Inserting past that evicts the
//! least-recently-used user together with its token mapping; the next lookup
//! for that user falls through to the store. A capacity of `0` makes the
//! arena unbounded.

use chat_core::{AccessToken, User, UserId};
use chrono::{DateTime, Utc};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of users kept in memory
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of users currently cached
    pub size: usize,
    /// Maximum number of users, `None` when unbounded
    pub capacity: Option<usize>,
    /// Lookups answered from memory
    pub hits: u64,
    /// Lookups that found nothing in memory
    pub misses: u64,
    /// Users dropped to stay within capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct Indexes {
    users: LruCache<UserId, User>,
    tokens: HashMap<AccessToken, UserId>,
}

impl Indexes {
    /// Store `user` under `id`, returning how many other users were evicted
    ///
    /// A cached `disabled_at` is never cleared by a later write, and a
    /// replaced access token stops resolving.
    fn put(&mut self, id: UserId, mut user: User) -> u64 {
        let stale_token = match self.users.peek(&id) {
            Some(existing) => {
                if user.disabled_at.is_none() {
                    user.disabled_at = existing.disabled_at;
                }
                (existing.access_token != user.access_token)
                    .then(|| existing.access_token.clone())
            }
            None => None,
        };
        if let Some(token) = stale_token {
            self.drop_token(&token, &id);
        }

        match self.users.push(id.clone(), user) {
            // Same key overwritten, nothing evicted
            Some((old_id, _)) if old_id == id => 0,
            Some((evicted_id, evicted)) => {
                self.drop_token(&evicted.access_token, &evicted_id);
                1
            }
            None => 0,
        }
    }

    fn drop_token(&mut self, token: &AccessToken, id: &UserId) {
        if self.tokens.get(token) == Some(id) {
            self.tokens.remove(token);
        }
    }
}

/// Thread-safe identity cache shared by all request handlers
pub struct IdentityCache {
    indexes: Mutex<Indexes>,
    capacity: Option<NonZeroUsize>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl IdentityCache {
    /// Create a cache holding at most `capacity` users (`0` for unbounded)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity);
        let users = capacity.map_or_else(LruCache::unbounded, LruCache::new);

        Self {
            indexes: Mutex::new(Indexes {
                users,
                tokens: HashMap::new(),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Cached user for `id`
    pub fn get_by_id(&self, id: &UserId) -> Option<User> {
        let user = self.lock().users.get(id).cloned();
        self.record(user.is_some());
        user
    }

    /// Insert or overwrite the entry for `id`
    ///
    /// Does not touch the token index: a user stored only this way is not
    /// resolvable by token until [`IdentityCache::set_by_token`] or
    /// [`IdentityCache::insert`] is called for it.
    pub fn set_by_id(&self, id: UserId, user: User) {
        debug_assert_eq!(id, user.id, "cache key must match the user's id");
        let evicted = self.lock().put(id, user);
        self.evictions.fetch_add(evicted, Ordering::Relaxed);
    }

    /// Cached user for `token`
    pub fn get_by_token(&self, token: &AccessToken) -> Option<User> {
        let user = {
            let mut indexes = self.lock();
            match indexes.tokens.get(token).cloned() {
                Some(id) => {
                    let user = indexes.users.get(&id).cloned();
                    if user.is_none() {
                        indexes.tokens.remove(token);
                    }
                    user
                }
                None => None,
            }
        };
        self.record(user.is_some());
        user
    }

    /// Insert or overwrite the entry for `token`
    ///
    /// The user itself is stored in the arena under its own id.
    pub fn set_by_token(&self, token: AccessToken, user: User) {
        let evicted = {
            let mut indexes = self.lock();
            let id = user.id.clone();
            let evicted = indexes.put(id.clone(), user);
            indexes.tokens.insert(token, id);
            evicted
        };
        self.evictions.fetch_add(evicted, Ordering::Relaxed);
    }

    /// Make `user` resolvable by both id and token
    pub fn insert(&self, user: User) {
        self.set_by_token(user.access_token.clone(), user);
    }

    /// Apply a soft-delete timestamp to a cached user
    ///
    /// Returns `false` if the user is not cached.
    pub fn mark_disabled(&self, id: &UserId, at: DateTime<Utc>) -> bool {
        match self.lock().users.peek_mut(id) {
            Some(user) => {
                user.disabled_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// Drop a user and its token mapping
    pub fn evict(&self, id: &UserId) -> Option<User> {
        let mut indexes = self.lock();
        let user = indexes.users.pop(id)?;
        indexes.drop_token(&user.access_token, id);
        Some(user)
    }

    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity.map(NonZeroUsize::get),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    // Map operations cannot leave the indexes half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Indexes> {
        self.indexes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
