//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use chat_core::{AccessToken, ChatError, User, UserId, UserStore};
use chat_identity::{
    GenerationError, IdentityCache, IdentityGenerator, IdentityService, RandomIdentityGenerator,
};
use chat_storage::SqliteUserStore;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// File-backed SQLite store that cleans up on drop
pub struct TestStore {
    pub store: Arc<SqliteUserStore>,
    _temp_dir: TempDir,
}

impl TestStore {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = chat_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        chat_storage::create_schema(&pool)
            .await
            .expect("Failed to create schema");

        Self {
            store: Arc::new(SqliteUserStore::new(pool)),
            _temp_dir: temp_dir,
        }
    }
}

/// Store wrapper that counts every call reaching the inner store
pub struct CountingStore {
    inner: Arc<dyn UserStore>,
    pub inserts: AtomicUsize,
    pub id_lookups: AtomicUsize,
    pub token_lookups: AtomicUsize,
    pub disables: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn UserStore>) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            id_lookups: AtomicUsize::new(0),
            token_lookups: AtomicUsize::new(0),
            disables: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.id_lookups.load(Ordering::SeqCst) + self.token_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn insert(&self, user: &User) -> chat_core::Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> chat_core::Result<Option<User>> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_by_token(&self, token: &AccessToken) -> chat_core::Result<Option<User>> {
        self.token_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_token(token).await
    }

    async fn disable(&self, id: &UserId) -> chat_core::Result<Option<DateTime<Utc>>> {
        self.disables.fetch_add(1, Ordering::SeqCst);
        self.inner.disable(id).await
    }
}

/// Store whose lookups return only after a delay, as a busy database would
pub struct SlowLookupStore {
    inner: Arc<dyn UserStore>,
    delay: Duration,
}

impl SlowLookupStore {
    pub fn new(inner: Arc<dyn UserStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl UserStore for SlowLookupStore {
    async fn insert(&self, user: &User) -> chat_core::Result<()> {
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> chat_core::Result<Option<User>> {
        let user = self.inner.find_by_id(id).await;
        tokio::time::sleep(self.delay).await;
        user
    }

    async fn find_by_token(&self, token: &AccessToken) -> chat_core::Result<Option<User>> {
        let user = self.inner.find_by_token(token).await;
        tokio::time::sleep(self.delay).await;
        user
    }

    async fn disable(&self, id: &UserId) -> chat_core::Result<Option<DateTime<Utc>>> {
        self.inner.disable(id).await
    }
}

/// Store whose every operation fails as an unreachable database would
pub struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn insert(&self, _user: &User) -> chat_core::Result<()> {
        Err(ChatError::storage("database is locked"))
    }

    async fn find_by_id(&self, _id: &UserId) -> chat_core::Result<Option<User>> {
        Err(ChatError::storage("database is locked"))
    }

    async fn find_by_token(&self, _token: &AccessToken) -> chat_core::Result<Option<User>> {
        Err(ChatError::storage("database is locked"))
    }

    async fn disable(&self, _id: &UserId) -> chat_core::Result<Option<DateTime<Utc>>> {
        Err(ChatError::storage("database is locked"))
    }
}

/// Generator whose entropy source always fails
pub struct BrokenEntropyGenerator;

impl IdentityGenerator for BrokenEntropyGenerator {
    fn generate_id(&self) -> UserId {
        UserId::new("never-used")
    }

    fn generate_access_token(&self) -> Result<AccessToken, GenerationError> {
        Err(GenerationError::new("entropy source unavailable"))
    }

    fn generate_display_name(&self) -> String {
        "Nobody".to_string()
    }

    fn generate_display_color(&self) -> f64 {
        0.0
    }
}

/// Generator that hands out scripted ids, then falls back to random ones
pub struct ScriptedIdGenerator {
    ids: Mutex<VecDeque<&'static str>>,
    tokens: AtomicU32,
}

impl ScriptedIdGenerator {
    pub fn new(ids: &[&'static str]) -> Self {
        Self {
            ids: Mutex::new(ids.iter().copied().collect()),
            tokens: AtomicU32::new(0),
        }
    }
}

impl IdentityGenerator for ScriptedIdGenerator {
    fn generate_id(&self) -> UserId {
        match self.ids.lock().unwrap().pop_front() {
            Some(id) => UserId::new(id),
            None => RandomIdentityGenerator::new().generate_id(),
        }
    }

    fn generate_access_token(&self) -> Result<AccessToken, GenerationError> {
        let n = self.tokens.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new(format!("scripted-token-{n}")))
    }

    fn generate_display_name(&self) -> String {
        "Scripted Wren".to_string()
    }

    fn generate_display_color(&self) -> f64 {
        42.0
    }
}

/// Service over a real SQLite store, with call counting
pub async fn counting_service() -> (
    Arc<IdentityService>,
    Arc<CountingStore>,
    TestStore,
) {
    let db = TestStore::new().await;
    let store = Arc::new(CountingStore::new(
        Arc::clone(&db.store) as Arc<dyn UserStore>
    ));
    let service = IdentityService::new(
        Arc::new(IdentityCache::default()),
        Arc::clone(&store) as Arc<dyn UserStore>,
        Arc::new(RandomIdentityGenerator::new()),
    );
    (Arc::new(service), store, db)
}
