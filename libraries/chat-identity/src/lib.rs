//! Chat Identity
//!
//! Issues anonymous chat identities and resolves callers back to them.
//!
//! # Architecture
//!
//! - **`IdentityGenerator`**: ids, access tokens, display names and colors
//! - **`IdentityCache`**: bounded in-memory arena of users, indexed by id and
//!   by access token
//! - **`IdentityService`**: the entry point; cache-first lookups that fall
//!   back to a [`chat_core::UserStore`] and populate the cache on a hit
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_identity::{IdentityCache, IdentityService, RandomIdentityGenerator};
//! use chat_storage::{create_pool, create_schema, SqliteUserStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://chat.db").await?;
//! create_schema(&pool).await?;
//!
//! let service = IdentityService::new(
//!     Arc::new(IdentityCache::new(10_000)),
//!     Arc::new(SqliteUserStore::new(pool)),
//!     Arc::new(RandomIdentityGenerator::new()),
//! );
//!
//! let user = service.register_anonymous_user().await?;
//! let same = service.resolve_by_token(&user.access_token).await;
//! assert_eq!(same.as_ref(), Some(&user));
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod error;
pub mod generator;
pub mod service;

pub use cache::{CacheStats, IdentityCache};
pub use error::{IdentityError, Result};
pub use generator::{GenerationError, IdentityGenerator, RandomIdentityGenerator};
pub use service::IdentityService;
