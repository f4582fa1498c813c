//! Chat Core
//!
//! Domain types, traits, and error handling shared by the chat identity layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `UserId`, `AccessToken`, `UserState`
//! - **Core Traits**: `UserStore`, the durable source of truth behind the identity cache
//! - **Error Handling**: Unified `ChatError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use chat_core::types::{AccessToken, User, UserId, UserState};
//! use chrono::Utc;
//!
//! let user = User::new(
//!     UserId::new("k3Jd9aQx"),
//!     AccessToken::new("c2VjcmV0LXRva2Vu"),
//!     "Quiet Otter",
//!     212.0,
//!     Utc::now(),
//! );
//!
//! assert_eq!(user.state(), UserState::Active);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ChatError, Result};
pub use traits::UserStore;
pub use types::{AccessToken, User, UserId, UserState};
