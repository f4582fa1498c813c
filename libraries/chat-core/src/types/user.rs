/// User domain type
use super::ids::{AccessToken, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state derived from `disabled_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    /// `disabled_at` is absent
    Active,
    /// Soft-deleted; the record is kept so history still resolves
    Disabled,
}

/// Anonymous chat user
///
/// Immutable once created, except for `disabled_at`, which moves from
/// `None` to `Some` at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Unique bearer credential
    pub access_token: AccessToken,

    /// Generated display name (not guaranteed unique)
    pub display_name: String,

    /// Display hue in degrees, `[0, 360)`
    pub display_color: f64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Soft-delete timestamp
    pub disabled_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user
    pub fn new(
        id: UserId,
        access_token: AccessToken,
        display_name: impl Into<String>,
        display_color: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            access_token,
            display_name: display_name.into(),
            display_color,
            created_at,
            disabled_at: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> UserState {
        if self.disabled_at.is_some() {
            UserState::Disabled
        } else {
            UserState::Active
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.state() == UserState::Disabled
    }
}
