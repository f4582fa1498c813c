//! Random identity material: ids, access tokens, display names, colors

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chat_core::{AccessToken, UserId};
use rand::{rngs::OsRng, Rng, RngCore};
use thiserror::Error;

/// Length of generated user ids
pub const ID_LENGTH: usize = 10;

/// Number of random bytes behind each access token
pub const ACCESS_TOKEN_BYTES: usize = 32;

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

const ADJECTIVES: &[&str] = &[
    "Amber", "Bold", "Brave", "Bright", "Calm", "Clever", "Cosmic", "Curious", "Daring", "Eager",
    "Gentle", "Golden", "Happy", "Jolly", "Keen", "Lucky", "Mellow", "Misty", "Nimble", "Quiet",
    "Rapid", "Silver", "Sunny", "Swift", "Tidy", "Vivid", "Wild", "Witty",
];

const NOUNS: &[&str] = &[
    "Badger", "Comet", "Crane", "Falcon", "Finch", "Fox", "Gecko", "Heron", "Ibis", "Koala",
    "Lark", "Lynx", "Marten", "Moose", "Newt", "Otter", "Owl", "Panda", "Puffin", "Raven",
    "Robin", "Seal", "Sparrow", "Stoat", "Tiger", "Walrus", "Wombat", "Wren",
];

/// The entropy source could not produce token bytes
#[derive(Debug, Error)]
#[error("failed to generate access token: {0}")]
pub struct GenerationError(String);

impl GenerationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<rand::Error> for GenerationError {
    fn from(err: rand::Error) -> Self {
        Self(err.to_string())
    }
}

/// Source of identity material for new anonymous users
///
/// Injected into the identity service so tests can substitute deterministic
/// or failing generators.
pub trait IdentityGenerator: Send + Sync {
    /// Short unique identifier
    fn generate_id(&self) -> UserId;

    /// Opaque bearer credential
    ///
    /// # Errors
    /// Returns `GenerationError` if the entropy source fails
    fn generate_access_token(&self) -> Result<AccessToken, GenerationError>;

    /// Human-readable display name
    fn generate_display_name(&self) -> String;

    /// Display hue in degrees, `[0, 360)`
    fn generate_display_color(&self) -> f64;
}

/// Production generator backed by the OS entropy source
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentityGenerator;

impl RandomIdentityGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityGenerator for RandomIdentityGenerator {
    fn generate_id(&self) -> UserId {
        let mut rng = rand::thread_rng();
        let id: String = (0..ID_LENGTH)
            .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
            .collect();
        UserId::new(id)
    }

    fn generate_access_token(&self) -> Result<AccessToken, GenerationError> {
        let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(AccessToken::new(URL_SAFE_NO_PAD.encode(bytes)))
    }

    fn generate_display_name(&self) -> String {
        let mut rng = rand::thread_rng();
        let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
        let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
        format!("{} {}", adjective, noun)
    }

    fn generate_display_color(&self) -> f64 {
        f64::from(rand::thread_rng().gen_range(0u16..360))
    }
}
