mod ids;
mod user;

pub use ids::{AccessToken, UserId};
pub use user::{User, UserState};
