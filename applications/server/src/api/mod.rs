//! API route modules
pub mod admin;
pub mod chat;
pub mod health;
