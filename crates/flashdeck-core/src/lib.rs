//! Core library for the flashdeck study client.
//!
//! - `api`: the authenticated request gateway and typed endpoint wrappers
//! - `auth`: session lifecycle and token persistence
//! - `models`: wire types for decks, cards, study sessions and accounts
//! - `validation`: client-side checks run before any request is sent
//! - `config`: on-disk application configuration
//! - `utils`: display formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError, Gateway};
pub use auth::{SessionManager, SessionStatus, TokenStore};
pub use config::Config;
