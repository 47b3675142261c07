//! REST API client module for the flashcard backend.
//!
//! `Gateway` owns the HTTP connection pool and the token refresh
//! coordination; `ApiClient` layers one typed method per endpoint on top.
//! Endpoint methods are grouped by resource in `auth`, `decks`, `cards`
//! and `study`.

pub mod auth;
pub mod cards;
pub mod client;
pub mod decks;
pub mod error;
pub mod gateway;
pub mod request;
pub mod study;

pub use client::ApiClient;
pub use error::ApiError;
pub use gateway::Gateway;
pub use request::ApiRequest;
