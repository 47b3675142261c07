//! Data models for the flashcard backend.
//!
//! - `User`, `AuthTokens` and the auth request bodies
//! - `Deck`, `Card` and their create/update requests
//! - `StudySession`, `CardReview`, `StudyStatistics` for spaced-repetition study
//! - `Dashboard`: decks and recent activity combined for the home screen
//!
//! All types use camelCase on the wire.

pub mod account;
pub mod card;
pub mod dashboard;
pub mod deck;
pub mod study;

pub use account::{
    AuthTokens, LoginRequest, MessageResponse, RegisterRequest, RequestPasswordResetRequest, ResetPasswordRequest,
    User, VerifyEmailRequest,
};
pub use card::{Card, CardCreateRequest, CardUpdateRequest};
pub use dashboard::Dashboard;
pub use deck::{Deck, DeckCreateRequest, DeckUpdateRequest};
pub use study::{
    CardRef, CardReview, CardReviewRequest, CompleteSessionRequest, SessionTally, StudySession,
    StudyStatistics, CORRECT_RESULT_THRESHOLD,
};

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp from the backend, ignoring malformed values.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
