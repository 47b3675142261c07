//! Authentication module for managing sessions and stored credentials.
//!
//! This module provides:
//! - `SessionManager`: owns the credential pair and announces session end
//! - `TokenStore`: persistence seam for tokens, with file, keychain and
//!   in-memory implementations
//!
//! Tokens are stored under the fixed keys `accessToken`, `refreshToken`
//! and `tokenExpiry`, and are always cleared together.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::{Credentials, SessionManager, SessionStatus};
pub use store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
