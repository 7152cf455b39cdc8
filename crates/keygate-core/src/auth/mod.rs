//! Authentication module for deriving API keys and managing the session.
//!
//! This module provides:
//! - `hash_credentials`: Derives the API key from `username:password`
//! - `sha256`: Portable SHA-256 used when the `sha2` crate is unavailable
//! - `TokenSlot` / `MemorySlot`: Where the current key lives for the process lifetime
//! - `SessionController`: Login, start-up recovery, protected calls and logout
//!
//! Keys never expire and are never renewed. A 401 on a protected call is the
//! only way the client learns a key is no longer accepted.

pub mod hasher;
pub mod session;
pub mod sha256;
pub mod store;

pub use hasher::{hash_credentials, hash_credentials_portable, ApiKey, Credentials, API_KEY_LEN};
pub use session::{SessionController, SessionError, SessionState, View};
pub use store::{MemorySlot, TokenSlot};
