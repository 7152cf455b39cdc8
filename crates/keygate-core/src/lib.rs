//! Core library for keygate.
//!
//! Derives a static API key from a username and password, validates it
//! against the demo backend, and wraps the backend's protected endpoints
//! with session handling (forced logout on 401).

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{Credentials, SessionController, SessionError, SessionState, View};
pub use config::Config;
