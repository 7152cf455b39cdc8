//! REST API client module for the demo backend.
//!
//! This module provides the `ApiClient` for calling the three backend
//! endpoints: `/test-auth`, `/random-number` and `/add-numbers`.
//!
//! Every request authenticates with the derived API key in the
//! `X-API-Key` header.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
