//! Wire types for the demo backend.
//!
//! - `RandomNumber`: body of `GET /random-number`
//! - `AddNumbersRequest`, `AddNumbersResponse`: `POST /add-numbers`
//! - `ErrorBody`: `{"error": "..."}` bodies on rejected requests

pub mod numbers;

pub use numbers::{AddNumbersRequest, AddNumbersResponse, ErrorBody, RandomNumber};
