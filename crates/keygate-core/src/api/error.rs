use thiserror::Error;

use crate::models::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - API key was rejected")]
    Unauthorized,

    #[error("Request rejected with status {status}{}", detail(.message))]
    Rejected {
        status: reqwest::StatusCode,
        /// `error` field of a JSON error body, when the backend sent one.
        /// Kept exactly as sent; only `Display` truncates it.
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Map a non-success response to an error.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        let message = serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.error);
        ApiError::Rejected { status, message }
    }
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", ApiError::truncate_body(m)))
        .unwrap_or_default()
}
