//! Session controller.
//!
//! Two states: `LoggedOut` and `LoggedIn(key)`. Login and start-up recovery
//! move to `LoggedIn` only after `/test-auth` accepts the key. A 401 on a
//! protected call, a failed recovery, or an explicit logout returns to
//! `LoggedOut` and clears the slot. Nothing is retried.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{AddNumbersResponse, RandomNumber};

use super::{ApiKey, Credentials, MemorySlot, TokenSlot};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password. Please try again.";
pub const NETWORK_FAILURE_MESSAGE: &str = "Error connecting to server. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
pub const RANDOM_NUMBER_FAILED_MESSAGE: &str = "Error fetching random number";
pub const ADD_NUMBERS_FAILED_MESSAGE: &str = "Error adding numbers";

/// Failure of a session operation. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The backend rejected the derived key. Deliberately does not say
    /// whether the username or the password was wrong.
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    #[error("{}", NETWORK_FAILURE_MESSAGE)]
    NetworkFailure,

    /// Backend-reported validation error, shown verbatim
    #[error("{0}")]
    DomainValidation(String),

    /// Any other failed request, with a per-endpoint message
    #[error("{0}")]
    RequestFailed(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Already logged in. Log out first.")]
    AlreadyLoggedIn,
}

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(ApiKey),
}

/// Which screen the client should present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

/// Owns the authentication state and mediates every authenticated request.
///
/// State changes only in response to backend results (or an explicit logout),
/// one operation at a time through `&mut self`.
pub struct SessionController<S: TokenSlot = MemorySlot> {
    api: ApiClient,
    slot: S,
    state: SessionState,
    login_error: Option<String>,
}

impl<S: TokenSlot> SessionController<S> {
    /// Create a controller in the `LoggedOut` state. Call `recover` to pick
    /// up a key already in the slot.
    pub fn new(api: ApiClient, slot: S) -> Self {
        Self {
            api,
            slot,
            state: SessionState::LoggedOut,
            login_error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> View {
        match self.state {
            SessionState::LoggedOut => View::Login,
            SessionState::LoggedIn(_) => View::Dashboard,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    /// Message from the most recent failed login, cleared on success
    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Start-up recovery: verify a key left in the slot by an earlier session.
    ///
    /// Returns `Ok(false)` when the slot is empty. Any failure clears the
    /// slot and leaves the controller logged out.
    pub async fn recover(&mut self) -> Result<bool, SessionError> {
        let Some(key) = self.slot.load() else {
            debug!("No stored API key, starting logged out");
            return Ok(false);
        };

        match self.api.test_auth(&key).await {
            Ok(()) => {
                info!(key = key.fingerprint(), "Stored API key verified");
                self.state = SessionState::LoggedIn(key);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Stored API key could not be verified, logging out");
                self.logout();
                Err(match e {
                    ApiError::Network(_) => SessionError::NetworkFailure,
                    _ => SessionError::InvalidCredentials,
                })
            }
        }
    }

    /// Derive the key from `credentials` and ask the backend to accept it.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        if self.is_logged_in() {
            return Err(SessionError::AlreadyLoggedIn);
        }

        let key = credentials.api_key();

        match self.api.test_auth(&key).await {
            Ok(()) => {
                self.slot.store(key.clone());
                self.state = SessionState::LoggedIn(key);
                self.login_error = None;
                info!(username = %credentials.username, "Login successful");
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    ApiError::Network(ref inner) => {
                        warn!(error = %inner, "Login failed: backend unreachable");
                        SessionError::NetworkFailure
                    }
                    ref other => {
                        warn!(error = %other, "Login failed: key rejected");
                        SessionError::InvalidCredentials
                    }
                };
                self.login_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop the key and return to `LoggedOut`. Idempotent; no network call.
    pub fn logout(&mut self) {
        if self.is_logged_in() {
            info!("Logged out");
        }
        self.slot.clear();
        self.state = SessionState::LoggedOut;
    }

    /// Fetch a random number from the backend
    pub async fn random_number(&mut self) -> Result<RandomNumber, SessionError> {
        let api = self.api.clone();
        self.protected(
            |key| async move { api.random_number(&key).await },
            |_| SessionError::RequestFailed(RANDOM_NUMBER_FAILED_MESSAGE.to_string()),
        )
        .await
    }

    /// Have the backend add two integers
    pub async fn add_numbers(
        &mut self,
        num1: i64,
        num2: i64,
    ) -> Result<AddNumbersResponse, SessionError> {
        let api = self.api.clone();
        self.protected(
            move |key| async move { api.add_numbers(&key, num1, num2).await },
            |e| match e {
                ApiError::Rejected {
                    message: Some(message),
                    ..
                } => SessionError::DomainValidation(message),
                _ => SessionError::RequestFailed(ADD_NUMBERS_FAILED_MESSAGE.to_string()),
            },
        )
        .await
    }

    /// Run a protected call with the current key.
    ///
    /// A 401 forces a logout and yields `SessionExpired`; transport failures
    /// yield `NetworkFailure`; everything else goes through `on_error`. The
    /// request is never retried.
    async fn protected<T, F, Fut, E>(&mut self, call: F, on_error: E) -> Result<T, SessionError>
    where
        F: FnOnce(ApiKey) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        E: FnOnce(ApiError) -> SessionError,
    {
        let key = match &self.state {
            SessionState::LoggedIn(key) => key.clone(),
            SessionState::LoggedOut => return Err(SessionError::NotLoggedIn),
        };

        match call(key).await {
            Ok(value) => Ok(value),
            Err(ApiError::Unauthorized) => {
                warn!("API key rejected during protected call, session expired");
                self.logout();
                Err(SessionError::SessionExpired)
            }
            Err(ApiError::Network(e)) => {
                warn!(error = %e, "Protected call failed: backend unreachable");
                Err(SessionError::NetworkFailure)
            }
            Err(e) => {
                warn!(error = %e, "Protected call failed");
                Err(on_error(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::auth::hash_credentials;

    fn controller(slot: MemorySlot) -> SessionController {
        // Nothing listens on port 1; tests here never reach the network
        let api = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        SessionController::new(api, slot)
    }

    #[test]
    fn test_starts_logged_out() {
        let c = controller(MemorySlot::seeded(hash_credentials("alice", "wonderland")));
        assert_eq!(c.state(), &SessionState::LoggedOut);
        assert_eq!(c.view(), View::Login);
        assert!(c.login_error().is_none());
    }

    #[tokio::test]
    async fn test_recover_with_empty_slot() {
        let mut c = controller(MemorySlot::new());
        assert_eq!(c.recover().await, Ok(false));
        assert_eq!(c.state(), &SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_protected_calls_require_login() {
        let mut c = controller(MemorySlot::new());
        assert_eq!(c.random_number().await, Err(SessionError::NotLoggedIn));
        assert_eq!(c.add_numbers(2, 3).await, Err(SessionError::NotLoggedIn));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut c = controller(MemorySlot::seeded(hash_credentials("alice", "wonderland")));
        c.logout();
        assert!(c.slot().load().is_none());
        assert_eq!(c.state(), &SessionState::LoggedOut);
        c.logout();
        assert!(c.slot().load().is_none());
        assert_eq!(c.state(), &SessionState::LoggedOut);
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            SessionError::InvalidCredentials.to_string(),
            "Invalid username or password. Please try again."
        );
        assert_eq!(
            SessionError::SessionExpired.to_string(),
            "Session expired. Please login again."
        );
        assert_eq!(
            SessionError::NetworkFailure.to_string(),
            "Error connecting to server. Please try again."
        );
        assert_eq!(
            SessionError::DomainValidation("num1 must be an integer".into()).to_string(),
            "num1 must be an integer"
        );
    }
}
