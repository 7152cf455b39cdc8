use tracing::debug;

use super::ApiKey;

/// Storage for the current API key.
///
/// One value at a time, living no longer than the client process. The
/// controller is the only writer.
pub trait TokenSlot {
    /// Stored key, if any
    fn load(&self) -> Option<ApiKey>;

    /// Replace the stored key
    fn store(&mut self, key: ApiKey);

    /// Remove the stored key. Safe to call when empty.
    fn clear(&mut self);
}

/// In-memory slot. Never touches disk; the key is gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySlot {
    key: Option<ApiKey>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with a key from an earlier session, so start-up
    /// recovery has something to verify.
    pub fn seeded(key: ApiKey) -> Self {
        Self { key: Some(key) }
    }
}

impl TokenSlot for MemorySlot {
    fn load(&self) -> Option<ApiKey> {
        self.key.clone()
    }

    fn store(&mut self, key: ApiKey) {
        debug!(key = key.fingerprint(), "Storing API key in session slot");
        self.key = Some(key);
    }

    fn clear(&mut self) {
        if self.key.take().is_some() {
            debug!("Session slot cleared");
        }
    }
}
