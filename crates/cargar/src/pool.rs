//! Shared credential pool with claim-once semantics.
//!
//! Many sessions start concurrently and race to claim a login identity.
//! A credential, once claimed, is never handed out again for the lifetime
//! of the run; an empty pool is a degraded mode, not an error.

use crate::fixture::Credential;
use std::sync::Mutex;
use tracing::warn;

/// Pool of not-yet-claimed credentials, safe to share across sessions.
#[derive(Debug)]
pub struct CredentialPool {
    available: Mutex<Vec<Credential>>,
}

impl CredentialPool {
    /// Create a pool holding the loaded credentials.
    #[must_use]
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            available: Mutex::new(credentials),
        }
    }

    /// Atomically claim one credential, or `None` if the pool is empty.
    ///
    /// Never blocks beyond the internal lock and never returns the same
    /// credential twice. Callers that receive `None` run unauthenticated
    /// for their whole session and must not retry.
    pub fn claim(&self) -> Option<Credential> {
        let claimed = self
            .available
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop();
        if claimed.is_none() {
            warn!("credential pool exhausted; session runs unauthenticated");
        }
        claimed
    }

    /// Number of credentials still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}
