//! Bulk provisioning of test accounts from the credentials fixture.
//!
//! The account store itself (the target deployment's user table, an admin
//! API, whatever the installation provides) is an external collaborator
//! behind the [`AccountStore`] trait; this module supplies the CSV-driven
//! create/delete passes over it.

use crate::fixture::load_credentials;
use crate::result::{CargarError, CargarResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// A user-account store keyed by username.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account. Existing accounts are overwritten.
    async fn create(&self, username: &str, password: &str) -> CargarResult<()>;

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `CargarError::AccountNotFound` if no account with that
    /// username exists.
    async fn delete(&self, username: &str) -> CargarResult<()>;
}

/// Create every account listed in the credentials file.
///
/// Returns the number of accounts created. Fails fast on the first store
/// error; accounts created before the failure stay created.
pub async fn create_accounts(
    store: &dyn AccountStore,
    credentials_path: &Path,
) -> CargarResult<usize> {
    let credentials = load_credentials(credentials_path)?;
    for credential in &credentials {
        info!(username = %credential.username, "creating account");
        store
            .create(&credential.username, &credential.password)
            .await?;
    }
    Ok(credentials.len())
}

/// Delete every account listed in the credentials file.
///
/// Returns the number of accounts deleted. A listed username missing from
/// the store fails the pass with `AccountNotFound`.
pub async fn delete_accounts(
    store: &dyn AccountStore,
    credentials_path: &Path,
) -> CargarResult<usize> {
    let credentials = load_credentials(credentials_path)?;
    for credential in &credentials {
        info!(username = %credential.username, "deleting account");
        store.delete(&credential.username).await?;
    }
    Ok(credentials.len())
}

/// In-memory store used by tests and local dry runs.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, String>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether an account exists.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.lock().contains_key(username)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, username: &str, password: &str) -> CargarResult<()> {
        self.lock()
            .insert(username.to_string(), password.to_string());
        Ok(())
    }

    async fn delete(&self, username: &str) -> CargarResult<()> {
        match self.lock().remove(username) {
            Some(_) => Ok(()),
            None => Err(CargarError::AccountNotFound {
                username: username.to_string(),
            }),
        }
    }
}
