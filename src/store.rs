//! The remote secret-store surface consumed by the reconciler.
//!
//! Exactly three operations: read one secret, write one secret, delete one
//! secret. The reconciler is written against this trait; the in-memory
//! store backs tests and the Azure store (feature `azure`) backs production.

use crate::record::{FetchedSecret, SecretId};
use crate::spec::ValidityWindow;
use crate::{Result, SecretString, SecretSyncError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// A handle to one vault.
///
/// Implementations must be `Send + Sync`. A store is owned by a single
/// reconciliation call; it is not cached or shared across invocations.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// The vault endpoint URI this store is bound to.
    fn vault_url(&self) -> &str;

    /// Reads a secret by name. An empty version selects the latest.
    ///
    /// # Errors
    ///
    /// - [`SecretSyncError::NotFound`] when no such secret exists — the
    ///   caller treats this as a normal outcome
    /// - [`SecretSyncError::Remote`] for any other failure
    async fn get_secret(&self, name: &str, version: &str) -> Result<FetchedSecret>;

    /// Creates the secret or adds a new version to an existing one.
    ///
    /// Returns the identifier of the version the server assigned.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSyncError::Remote`] on any failure.
    async fn set_secret(&self, request: SetSecretRequest<'_>) -> Result<SecretId>;

    /// Deletes a secret by name.
    ///
    /// Returns the identifier of the deleted secret.
    ///
    /// # Errors
    ///
    /// - [`SecretSyncError::NotFound`] when no such secret exists
    /// - [`SecretSyncError::Remote`] for any other failure
    async fn delete_secret(&self, name: &str) -> Result<SecretId>;
}

/// Everything a set-secret call carries.
#[derive(Debug, Clone)]
pub struct SetSecretRequest<'a> {
    /// Secret name.
    pub name: &'a str,
    /// Value to store.
    pub value: &'a SecretString,
    /// Tag set to attach.
    pub tags: &'a HashMap<String, String>,
    /// Content-type label.
    pub content_type: Option<&'a str>,
    /// Parsed validity window.
    pub window: ValidityWindow,
}

/// Bounds one remote operation, mapping expiry onto a [`Remote`] error.
///
/// The underlying HTTP client's own limits still apply; this adds the
/// configurable per-operation cap of [`VaultConfig::request_timeout`].
///
/// [`Remote`]: SecretSyncError::Remote
/// [`VaultConfig::request_timeout`]: crate::VaultConfig::request_timeout
pub async fn with_timeout<T, F>(limit: Duration, operation: &str, name: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SecretSyncError::remote_op(
            operation,
            name,
            format!("timed out after {}s", limit.as_secs()),
        )),
    }
}
