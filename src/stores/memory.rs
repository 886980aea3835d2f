//! In-memory store for tests.
//!
//! A complete implementation of [`SecretStore`] with error injection and
//! write counters, for testing reconciliation logic without a vault.

use crate::record::{FetchedSecret, SecretId};
use crate::spec::ValidityWindow;
use crate::store::{SecretStore, SetSecretRequest};
use crate::{Result, SecretString, SecretSyncError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One stored secret version, inspectable from tests.
#[derive(Debug, Clone)]
pub struct StoredSecret {
    /// Current value.
    pub value: SecretString,
    /// Server-assigned version token (32 hex chars, like Key Vault's).
    pub version: String,
    /// Attached tags.
    pub tags: HashMap<String, String>,
    /// Content-type label.
    pub content_type: Option<String>,
    /// Validity window.
    pub window: ValidityWindow,
}

#[derive(Default)]
struct Inner {
    secrets: HashMap<String, StoredSecret>,
    set_calls: usize,
    delete_calls: usize,
    get_error: Option<SecretSyncError>,
    set_error: Option<SecretSyncError>,
    delete_error: Option<SecretSyncError>,
}

/// In-memory secret store.
///
/// Each injected error fires on the next matching call, then clears.
///
/// # Example
///
/// ```
/// use secretsync::stores::memory::MemoryStore;
/// use secretsync::{reconcile, RunMode, SecretSpec};
///
/// #[tokio::main]
/// async fn main() -> secretsync::Result<()> {
///     let store = MemoryStore::new("https://contoso.vault.azure.net/");
///     store.seed("api-key", "sk-secret123").await;
///
///     let spec = SecretSpec::absent("api-key");
///     let outcome = reconcile(&store, &spec, RunMode::Apply).await?;
///     assert!(outcome.changed);
///
///     Ok(())
/// }
/// ```
pub struct MemoryStore {
    vault_url: String,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store bound to a vault URI.
    pub fn new(vault_url: impl Into<String>) -> Self {
        let mut vault_url = vault_url.into();
        if !vault_url.ends_with('/') {
            vault_url.push('/');
        }
        Self {
            vault_url,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Pre-populates the store with a secret. Useful for fixtures.
    pub async fn seed(&self, name: impl Into<String>, value: impl Into<SecretString>) {
        let mut inner = self.inner.write().await;
        inner.secrets.insert(
            name.into(),
            StoredSecret {
                value: value.into(),
                version: new_version(),
                tags: HashMap::new(),
                content_type: None,
                window: ValidityWindow::default(),
            },
        );
    }

    /// Makes the next `get_secret` fail with `err`.
    pub async fn inject_get_error(&self, err: SecretSyncError) {
        self.inner.write().await.get_error = Some(err);
    }

    /// Makes the next `set_secret` fail with `err`.
    pub async fn inject_set_error(&self, err: SecretSyncError) {
        self.inner.write().await.set_error = Some(err);
    }

    /// Makes the next `delete_secret` fail with `err`.
    pub async fn inject_delete_error(&self, err: SecretSyncError) {
        self.inner.write().await.delete_error = Some(err);
    }

    /// Snapshot of one stored secret.
    pub async fn stored(&self, name: &str) -> Option<StoredSecret> {
        self.inner.read().await.secrets.get(name).cloned()
    }

    /// Whether a secret exists.
    pub async fn contains(&self, name: &str) -> bool {
        self.inner.read().await.secrets.contains_key(name)
    }

    /// Number of `set_secret` calls that reached the store.
    pub async fn set_count(&self) -> usize {
        self.inner.read().await.set_calls
    }

    /// Number of `delete_secret` calls that reached the store.
    pub async fn delete_count(&self) -> usize {
        self.inner.read().await.delete_calls
    }

    /// Total write calls (set + delete). Dry-run tests assert this stays 0.
    pub async fn write_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.set_calls + inner.delete_calls
    }

    fn secret_id(&self, name: &str, version: &str) -> SecretId {
        SecretId::new(format!("{}secrets/{}/{}", self.vault_url, name, version))
    }
}

fn new_version() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl SecretStore for MemoryStore {
    fn vault_url(&self) -> &str {
        &self.vault_url
    }

    async fn get_secret(&self, name: &str, _version: &str) -> Result<FetchedSecret> {
        let mut inner = self.inner.write().await;
        if let Some(err) = inner.get_error.take() {
            return Err(err);
        }

        let stored = inner
            .secrets
            .get(name)
            .ok_or_else(|| SecretSyncError::NotFound(name.to_string()))?;

        Ok(FetchedSecret {
            id: self.secret_id(name, &stored.version),
            value: stored.value.clone(),
        })
    }

    async fn set_secret(&self, request: SetSecretRequest<'_>) -> Result<SecretId> {
        let mut inner = self.inner.write().await;
        inner.set_calls += 1;
        if let Some(err) = inner.set_error.take() {
            return Err(err);
        }

        let version = new_version();
        inner.secrets.insert(
            request.name.to_string(),
            StoredSecret {
                value: request.value.clone(),
                version: version.clone(),
                tags: request.tags.clone(),
                content_type: request.content_type.map(str::to_string),
                window: request.window,
            },
        );

        Ok(self.secret_id(request.name, &version))
    }

    async fn delete_secret(&self, name: &str) -> Result<SecretId> {
        let mut inner = self.inner.write().await;
        inner.delete_calls += 1;
        if let Some(err) = inner.delete_error.take() {
            return Err(err);
        }

        let stored = inner
            .secrets
            .remove(name)
            .ok_or_else(|| SecretSyncError::NotFound(name.to_string()))?;

        Ok(self.secret_id(name, &stored.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = "https://contoso.vault.azure.net/";

    fn set_request<'a>(
        name: &'a str,
        value: &'a SecretString,
        tags: &'a HashMap<String, String>,
    ) -> SetSecretRequest<'a> {
        SetSecretRequest {
            name,
            value,
            tags,
            content_type: None,
            window: ValidityWindow::default(),
        }
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new(VAULT);
        let value = SecretString::new("test-value");
        let tags = HashMap::new();

        let id = store.set_secret(set_request("test-key", &value, &tags)).await.unwrap();
        assert_eq!(id.name(), Some("test-key"));
        assert_eq!(id.vault_url(), Some(VAULT));
        assert_eq!(id.version().map(str::len), Some(32));

        let fetched = store.get_secret("test-key", "").await.unwrap();
        assert_eq!(fetched.value.expose(), "test-value");
        assert_eq!(fetched.id, id);
    }

    #[tokio::test]
    async fn test_set_assigns_fresh_version() {
        let store = MemoryStore::new(VAULT);
        let value = SecretString::new("v");
        let tags = HashMap::new();

        let first = store.set_secret(set_request("k", &value, &tags)).await.unwrap();
        let second = store.set_secret(set_request("k", &value, &tags)).await.unwrap();
        assert_ne!(first.version(), second.version());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new(VAULT);
        let err = store.get_secret("missing", "").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_returns_id_of_removed() {
        let store = MemoryStore::new(VAULT);
        store.seed("k", "v").await;

        let id = store.delete_secret("k").await.unwrap();
        assert_eq!(id.name(), Some("k"));
        assert!(!store.contains("k").await);

        let err = store.delete_secret("k").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_error_injection_fires_once() {
        let store = MemoryStore::new(VAULT);
        store.seed("k", "v").await;
        store
            .inject_get_error(SecretSyncError::remote_op("get", "k", "boom"))
            .await;

        assert!(store.get_secret("k", "").await.is_err());
        assert!(store.get_secret("k", "").await.is_ok());
    }

    #[tokio::test]
    async fn test_vault_url_normalized() {
        let store = MemoryStore::new("https://contoso.vault.azure.net");
        assert_eq!(store.vault_url(), VAULT);
    }
}
