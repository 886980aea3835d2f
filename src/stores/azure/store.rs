//! [`SecretStore`] over the Azure Key Vault SDK.

use crate::config::VaultConfig;
use crate::record::{FetchedSecret, SecretId};
use crate::store::{with_timeout, SecretStore, SetSecretRequest};
use crate::stores::azure::resolve_credential;
use crate::{Result, SecretString, SecretSyncError};
use async_trait::async_trait;
use azure_security_keyvault::SecretClient;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A vault handle backed by the official SDK.
///
/// Built once per invocation via [`connect`](AzureSecretStore::connect) and
/// dropped afterwards; never cached or shared across invocations.
pub struct AzureSecretStore {
    client: SecretClient,
    vault_url: String,
    timeout: Duration,
}

impl AzureSecretStore {
    /// Resolves a credential for the configured auth source and binds a
    /// client to the vault endpoint.
    ///
    /// # Errors
    ///
    /// - [`SecretSyncError::Config`] for a missing vault URI or incomplete
    ///   explicit credentials
    /// - [`SecretSyncError::Auth`] when no credential strategy succeeded
    pub async fn connect(config: &VaultConfig) -> Result<Self> {
        config.validate()?;

        let credential = resolve_credential(config).await?;
        let client = SecretClient::new(config.vault_url(), credential).map_err(|err| {
            SecretSyncError::Config(format!("failed to create secret client: {}", err))
        })?;

        Ok(Self {
            client,
            vault_url: normalize_vault_url(config.vault_url()),
            timeout: config.request_timeout(),
        })
    }
}

#[async_trait]
impl SecretStore for AzureSecretStore {
    fn vault_url(&self) -> &str {
        &self.vault_url
    }

    async fn get_secret(&self, name: &str, version: &str) -> Result<FetchedSecret> {
        let fetch = async {
            let mut request = self.client.get(name);
            if !version.is_empty() {
                request = request.version(version);
            }

            let secret = request
                .into_future()
                .await
                .map_err(|err| classify_error(err, "get", name))?;

            Ok(FetchedSecret {
                id: SecretId::new(secret.id),
                value: SecretString::new(secret.value),
            })
        };

        with_timeout(self.timeout, "get", name, fetch).await
    }

    async fn set_secret(&self, request: SetSecretRequest<'_>) -> Result<SecretId> {
        let name = request.name;
        let store = async {
            let mut builder = self.client.set(name, request.value.expose());
            if let Some(content_type) = request.content_type {
                builder = builder.content_type(content_type);
            }
            if !request.tags.is_empty() {
                builder = builder.tags(request.tags.clone());
            }
            if let Some(not_before) = request.window.not_before {
                builder = builder.not_before(to_offset_datetime(not_before)?);
            }
            if let Some(expires) = request.window.expires {
                builder = builder.expiration(to_offset_datetime(expires)?);
            }

            let created = builder
                .into_future()
                .await
                .map_err(|err| SecretSyncError::remote_op("set", name, err.to_string()))?;

            Ok(SecretId::new(created.id))
        };

        with_timeout(self.timeout, "set", name, store).await
    }

    async fn delete_secret(&self, name: &str) -> Result<SecretId> {
        let remove = async {
            let deleted = self
                .client
                .delete(name)
                .into_future()
                .await
                .map_err(|err| classify_error(err, "delete", name))?;

            Ok(SecretId::new(deleted.id))
        };

        with_timeout(self.timeout, "delete", name, remove).await
    }
}

/// Distinguishes the expected not-found outcome from real remote failures
/// by error shape, as the SDK exposes no typed variant for it.
fn classify_error(err: azure_core::error::Error, operation: &str, name: &str) -> SecretSyncError {
    let message = err.to_string();
    if message.contains("SecretNotFound") || message.contains("404") {
        SecretSyncError::NotFound(name.to_string())
    } else {
        SecretSyncError::remote_op(operation, name, message)
    }
}

/// The SDK's attribute timestamps are `time` types; the crate's are chrono.
fn to_offset_datetime(dt: DateTime<Utc>) -> Result<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp(dt.timestamp()).map_err(|err| {
        SecretSyncError::Validation(format!("timestamp out of representable range: {}", err))
    })
}

fn normalize_vault_url(vault_url: &str) -> String {
    let mut vault_url = vault_url.to_string();
    if !vault_url.ends_with('/') {
        vault_url.push('/');
    }
    vault_url
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_vault_url() {
        assert_eq!(
            normalize_vault_url("https://contoso.vault.azure.net"),
            "https://contoso.vault.azure.net/"
        );
        assert_eq!(
            normalize_vault_url("https://contoso.vault.azure.net/"),
            "https://contoso.vault.azure.net/"
        );
    }

    #[test]
    fn test_offset_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let offset = to_offset_datetime(dt).unwrap();
        assert_eq!(offset.unix_timestamp(), dt.timestamp());
    }
}
