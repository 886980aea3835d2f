//! The caller-facing parameter surface.
//!
//! Mirrors the invocation parameters the orchestration host supplies, with
//! their original names and defaults, and converts them into the typed
//! [`SecretSpec`] + [`VaultConfig`] pair the rest of the crate works with.

use crate::config::{AuthSource, VaultConfig};
use crate::spec::{Presence, SecretSpec};
use crate::{Result, SecretString, SecretSyncError};
use serde::Deserialize;
use std::collections::HashMap;

/// Parameters of one ensure-secret invocation.
///
/// Field names and defaults match the host convention: `state` defaults to
/// `present`, `auth_source` to `auto`, and `secret_value` is required iff
/// `state` is `present`. Sensitive fields deserialize into [`SecretString`]
/// and stay redacted from there on.
#[derive(Debug, Clone, Deserialize)]
pub struct EnsureParams {
    /// Name of the keyvault secret.
    pub secret_name: String,

    /// Secret to be secured by the vault.
    #[serde(default)]
    pub secret_value: Option<SecretString>,

    /// Optional valid-from datetime string.
    #[serde(default)]
    pub secret_valid_from: Option<String>,

    /// Optional expiry datetime string.
    #[serde(default)]
    pub secret_expiry: Option<String>,

    /// URI of the keyvault endpoint.
    pub keyvault_uri: String,

    /// Desired presence; defaults to `present`.
    #[serde(default)]
    pub state: Presence,

    /// Type of the secret value, such as a password.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Tags to attach to the secret.
    #[serde(default)]
    pub tags: HashMap<String, String>,

    /// Credential acquisition selector; defaults to `auto`.
    #[serde(default)]
    pub auth_source: AuthSource,

    /// Service-principal client id.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Service-principal secret.
    #[serde(default)]
    pub secret: Option<SecretString>,

    /// AAD tenant; `common` when unset.
    #[serde(default)]
    pub tenant: Option<String>,
}

impl EnsureParams {
    /// Deserializes parameters from the host's JSON payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Splits the parameters into desired state and vault configuration.
    ///
    /// # Errors
    ///
    /// - [`SecretSyncError::Validation`] when `state` is `present` without a
    ///   `secret_value`
    /// - [`SecretSyncError::Config`] when `keyvault_uri` is empty
    pub fn into_parts(self) -> Result<(SecretSpec, VaultConfig)> {
        let mut spec = match (self.state, self.secret_value) {
            (Presence::Present, Some(value)) => SecretSpec::present(self.secret_name, value),
            (Presence::Present, None) => {
                return Err(SecretSyncError::Validation(
                    "secret_value is required when state is 'present'".to_string(),
                ))
            }
            (Presence::Absent, _) => SecretSpec::absent(self.secret_name),
        };

        if let Some(valid_from) = self.secret_valid_from {
            spec = spec.with_valid_from(valid_from);
        }
        if let Some(expiry) = self.secret_expiry {
            spec = spec.with_expiry(expiry);
        }
        if let Some(content_type) = self.content_type {
            spec = spec.with_content_type(content_type);
        }
        if !self.tags.is_empty() {
            spec = spec.with_tags(self.tags);
        }

        let mut config = VaultConfig::new(self.keyvault_uri).with_auth_source(self.auth_source);
        if let (Some(client_id), Some(secret)) = (self.client_id, self.secret) {
            config = config.with_client_credentials(client_id, secret);
        }
        if let Some(tenant) = self.tenant {
            config = config.with_tenant(tenant);
        }
        config.validate()?;

        Ok((spec, config))
    }
}
