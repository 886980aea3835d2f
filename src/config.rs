//! Configuration for binding to one vault.

use crate::{Result, SecretString, SecretSyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default bound on each individual remote operation.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential acquisition selector.
///
/// Determines which strategies the credential resolver tries, and in what
/// order. See [`strategy_chain`](crate::credentials::strategy_chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSource {
    /// Use the local CLI login session, falling back to explicit credentials.
    #[default]
    Auto,
    /// Same as `auto`: the CLI session first.
    Cli,
    /// Managed identity first; it only works on hosts with one attached.
    Msi,
    /// Explicit service-principal credentials only.
    Explicit,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Cli => write!(f, "cli"),
            Self::Msi => write!(f, "msi"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

impl FromStr for AuthSource {
    type Err = SecretSyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "cli" => Ok(Self::Cli),
            "msi" => Ok(Self::Msi),
            "explicit" => Ok(Self::Explicit),
            other => Err(SecretSyncError::Config(format!(
                "auth_source must be one of auto, cli, msi, explicit; got '{}'",
                other
            ))),
        }
    }
}

/// Connection and authentication settings for one vault.
///
/// One invocation builds one `VaultConfig`, resolves one client from it, and
/// drops both afterwards; nothing is cached across invocations.
///
/// ```
/// use secretsync::{AuthSource, VaultConfig};
/// use std::time::Duration;
///
/// let config = VaultConfig::new("https://contoso.vault.azure.net/")
///     .with_auth_source(AuthSource::Msi)
///     .with_request_timeout(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct VaultConfig {
    vault_url: String,
    auth_source: AuthSource,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    tenant: Option<String>,
    request_timeout: Duration,
}

impl VaultConfig {
    /// Creates a configuration bound to a vault endpoint URI.
    pub fn new(vault_url: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into(),
            auth_source: AuthSource::default(),
            client_id: None,
            client_secret: None,
            tenant: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Selects the credential acquisition strategy chain.
    pub fn with_auth_source(mut self, auth_source: AuthSource) -> Self {
        self.auth_source = auth_source;
        self
    }

    /// Supplies explicit service-principal credentials.
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the AAD tenant for explicit credentials.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Bounds each individual remote operation.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Vault endpoint URI.
    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    /// Selected credential chain.
    pub fn auth_source(&self) -> AuthSource {
        self.auth_source
    }

    /// Explicit client id, when supplied.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Explicit client secret, when supplied.
    pub fn client_secret(&self) -> Option<&SecretString> {
        self.client_secret.as_ref()
    }

    /// Tenant for explicit credentials, defaulting to "common".
    pub fn tenant_or_default(&self) -> &str {
        self.tenant.as_deref().filter(|t| !t.is_empty()).unwrap_or("common")
    }

    /// Per-operation timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Checks that the configuration can bind to a vault at all.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSyncError::Config`] when the vault URI is missing.
    pub fn validate(&self) -> Result<()> {
        if self.vault_url.is_empty() {
            return Err(SecretSyncError::Config(
                "keyvault_uri is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = VaultConfig::new("https://contoso.vault.azure.net/")
            .with_auth_source(AuthSource::Explicit)
            .with_client_credentials("client-id", "client-secret")
            .with_tenant("my-tenant")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.vault_url(), "https://contoso.vault.azure.net/");
        assert_eq!(config.auth_source(), AuthSource::Explicit);
        assert_eq!(config.client_id(), Some("client-id"));
        assert_eq!(config.tenant_or_default(), "my-tenant");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_tenant_defaults_to_common() {
        let config = VaultConfig::new("https://contoso.vault.azure.net/");
        assert_eq!(config.tenant_or_default(), "common");

        let config = config.with_tenant("");
        assert_eq!(config.tenant_or_default(), "common");
    }

    #[test]
    fn test_missing_vault_url_rejected() {
        let config = VaultConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(SecretSyncError::Config(_))
        ));
    }

    #[test]
    fn test_auth_source_round_trip() {
        for source in [
            AuthSource::Auto,
            AuthSource::Cli,
            AuthSource::Msi,
            AuthSource::Explicit,
        ] {
            assert_eq!(source.to_string().parse::<AuthSource>().unwrap(), source);
        }
        assert!("env".parse::<AuthSource>().is_err());
    }

    #[test]
    fn test_debug_redacts_client_secret() {
        let config = VaultConfig::new("https://contoso.vault.azure.net/")
            .with_client_credentials("client-id", "super-secret");
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret"));
    }
}
