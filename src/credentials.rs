//! Credential strategy selection.
//!
//! The resolver tries an ordered list of acquisition strategies, first
//! success wins. This module owns the ordering and the completeness rules;
//! binding the strategies to actual Azure credentials lives in the
//! feature-gated store (`stores::azure`), so the chain semantics stay
//! testable without the SDK.

use crate::config::{AuthSource, VaultConfig};
use crate::{Result, SecretString, SecretSyncError};
use std::fmt;

/// One way of acquiring a vault credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStrategy {
    /// Managed-identity token from the execution host (no stored secret).
    ManagedIdentity,
    /// The local `az` CLI login session.
    CliProfile,
    /// Explicit service-principal client id + secret + tenant.
    ClientSecret,
}

impl fmt::Display for CredentialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManagedIdentity => write!(f, "managed identity"),
            Self::CliProfile => write!(f, "cli profile"),
            Self::ClientSecret => write!(f, "client secret"),
        }
    }
}

/// The ordered strategy list for an auth source.
///
/// Managed identity is only attempted when asked for: on an Azure VM it
/// would otherwise always produce a credential and shadow the caller's
/// intent. Explicit credentials are always the last resort, so a failed
/// earlier strategy falls through instead of aborting.
///
/// # Example
///
/// ```
/// use secretsync::config::AuthSource;
/// use secretsync::credentials::{strategy_chain, CredentialStrategy};
///
/// assert_eq!(
///     strategy_chain(AuthSource::Msi),
///     [
///         CredentialStrategy::ManagedIdentity,
///         CredentialStrategy::CliProfile,
///         CredentialStrategy::ClientSecret,
///     ]
/// );
/// ```
pub fn strategy_chain(source: AuthSource) -> &'static [CredentialStrategy] {
    match source {
        AuthSource::Msi => &[
            CredentialStrategy::ManagedIdentity,
            CredentialStrategy::CliProfile,
            CredentialStrategy::ClientSecret,
        ],
        AuthSource::Auto | AuthSource::Cli => &[
            CredentialStrategy::CliProfile,
            CredentialStrategy::ClientSecret,
        ],
        AuthSource::Explicit => &[CredentialStrategy::ClientSecret],
    }
}

/// Explicit service-principal credentials, checked for completeness.
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// AAD tenant; "common" when the caller left it unset.
    pub tenant: String,
}

impl ServicePrincipal {
    /// Extracts complete explicit credentials from a config.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSyncError::Config`] when client id or secret is
    /// absent. This is the terminal strategy, so an incomplete config here
    /// fails the whole chain.
    pub fn from_config(config: &VaultConfig) -> Result<Self> {
        let (Some(client_id), Some(client_secret)) = (config.client_id(), config.client_secret())
        else {
            return Err(SecretSyncError::Config(
                "client_id, secret, and tenant are required to access the key vault".to_string(),
            ));
        };

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.clone(),
            tenant: config.tenant_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msi_falls_through_to_cli_then_explicit() {
        let chain = strategy_chain(AuthSource::Msi);
        assert_eq!(
            chain,
            [
                CredentialStrategy::ManagedIdentity,
                CredentialStrategy::CliProfile,
                CredentialStrategy::ClientSecret,
            ]
        );
    }

    #[test]
    fn test_auto_and_cli_share_the_chain() {
        assert_eq!(
            strategy_chain(AuthSource::Auto),
            strategy_chain(AuthSource::Cli)
        );
        assert_eq!(
            strategy_chain(AuthSource::Auto),
            [
                CredentialStrategy::CliProfile,
                CredentialStrategy::ClientSecret,
            ]
        );
    }

    #[test]
    fn test_explicit_has_no_fallback() {
        assert_eq!(
            strategy_chain(AuthSource::Explicit),
            [CredentialStrategy::ClientSecret]
        );
    }

    #[test]
    fn test_managed_identity_only_when_requested() {
        for source in [AuthSource::Auto, AuthSource::Cli, AuthSource::Explicit] {
            assert!(!strategy_chain(source).contains(&CredentialStrategy::ManagedIdentity));
        }
    }

    #[test]
    fn test_service_principal_requires_id_and_secret() {
        let config = VaultConfig::new("https://contoso.vault.azure.net/");
        assert!(matches!(
            ServicePrincipal::from_config(&config),
            Err(SecretSyncError::Config(_))
        ));

        let config = config.with_client_credentials("client-id", "client-secret");
        let principal = ServicePrincipal::from_config(&config).unwrap();
        assert_eq!(principal.client_id, "client-id");
        assert_eq!(principal.tenant, "common");
    }

    #[test]
    fn test_service_principal_honors_tenant() {
        let config = VaultConfig::new("https://contoso.vault.azure.net/")
            .with_client_credentials("client-id", "client-secret")
            .with_tenant("contoso-tenant");
        let principal = ServicePrincipal::from_config(&config).unwrap();
        assert_eq!(principal.tenant, "contoso-tenant");
    }
}
