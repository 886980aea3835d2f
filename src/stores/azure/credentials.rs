//! Binds the credential strategy chain to Azure identity types.

use crate::config::VaultConfig;
use crate::credentials::{strategy_chain, CredentialStrategy, ServicePrincipal};
use crate::{Result, SecretSyncError};
use azure_core::auth::TokenCredential;
use azure_identity::{AzureCliCredential, ClientSecretCredential, ImdsManagedIdentityCredential};
use std::sync::Arc;
use tracing::debug;

/// Resource scope requested when probing a credential for vault access.
const VAULT_SCOPE: &str = "https://vault.azure.net";

/// AAD authority for explicit service-principal credentials.
const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Resolves a credential by trying the configured strategy chain in order.
///
/// Each strategy is probed with a token request scoped to the vault
/// resource; the first one that produces a token wins. A failed probe falls
/// through to the next strategy without aborting. Probe failures are logged
/// at debug level, message only.
///
/// # Errors
///
/// - [`SecretSyncError::Config`] when the chain reaches explicit
///   credentials and client id or secret is absent
/// - [`SecretSyncError::Auth`] when every strategy failed to produce a
///   token
pub async fn resolve_credential(config: &VaultConfig) -> Result<Arc<dyn TokenCredential>> {
    for strategy in strategy_chain(config.auth_source()) {
        let credential = match build_credential(*strategy, config) {
            Ok(credential) => credential,
            // Incomplete explicit credentials are terminal: this is the
            // last strategy, there is nothing left to fall through to.
            Err(err) => return Err(err),
        };

        match credential.get_token(&[VAULT_SCOPE]).await {
            Ok(_) => {
                debug!(strategy = %strategy, "credential strategy succeeded");
                return Ok(credential);
            }
            Err(err) => {
                debug!(
                    strategy = %strategy,
                    error = %err,
                    "credential strategy failed, trying next"
                );
            }
        }
    }

    Err(SecretSyncError::Auth(
        "no credential strategy produced a token for the vault".to_string(),
    ))
}

fn build_credential(
    strategy: CredentialStrategy,
    config: &VaultConfig,
) -> Result<Arc<dyn TokenCredential>> {
    match strategy {
        CredentialStrategy::ManagedIdentity => {
            Ok(Arc::new(ImdsManagedIdentityCredential::default()))
        }
        CredentialStrategy::CliProfile => Ok(Arc::new(AzureCliCredential::new())),
        CredentialStrategy::ClientSecret => {
            let principal = ServicePrincipal::from_config(config)?;
            let authority = azure_core::Url::parse(AUTHORITY_HOST).map_err(|err| {
                SecretSyncError::Config(format!("invalid authority host: {}", err))
            })?;

            Ok(Arc::new(ClientSecretCredential::new(
                azure_core::new_http_client(),
                authority,
                principal.tenant,
                principal.client_id,
                principal.client_secret.expose().to_string(),
            )))
        }
    }
}
