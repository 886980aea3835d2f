//! Input validation performed before any remote call.

use crate::{Result, SecretSyncError};

/// Maximum secret name length accepted by Azure Key Vault.
const MAX_NAME_LENGTH: usize = 127;

/// Validates a secret name against Key Vault naming rules.
///
/// Key Vault secret names are 1-127 characters of ASCII alphanumerics and
/// hyphens. Anything else is rejected here, before a request is built.
///
/// # Errors
///
/// Returns [`SecretSyncError::InvalidSecretName`] if validation fails.
///
/// # Example
///
/// ```
/// use secretsync::validation::validate_secret_name;
///
/// assert!(validate_secret_name("MySecret").is_ok());
/// assert!(validate_secret_name("db-conn-prod").is_ok());
///
/// assert!(validate_secret_name("").is_err());
/// assert!(validate_secret_name("db_conn").is_err());
/// assert!(validate_secret_name("name with spaces").is_err());
/// ```
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SecretSyncError::InvalidSecretName(
            "name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(SecretSyncError::InvalidSecretName(format!(
            "name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(SecretSyncError::InvalidSecretName(
            "name may contain only ASCII letters, digits, and hyphens".to_string(),
        ));
    }

    Ok(())
}
