//! Observed secret state and reconciliation results.

use crate::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored secret version.
///
/// Wraps the identifier URI the vault assigns, of the form
/// `{vault}/secrets/{name}/{version}`. The caller treats it as opaque; the
/// accessors parse it leniently for display and tests.
///
/// # Example
///
/// ```
/// use secretsync::SecretId;
///
/// let id = SecretId::new("https://contoso.vault.azure.net/secrets/hello/e924f053839f4431b35bc54393f98423");
/// assert_eq!(id.name(), Some("hello"));
/// assert_eq!(id.version(), Some("e924f053839f4431b35bc54393f98423"));
/// assert_eq!(id.vault_url(), Some("https://contoso.vault.azure.net/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretId(String);

impl SecretId {
    /// Wraps an identifier URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The raw identifier URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments after `/secrets/`, if the URI has that shape.
    fn secret_path(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("/secrets/")?;
        Some(rest)
    }

    /// The vault base URL, including its trailing slash.
    pub fn vault_url(&self) -> Option<&str> {
        let idx = self.0.find("/secrets/")?;
        Some(&self.0[..idx + 1])
    }

    /// The secret name encoded in the identifier.
    pub fn name(&self) -> Option<&str> {
        let path = self.secret_path()?;
        Some(path.split('/').next().unwrap_or(path))
    }

    /// The server-assigned version, when the identifier carries one.
    pub fn version(&self) -> Option<&str> {
        let path = self.secret_path()?;
        let mut segments = path.split('/');
        segments.next()?;
        segments.next().filter(|v| !v.is_empty())
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status label attached to the record after a write (or prospective write
/// in dry-run mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretStatus {
    /// Secret was created or updated.
    Created,
    /// Secret was deleted.
    Deleted,
}

impl fmt::Display for SecretStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A secret as read from the vault.
///
/// This is the internal intermediate used for the diff; it is never part of
/// a reconciliation result, which is how the value stays out of output.
#[derive(Debug, Clone)]
pub struct FetchedSecret {
    /// Identifier of the latest version.
    pub id: SecretId,
    /// The stored value.
    pub value: SecretString,
}

/// Result state of one reconciliation.
///
/// Contains the secret identifier and, when a write happened (or would have
/// happened in dry-run), a status label. Never contains the secret value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecretRecord {
    /// Identifier of the affected secret version, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<SecretId>,

    /// What the reconciler did (or would do).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SecretStatus>,
}

impl SecretRecord {
    /// Record for a no-op against an existing secret.
    pub fn unchanged(id: SecretId) -> Self {
        Self {
            secret_id: Some(id),
            status: None,
        }
    }

    /// Record for a performed or prospective write.
    pub fn with_status(id: Option<SecretId>, status: SecretStatus) -> Self {
        Self {
            secret_id: id,
            status: Some(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ID: &str =
        "https://contoso.vault.azure.net/secrets/MySecret/e924f053839f4431b35bc54393f98423";

    #[test]
    fn test_id_components() {
        let id = SecretId::new(FULL_ID);
        assert_eq!(id.vault_url(), Some("https://contoso.vault.azure.net/"));
        assert_eq!(id.name(), Some("MySecret"));
        assert_eq!(id.version(), Some("e924f053839f4431b35bc54393f98423"));
    }

    #[test]
    fn test_id_without_version() {
        let id = SecretId::new("https://contoso.vault.azure.net/secrets/MySecret");
        assert_eq!(id.name(), Some("MySecret"));
        assert_eq!(id.version(), None);
    }

    #[test]
    fn test_id_opaque_passthrough() {
        let id = SecretId::new("not-a-uri");
        assert_eq!(id.as_str(), "not-a-uri");
        assert_eq!(id.vault_url(), None);
        assert_eq!(id.name(), None);
        assert_eq!(id.version(), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SecretStatus::Created.to_string(), "Created");
        assert_eq!(SecretStatus::Deleted.to_string(), "Deleted");
    }

    #[test]
    fn test_record_serialization_omits_empty_fields() {
        let record = SecretRecord::default();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, "{}");

        let record = SecretRecord::with_status(Some(SecretId::new(FULL_ID)), SecretStatus::Created);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"secret_id\""));
        assert!(json.contains("\"Created\""));
    }
}
