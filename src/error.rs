//! Error types for secretsync operations.

use thiserror::Error;

/// Result type alias using [`SecretSyncError`].
pub type Result<T> = std::result::Result<T, SecretSyncError>;

/// Errors that can occur while reconciling a secret.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
/// Error messages never contain secret values or credential material.
#[derive(Debug, Error)]
pub enum SecretSyncError {
    /// Secret was not found in the vault.
    ///
    /// This is the one expected, non-fatal error: the reconciler catches it
    /// and turns it into the create path.
    #[error("secret not found: {0}")]
    NotFound(String),

    /// No credential strategy produced a usable credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration is incomplete or contradictory.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input failed validation before any remote call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Secret name violates the vault's naming rules.
    #[error("invalid secret name: {0}")]
    InvalidSecretName(String),

    /// Remote store operation failed with context.
    #[error("{operation} {name}: {message}")]
    Remote {
        /// Operation name (get, set, delete)
        operation: String,
        /// Secret name
        name: String,
        /// Remote failure description
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SecretSyncError {
    /// Creates a remote operation error with context.
    ///
    /// # Example
    ///
    /// ```
    /// use secretsync::SecretSyncError;
    ///
    /// let err = SecretSyncError::remote_op("set", "api-key", "throttled (429)");
    /// assert_eq!(err.to_string(), "set api-key: throttled (429)");
    /// ```
    pub fn remote_op(
        operation: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            operation: operation.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error is the expected not-found outcome of a read.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error indicates bad input rather than a remote failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidSecretName(_))
    }
}
