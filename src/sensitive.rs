//! Redacted container for secret material.
//!
//! Secret values and service-principal secrets travel through the crate in a
//! [`SecretString`], which keeps them out of `Debug` output, log events, and
//! serialized results.

use serde::Deserialize;
use std::fmt;

/// A string whose content must never appear in logs or results.
///
/// `Debug` and `Display` print a redaction marker; the raw value is reachable
/// only through [`expose`](SecretString::expose). The type implements
/// `Deserialize` (values arrive from the caller) but deliberately not
/// `Serialize`, so a result object cannot contain one.
///
/// # Example
///
/// ```
/// use secretsync::SecretString;
///
/// let value = SecretString::new("My_Pass_Sec");
/// assert_eq!(format!("{:?}", value), "SecretString(\"[REDACTED]\")");
/// assert_eq!(value.expose(), "My_Pass_Sec");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a raw value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value. Use at the point of the remote call or the
    /// equality diff, nowhere else.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length without exposing content.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the wrapped value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(\"[REDACTED]\")")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::new("sensitive-data");
        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_display_is_redacted() {
        let secret = SecretString::new("sensitive-data");
        assert_eq!(secret.to_string(), "[REDACTED]");
    }

    #[test]
    fn test_expose_and_len() {
        let secret = SecretString::new("sensitive-data");
        assert_eq!(secret.expose(), "sensitive-data");
        assert_eq!(secret.len(), 14);
        assert!(!secret.is_empty());
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(SecretString::new("a"), SecretString::new("a"));
        assert_ne!(SecretString::new("a"), SecretString::new("a "));
    }

    #[test]
    fn test_deserialize_from_plain_string() {
        let secret: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(secret.expose(), "hunter2");
    }
}
