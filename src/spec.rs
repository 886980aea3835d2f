//! Desired secret state, as declared by the caller.

use crate::validation::validate_secret_name;
use crate::{Result, SecretString, SecretSyncError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Whether the secret should exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Ensure the secret exists with the declared value.
    #[default]
    Present,
    /// Ensure the secret does not exist.
    Absent,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

impl FromStr for Presence {
    type Err = SecretSyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(SecretSyncError::Validation(format!(
                "state must be 'present' or 'absent', got '{}'",
                other
            ))),
        }
    }
}

/// Desired state of one secret.
///
/// Constructed once per invocation from caller parameters and never mutated.
/// Timestamps stay in their raw string form here; [`validity_window`]
/// parses them when (and only when) a write is on the table.
///
/// # Example
///
/// ```
/// use secretsync::SecretSpec;
///
/// let spec = SecretSpec::present("MySecret", "My_Pass_Sec")
///     .with_content_type("password")
///     .with_tag("team", "platform");
/// assert!(spec.validate().is_ok());
/// ```
///
/// [`validity_window`]: SecretSpec::validity_window
#[derive(Debug, Clone)]
pub struct SecretSpec {
    name: String,
    value: Option<SecretString>,
    valid_from: Option<String>,
    expiry: Option<String>,
    content_type: Option<String>,
    tags: HashMap<String, String>,
    presence: Presence,
}

impl SecretSpec {
    /// Declares that a secret should exist with the given value.
    pub fn present(name: impl Into<String>, value: impl Into<SecretString>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            valid_from: None,
            expiry: None,
            content_type: None,
            tags: HashMap::new(),
            presence: Presence::Present,
        }
    }

    /// Declares that a secret should not exist. No value is needed.
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            valid_from: None,
            expiry: None,
            content_type: None,
            tags: HashMap::new(),
            presence: Presence::Absent,
        }
    }

    /// Sets the valid-from timestamp as a raw date string.
    pub fn with_valid_from(mut self, valid_from: impl Into<String>) -> Self {
        self.valid_from = Some(valid_from.into());
        self
    }

    /// Sets the expiry timestamp as a raw date string.
    pub fn with_expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Sets the content-type label.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Adds one tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole tag set.
    pub fn with_tags(mut self, tags: HashMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Secret name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value, when presence is `present`.
    pub fn value(&self) -> Option<&SecretString> {
        self.value.as_ref()
    }

    /// Content-type label.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Tag set.
    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    /// Presence flag.
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Checks the spec before any remote call.
    ///
    /// # Errors
    ///
    /// - [`SecretSyncError::InvalidSecretName`] for a name outside Key Vault
    ///   rules
    /// - [`SecretSyncError::Validation`] for `present` without a value
    pub fn validate(&self) -> Result<()> {
        validate_secret_name(&self.name)?;

        if self.presence == Presence::Present && self.value.is_none() {
            return Err(SecretSyncError::Validation(
                "a secret value is required when state is 'present'".to_string(),
            ));
        }

        Ok(())
    }

    /// Parses the declared validity window.
    ///
    /// Empty or missing date strings are skipped; malformed non-empty ones
    /// are a hard failure.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSyncError::Validation`] if a non-empty date string is
    /// not in a recognized format.
    pub fn validity_window(&self) -> Result<ValidityWindow> {
        Ok(ValidityWindow {
            not_before: parse_optional_timestamp(self.valid_from.as_deref(), "secret_valid_from")?,
            expires: parse_optional_timestamp(self.expiry.as_deref(), "secret_expiry")?,
        })
    }
}

/// Parsed validity window of a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityWindow {
    /// Secret is not usable before this instant.
    pub not_before: Option<DateTime<Utc>>,
    /// Secret is not usable after this instant.
    pub expires: Option<DateTime<Utc>>,
}

fn parse_optional_timestamp(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_timestamp(s, field).map(Some),
    }
}

/// Permissive date-string parsing: RFC 3339, then common unzoned formats
/// taken as UTC. The raw string is kept out of the error message; these
/// parameters are sensitive in the caller's convention.
fn parse_timestamp(s: &str, field: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(SecretSyncError::Validation(format!(
        "{} is not in a recognized date format",
        field
    )))
}
