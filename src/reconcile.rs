//! The reconciler: converge one secret to its declared state.

use crate::record::{SecretRecord, SecretStatus};
use crate::spec::{Presence, SecretSpec};
use crate::store::{SecretStore, SetSecretRequest};
use crate::{Result, SecretSyncError};
use serde::Serialize;
use tracing::debug;

/// Whether remote writes are performed or only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Perform the minimal write needed to converge.
    #[default]
    Apply,
    /// Check mode: compute and report the intended change, write nothing.
    DryRun,
}

impl RunMode {
    /// True in check mode.
    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// What one reconciliation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    /// Whether remote state differed from the spec (and, outside dry-run,
    /// was changed to match).
    pub changed: bool,
    /// Resulting record: identifier plus status on a write, the fetched
    /// identifier on a no-op. Never the value.
    pub state: SecretRecord,
}

/// Converges one secret: at most one read, at most one write.
///
/// `NotFound` on the read is the expected signal for the create path; every
/// other error aborts the invocation. Validation (name rules, required
/// value, date parsing) happens before any write and also applies in
/// dry-run.
///
/// # Errors
///
/// - [`SecretSyncError::Validation`] / [`SecretSyncError::InvalidSecretName`]
///   for a bad spec, before any remote call reaches a write
/// - [`SecretSyncError::Remote`] when the store fails
pub async fn reconcile<S>(store: &S, spec: &SecretSpec, mode: RunMode) -> Result<ReconcileOutcome>
where
    S: SecretStore + ?Sized,
{
    spec.validate()?;

    let current = match store.get_secret(spec.name(), "").await {
        Ok(found) => Some(found),
        Err(err) if err.is_not_found() => None,
        Err(err) => return Err(err),
    };

    let changed = match (current.as_ref(), spec.presence()) {
        (None, Presence::Present) => true,
        (None, Presence::Absent) => false,
        (Some(_), Presence::Absent) => true,
        (Some(found), Presence::Present) => match spec.value() {
            // exact string equality, no normalization
            Some(desired) => found.value.expose() != desired.expose(),
            None => false,
        },
    };

    debug!(
        secret = spec.name(),
        presence = %spec.presence(),
        exists = current.is_some(),
        changed,
        "computed reconciliation diff"
    );

    // Parsed up front so a malformed date string fails the invocation even
    // in dry-run and even when no write would follow, matching the caller's
    // contract that bad input is never silently ignored.
    let window = spec.validity_window()?;

    if mode.is_dry_run() {
        let state = match (changed, spec.presence()) {
            (true, Presence::Present) => SecretRecord::with_status(
                current.map(|found| found.id),
                SecretStatus::Created,
            ),
            (true, Presence::Absent) => SecretRecord::with_status(
                current.map(|found| found.id),
                SecretStatus::Deleted,
            ),
            (false, _) => unchanged_record(current),
        };
        return Ok(ReconcileOutcome { changed, state });
    }

    let state = if !changed {
        unchanged_record(current)
    } else {
        match spec.presence() {
            Presence::Present => {
                let value = match spec.value() {
                    Some(value) => value,
                    None => {
                        return Err(SecretSyncError::Validation(
                            "a secret value is required when state is 'present'".to_string(),
                        ))
                    }
                };

                let id = store
                    .set_secret(SetSecretRequest {
                        name: spec.name(),
                        value,
                        tags: spec.tags(),
                        content_type: spec.content_type(),
                        window,
                    })
                    .await?;
                debug!(secret = spec.name(), "secret created");
                SecretRecord::with_status(Some(id), SecretStatus::Created)
            }
            Presence::Absent => {
                let id = store.delete_secret(spec.name()).await?;
                debug!(secret = spec.name(), "secret deleted");
                SecretRecord::with_status(Some(id), SecretStatus::Deleted)
            }
        }
    };

    Ok(ReconcileOutcome { changed, state })
}

fn unchanged_record(current: Option<crate::record::FetchedSecret>) -> SecretRecord {
    match current {
        Some(found) => SecretRecord::unchanged(found.id),
        None => SecretRecord::default(),
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryStore;

    const VAULT: &str = "https://contoso.vault.azure.net/";

    #[tokio::test]
    async fn test_create_when_missing() {
        let store = MemoryStore::new(VAULT);
        let spec = SecretSpec::present("MySecret", "My_Pass_Sec");

        let outcome = reconcile(&store, &spec, RunMode::Apply).await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.state.status, Some(SecretStatus::Created));
    }

    #[tokio::test]
    async fn test_update_only_when_value_differs() {
        let store = MemoryStore::new(VAULT);
        store.seed("MySecret", "old-value").await;

        let same = SecretSpec::present("MySecret", "old-value");
        let outcome = reconcile(&store, &same, RunMode::Apply).await.unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.state.status, None);
        assert!(outcome.state.secret_id.is_some());

        let differs = SecretSpec::present("MySecret", "new-value");
        let outcome = reconcile(&store, &differs, RunMode::Apply).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.state.status, Some(SecretStatus::Created));
    }

    #[tokio::test]
    async fn test_value_comparison_is_exact() {
        let store = MemoryStore::new(VAULT);
        store.seed("MySecret", "value").await;

        // trailing whitespace is a different value
        let spec = SecretSpec::present("MySecret", "value ");
        let outcome = reconcile(&store, &spec, RunMode::Apply).await.unwrap();
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn test_absent_deletes_existing() {
        let store = MemoryStore::new(VAULT);
        store.seed("MySecret", "value").await;

        let spec = SecretSpec::absent("MySecret");
        let outcome = reconcile(&store, &spec, RunMode::Apply).await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.state.status, Some(SecretStatus::Deleted));
    }

    #[tokio::test]
    async fn test_absent_of_missing_is_noop() {
        let store = MemoryStore::new(VAULT);
        let spec = SecretSpec::absent("MySecret");

        let outcome = reconcile(&store, &spec, RunMode::Apply).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.state, SecretRecord::default());
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_date_fails_even_in_dry_run() {
        let store = MemoryStore::new(VAULT);
        let spec = SecretSpec::present("MySecret", "v").with_expiry("not-a-date");

        let err = reconcile(&store, &spec, RunMode::DryRun).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_remote_error_propagates() {
        let store = MemoryStore::new(VAULT);
        store
            .inject_get_error(SecretSyncError::remote_op("get", "MySecret", "boom"))
            .await;

        let spec = SecretSpec::present("MySecret", "v");
        let err = reconcile(&store, &spec, RunMode::Apply).await.unwrap_err();
        assert!(matches!(err, SecretSyncError::Remote { .. }));
    }

    #[tokio::test]
    async fn test_outcome_serialization_shape() {
        let store = MemoryStore::new(VAULT);
        let spec = SecretSpec::present("MySecret", "v");

        let outcome = reconcile(&store, &spec, RunMode::Apply).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["changed"], true);
        assert_eq!(json["state"]["status"], "Created");
        assert!(json["state"]["secret_id"]
            .as_str()
            .unwrap()
            .starts_with(VAULT));
    }
}
