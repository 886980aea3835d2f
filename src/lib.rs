//! Secretsync - declarative, idempotent secret reconciliation for Azure Key Vault.
//!
//! Secretsync ensures a named secret inside a vault is present with a given
//! value, or absent, and reports whether anything had to change. Repeated
//! invocations with the same declaration converge to "no change". A dry-run
//! mode computes and reports the intended change without performing remote
//! writes.
//!
//! # Features
//!
//! - **Idempotent**: at most one read and one write per invocation; equal
//!   value means no write
//! - **Check mode**: dry-run reports the prospective Created/Deleted status
//!   without touching the vault
//! - **Credential chain**: managed identity, CLI login session, and explicit
//!   service-principal credentials tried as an ordered fallback list
//! - **Redaction by type**: secret values travel in a wrapper that cannot be
//!   serialized or logged
//!
//! # Quick Start
//!
//! ```
//! use secretsync::stores::memory::MemoryStore;
//! use secretsync::{reconcile, RunMode, SecretSpec};
//!
//! #[tokio::main]
//! async fn main() -> secretsync::Result<()> {
//!     // In production this is AzureSecretStore::connect (feature "azure").
//!     let store = MemoryStore::new("https://contoso.vault.azure.net/");
//!
//!     let spec = SecretSpec::present("MySecret", "My_Pass_Sec")
//!         .with_tag("testing", "testing");
//!
//!     let outcome = reconcile(&store, &spec, RunMode::Apply).await?;
//!     assert!(outcome.changed);
//!
//!     // Same declaration again: nothing to do.
//!     let outcome = reconcile(&store, &spec, RunMode::Apply).await?;
//!     assert!(!outcome.changed);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Stores
//!
//! | Store | Feature flag | Notes |
//! |-------|--------------|-------|
//! | Memory | `memory` (default) | In-memory testing store with error injection |
//! | Azure Key Vault | `azure` | SDK-based, credential chain per `auth_source` |

pub mod config;
pub mod credentials;
pub mod error;
pub mod params;
pub mod reconcile;
pub mod record;
pub mod sensitive;
pub mod spec;
pub mod store;
pub mod stores;
pub mod validation;

pub use config::{AuthSource, VaultConfig};
pub use error::{Result, SecretSyncError};
pub use params::EnsureParams;
pub use reconcile::{reconcile, ReconcileOutcome, RunMode};
pub use record::{FetchedSecret, SecretId, SecretRecord, SecretStatus};
pub use sensitive::SecretString;
pub use spec::{Presence, SecretSpec, ValidityWindow};
pub use store::{SecretStore, SetSecretRequest};

#[cfg(feature = "azure")]
pub use stores::azure::AzureSecretStore;
