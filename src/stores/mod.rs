//! Store implementations.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "azure")]
pub mod azure;
