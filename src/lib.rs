//! litres-backup core library
//!
//! Backs up a litres.ru personal library: authenticates against the
//! catalit protocol, enumerates the items the account owns, and downloads
//! each one in a chosen format, skipping items already present locally.
//!
//! # Architecture
//!
//! - [`catalog`] - remote catalog client (authentication, listing, download
//!   streams) and the catalit XML protocol
//! - [`store`] - local file inspection and removal
//! - [`sync`] - the reconciliation policy and the sequential sync engine

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use catalog::{
    CatalogClient, CatalogConfig, CatalogError, Format, FormatParseError, RemoteItem, Session,
};
pub use store::LocalFileState;
pub use sync::{Decision, SyncEngine, SyncError, SyncOptions, SyncReport, TargetFile, decide};
