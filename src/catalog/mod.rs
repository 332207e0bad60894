//! Remote catalog client for the catalit protocol.
//!
//! This module is the protocol boundary: authentication, the owned-items
//! listing, and per-item download streams. It has no knowledge of local
//! state; reconciliation lives in [`crate::sync`].

pub mod client;
pub mod error;
pub mod format;
pub mod xml;

pub use client::{CatalogClient, CatalogConfig, DownloadStream, Session};
pub use error::CatalogError;
pub use format::{Format, FormatParseError};
pub use xml::{AuthResponse, CatalogPage, FormatVariant, RemoteItem};
