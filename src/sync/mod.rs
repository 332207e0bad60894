//! Sync engine and reconciliation policy.

pub mod engine;
pub mod error;
pub mod policy;
pub mod progress;

pub use engine::{DEFAULT_PACING, PAGE_LIMIT, SyncEngine, SyncOptions, SyncReport};
pub use error::SyncError;
pub use policy::{Decision, TargetFile, decide};
pub use progress::{CHUNK_SIZE, chunk_units};
