//! Storage layer (local key/value files).

pub mod local;

pub use local::{LocalStorage, StorageError};

/// Storage keys as constants.
pub mod keys {
    /// JSON array of every hike record, newest first
    pub const HIKING_RECORDS: &str = "hiking_records";
}
