// # Parameter Store Implementations
//
// This module provides local implementations of the ParameterStore trait,
// for tests, development, and deployments outside AWS.

pub mod file;
pub mod memory;

pub use file::FileParameterStore;
pub use memory::MemoryParameterStore;

/// A stored parameter value
///
/// `last_written` is tracked by the store, never by the updater.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParameterRecord {
    /// The stored value (textual IP)
    pub value: String,
    /// When the value was last written
    pub last_written: chrono::DateTime<chrono::Utc>,
}

impl ParameterRecord {
    /// Create a record written now
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            last_written: chrono::Utc::now(),
        }
    }
}
