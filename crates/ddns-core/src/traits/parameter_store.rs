// # Parameter Store Trait
//
// Defines the interface for the durable key-value store that holds the last
// known home IP.
//
// ## Purpose
//
// The store is the only state shared between the updater and the authorizer.
// It holds one string value per key, written by the updater and read by the
// authorizer.
//
// ## Implementations
//
// - AWS Systems Manager Parameter Store: `ddns-store-ssm` crate
// - In-memory and JSON file: `ddns_core::state`
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{ParameterLookup, ParameterStore};
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let store = /* ParameterStore implementation */;
//
//     if let ParameterLookup::Found(ip) = store.get("/home/ip").await? {
//         println!("last known home IP: {ip}");
//     }
//
//     store.put("/home/ip", "203.0.113.5").await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Result of reading a parameter
///
/// "Not found" is an expected condition (first run), so it is a value here
/// rather than an error. Every other read failure is an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLookup {
    /// The parameter exists and holds this value
    Found(String),
    /// The parameter has never been set
    NotFound,
}

impl ParameterLookup {
    /// The stored value, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            ParameterLookup::Found(value) => Some(value),
            ParameterLookup::NotFound => None,
        }
    }

    /// Consume the lookup, returning the stored value if any
    pub fn into_value(self) -> Option<String> {
        match self {
            ParameterLookup::Found(value) => Some(value),
            ParameterLookup::NotFound => None,
        }
    }
}

/// Trait for parameter store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error Handling
///
/// Any failure other than "not found" must be logged at error level by the
/// implementation and returned as `Err`. The updater treats these as fatal.
///
/// # Concurrency
///
/// Individual `get`/`put` calls are expected to be atomic; there is no
/// cross-call transaction and concurrent writers resolve as last-write-wins.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Read the current value of `name`
    ///
    /// # Returns
    ///
    /// - `Ok(ParameterLookup::Found(value))`: The current value
    /// - `Ok(ParameterLookup::NotFound)`: The key has never been set
    /// - `Err(Error)`: Storage error
    async fn get(&self, name: &str) -> Result<ParameterLookup, crate::Error>;

    /// Create or overwrite `name` with `value`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully written
    /// - `Err(Error)`: Storage error
    async fn put(&self, name: &str, value: &str) -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
