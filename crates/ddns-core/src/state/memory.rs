// # Memory Parameter Store
//
// In-memory implementation of ParameterStore.
//
// ## Crash Behavior
//
// - All values are lost on restart
// - First pass after a restart sees "not found" and writes the resolved IP
//
// ## When to Use
//
// - Tests
// - Local dry runs where the write itself doesn't matter

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ParameterRecord;
use crate::traits::parameter_store::{ParameterLookup, ParameterStore};
use crate::Error;

/// In-memory parameter store implementation
///
/// Values live in a HashMap protected by a RwLock. Clones share the same map.
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::state::MemoryParameterStore;
/// use ddns_core::traits::ParameterStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryParameterStore::with_parameters([("/home/ip", "0.0.0.0")]);
///
///     store.put("/home/ip", "203.0.113.5").await?;
///
///     let lookup = store.get("/home/ip").await?;
///     assert_eq!(lookup.value(), Some("203.0.113.5"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryParameterStore {
    inner: Arc<RwLock<HashMap<String, ParameterRecord>>>,
}

impl MemoryParameterStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with parameters, e.g. the `0.0.0.0` provisioning sentinel
    pub fn with_parameters<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let parameters = parameters
            .into_iter()
            .map(|(name, value)| (name.into(), ParameterRecord::new(value)))
            .collect();

        Self {
            inner: Arc::new(RwLock::new(parameters)),
        }
    }

    /// Get the full record for a parameter
    pub async fn record(&self, name: &str) -> Option<ParameterRecord> {
        self.inner.read().await.get(name).cloned()
    }

    /// Get the number of parameters in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get(&self, name: &str) -> Result<ParameterLookup, Error> {
        let guard = self.inner.read().await;
        Ok(match guard.get(name) {
            Some(record) => ParameterLookup::Found(record.value.clone()),
            None => ParameterLookup::NotFound,
        })
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(name.to_string(), ParameterRecord::new(value));
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
