// # ddns-core
//
// Core library for keeping a home network's public IP in a parameter store.
//
// ## Architecture Overview
//
// - **HostnameResolver**: Trait for resolving the DDNS hostname to an IPv4 address
// - **ParameterStore**: Trait for the durable key-value store holding the home IP
// - **HomeIpUpdater**: Resolve → compare → write-if-changed, once per tick
// - **UpdaterConfig**: The hostname and parameter name, read from the environment
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from DNS and storage backends
// 2. **Tick-Driven**: No loops or timers here; an external schedule calls the updater
// 3. **Library-First**: The binary is a thin shell around `HomeIpUpdater::invoke`
// 4. **Idempotency**: An unchanged IP never causes a write

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{HostnameResolver, ParameterLookup, ParameterStore, Resolution};
pub use engine::{HomeIpUpdater, InvocationResult, UpdateOutcome, UpdaterEvent};
pub use config::UpdaterConfig;
pub use error::{Error, Result};
pub use state::{FileParameterStore, MemoryParameterStore};
