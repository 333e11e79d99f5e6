//! Core traits for the home IP sync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HostnameResolver`]: Resolve the DDNS hostname to the current home IP
//! - [`ParameterStore`]: Durable storage of the last known home IP

pub mod hostname_resolver;
pub mod parameter_store;

pub use hostname_resolver::{HostnameResolver, Resolution};
pub use parameter_store::{ParameterLookup, ParameterStore};
