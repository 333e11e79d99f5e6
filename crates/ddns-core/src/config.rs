//! Configuration types for the home IP sync
//!
//! The updater needs exactly two values, both read from the environment on
//! every invocation:
//!
//! - `DDNS_HOSTNAME`: the dynamic-DNS hostname to resolve
//! - `HOME_IP_SSM_PARAM_NAME`: the parameter holding the last known home IP

use serde::{Deserialize, Serialize};

/// Environment variable holding the hostname to resolve
pub const HOSTNAME_ENV: &str = "DDNS_HOSTNAME";

/// Environment variable holding the parameter name
pub const PARAMETER_NAME_ENV: &str = "HOME_IP_SSM_PARAM_NAME";

/// Updater configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// DDNS hostname to resolve (e.g., "home.example.net")
    pub hostname: String,

    /// Name of the parameter that stores the home IP
    pub parameter_name: String,
}

impl UpdaterConfig {
    /// Create a new configuration
    pub fn new(hostname: impl Into<String>, parameter_name: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            parameter_name: parameter_name.into(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Values are trimmed; unset and blank variables both count as missing.
    /// The error names every missing variable, not just the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        match (read(HOSTNAME_ENV), read(PARAMETER_NAME_ENV)) {
            (Some(hostname), Some(parameter_name)) => Ok(Self {
                hostname,
                parameter_name,
            }),
            (hostname, parameter_name) => {
                let missing: Vec<&str> = [
                    hostname.is_none().then_some(HOSTNAME_ENV),
                    parameter_name.is_none().then_some(PARAMETER_NAME_ENV),
                ]
                .into_iter()
                .flatten()
                .collect();

                Err(crate::Error::config(format!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hostname.trim().is_empty() {
            return Err(crate::Error::config("Hostname cannot be empty"));
        }
        if self.parameter_name.trim().is_empty() {
            return Err(crate::Error::config("Parameter name cannot be empty"));
        }
        Ok(())
    }
}
