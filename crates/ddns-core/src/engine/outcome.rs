//! Update outcomes and the invocation result contract

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Status code for every handled outcome
pub const STATUS_OK: u16 = 200;

/// Status code for configuration errors and unhandled failures
pub const STATUS_ERROR: u16 = 500;

/// Message for an invocation that could not resolve the hostname
pub const MSG_SKIPPED: &str = "Skipped: could not resolve current public IP.";

/// Message for an invocation whose stored IP already matched
pub const MSG_UP_TO_DATE: &str = "Parameter already up to date.";

/// Message for an invocation that wrote a new IP
pub const MSG_UPDATED: &str = "Parameter updated successfully.";

/// Message for an invocation with missing configuration
pub const MSG_MISSING_CONFIG: &str = "Missing configuration.";

/// Terminal state of one update pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Hostname did not resolve; the store was not touched
    Skipped {
        hostname: String,
    },

    /// Stored value already equals the resolved IP
    AlreadyUpToDate {
        ip: Ipv4Addr,
    },

    /// Resolved IP was written to the store
    Updated {
        /// Previous stored value (`None` if the parameter did not exist)
        previous: Option<String>,
        ip: Ipv4Addr,
    },
}

impl UpdateOutcome {
    /// Whether this outcome wrote to the store
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }

    /// Fixed message reported for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            UpdateOutcome::Skipped { .. } => MSG_SKIPPED,
            UpdateOutcome::AlreadyUpToDate { .. } => MSG_UP_TO_DATE,
            UpdateOutcome::Updated { .. } => MSG_UPDATED,
        }
    }
}

/// Result returned to whoever triggered the invocation
///
/// Serialized as `{"statusCode": 200, "body": "..."}`. The scheduler does not
/// act on it; it exists for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    #[serde(rename = "body")]
    pub message: String,
}

impl InvocationResult {
    /// A handled outcome (status 200)
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_OK,
            message: message.into(),
        }
    }

    /// A fatal outcome (status 500)
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_ERROR,
            message: message.into(),
        }
    }

    /// Whether the invocation was handled
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

impl From<&UpdateOutcome> for InvocationResult {
    fn from(outcome: &UpdateOutcome) -> Self {
        Self::ok(outcome.message())
    }
}
