//! Home IP updater
//!
//! The HomeIpUpdater is responsible for:
//! - Resolving the DDNS hostname via HostnameResolver
//! - Comparing the result with the stored value
//! - Writing the new value only when it differs
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ HostnameResolver │─── Resolution ───┐
//! └──────────────────┘                  │
//!                                       ▼
//!                              ┌────────────────┐
//!                              │ HomeIpUpdater  │
//!                              └────────────────┘
//!                                       │
//!                 ┌─────────────────────┼─────────────────────┐
//!                 │                     │                     │
//!                 ▼                     ▼                     ▼
//!        ┌────────────────┐    ┌────────────────┐    ┌─────────────┐
//!        │ ParameterStore │    │ ParameterStore │    │   Events    │
//!        │ (get)          │    │ (put if new)   │    │  (notify)   │
//!        └────────────────┘    └────────────────┘    └─────────────┘
//! ```
//!
//! ## Decision Flow
//!
//! 1. Resolve the hostname. No address → skipped, store untouched
//! 2. Read the parameter. Not found counts as "different"
//! 3. Equal → already up to date
//! 4. Different → put the resolved IP → updated
//!
//! Store failures in steps 2 and 4 are fatal and propagate to the caller.
//! Every pass starts from scratch; the stored parameter is the only state.

mod outcome;

pub use outcome::{
    InvocationResult, MSG_MISSING_CONFIG, MSG_SKIPPED, MSG_UP_TO_DATE, MSG_UPDATED, STATUS_ERROR,
    STATUS_OK, UpdateOutcome,
};

use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::traits::{HostnameResolver, ParameterStore};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the HomeIpUpdater
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdaterEvent {
    /// Hostname did not resolve, pass skipped
    ResolutionSkipped {
        hostname: String,
    },

    /// Parameter has no value yet and will be initialized
    ParameterMissing {
        parameter_name: String,
    },

    /// Stored value already matches
    AlreadyUpToDate {
        parameter_name: String,
        ip: Ipv4Addr,
    },

    /// Write started
    UpdateStarted {
        parameter_name: String,
        ip: Ipv4Addr,
    },

    /// Write succeeded
    UpdateSucceeded {
        parameter_name: String,
        ip: Ipv4Addr,
        previous: Option<String>,
    },

    /// Store read or write failed
    UpdateFailed {
        parameter_name: String,
        error: String,
    },
}

/// Compare-and-update logic for the home IP parameter
///
/// The updater owns no state of its own. It is cheap to share behind an `Arc`
/// and safe to call concurrently, although overlapping passes are not
/// coordinated: two racing passes may both write, converging on the same value.
///
/// ## Lifecycle
///
/// 1. Create with [`HomeIpUpdater::new()`] (or [`HomeIpUpdater::with_event_channel()`])
/// 2. Call [`HomeIpUpdater::invoke()`] once per scheduled tick
pub struct HomeIpUpdater {
    /// Resolver for the DDNS hostname
    resolver: Arc<dyn HostnameResolver>,

    /// Store holding the last known home IP
    store: Arc<dyn ParameterStore>,

    /// Event sender for external monitoring
    event_tx: Option<mpsc::Sender<UpdaterEvent>>,
}

impl HomeIpUpdater {
    /// Create a new updater without event reporting
    pub fn new(resolver: Arc<dyn HostnameResolver>, store: Arc<dyn ParameterStore>) -> Self {
        Self {
            resolver,
            store,
            event_tx: None,
        }
    }

    /// Create a new updater that reports [`UpdaterEvent`]s
    ///
    /// # Returns
    ///
    /// A tuple of (updater, event_receiver). Events that don't fit in a channel
    /// of `capacity` are dropped with a warning.
    pub fn with_event_channel(
        resolver: Arc<dyn HostnameResolver>,
        store: Arc<dyn ParameterStore>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<UpdaterEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        let updater = Self {
            resolver,
            store,
            event_tx: Some(tx),
        };

        (updater, rx)
    }

    /// Run one invocation and map it onto the result contract
    ///
    /// `config` is passed as a `Result` so that a configuration failure is
    /// reported as an invocation result before any resolver or store call.
    ///
    /// - Configuration error → 500 "Missing configuration."
    /// - Store error → 500 "Unhandled error: ..."
    /// - Every [`UpdateOutcome`] → 200 with its fixed message
    pub async fn invoke(&self, config: Result<UpdaterConfig>) -> InvocationResult {
        let config = match config.and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "Missing required configuration");
                return InvocationResult::error(MSG_MISSING_CONFIG);
            }
        };

        match self.update(&config).await {
            Ok(outcome) => InvocationResult::from(&outcome),
            Err(e) => {
                error!(
                    error = %e,
                    hostname = %config.hostname,
                    parameter = %config.parameter_name,
                    "Unhandled error during home IP update"
                );
                InvocationResult::error(format!("Unhandled error: {e}"))
            }
        }
    }

    /// Resolve, compare, and write if needed
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateOutcome)`: One of the three handled outcomes
    /// - `Err(Error)`: Invalid configuration, or the store failed
    #[tracing::instrument(
        name = "home_ip_update",
        skip_all,
        fields(hostname = %config.hostname, parameter = %config.parameter_name)
    )]
    pub async fn update(&self, config: &UpdaterConfig) -> Result<UpdateOutcome> {
        config.validate()?;

        let resolution = self.resolver.resolve(&config.hostname).await;
        let Some(resolved_ip) = resolution.address() else {
            warn!(
                resolver = self.resolver.resolver_name(),
                outcome = %resolution,
                "Could not resolve current public IP. Skipping update."
            );
            self.emit_event(UpdaterEvent::ResolutionSkipped {
                hostname: config.hostname.clone(),
            });
            return Ok(UpdateOutcome::Skipped {
                hostname: config.hostname.clone(),
            });
        };

        let stored = match self.store.get(&config.parameter_name).await {
            Ok(lookup) => lookup.into_value(),
            Err(e) => {
                self.emit_failure(&config.parameter_name, &e);
                return Err(e);
            }
        };

        let resolved = resolved_ip.to_string();
        match stored.as_deref() {
            Some(current) if current == resolved => {
                info!(
                    ip = %resolved_ip,
                    "Parameter already contains the current IP. No update needed."
                );
                self.emit_event(UpdaterEvent::AlreadyUpToDate {
                    parameter_name: config.parameter_name.clone(),
                    ip: resolved_ip,
                });
                return Ok(UpdateOutcome::AlreadyUpToDate { ip: resolved_ip });
            }
            Some(current) => {
                info!(
                    previous = current,
                    ip = %resolved_ip,
                    "IP changed. Updating parameter."
                );
            }
            None => {
                debug!("Parameter has no value yet, initializing");
                self.emit_event(UpdaterEvent::ParameterMissing {
                    parameter_name: config.parameter_name.clone(),
                });
                info!(ip = %resolved_ip, "Initializing parameter with current IP");
            }
        }

        self.emit_event(UpdaterEvent::UpdateStarted {
            parameter_name: config.parameter_name.clone(),
            ip: resolved_ip,
        });

        if let Err(e) = self.store.put(&config.parameter_name, &resolved).await {
            self.emit_failure(&config.parameter_name, &e);
            return Err(e);
        }

        info!(
            store = self.store.store_name(),
            ip = %resolved_ip,
            "Parameter updated"
        );
        self.emit_event(UpdaterEvent::UpdateSucceeded {
            parameter_name: config.parameter_name.clone(),
            ip: resolved_ip,
            previous: stored.clone(),
        });

        Ok(UpdateOutcome::Updated {
            previous: stored,
            ip: resolved_ip,
        })
    }

    fn emit_failure(&self, parameter_name: &str, error: &crate::Error) {
        self.emit_event(UpdaterEvent::UpdateFailed {
            parameter_name: parameter_name.to_string(),
            error: error.to_string(),
        });
    }

    /// Emit an updater event
    fn emit_event(&self, event: UpdaterEvent) {
        let Some(tx) = &self.event_tx else {
            return;
        };

        // Never block the update on a slow consumer
        if tx.try_send(event).is_err() {
            warn!("Event channel full or closed, dropping updater event");
        }
    }
}
