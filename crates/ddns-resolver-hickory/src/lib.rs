// # Hickory Hostname Resolver
//
// This crate provides a HostnameResolver backed by hickory-resolver, using the
// system's DNS configuration (resolv.conf).
//
// ## Behavior
//
// - A records only; the first answer wins
// - No retries beyond what the resolver does natively
// - Never fails: NXDOMAIN, empty answers, and transport errors are all mapped
//   to a `Resolution` and logged with the hostname
//
// ## Lifetime
//
// The underlying resolver is built on first use and reused for the life of the
// process, so a warm Lambda container doesn't re-read system config on every
// tick. Answers are cached no longer than their TTL.

use async_trait::async_trait;
use ddns_core::traits::{HostnameResolver, Resolution};
use ddns_core::{Error, Result};
use hickory_resolver::{ResolveError, TokioResolver};
use std::net::Ipv4Addr;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// Hostname resolver over hickory-resolver
#[derive(Default)]
pub struct HickoryResolver {
    resolver: OnceCell<TokioResolver>,
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver")
            .field("initialized", &self.resolver.initialized())
            .finish()
    }
}

impl HickoryResolver {
    /// Create a resolver that reads system DNS configuration on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built resolver (custom name servers, options)
    pub fn with_resolver(resolver: TokioResolver) -> Self {
        Self {
            resolver: OnceCell::new_with(Some(resolver)),
        }
    }

    /// Get the shared resolver, building it on first use
    async fn resolver(&self) -> Result<&TokioResolver> {
        self.resolver
            .get_or_try_init(|| async {
                TokioResolver::builder_tokio()
                    .map(|builder| builder.build())
                    .map_err(|e| Error::resolver(format!("failed to create resolver: {e}")))
            })
            .await
    }
}

#[async_trait]
impl HostnameResolver for HickoryResolver {
    async fn resolve(&self, hostname: &str) -> Resolution {
        let resolver = match self.resolver().await {
            Ok(resolver) => resolver,
            Err(e) => {
                error!(hostname, error = %e, "Error resolving DDNS hostname");
                return Resolution::Failed(e.to_string());
            }
        };

        let resolution = match resolver.ipv4_lookup(hostname).await {
            Ok(lookup) => first_address(lookup.iter().map(|a| a.0))
                .map_or(Resolution::NoRecords, Resolution::Resolved),
            Err(e) => resolution_from_error(&e),
        };

        match &resolution {
            Resolution::Resolved(ip) => {
                info!(hostname, ip = %ip, "Resolved DDNS hostname");
            }
            Resolution::NoRecords => {
                warn!(hostname, "No A record found for hostname");
            }
            Resolution::NxDomain => {
                warn!(hostname, "Hostname does not exist");
            }
            Resolution::Failed(reason) => {
                error!(hostname, error = %reason, "Error resolving DDNS hostname");
            }
        }

        resolution
    }

    fn resolver_name(&self) -> &'static str {
        "hickory"
    }
}

/// First address of an answer, in the order the resolver returned them
fn first_address<I>(addresses: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    addresses.into_iter().next()
}

/// Map a lookup error to the matching `Resolution`
fn resolution_from_error(err: &ResolveError) -> Resolution {
    if err.is_nx_domain() {
        Resolution::NxDomain
    } else if err.is_no_records_found() {
        Resolution::NoRecords
    } else {
        Resolution::Failed(err.to_string())
    }
}
