// # Hostname Resolver Trait
//
// Defines the interface for discovering the home network's current public IP
// by resolving its dynamic-DNS hostname.
//
// ## Implementations
//
// - Hickory DNS: `ddns-resolver-hickory` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::HostnameResolver;
//
// #[tokio::main]
// async fn main() {
//     let resolver = /* HostnameResolver implementation */;
//
//     match resolver.resolve("home.example.net").await.address() {
//         Some(ip) => println!("home is at {ip}"),
//         None => println!("could not resolve"),
//     }
// }
// ```

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// Outcome of resolving a hostname to an IPv4 address
///
/// Every failure kind is kept distinct so implementations and callers can log
/// it precisely, but all of them mean the same thing to the updater: no
/// address was resolved this time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first A record returned for the name
    Resolved(Ipv4Addr),
    /// The name exists but has no A record
    NoRecords,
    /// The name does not exist (NXDOMAIN)
    NxDomain,
    /// Any other resolution or network failure
    Failed(String),
}

impl Resolution {
    /// The resolved address, if any
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self {
            Resolution::Resolved(ip) => Some(*ip),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Resolved(ip) => write!(f, "resolved to {ip}"),
            Resolution::NoRecords => f.write_str("no A record"),
            Resolution::NxDomain => f.write_str("name does not exist"),
            Resolution::Failed(reason) => write!(f, "resolution failed: {reason}"),
        }
    }
}

/// Trait for hostname resolver implementations
///
/// # Contract
///
/// - `resolve()` never fails: every problem degrades to a non-`Resolved`
///   variant, logged by the implementation with the hostname attached.
/// - Only IPv4 (A) records are considered; when several are returned the
///   first one wins.
/// - No retries. The next scheduled tick is the retry.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    /// Resolve `hostname` to its current IPv4 address
    async fn resolve(&self, hostname: &str) -> Resolution;

    /// Get the resolver name (for logging/debugging)
    fn resolver_name(&self) -> &'static str;
}
