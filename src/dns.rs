//! Forward DNS resolution of tracker hosts.
//!
//! The [`Resolver`] trait is the seam between the extractors and the platform resolver, so
//! tests can substitute a deterministic table. [`resolve_public`] wraps any resolver with the
//! public-address filter and turns failures into a logged, empty result.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, error};

#[cfg(test)]
use mockall::automock;

use crate::classifier::is_public;
use crate::error::ResolveError;

/// Default DNS resolution timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// A source of A records for a host name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Look up every IPv4 address of `host`, unfiltered and in resolver order.
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError>;
}

/// Resolver backed by the platform's `getaddrinfo`.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(DNS_TIMEOUT_SECS)
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, ResolveError> {
        if host.is_empty() {
            return Err(ResolveError::EmptyHost);
        }

        let name = host.to_string();
        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_host(&name));

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Ok(addrs))) => Ok(addrs
                .into_iter()
                .filter_map(|addr| match addr {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                })
                .collect()),
            Ok(Ok(Err(e))) => Err(ResolveError::Lookup(e.to_string())),
            Ok(Err(e)) => Err(ResolveError::Task(e.to_string())),
            Err(_) => Err(ResolveError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Resolve `host` to its distinct public IPv4 addresses.
///
/// Never fails: a lookup error is logged with the host name and yields an empty set, the
/// same as a host whose every address was filtered out.
pub async fn resolve_public<R: Resolver + ?Sized>(
    resolver: &R,
    host: &str,
) -> BTreeSet<Ipv4Addr> {
    match resolver.lookup_ipv4(host).await {
        Ok(addrs) => {
            let public: BTreeSet<Ipv4Addr> =
                addrs.into_iter().filter(|addr| is_public(*addr)).collect();
            debug!("Host '{}' resolved to {} public IPs", host, public.len());
            public
        }
        Err(e) => {
            error!("Unable to resolve host '{}': {}", host, e);
            BTreeSet::new()
        }
    }
}
