//! Resolve command implementation.
//!
//! Runs a single host through the same lookup and filtering as `update`.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::classifier::classify;
use crate::config::Config;
use crate::dns::{Resolver, SystemResolver};
use crate::sources::exodus::simplify_host;

/// Run the resolve command
pub async fn run(host: &str, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let resolver = SystemResolver::new(config.resolver.timeout_secs);

    print!("{}", describe(&resolver, host).await);
    Ok(())
}

/// Resolve `host` once and describe every address, kept or discarded.
pub async fn describe<R: Resolver + ?Sized>(resolver: &R, host: &str) -> String {
    let (host, simplified) = simplify_host(host);
    let mut out = String::new();

    if simplified {
        out.push_str(&format!("Wildcard host simplified to '{}'\n", host));
    }

    let addrs = match resolver.lookup_ipv4(host).await {
        Ok(addrs) => addrs,
        Err(e) => {
            out.push_str(&format!("{}: no public IPv4 address ({})\n", host, e));
            return out;
        }
    };

    let mut public = BTreeSet::new();
    let mut discarded = BTreeMap::new();
    for addr in addrs {
        match classify(addr) {
            None => {
                public.insert(addr);
            }
            Some(reason) => {
                discarded.insert(addr, reason);
            }
        }
    }

    if public.is_empty() {
        out.push_str(&format!("{}: no public IPv4 address\n", host));
    } else {
        out.push_str(&format!("{}: {} public IPv4 address(es)\n", host, public.len()));
        for addr in &public {
            out.push_str(&format!("  {}\n", addr));
        }
    }
    for (addr, reason) in discarded {
        out.push_str(&format!("  {} discarded: {}\n", addr, reason.describe()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::MockResolver;
    use crate::error::ResolveError;

    #[tokio::test]
    async fn test_describe_public() {
        let mut mock = MockResolver::new();
        mock.expect_lookup_ipv4()
            .times(1)
            .returning(|_| Ok(vec!["8.8.4.4".parse().unwrap(), "8.8.8.8".parse().unwrap()]));

        let out = describe(&mock, "dns.example.com").await;
        assert!(out.contains("2 public IPv4 address(es)"));
        assert!(out.contains("  8.8.4.4\n  8.8.8.8\n"));
    }

    #[tokio::test]
    async fn test_describe_discarded_reasons() {
        let mut mock = MockResolver::new();
        mock.expect_lookup_ipv4()
            .withf(|host| host == "sub.example.com")
            .times(1)
            .returning(|_| Ok(vec!["127.0.0.1".parse().unwrap()]));

        let out = describe(&mock, ".sub.example.com").await;
        assert!(out.contains("simplified to 'sub.example.com'"));
        assert!(out.contains("no public IPv4 address"));
        assert!(out.contains("127.0.0.1 discarded: loopback"));
    }

    #[tokio::test]
    async fn test_describe_failure() {
        let mut mock = MockResolver::new();
        mock.expect_lookup_ipv4()
            .returning(|_| Err(ResolveError::Timeout(5)));

        let out = describe(&mock, "slow.example.com").await;
        assert_eq!(
            out,
            "slow.example.com: no public IPv4 address (timed out after 5s)\n"
        );
    }

    #[tokio::test]
    async fn test_describe_mixed_lists_kept_and_discarded() {
        let mut mock = MockResolver::new();
        mock.expect_lookup_ipv4().times(1).returning(|_| {
            Ok(vec![
                "10.0.0.5".parse().unwrap(),
                "93.184.216.34".parse().unwrap(),
                "192.168.1.1".parse().unwrap(),
                "10.0.0.5".parse().unwrap(),
            ])
        });

        let out = describe(&mock, "mixed.example.com").await;
        assert_eq!(
            out,
            "mixed.example.com: 1 public IPv4 address(es)\n\
             \x20 93.184.216.34\n\
             \x20 10.0.0.5 discarded: private range 10.0.0.0/8 (RFC1918)\n\
             \x20 192.168.1.1 discarded: private range 192.168.0.0/16 (RFC1918)\n"
        );
    }
}
