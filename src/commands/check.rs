//! Check command implementation.

use anyhow::Result;
use std::net::Ipv4Addr;

use crate::classifier::classify;

/// Run the check command
pub fn run(ip_str: &str) -> Result<()> {
    println!("{}", verdict(ip_str)?);
    Ok(())
}

/// Whether `ip_str` would be kept in a blocklist, with the reason if not.
pub fn verdict(ip_str: &str) -> Result<String> {
    let ip: Ipv4Addr = ip_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid IPv4 address: {}", ip_str))?;

    Ok(match classify(ip) {
        None => format!("IP {} is PUBLIC (blockable)", ip),
        Some(reason) => format!("IP {} is DISCARDED: {}", ip, reason.describe()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_public() {
        assert_eq!(verdict("8.8.8.8").unwrap(), "IP 8.8.8.8 is PUBLIC (blockable)");
    }

    #[test]
    fn test_verdict_discarded() {
        let out = verdict("172.16.0.1").unwrap();
        assert!(out.contains("DISCARDED"));
        assert!(out.contains("172.16.0.0/12"));
    }

    #[test]
    fn test_verdict_invalid() {
        assert!(verdict("not-an-ip").is_err());
        assert!(verdict("::1").is_err());
        assert!(verdict("256.0.0.1").is_err());
    }
}
