//! Public/blockable IPv4 address classification.
//!
//! Resolved tracker addresses are only worth blocking when they are routable on the
//! public internet. Anything in loopback, RFC1918 or link-local space (plus the all-zero
//! address) is what sinkholed trackers usually resolve to, and blocking it would break
//! the local network instead.

use std::net::Ipv4Addr;

/// Why an address was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unspecified,
    Private10,
    Loopback,
    LinkLocal,
    Private172,
    Private192,
}

impl Rejection {
    pub fn describe(self) -> &'static str {
        match self {
            Rejection::Unspecified => "unspecified address 0.0.0.0",
            Rejection::Private10 => "private range 10.0.0.0/8 (RFC1918)",
            Rejection::Loopback => "loopback range 127.0.0.0/8",
            Rejection::LinkLocal => "link-local range 169.254.0.0/16 (RFC3927)",
            Rejection::Private172 => "private range 172.16.0.0/12 (RFC1918)",
            Rejection::Private192 => "private range 192.168.0.0/16 (RFC1918)",
        }
    }
}

/// Return the reason `addr` must not end up in a blocklist, if any.
pub fn classify(addr: Ipv4Addr) -> Option<Rejection> {
    match addr.octets() {
        [0, 0, 0, 0] => Some(Rejection::Unspecified),
        [10, ..] => Some(Rejection::Private10),
        [127, ..] => Some(Rejection::Loopback),
        [169, 254, ..] => Some(Rejection::LinkLocal),
        [172, 16..=31, ..] => Some(Rejection::Private172),
        [192, 168, ..] => Some(Rejection::Private192),
        _ => None,
    }
}

/// Whether `addr` is a public, blockable address.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
/// use trackip::classifier::is_public;
/// assert!(is_public(Ipv4Addr::new(8, 8, 8, 8)));
/// assert!(!is_public(Ipv4Addr::new(192, 168, 1, 1)));
/// ```
pub fn is_public(addr: Ipv4Addr) -> bool {
    classify(addr).is_none()
}
