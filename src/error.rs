//! Error types for trackip.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackipError {
    #[error("Malformed {source_name} document: {reason}")]
    InputMalformed {
        source_name: &'static str,
        reason: String,
    },
}

impl TrackipError {
    pub fn malformed(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InputMalformed {
            source_name,
            reason: reason.into(),
        }
    }
}

/// Why a single host lookup produced no addresses.
///
/// Never escalated past the extractors: a failed host is logged and counted as unresolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("resolver task failed: {0}")]
    Task(String),

    #[error("empty host name")]
    EmptyHost,
}
