//! # trackip - Tracker host lists to IPv4 blocklist
//!
//! Converts curated lists of tracker/advertising host names into a deduplicated, numerically
//! sorted list of their public IPv4 addresses, for network-level blocking.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        trackip                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: update, resolve, check, init, version      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    └── Exodus export, Disconnect.me services.json           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Sources                                                    │
//! │    ├── Exodus (network signature expansion)                 │
//! │    └── Disconnect.me (category/tracker/url traversal)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DNS (Resolver trait, dns-lookup)                           │
//! │    └── Classifier: loopback/private/link-local filtering    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    ├── flat: merged, deduplicated, numeric order            │
//! │    └── structured: tracker -> host -> addresses (JSON)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use trackip::aggregator::{merge_flat, render_flat};
//! use trackip::dns::SystemResolver;
//! use trackip::sources::exodus::{self, ExodusDocument};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let content = std::fs::read_to_string("exodus_trackers.json")?;
//!     let document = ExodusDocument::from_json(&content)?;
//!
//!     let resolver = SystemResolver::default();
//!     let report = exodus::extract(&document, &resolver, 8).await;
//!     println!("{}", report);
//!
//!     print!("{}", render_flat(&merge_flat(&[report])));
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Merging, sorting and rendering of results
//! - [`classifier`] - Public IPv4 address predicate
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`dns`] - Forward resolution behind the `Resolver` trait
//! - [`error`] - Error types
//! - [`fetcher`] - HTTP client for downloading tracker lists
//! - [`sources`] - Exodus and Disconnect.me extractors

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dns;
pub mod error;
pub mod fetcher;
pub mod sources;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ResolveError, TrackipError};
