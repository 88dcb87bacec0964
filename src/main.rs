//! trackip - tracker host lists to public IPv4 blocklist
//!
//! Resolves the Exodus and Disconnect.me tracker lists into a blocklist of public IPv4 addresses.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use trackip::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Update {
            mode,
            offline,
            dry_run,
        } => trackip::commands::update::run(mode, offline, dry_run, &cli.config).await,
        Commands::Resolve { host } => trackip::commands::resolve::run(&host, &cli.config).await,
        Commands::Check { ip } => trackip::commands::check::run(&ip),
        Commands::Init { force } => trackip::commands::init::run(force, &cli.config),
        Commands::Version => {
            println!("trackip {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
