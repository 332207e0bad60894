//! CLI entry point for the litres-backup tool.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use litres_backup::catalog::{CatalogClient, CatalogError, Format};
use litres_backup::sync::{SyncEngine, SyncOptions};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level: RUST_LOG env var > debug flag > default (info)
    let default_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // `list` is a pseudo-format: print the enumeration and stop before
    // touching the network.
    if args.format == "list" {
        for format in Format::ALL {
            println!("{format}");
        }
        return Ok(());
    }

    let Ok(format) = args.format.parse::<Format>() else {
        bail!("Unknown format: {}", args.format);
    };

    let (Some(user), Some(password)) = (args.user.as_deref(), args.password.as_deref()) else {
        bail!("Username or password is missing");
    };

    info!(format = %format, "Download format");
    info!(user = %user, "Logging in");

    let client = CatalogClient::new();
    let session = match client.authenticate(user, password).await {
        Ok(session) => session,
        Err(CatalogError::AuthorizationRejected) => bail!("Authorization failed"),
        Err(err) => return Err(err.into()),
    };

    info!(login = %session.login, mail = %session.mail, "Welcome");
    info!("Querying the list of books (can take some time)...");

    let options = SyncOptions {
        format,
        check_sizes: args.size,
        output_dir: args.output_dir,
        pacing: Duration::from_millis(args.rate_limit),
        show_progress: true,
    };
    debug!(?options, "sync options resolved");

    let engine = SyncEngine::new(client, options);
    let report = engine.run(&session).await?;

    info!(
        fetched = report.fetched,
        skipped = report.skipped,
        replaced = report.replaced,
        failed = report.failed,
        "Backup complete"
    );

    if !report.is_clean() {
        bail!("{} download(s) failed", report.failed);
    }

    Ok(())
}
