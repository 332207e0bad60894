//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Back up a litres.ru library to local storage.
///
/// Authenticates against the bookstore, lists the books the account owns,
/// and downloads each one in the chosen format, skipping books that are
/// already present locally.
#[derive(Parser, Debug)]
#[command(name = "litres-backup")]
#[command(author, version, about)]
pub struct Args {
    /// Username (defaults from LR_USER)
    #[arg(short, long, env = "LR_USER")]
    pub user: Option<String>,

    /// Password (defaults from LR_PASSWORD)
    #[arg(short, long, env = "LR_PASSWORD")]
    pub password: Option<String>,

    /// Download format; 'list' prints the available formats and exits
    #[arg(short, long, default_value = "ios.epub")]
    pub format: String,

    /// Add debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Check file sizes of already-downloaded books against the catalog
    #[arg(short, long)]
    pub size: bool,

    /// Directory downloads are written into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Pause between downloads in milliseconds (0 disables pacing, max 60000)
    #[arg(short = 'l', long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub rate_limit: u64,
}
