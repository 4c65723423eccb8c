use std::path::PathBuf;

use clap::Parser;
use iconset_core::DEFAULT_MIN_WIDTH;
use iconset_engine::{DEFAULT_ARCHIVE_ENTRY, DEFAULT_COUNT, DEFAULT_TOP_SITES_URL};

#[derive(Parser, Debug)]
#[command(
    name = "iconset",
    about = "Build a manifest of the best site icons for the most visited domains",
    version,
    long_about = None
)]
pub struct Cli {
    /// Number of ranked domains to process
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// CSV of (rank, hostname) rows replacing the remote ranked list
    #[arg(long)]
    pub top_sites_file: Option<PathBuf>,

    /// CSV of (label, hostname) rows that are always included
    #[arg(long)]
    pub extra_file: Option<PathBuf>,

    /// Minimum raster icon width in pixels; vector icons are exempt
    #[arg(long, default_value_t = DEFAULT_MIN_WIDTH)]
    pub min_width: u32,

    /// Load previously saved raw site data instead of fetching
    #[arg(long)]
    pub load_raw: Option<PathBuf>,

    /// Save the raw site data to this file
    #[arg(long)]
    pub save_raw: Option<PathBuf>,

    /// Zipped rank,hostname CSV to download when no top sites file is given
    #[arg(long, default_value = DEFAULT_TOP_SITES_URL)]
    pub top_sites_url: String,

    /// Archive entry holding the ranked CSV; the first entry is used if absent
    #[arg(long, default_value = DEFAULT_ARCHIVE_ENTRY)]
    pub top_sites_entry: String,

    /// Extra hostnames to exclude, one per line
    #[arg(long)]
    pub exclude_file: Option<PathBuf>,

    /// Hostnames to treat as NSFW, one per line
    #[arg(long)]
    pub nsfw_list: Option<PathBuf>,

    /// Number of domains processed at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Log file location
    #[arg(long, default_value = "debug.log")]
    pub log_file: PathBuf,

    /// Echo info-level progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
