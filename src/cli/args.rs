//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the favorites and history store
pub const DEFAULT_STORE: &str = "certcheck-store.json";

#[derive(Parser, Debug)]
#[command(name = "certcheck")]
#[command(version)]
#[command(
    about = "Check a host's TLS certificate chain the way a mobile platform trust store sees it",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Host to check (shortcut for 'check' command)
    #[arg(value_name = "HOST")]
    pub host: Option<String>,

    /// Output JSON instead of terminal text
    #[arg(long)]
    pub json: bool,

    /// Verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (default: config/default.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the certificate chain of one host
    Check(CheckArgs),

    /// Check multiple hosts from a file
    Batch(BatchArgs),

    /// Re-check favorites (or one host) periodically and raise alerts
    Watch(WatchArgs),

    /// Manage saved hosts
    Favorites(FavoritesArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Host to check, optionally with scheme, port and path
    #[arg(required = true)]
    pub host: String,

    /// Port used when the host names none
    #[arg(long)]
    pub port: Option<u16>,

    /// Output JSON instead of terminal text
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON result to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File containing hosts (one per line, '#' starts a comment)
    #[arg(required = true)]
    pub file: PathBuf,

    /// Number of parallel checks
    #[arg(short, long, default_value = "5")]
    pub parallel: usize,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Only show hosts with issues or errors
    #[arg(long)]
    pub issues_only: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Watch a single host instead of the saved favorites
    pub host: Option<String>,

    /// Port used when the host names none
    #[arg(long)]
    pub port: Option<u16>,

    /// Check interval in seconds (default from configuration)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Number of rounds to run (0 = until interrupted)
    #[arg(short, long, default_value = "0")]
    pub count: u64,

    /// Favorites and history store
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STORE)]
    pub store: PathBuf,
}

#[derive(Args, Debug)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub action: FavoriteAction,

    /// Favorites and history store
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum FavoriteAction {
    /// Save a host
    Add {
        host: String,

        /// Port used when the host names none
        #[arg(long)]
        port: Option<u16>,
    },

    /// Delete a saved host and its history
    Remove { id: u64 },

    /// List saved hosts
    List,

    /// Turn alerts for a saved host on or off
    Notify {
        id: u64,

        /// Disable alerts instead of enabling them
        #[arg(long)]
        off: bool,
    },

    /// Show the check history of a saved host
    History { id: u64 },
}

impl Cli {
    /// The host to check when no subcommand is given
    pub fn shortcut_host(&self) -> Option<&str> {
        match self.command {
            None => self.host.as_deref().map(str::trim).filter(|h| !h.is_empty()),
            Some(_) => None,
        }
    }
}
