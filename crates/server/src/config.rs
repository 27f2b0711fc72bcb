#![forbid(unsafe_code)]

use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand};
use lt_storage::StoreLocation;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATABASE: &str = "./logtail.sqlite";
pub const DEFAULT_PORT: u16 = 8080;

/// Collects game-client log lines per commit and player and serves them to
/// browsers as live-tailing pages.
#[derive(Debug, Parser)]
#[command(name = "logtail", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// SQLite file holding the logs, or `:memory:` for a throwaway store.
    #[arg(
        long,
        env = "LOGTAIL_DATABASE",
        default_value = DEFAULT_DATABASE,
        global = true
    )]
    pub database: String,

    /// Log output format; defaults to `pretty` on a terminal and `json` otherwise.
    #[arg(long, env = "LOGTAIL_LOG_FORMAT", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bulk-load a `{commit: {player: [message, ...]}}` JSON file and exit.
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "LOGTAIL_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(long, env = "LOGTAIL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Mount the GET-based fill and ingest routes meant for manual testing.
    #[arg(long, env = "LOGTAIL_DEBUG_ROUTES")]
    pub debug_routes: bool,

    /// Insert a batch of generated demo rows at startup.
    #[arg(long, env = "LOGTAIL_SEED_DEMO")]
    pub seed_demo: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

/// Resolved settings for one server run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub store: StoreLocation,
    pub debug_routes: bool,
    pub seed_demo: bool,
}

impl Cli {
    pub fn store_location(&self) -> StoreLocation {
        StoreLocation::parse(&self.database)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(LogFormat::detect)
    }
}

impl ServeArgs {
    pub fn into_config(self, store: StoreLocation) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            store,
            debug_routes: self.debug_routes,
            seed_demo: self.seed_demo,
        }
    }
}
