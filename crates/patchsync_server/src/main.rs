//! patchsync server binary.

use clap::Parser;
use patchsync_engine::{SyncConfig, DEFAULT_MAX_PATCH_OPERATIONS};
use patchsync_server::{seed, serve, AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Todo and people resources with JSON Patch synchronization.
#[derive(Parser, Debug)]
#[command(name = "patchsync-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Keep collections as JSON files in this directory instead of memory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Do not insert the sample records
    #[arg(long)]
    no_seed: bool,

    /// Largest accepted patch, in operations
    #[arg(long, default_value_t = DEFAULT_MAX_PATCH_OPERATIONS)]
    max_patch_operations: usize,

    /// Do not compute ETag headers
    #[arg(long)]
    no_etag: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ServerConfig::new(cli.bind)
        .with_seed(!cli.no_seed)
        .with_etag(!cli.no_etag)
        .with_sync(SyncConfig::new().with_max_patch_operations(cli.max_patch_operations));
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let state = AppState::from_config(config)?;
    if state.config().seed {
        seed(&state)?;
    }
    serve(state).await?;
    Ok(())
}
