//! ecusim Server Binary
//!
//! Starts the simulated ECU on a TCP port.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ecusim::network::Server;
use ecusim::{Config, Dispatcher};
use tracing_subscriber::{fmt, EnvFilter};

/// ecusim Server
#[derive(Parser, Debug)]
#[command(name = "ecusim-server")]
#[command(about = "UDS-style diagnostic ECU simulator")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port) [default: 127.0.0.1:5555]
    #[arg(short, long)]
    listen: Option<String>,

    /// Connection worker threads, 0 for one thread per connection
    #[arg(short, long)]
    workers: Option<usize>,

    /// Bytes taken by one socket read (one request)
    #[arg(long)]
    read_buffer: Option<usize>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ecusim=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("ecusim Server v{}", ecusim::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);
    for (did, value) in &config.seed {
        tracing::debug!("Seed DID 0x{:04X}: {}", did, ecusim::protocol::format_hex(value));
    }

    let dispatcher = Arc::new(Dispatcher::from_config(&config));

    let server = match Server::bind(config, dispatcher) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// File first, then command-line overrides
fn load_config(args: &Args) -> ecusim::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(listen) = &args.listen {
        config.listen_addr = listen.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(size) = args.read_buffer {
        config.read_buffer_size = size;
    }

    config.validate()?;
    Ok(config)
}
