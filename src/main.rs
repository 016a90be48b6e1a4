// CLASSIFICATION: COMMUNITY
// Filename: main.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! sensefs daemon entry point.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use sensefs::config::{default_dev_root, Config};
use sensefs::server::SenseServer;

/// Command-line flags recognised by the sensefs daemon.
#[derive(Debug, Parser)]
#[command(name = "sensefs", about = "Serve the Sense HAT as a 9P file tree")]
struct Args {
    /// Service name for the Unix socket listener
    #[arg(short, long, default_value = "sensefs")]
    service: String,

    /// Serve over TCP on this port instead of a Unix socket
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the per-device data files
    #[arg(long)]
    dev_root: Option<PathBuf>,

    /// Incremental verbosity (`-v`, `-vv`)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let cfg = Config {
        service: args.service,
        port: args.port.unwrap_or(564),
        dev_root: args.dev_root.unwrap_or_else(default_dev_root),
        verbose: args.verbose > 0,
    };

    let mut srv = SenseServer::new(cfg);
    if args.port.is_some() {
        srv.start()?;
    } else {
        srv.start_socket()?;
    }

    // Runs until the engine's serve loop ends, then powers the devices
    // back down.
    srv.join();
    Ok(())
}
