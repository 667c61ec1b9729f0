//! Interactive console for block location scans
//!
//! This binary:
//! 1. Generates a noise terrain world in memory
//! 2. Reads commands from stdin on a separate thread
//! 3. Runs `blockloc` scans on a worker pool, printing notices to the
//!    terminal and reports to the log
//!
//! Type `help` for the command list.
//!
//! Environment:
//! - `BLOCKLOC_CONFIG` - path to a JSON scan config
//! - `BLOCKLOC_PARALLEL_THRESHOLD`, `BLOCKLOC_WORKER_THREADS` - used when no
//!   config file is given
//! - `BLOCKLOC_SEED` - terrain seed

mod audience;
mod commands;
mod session;
mod terrain;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blockloc::{MemoryWorld, ScanConfig, TracingSink};
use crossbeam_channel::{RecvTimeoutError, Sender, unbounded};
use eyre::WrapErr;
use tracing::{error, info};

use crate::audience::ConsoleAudience;
use crate::commands::{Command, parse_command};
use crate::session::Session;
use crate::terrain::Terrain;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockloc=info".parse()?)
                .add_directive("blockloc_console=info".parse()?),
        )
        .init();

    let config = load_config()?;

    let terrain = std::env::var("BLOCKLOC_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .map_or_else(Terrain::default, Terrain::with_seed);
    info!("Generating terrain with seed {}", terrain.seed);

    let world = Arc::new(MemoryWorld::with_generator("world", move |pos| {
        terrain.block_at(pos)
    }));

    let mut session = Session::new(
        world,
        Arc::new(TracingSink::new()),
        Arc::new(ConsoleAudience),
        &config,
    )
    .wrap_err("failed to start scan workers")?;

    let (cmd_tx, cmd_rx) = unbounded::<Command>();
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || input_thread(&cmd_tx))
        .wrap_err("failed to spawn input thread")?;

    info!("Type 'help' for commands");
    print_prompt();

    loop {
        match cmd_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(cmd) => {
                if !session.execute(cmd) {
                    break;
                }
                print_prompt();
            }
            Err(RecvTimeoutError::Timeout) => session.reap(),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("Shutting down...");
    session.shutdown();

    Ok(())
}

fn load_config() -> eyre::Result<ScanConfig> {
    let Ok(path) = std::env::var("BLOCKLOC_CONFIG") else {
        return Ok(ScanConfig::from_env());
    };

    let json = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("failed to read config {path}"))?;
    let config =
        ScanConfig::from_json(&json).wrap_err_with(|| format!("invalid config {path}"))?;
    info!("Loaded config from {}", path);
    Ok(config)
}

fn input_thread(tx: &Sender<Command>) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let cmd = parse_command(&line);
        let is_quit = matches!(cmd, Command::Quit);
        if tx.send(cmd).is_err() || is_quit {
            return;
        }
    }

    // EOF
    let _ = tx.send(Command::Quit);
}

#[allow(clippy::print_stdout)]
fn print_prompt() {
    print!("\r> ");
    io::stdout().flush().ok();
}
