//! rawcat - a raw-terminal TCP relay
//!
//! rawcat wires the local terminal directly to a remote TCP peer: the
//! terminal is switched to raw mode, every keystroke is forwarded to the
//! socket verbatim, and everything the peer sends is written to the local
//! display unmodified, until one side closes.
//!
//! # Quick Start
//!
//! ```text
//! rawcat 192.0.2.10:4444
//! ```
//!
//! There is no framing, no negotiation, and no reconnection; rawcat is a
//! one-shot tool. Exit status is 0 when the remote peer closes the session
//! and 1 when the connection fails, raw mode cannot be enabled, or local
//! input ends.

mod config;
mod core;

use std::env;
use std::io;
use std::process;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::core::net;
use crate::core::relay::{self, SessionEnd};
use crate::core::term::RawModeGuard;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("rawcat {}", VERSION);
}

fn print_help() {
    eprintln!("rawcat {} - a raw-terminal TCP relay", VERSION);
    eprintln!();
    eprintln!("Usage: rawcat <host:port>");
    eprintln!();
    eprintln!("Switches the local terminal to raw mode and relays bytes");
    eprintln!("verbatim between it and the remote peer, in both directions.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Exit status:");
    eprintln!("  0   remote peer closed the session");
    eprintln!("  1   connection, terminal setup, or local input failure");
    eprintln!();
    eprintln!("Configuration: ~/.rawcat/config.toml");
    eprintln!("Log file:      ~/.rawcat/rawcat.log");
}

fn parse_args(args: &[String]) -> Result<String, String> {
    let mut target: Option<String> = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            arg => {
                if target.is_some() {
                    return Err(format!("Unexpected extra argument: {}", arg));
                }
                target = Some(arg.to_string());
            }
        }
    }

    target.ok_or_else(|| "Missing remote address (host:port). Use -h for help.".to_string())
}

/// Initialize logging to `~/.rawcat/rawcat.log`.
///
/// Nothing may ever be logged to stdout: it carries the relay bytes.
fn init_logging(config: &Config) {
    if !config.log.enabled {
        return;
    }

    let log_path = config::home_dir()
        .map(|h| h.join(".rawcat").join("rawcat.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("rawcat.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let level = config.log.level.parse().unwrap_or(Level::INFO);
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let target = match parse_args(&args) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    let config = Config::load();
    init_logging(&config);
    info!("rawcat starting, target {}", target);

    let code = match run(&target, &config) {
        Ok(end) => end.exit_code(),
        Err(e) => {
            error!("session failed: {:#}", e);
            eprintln!("rawcat: {:#}", e);
            1
        }
    };
    process::exit(code);
}

/// Enter raw mode, connect, and relay until one side closes.
///
/// The raw-mode guard drops before this returns, so the terminal is
/// restored on every path, including errors; any diagnostic printing
/// happens afterwards in `main`, on a sane terminal.
fn run(target: &str, config: &Config) -> anyhow::Result<SessionEnd> {
    let _raw = RawModeGuard::enter()?;
    let stream = net::connect(target, config.connect_timeout())?;
    let end = relay::run(io::stdin(), io::stdout(), stream, config.chunk_size)?;
    Ok(end)
}
