//! Chatsock Daemon - One-Shot Unix Socket Listener
//!
//! Prints a greeting and a demo sum, opens a Unix socket, waits for one
//! client, prints the first message it sends (at most buffer size − 1
//! bytes) and exits.
//!
//! # Usage
//!
//! ```bash
//! # Listen on ./chat.socket
//! chatsock-daemon
//!
//! # Custom socket path
//! chatsock-daemon --socket-path /tmp/chat.socket
//!
//! # With config file
//! chatsock-daemon --config ./chatsock.toml
//!
//! # Verbose logging (stderr)
//! RUST_LOG=debug chatsock-daemon
//! ```
//!
//! # Exit Status
//!
//! - `0`: a client was served (with or without a message), or the wait was
//!   cancelled by a signal
//! - `1`: configuration error, or socket creation, bind, listen or accept failed
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: stop waiting, close, remove the socket file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use chatsock_core::{load_config_from_path, run_once, ConfigOverrides, ListenerConfig, RunOutcome};

/// Chatsock Daemon - accept one client on a Unix socket and print its message
#[derive(Parser, Debug)]
#[command(name = "chatsock-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Unix socket path to listen on (the config layer reads CHATSOCK_SOCKET)
    #[arg(short = 's', long, value_name = "PATH")]
    socket_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "CHATSOCK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen backlog
    #[arg(long, value_name = "N")]
    backlog: Option<i32>,

    /// Receive buffer size in bytes, terminator included
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "CHATSOCK_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            socket_path: self.socket_path.clone(),
            backlog: self.backlog,
            buffer_size: self.buffer_size,
        }
    }
}

/// Initialize logging with the specified level
///
/// Logs go to stderr; stdout carries only the status lines.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "chatsock_daemon={level},chatsock_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Resolve the listener configuration: file, then environment, then CLI
fn resolve_config(args: &Args) -> Result<ListenerConfig> {
    let mut config = load_config_from_path(args.config.clone())
        .context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command-line configuration")?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("Chatsock daemon starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    let config = resolve_config(&args)?;
    info!(
        socket_path = ?config.socket_path,
        backlog = config.backlog,
        buffer_size = config.buffer_size,
        source = %config.source(),
        "Configuration resolved"
    );

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, initiating shutdown"),
            _ = sigint.recv() => info!("Received SIGINT, initiating shutdown"),
        }
    };

    let mut stdout = std::io::stdout();
    let outcome = match run_once(&config, &mut stdout, shutdown).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(operation = e.operation(), error = %e, "Listener failed");
            return Err(e).context("Listener setup failed");
        }
    };

    match outcome {
        RunOutcome::Completed { message } => {
            info!(received = message.is_some(), "Shutdown complete");
        }
        RunOutcome::Interrupted { phase } => {
            info!(%phase, "Interrupted, socket removed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsock_core::config::load_config_with_env;
    use chatsock_core::ConfigSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chatsock-daemon"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert!(args.backlog.is_none());
        assert!(args.buffer_size.is_none());
    }

    #[test]
    fn test_args_all_flags() {
        let args = Args::try_parse_from([
            "chatsock-daemon",
            "-s",
            "/tmp/x.socket",
            "--backlog",
            "2",
            "--buffer-size",
            "64",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.socket_path, Some(PathBuf::from("/tmp/x.socket")));
        assert_eq!(args.backlog, Some(2));
        assert_eq!(args.buffer_size, Some(64));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_args_reject_bad_number() {
        let result = Args::try_parse_from(["chatsock-daemon", "--buffer-size", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[listener]\nsocket_path = \"file.socket\"\nbuffer_size = 32\n")
            .unwrap();
        let config_arg = file.path().to_string_lossy().into_owned();

        let args = Args::try_parse_from([
            "chatsock-daemon",
            "--config",
            config_arg.as_str(),
            "--socket-path",
            "cli.socket",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.socket_path, PathBuf::from("cli.socket"));
        assert_eq!(config.buffer_size, 32);
    }

    #[test]
    fn test_socket_env_is_left_to_config_layer() {
        let args = Args::try_parse_from(["chatsock-daemon"]).unwrap();
        assert!(args.overrides().socket_path.is_none());

        let mut config = load_config_with_env(None, |key| {
            (key == "CHATSOCK_SOCKET").then(|| "env.socket".to_string())
        })
        .unwrap();
        args.overrides().apply(&mut config).unwrap();

        assert_eq!(config.socket_path, PathBuf::from("env.socket"));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let args = Args::try_parse_from(["chatsock-daemon", "--buffer-size", "1"]).unwrap();
        assert!(resolve_config(&args).is_err());
    }
}
