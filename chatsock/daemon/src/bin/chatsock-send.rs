//! Chatsock Send - deliver one message to a waiting `chatsock-daemon`
//!
//! ```bash
//! chatsock-send hello
//! chatsock-send --socket-path /tmp/chat.socket "hello there"
//!
//! # Connect and hang up without sending anything
//! chatsock-send
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chatsock_core::send_message;
use chatsock_core::transport::default_socket_path;

/// Send one message to a chatsock listener
#[derive(Parser, Debug)]
#[command(name = "chatsock-send")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Unix socket path of the listener
    #[arg(short = 's', long, env = "CHATSOCK_SOCKET", value_name = "PATH")]
    socket_path: Option<PathBuf>,

    /// Message to send (omit to connect without sending)
    #[arg(default_value = "")]
    message: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let socket_path = args.socket_path.unwrap_or_else(default_socket_path);

    send_message(&socket_path, args.message.as_bytes())
        .await
        .with_context(|| format!("Failed to send to {socket_path:?}"))?;

    info!(path = ?socket_path, bytes = args.message.len(), "Sent");
    Ok(())
}
