//! Chatsock Core - One-Shot Unix Socket Listener
//!
//! This crate holds everything the `chatsock-daemon` binary does, minus
//! process concerns (argument parsing, logging setup, signals, exit codes):
//!
//! ```text
//!  greeting ─► Rendezvous::open ─► accept ─► read_once ─► close, unlink
//!  (2 + 5)     (unlink stale,      (one      (≤ buffer
//!               socket, bind,       client)    size − 1)
//!               listen backlog 1)
//! ```
//!
//! # Key Types
//!
//! - [`ListenerConfig`]: socket path, backlog and buffer size
//! - [`Rendezvous`]: the bound, listening socket
//! - [`Connection`]: the single accepted client
//! - [`MessageBuffer`]: fixed-capacity receive buffer with a reserved terminator
//! - [`ReadOutcome`]: message, empty, or failed read
//! - [`run_once`]: the whole sequence, returning a [`RunOutcome`]
//!
//! # Quick Start
//!
//! ```ignore
//! use chatsock_core::{run_once, ListenerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = ListenerConfig::default();
//!     let mut stdout = std::io::stdout();
//!     let outcome = run_once(&config, &mut stdout, std::future::pending())
//!         .await
//!         .unwrap();
//!     println!("{outcome:?}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod greeting;
pub mod lifecycle;
pub mod message;
pub mod transport;

pub use config::{
    load_config_from_path, ConfigError, ConfigOverrides, ConfigSource, ListenerConfig,
};
pub use error::ListenerError;
pub use greeting::{add_numbers, write_intro, GREETING};
pub use lifecycle::{run_once, Phase, RunOutcome};
pub use message::{MessageBuffer, ReadOutcome};
#[cfg(unix)]
pub use transport::{send_message, Connection, Rendezvous};
