//! Unix Socket Transport
//!
//! # Socket Location
//!
//! Default: `./chat.socket`, relative to the working directory. Both sides
//! must agree on the path; it is the only rendezvous information.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                      ┌──────────────────┐
//! │  chatsock-send   │                      │ chatsock-daemon  │
//! │                  │     Unix socket      │                  │
//! │  send_message() ─┼─────────────────────►│ Rendezvous       │
//! │                  │     chat.socket      │  └─ Connection   │
//! └──────────────────┘   (one message)      └──────────────────┘
//! ```

mod client;
mod server;

pub use client::send_message;
pub use server::{Connection, Rendezvous};

use std::path::PathBuf;

use crate::config::DEFAULT_SOCKET_PATH;

/// Get the default socket path
#[must_use]
pub fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_path() {
        let path = default_socket_path();
        assert!(path.to_string_lossy().contains("chat.socket"));
        assert!(path.is_relative());
    }
}
