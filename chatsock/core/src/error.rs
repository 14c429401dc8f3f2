//! Listener Errors
//!
//! Setup failures are fatal for a run and carry the operation that failed.
//! Read results are not errors; see [`crate::message::ReadOutcome`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from setting up or using the rendezvous socket
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Creating the socket descriptor failed
    #[error("socket: {0}")]
    Socket(#[source] io::Error),

    /// Binding the socket to its path failed
    #[error("bind {path:?}: {source}")]
    Bind {
        /// Path the socket was bound to
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// Marking the socket as listening failed
    #[error("listen: {0}")]
    Listen(#[source] io::Error),

    /// Accepting the client connection failed
    #[error("accept: {0}")]
    Accept(#[source] io::Error),

    /// Connecting to a listening socket failed (client side)
    #[error("connect {path:?}: {source}")]
    Connect {
        /// Path of the socket we tried to reach
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// Writing the message failed (client side)
    #[error("send: {0}")]
    Send(#[source] io::Error),
}

impl ListenerError {
    /// Name of the socket operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Socket(_) => "socket",
            Self::Bind { .. } => "bind",
            Self::Listen(_) => "listen",
            Self::Accept(_) => "accept",
            Self::Connect { .. } => "connect",
            Self::Send(_) => "send",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_operation() {
        let err = ListenerError::Bind {
            path: PathBuf::from("./chat.socket"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("bind"), "unexpected message: {msg}");
        assert!(msg.contains("chat.socket"));
        assert_eq!(err.operation(), "bind");
    }

    #[test]
    fn test_operation_names() {
        let io_err = || io::Error::from(io::ErrorKind::Other);
        assert_eq!(ListenerError::Socket(io_err()).operation(), "socket");
        assert_eq!(ListenerError::Listen(io_err()).operation(), "listen");
        assert_eq!(ListenerError::Accept(io_err()).operation(), "accept");
        assert_eq!(ListenerError::Send(io_err()).operation(), "send");
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;

        let err = ListenerError::Listen(io::Error::from(io::ErrorKind::InvalidInput));
        let source = err.source().expect("listen error should carry a source");
        assert!(!source.to_string().is_empty());
    }
}
