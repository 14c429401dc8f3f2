//! Unix Socket Server Transport
//!
//! Server side of the rendezvous: removes a stale socket file, creates and
//! binds the socket, listens with an explicit backlog, accepts one client
//! and performs one read on it.
//!
//! Socket creation, bind and listen are issued as separate calls so a
//! failure reports exactly which step went wrong and the backlog is the
//! configured value rather than the platform default. Values above the
//! system maximum are capped to it.

use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::path::{Path, PathBuf};

use nix::sys::socket::{self, AddressFamily, Backlog, SockFlag, SockType, UnixAddr};
use tokio::io::AsyncReadExt;
use tokio::net::{UnixListener, UnixStream};

use crate::config::ListenerConfig;
use crate::error::ListenerError;
use crate::message::{MessageBuffer, ReadOutcome};

/// Listening endpoint bound to a filesystem path
///
/// Dropping a `Rendezvous` closes the socket but leaves the path in place;
/// call [`Rendezvous::close`] to remove it.
pub struct Rendezvous {
    /// Path the socket is bound to
    socket_path: PathBuf,
    /// The bound, listening socket
    listener: UnixListener,
}

/// The single accepted client connection
pub struct Connection {
    stream: UnixStream,
}

impl Rendezvous {
    /// Remove any stale object at the path, then create, bind and listen
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Socket`], [`ListenerError::Bind`] or
    /// [`ListenerError::Listen`] for the step that failed. Nothing is
    /// cleaned up on failure.
    pub fn open(config: &ListenerConfig) -> Result<Self, ListenerError> {
        remove_stale(&config.socket_path);

        let fd = socket::socket(
            AddressFamily::Unix,
            SockType::Stream,
            SockFlag::empty(),
            None,
        )
        .map_err(|e| ListenerError::Socket(e.into()))?;

        let bind_error = |source: io::Error| ListenerError::Bind {
            path: config.socket_path.clone(),
            source,
        };
        let addr = UnixAddr::new(config.socket_path.as_path()).map_err(|e| bind_error(e.into()))?;
        socket::bind(fd.as_raw_fd(), &addr).map_err(|e| bind_error(e.into()))?;

        let backlog = listen_backlog(config.backlog)?;
        socket::listen(&fd, backlog).map_err(|e| ListenerError::Listen(e.into()))?;

        let listener = register(fd).map_err(ListenerError::Listen)?;

        tracing::info!(
            path = ?config.socket_path,
            backlog = config.backlog,
            "Listening on Unix socket"
        );

        Ok(Self {
            socket_path: config.socket_path.clone(),
            listener,
        })
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Wait, without timeout, for one client to connect
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Accept`] if the accept call fails.
    pub async fn accept(&self) -> Result<Connection, ListenerError> {
        let (stream, _addr) = self.listener.accept().await.map_err(ListenerError::Accept)?;
        tracing::info!(path = ?self.socket_path, "Client connected");
        Ok(Connection { stream })
    }

    /// Stop listening and remove the socket path
    ///
    /// A failed removal is logged and otherwise ignored.
    pub fn close(self) {
        let Self {
            socket_path,
            listener,
        } = self;
        drop(listener);

        match std::fs::remove_file(&socket_path) {
            Ok(()) => tracing::debug!(path = ?socket_path, "Socket file removed"),
            Err(e) => tracing::warn!(path = ?socket_path, error = %e, "Failed to remove socket file"),
        }
    }
}

impl Connection {
    /// Issue exactly one read of at most `buffer.max_read()` bytes
    ///
    /// Anything the peer sent beyond that stays unread.
    pub async fn read_once(&mut self, buffer: &mut MessageBuffer) -> ReadOutcome {
        let result = self.stream.read(buffer.read_area()).await;

        match &result {
            Ok(0) => tracing::debug!("Peer closed without sending"),
            Ok(n) => tracing::debug!(bytes = n, "Read message"),
            Err(e) => tracing::debug!(error = %e, "Read failed"),
        }

        ReadOutcome::from_read(result, buffer)
    }

    /// Close the client side of the conversation
    pub fn close(self) {
        drop(self.stream);
        tracing::debug!("Client connection closed");
    }
}

/// Unlink whatever sits at `path`; absence is expected, other failures are ignored
fn remove_stale(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = ?path, "Removed stale socket file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!(path = ?path, error = %e, "Could not remove stale socket file"),
    }
}

/// Backlog handed to `listen`; requests above the system maximum are capped
fn listen_backlog(requested: i32) -> Result<Backlog, ListenerError> {
    match Backlog::new(requested) {
        Ok(backlog) => Ok(backlog),
        Err(_) if requested > 0 => {
            tracing::debug!(requested, "Backlog above system maximum, capping");
            Ok(Backlog::MAXCONN)
        }
        Err(e) => Err(ListenerError::Listen(e.into())),
    }
}

/// Hand a listening descriptor over to the tokio reactor
fn register(fd: OwnedFd) -> io::Result<UnixListener> {
    let std_listener = std::os::unix::net::UnixListener::from(fd);
    std_listener.set_nonblocking(true)?;
    UnixListener::from_std(std_listener)
}
