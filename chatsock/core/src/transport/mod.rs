//! Transport Layer
//!
//! Local IPC over Unix domain stream sockets. The stream carries raw bytes
//! with no framing: one read on the listener side may return any number of
//! bytes up to the buffer limit, regardless of how the peer wrote them.

#[cfg(unix)]
pub mod unix_socket;

#[cfg(unix)]
pub use unix_socket::{default_socket_path, send_message, Connection, Rendezvous};
