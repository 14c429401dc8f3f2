//! Unix Socket Client Transport
//!
//! Connects to a listening rendezvous and delivers one message.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;

use crate::error::ListenerError;

/// Connect to `socket_path`, write `message` in one call and close
///
/// An empty message connects and disconnects without writing, which the
/// listener observes as a silent empty read.
///
/// # Errors
///
/// Returns [`ListenerError::Connect`] if nobody is listening on the path
/// and [`ListenerError::Send`] if the write fails.
pub async fn send_message(socket_path: &Path, message: &[u8]) -> Result<(), ListenerError> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .map_err(|e| ListenerError::Connect {
            path: socket_path.to_path_buf(),
            source: e,
        })?;

    if !message.is_empty() {
        stream.write_all(message).await.map_err(ListenerError::Send)?;
    }

    // The listener may already have hung up.
    if let Err(e) = stream.shutdown().await {
        tracing::debug!(error = %e, "Shutdown after send failed");
    }

    tracing::debug!(path = ?socket_path, bytes = message.len(), "Message sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::UnixListener;

    #[tokio::test]
    async fn test_send_without_listener_fails() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("nobody.socket");

        let result = send_message(&socket_path, b"hello").await;
        assert!(matches!(result, Err(ListenerError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_send_delivers_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.socket");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        send_message(&socket_path, b"hello").await.unwrap();
        assert_eq!(server.await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_send_empty_only_connects() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.socket");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        send_message(&socket_path, b"").await.unwrap();
        assert!(server.await.unwrap().is_empty());
    }
}
