//! One-Shot Lifecycle
//!
//! Drives a run from greeting to teardown:
//!
//! ```text
//! Starting ──► Listening ──► Connected ──► Reading ──► Done
//!    │             │                          │
//!    └─ setup      └─ shutdown ───────────────┴─► Interrupted
//!       error         (close, unlink)
//! ```
//!
//! Each phase is entered at most once. Setup errors (socket, bind, listen,
//! accept) end the run immediately with no cleanup. A read that returns
//! nothing or fails is silent and still leads to a normal teardown.

use std::fmt;
use std::future::Future;
use std::io::Write;

use crate::config::ListenerConfig;
use crate::error::ListenerError;
use crate::greeting::write_intro;
use crate::message::MessageBuffer;
use crate::transport::Rendezvous;

/// Status line printed once the socket is listening
pub const WAITING_LINE: &str = "Waiting for a connection...";

/// Status line printed once the client is accepted
pub const ACCEPTED_LINE: &str = "Connection accepted. Waiting for a message...";

/// Prefix of the line carrying the received text
pub const MESSAGE_PREFIX: &str = "Message received: ";

/// Position of a run in its linear sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Greeting printed, socket not yet bound
    Starting,
    /// Bound and waiting for the client
    Listening,
    /// Client accepted
    Connected,
    /// Waiting for the single read
    Reading,
    /// Everything closed and unlinked
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::Listening => "listening",
            Self::Connected => "connected",
            Self::Reading => "reading",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The client was served; `message` is `None` when nothing was printed
    Completed {
        /// Text of the received message
        message: Option<String>,
    },
    /// Shutdown was requested while waiting in `phase`
    Interrupted {
        /// Phase that was cancelled
        phase: Phase,
    },
}

/// Forward-only phase tracker
struct Progress {
    phase: Phase,
}

impl Progress {
    fn new() -> Self {
        Self {
            phase: Phase::Starting,
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase {next} after {}", self.phase);
        tracing::debug!(from = %self.phase, to = %next, "Phase transition");
        self.phase = next;
    }
}

/// Write a status line; output failures never abort the run
fn emit<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        tracing::warn!(error = %e, "Failed to write status line");
    }
}

/// Serve exactly one client on the configured socket
///
/// Status lines go to `out`. `shutdown` is polled while waiting for the
/// client and while waiting for its message; if it resolves first, the open
/// endpoints are closed, the socket path is removed and
/// [`RunOutcome::Interrupted`] is returned.
///
/// # Errors
///
/// Returns the [`ListenerError`] of the failed step if socket creation,
/// bind, listen or accept fails. No accept or read is attempted after a
/// setup failure, and the socket path is left as it is.
pub async fn run_once<W, F>(
    config: &ListenerConfig,
    out: &mut W,
    shutdown: F,
) -> Result<RunOutcome, ListenerError>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut progress = Progress::new();

    if let Err(e) = write_intro(out) {
        tracing::warn!(error = %e, "Failed to write greeting");
    }

    let rendezvous = Rendezvous::open(config)?;
    progress.enter(Phase::Listening);
    emit(out, WAITING_LINE);

    tokio::pin!(shutdown);

    let accepted = tokio::select! {
        accepted = rendezvous.accept() => Some(accepted),
        () = &mut shutdown => None,
    };
    let Some(accepted) = accepted else {
        tracing::info!(phase = %progress.phase, "Shutdown requested");
        rendezvous.close();
        return Ok(RunOutcome::Interrupted {
            phase: progress.phase,
        });
    };
    let mut connection = accepted?;
    progress.enter(Phase::Connected);
    emit(out, ACCEPTED_LINE);

    progress.enter(Phase::Reading);
    let mut buffer = MessageBuffer::with_capacity(config.buffer_size);
    let read = tokio::select! {
        outcome = connection.read_once(&mut buffer) => Some(outcome),
        () = &mut shutdown => None,
    };
    let Some(outcome) = read else {
        tracing::info!(phase = %progress.phase, "Shutdown requested");
        connection.close();
        rendezvous.close();
        return Ok(RunOutcome::Interrupted {
            phase: progress.phase,
        });
    };

    let message = outcome.into_message();
    if let Some(ref text) = message {
        emit(out, &format!("{MESSAGE_PREFIX}{text}"));
    }

    connection.close();
    rendezvous.close();
    progress.enter(Phase::Done);

    tracing::info!(received = message.is_some(), "Run complete");
    Ok(RunOutcome::Completed { message })
}
