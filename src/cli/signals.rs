//! Session input and signal handling
//!
//! Commands typed on stdin and OS shutdown signals are funneled into one
//! channel so the session loop handles them strictly one at a time.

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::commands::UserCommand;

/// Events driving the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    /// A recognized command
    Command(UserCommand),
    /// A line that is not a command
    Invalid(String),
    /// SIGINT/SIGTERM received
    Shutdown,
    /// stdin reached end of file
    InputClosed,
}

/// Session signal handler
pub struct SessionSignalHandler {
    receiver: mpsc::Receiver<SessionSignal>,
}

impl SessionSignalHandler {
    /// Listen on stdin and for shutdown signals
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        spawn_shutdown_listeners(tx.clone())?;
        tokio::spawn(read_commands(BufReader::new(tokio::io::stdin()), tx));

        Ok(Self { receiver: rx })
    }

    /// Listen on an arbitrary reader; no OS signals
    pub fn from_reader<Rd>(reader: Rd) -> Self
    where
        Rd: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(10);
        tokio::spawn(read_commands(reader, tx));
        Self { receiver: rx }
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<SessionSignal> {
        self.receiver.recv().await
    }
}

async fn read_commands<Rd>(reader: Rd, tx: mpsc::Sender<SessionSignal>)
where
    Rd: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let signal = match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match line.parse::<UserCommand>() {
                Ok(command) => SessionSignal::Command(command),
                Err(_) => SessionSignal::Invalid(line.trim().to_string()),
            },
            Ok(None) | Err(_) => SessionSignal::InputClosed,
        };

        let closed = signal == SessionSignal::InputClosed;
        if tx.send(signal).await.is_err() || closed {
            break;
        }
    }
}

#[cfg(unix)]
fn spawn_shutdown_listeners(tx: mpsc::Sender<SessionSignal>) -> Result<(), std::io::Error> {
    use tokio::signal::unix::{signal, SignalKind};

    let tx_int = tx.clone();
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        sigint.recv().await;
        eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
        let _ = tx_int.send(SessionSignal::Shutdown).await;
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        sigterm.recv().await;
        eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
        let _ = tx.send(SessionSignal::Shutdown).await;
    });

    Ok(())
}

#[cfg(not(unix))]
fn spawn_shutdown_listeners(tx: mpsc::Sender<SessionSignal>) -> Result<(), std::io::Error> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{} Received Ctrl+C (shutdown)", "↓".cyan());
            let _ = tx.send(SessionSignal::Shutdown).await;
        }
    });
    Ok(())
}
