//! Child-process streaming
//!
//! Every external tool runs behind a [`ProcessHandle`]: a reader task forwards
//! chunks of one captured pipe through a channel in the order the child wrote
//! them, then reports the exit status exactly once after the pipe closes.

use std::ffi::OsString;
use std::io;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const READ_BUFFER_SIZE: usize = 8 * 1024;
const CHANNEL_CAPACITY: usize = 64;

/// Which pipe of the child is streamed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Stdout,
    Stderr,
}

/// A fully resolved external command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
    pub capture: Capture,
}

impl CommandSpec {
    /// Render as a shell-like line for logs
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if arg.contains(' ') {
                line.push_str(&format!("{:?}", arg));
            } else {
                line.push_str(&arg);
            }
        }
        line
    }
}

/// Exit code of a finished child. `None` when it was terminated by a signal.
pub type ExitCode = Option<i32>;

/// Incremental output plus a single completion signal for one child process
pub struct ProcessHandle {
    chunks: mpsc::Receiver<String>,
    exit: oneshot::Receiver<io::Result<ExitCode>>,
    kill: Option<oneshot::Sender<()>>,
}

impl ProcessHandle {
    /// Assemble a handle from its channels. The sender side of `kill` asks the child to stop.
    pub fn new(
        chunks: mpsc::Receiver<String>,
        exit: oneshot::Receiver<io::Result<ExitCode>>,
        kill: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self { chunks, exit, kill }
    }

    /// A handle that replays fixed output and then exits with `code`
    pub fn scripted<I, S>(chunks: I, code: ExitCode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks: Vec<String> = chunks.into_iter().map(Into::into).collect();
        let (chunk_tx, chunk_rx) = mpsc::channel(chunks.len().max(1));
        for chunk in chunks {
            // Capacity matches the script length.
            let _ = chunk_tx.try_send(chunk);
        }
        let (exit_tx, exit_rx) = oneshot::channel();
        let _ = exit_tx.send(Ok(code));
        Self::new(chunk_rx, exit_rx, None)
    }

    /// Spawn `spec` on the current tokio runtime
    pub fn spawn(spec: &CommandSpec) -> io::Result<Self> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null()).kill_on_drop(true);
        match spec.capture {
            Capture::Stdout => command.stdout(Stdio::piped()).stderr(Stdio::null()),
            Capture::Stderr => command.stdout(Stdio::null()).stderr(Stdio::piped()),
        };

        debug!(command = %spec.display(), "spawning child process");
        let mut child = command.spawn()?;

        let pipe: Box<dyn AsyncRead + Unpin + Send> = match spec.capture {
            Capture::Stdout => Box::new(child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?),
            Capture::Stderr => Box::new(child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?),
        };

        let (chunk_tx, chunk_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
        let program = spec.program.clone();

        tokio::spawn(async move {
            let mut pipe = pipe;
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];
            let mut decoder = Utf8Decoder::default();
            loop {
                tokio::select! {
                    read = pipe.read(&mut buffer) => match read {
                        Ok(0) => break,
                        Ok(n) => {
                            let Some(chunk) = decoder.push(&buffer[..n]) else {
                                continue;
                            };
                            if chunk_tx.send(chunk).await.is_err() {
                                // Nobody is listening any more.
                                let _ = child.start_kill();
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(%program, error = %e, "failed to read child output");
                            break;
                        }
                    },
                    Ok(()) = &mut kill_rx => {
                        debug!(%program, "killing child process");
                        let _ = child.start_kill();
                        break;
                    }
                }
            }
            if let Some(rest) = decoder.finish() {
                let _ = chunk_tx.send(rest).await;
            }
            drop(chunk_tx);

            let status = child.wait().await.map(|status| status.code());
            debug!(%program, status = ?status, "child process exited");
            let _ = exit_tx.send(status);
        });

        Ok(Self::new(chunk_rx, exit_rx, Some(kill_tx)))
    }

    /// Next chunk of captured output, `None` once the pipe is closed
    pub async fn next_chunk(&mut self) -> Option<String> {
        self.chunks.recv().await
    }

    /// Ask the child to terminate. Later chunks may still be delivered.
    pub fn kill(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
    }

    /// Wait for the exit status, draining any output that was not consumed
    pub async fn wait(mut self) -> io::Result<ExitCode> {
        while self.chunks.recv().await.is_some() {}
        match self.exit.await {
            Ok(status) => status,
            Err(_) => Err(io::Error::other("child process monitor stopped unexpectedly")),
        }
    }
}

/// Lossy UTF-8 decoding that holds back a character split across reads
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Decode everything up to an incomplete trailing sequence
    pub fn push(&mut self, bytes: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(bytes);
        let ready = self.pending.len() - incomplete_tail(&self.pending);
        if ready == 0 {
            return None;
        }
        let text = String::from_utf8_lossy(&self.pending[..ready]).into_owned();
        self.pending.drain(..ready);
        Some(text)
    }

    /// Whatever is still held back, once the pipe is closed
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Length of a multi-byte sequence cut off at the end of `bytes`
fn incomplete_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xF0..=0xF7 => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::other(format!("child {} was not captured", name))
}
