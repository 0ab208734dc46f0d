//! Operator-initiated cancellation

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

/// Receiving half of the stop signal, threaded through the probe and encode stages
pub struct Cancellation {
    receiver: Option<broadcast::Receiver<()>>,
}

impl Cancellation {
    pub fn new(receiver: broadcast::Receiver<()>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// A signal that never fires
    pub fn none() -> Self {
        Self { receiver: None }
    }

    /// Whether a stop signal is already waiting, without blocking
    pub fn is_cancelled(&mut self) -> bool {
        match self.receiver.as_mut().map(|receiver| receiver.try_recv()) {
            Some(Ok(())) | Some(Err(TryRecvError::Lagged(_))) => true,
            Some(Err(TryRecvError::Empty | TryRecvError::Closed)) | None => false,
        }
    }

    /// Resolves once a stop signal arrives. Never resolves when there is no sender left.
    pub async fn cancelled(&mut self) {
        if let Some(receiver) = self.receiver.as_mut() {
            loop {
                match receiver.recv().await {
                    Ok(()) | Err(RecvError::Lagged(_)) => return,
                    Err(RecvError::Closed) => break,
                }
            }
        }
        std::future::pending::<()>().await
    }
}
