//! Transport abstraction for the booking queue.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Failure to hand a payload to the queue transport.
#[derive(Debug, Error)]
pub enum SendError {
    /// The broker rejected the payload or the connection failed.
    #[error("queue send failed: {0}")]
    Queue(String),
    /// The payload could not be serialized.
    #[error("payload serialization failed: {0}")]
    Serialize(String),
}

/// Hands serialized payloads to a message queue.
///
/// Implementations must bound their own connect and send times; callers treat
/// every send as best-effort and never retry.
pub trait QueueSender: Send + Sync {
    fn send(&self, payload: &str) -> Result<(), SendError>;
}

impl<S> QueueSender for Arc<S>
where
    S: QueueSender + ?Sized,
{
    fn send(&self, payload: &str) -> Result<(), SendError> {
        (**self).send(payload)
    }
}

/// Collects payloads in memory instead of publishing them.
///
/// Intended for tests/dev where no broker is running.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<String>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All payloads sent so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl QueueSender for RecordingSender {
    fn send(&self, payload: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .map_err(|_| SendError::Queue("lock poisoned".to_string()))?
            .push(payload.to_string());
        Ok(())
    }
}
