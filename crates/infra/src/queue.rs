//! Redis-backed booking queue transport.
//!
//! Pushes serialized notifications onto a Redis list with RPUSH; consumers
//! pop from the other end. Connect and send are both bounded by the
//! configured timeout, so a stalled broker cannot hold up order placement.

use std::sync::Arc;
use std::time::Duration;

use wayfarer_notify::{NotifyConfig, QueueSender, SendError};

/// Queue sender backed by a Redis list.
#[derive(Debug, Clone)]
pub struct RedisQueueSender {
    client: Arc<redis::Client>,
    queue_name: String,
    timeout: Duration,
}

impl RedisQueueSender {
    /// Open a client against the configured broker.
    ///
    /// Validates the URL and performs one PING, so a dead broker is detected
    /// at startup rather than on the first order.
    pub fn connect(config: &NotifyConfig) -> Result<Self, SendError> {
        let client = redis::Client::open(config.queue_url.as_str())
            .map_err(|e| SendError::Queue(format!("invalid queue URL: {e}")))?;

        let sender = Self {
            client: Arc::new(client),
            queue_name: config.queue_name.clone(),
            timeout: config.send_timeout,
        };
        sender.ping()?;
        Ok(sender)
    }

    fn connection(&self) -> Result<redis::Connection, SendError> {
        let conn = self
            .client
            .get_connection_with_timeout(self.timeout)
            .map_err(|e| SendError::Queue(format!("connection failed: {e}")))?;
        conn.set_read_timeout(Some(self.timeout))
            .map_err(|e| SendError::Queue(format!("failed to set read timeout: {e}")))?;
        conn.set_write_timeout(Some(self.timeout))
            .map_err(|e| SendError::Queue(format!("failed to set write timeout: {e}")))?;
        Ok(conn)
    }

    fn ping(&self) -> Result<(), SendError> {
        let mut conn = self.connection()?;
        let _: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| SendError::Queue(format!("ping failed: {e}")))?;
        Ok(())
    }
}

impl QueueSender for RedisQueueSender {
    fn send(&self, payload: &str) -> Result<(), SendError> {
        let mut conn = self.connection()?;
        let _: i64 = redis::cmd("RPUSH")
            .arg(&self.queue_name)
            .arg(payload)
            .query(&mut conn)
            .map_err(|e| SendError::Queue(format!("RPUSH to '{}' failed: {e}", self.queue_name)))?;
        Ok(())
    }
}
