//! Best-effort delivery of booking notifications.
//!
//! ## Design Philosophy
//!
//! The dispatcher is wired once at startup into one of two states:
//!
//! - **Ready**: a queue connection was established at startup; every
//!   committed order is offered to the queue.
//! - **Disabled**: the channel is switched off in configuration, or
//!   connecting failed at startup; dispatch is a no-op.
//!
//! A Ready dispatcher never downgrades to Disabled. A broker outage makes
//! individual sends fail (each one logged and discarded) while later sends
//! keep being attempted, so delivery resumes as soon as the broker is back.
//!
//! Order placement must never fail because of this channel: the order a
//! notification describes has already committed by the time `dispatch` runs,
//! which is why `dispatch` returns nothing.

use std::sync::Arc;

use crate::config::NotifyConfig;
use crate::message::BookingNotification;
use crate::sender::{QueueSender, SendError};

#[derive(Clone)]
enum State {
    Ready { sender: Arc<dyn QueueSender> },
    Disabled,
}

/// Dispatches booking notifications after orders commit.
#[derive(Clone)]
pub struct BookingDispatcher {
    state: State,
}

impl BookingDispatcher {
    /// Channel switched off; every dispatch is a no-op.
    pub fn disabled() -> Self {
        Self {
            state: State::Disabled,
        }
    }

    /// Channel wired to a live queue connection.
    pub fn ready(sender: Arc<dyn QueueSender>) -> Self {
        Self {
            state: State::Ready { sender },
        }
    }

    /// Wire the dispatcher from configuration, connecting at most once.
    ///
    /// `connect` is invoked only when the channel is enabled and a queue URL
    /// is configured. A connect failure downgrades the channel to Disabled
    /// for the lifetime of the process.
    pub fn from_config<F>(config: &NotifyConfig, connect: F) -> Self
    where
        F: FnOnce(&NotifyConfig) -> Result<Arc<dyn QueueSender>, SendError>,
    {
        if !config.enabled {
            tracing::debug!("booking notifications disabled by configuration");
            return Self::disabled();
        }
        if config.queue_url.trim().is_empty() {
            tracing::warn!("booking notifications enabled but no queue URL configured, disabling");
            return Self::disabled();
        }

        match connect(config) {
            Ok(sender) => {
                tracing::info!("booking notifications ready on queue '{}'", config.queue_name);
                Self::ready(sender)
            }
            Err(e) => {
                tracing::warn!("booking queue connection failed, disabling notifications: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// Offer a notification to the queue.
    ///
    /// Failures are logged and discarded. The order this notification
    /// describes has already committed and stands regardless of the outcome.
    pub fn dispatch(&self, notification: &BookingNotification) {
        let State::Ready { sender } = &self.state else {
            tracing::debug!(
                "skipping booking notification for order {} (channel disabled)",
                notification.order_tracking_number
            );
            return;
        };

        let payload = match serde_json::to_string(notification) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    "failed to serialize booking notification for order {}: {}",
                    notification.order_tracking_number,
                    e
                );
                return;
            }
        };

        match sender.send(&payload) {
            Ok(()) => tracing::debug!(
                "booking notification enqueued for order {}",
                notification.order_tracking_number
            ),
            Err(e) => tracing::warn!(
                "failed to enqueue booking notification for order {}: {}",
                notification.order_tracking_number,
                e
            ),
        }
    }
}

impl std::fmt::Debug for BookingDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            State::Ready { .. } => "Ready",
            State::Disabled => "Disabled",
        };
        f.debug_struct("BookingDispatcher")
            .field("state", &state)
            .finish()
    }
}
