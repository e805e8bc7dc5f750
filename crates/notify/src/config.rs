//! Notification channel configuration.

use std::time::Duration;

const DEFAULT_QUEUE_NAME: &str = "bookings";
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Booking queue settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Master switch for the channel.
    pub enabled: bool,
    /// Broker connection URL. Required when `enabled` is true.
    pub queue_url: String,
    /// Queue the notifications are pushed onto.
    pub queue_name: String,
    /// Upper bound for a single connect or send.
    pub send_timeout: Duration,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            queue_url: String::new(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl NotifyConfig {
    /// Read the configuration from the environment.
    ///
    /// Variables: `BOOKING_QUEUE_ENABLED`, `BOOKING_QUEUE_URL`,
    /// `BOOKING_QUEUE_NAME`, `BOOKING_QUEUE_TIMEOUT_MS`. Missing or
    /// malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        let enabled = std::env::var("BOOKING_QUEUE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);
        let queue_url = std::env::var("BOOKING_QUEUE_URL").unwrap_or_default();
        let queue_name =
            std::env::var("BOOKING_QUEUE_NAME").unwrap_or_else(|_| DEFAULT_QUEUE_NAME.to_string());
        let send_timeout = std::env::var("BOOKING_QUEUE_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEND_TIMEOUT);

        Self {
            enabled,
            queue_url,
            queue_name,
            send_timeout,
        }
    }
}
