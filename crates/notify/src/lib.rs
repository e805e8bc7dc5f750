//! `wayfarer-notify` — best-effort booking notifications.
//!
//! After an order commits, a [`BookingNotification`] describing it is offered
//! to a message queue through a [`BookingDispatcher`]. The channel is strictly
//! one-way and advisory: a committed order stands whether or not its
//! notification ever reaches the queue.

pub mod config;
pub mod dispatcher;
pub mod message;
pub mod sender;

pub use config::NotifyConfig;
pub use dispatcher::BookingDispatcher;
pub use message::BookingNotification;
pub use sender::{QueueSender, RecordingSender, SendError};


