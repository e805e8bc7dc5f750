//! Wire format of the booking notification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Message published to the booking queue after an order commits.
///
/// Field names are part of the queue contract with downstream consumers,
/// hence the camelCase rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotification {
    pub order_tracking_number: String,
    pub customer_name: String,
    pub vacation_title: String,
    /// Serialized as a plain JSON number, not a string.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// When the notification was built, immediately before dispatch.
    pub timestamp: DateTime<Utc>,
}

impl BookingNotification {
    /// Build a notification stamped with the current time.
    pub fn new(
        order_tracking_number: impl Into<String>,
        customer_name: impl Into<String>,
        vacation_title: impl Into<String>,
        total_price: Decimal,
    ) -> Self {
        Self {
            order_tracking_number: order_tracking_number.into(),
            customer_name: customer_name.into(),
            vacation_title: vacation_title.into(),
            total_price,
            timestamp: Utc::now(),
        }
    }
}
