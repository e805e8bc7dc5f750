use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, globally unique tracking identifier handed to customers.
///
/// Backed by a random UUIDv4 in hyphenated form: tracking numbers are
/// externally visible, so they must be unguessable and must not expose
/// creation order or order volume (ruling out sequential counters and
/// time-ordered UUIDv7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Generate a fresh tracking number.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for TrackingNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}
