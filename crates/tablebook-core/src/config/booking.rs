//! Reservation admission configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the reservation admission engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Upper bound for any single store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl BookingConfig {
    /// The store timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_store_timeout() -> u64 {
    5000
}
