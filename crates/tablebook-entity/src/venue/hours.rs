//! Operating-hours window of a venue.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Daily window during which a venue accepts reservations.
///
/// Both ends are inclusive: a venue open 10:00-23:00 accepts a 23:00
/// booking but not 23:01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// First bookable time of day.
    pub opens_at: NaiveTime,
    /// Last bookable time of day.
    pub closes_at: NaiveTime,
}

impl OperatingHours {
    /// Create a window. Returns `None` unless `opens_at < closes_at`.
    pub fn new(opens_at: NaiveTime, closes_at: NaiveTime) -> Option<Self> {
        (opens_at < closes_at).then_some(Self {
            opens_at,
            closes_at,
        })
    }

    /// Whether `time` falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.opens_at <= time && time <= self.closes_at
    }
}
