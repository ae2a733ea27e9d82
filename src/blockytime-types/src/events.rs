use serde::{Deserialize, Serialize};

/// Length of one logged block in hours.
pub const BLOCK_HOURS: f64 = 0.25;

/// A single 15 minute block of logged activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub type_id: i32,
    /// Unix seconds, UTC
    pub timestamp: i64,
}

impl Event {
    pub fn new(type_id: i32, timestamp: i64) -> Self {
        Self { type_id, timestamp }
    }
}

/// Entry of the type catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub uid: i32,
    pub category_uid: i32,
    pub name: String,
    pub color: Option<i64>,
    pub hidden: Option<bool>,
    pub priority: Option<i32>,
}

/// Half open `[start, end)` range of Unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
