use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::events::TypeInfo;

/// Local time-of-day window `[hour:minute, hour:minute + slot_minutes)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_minutes: u32,
    pub hour: u32,
    pub minute: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatisticsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub type_ids: Option<Vec<i32>>,
    pub time_slot: Option<TimeSlot>,
    pub weekday: Option<Weekday>,
}

impl StatisticsQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            type_ids: None,
            time_slot: None,
            weekday: None,
        }
    }

    pub fn with_type_ids(mut self, type_ids: Vec<i32>) -> Self {
        self.type_ids = Some(type_ids);
        self
    }

    pub fn with_time_slot(mut self, time_slot: TimeSlot) -> Self {
        self.time_slot = Some(time_slot);
        self
    }

    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDuration {
    #[serde(rename = "type")]
    pub type_info: TypeInfo,
    pub duration_hours: f64,
}
