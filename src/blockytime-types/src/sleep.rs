use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Name of the catalog type whose blocks count as sleep.
pub const SLEEP_TYPE_NAME: &str = "Sleep";

/// Cluster of sleep blocks sharing one sleep-day bucket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    /// Bucket key, days since 1970-01-01
    pub session_day: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_hours: f64,
    pub event_count: usize,
}

/// Smoothed and raw sleep series.
///
/// Averages share one length, raw series share another and
/// `dates.len() == moving_avg_dates.len() + window_size - 1` whenever any average exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepStats {
    pub start_moving_avg: Vec<f64>,
    pub end_moving_avg: Vec<f64>,
    pub duration_moving_avg: Vec<f64>,
    pub moving_avg_dates: Vec<NaiveDate>,
    pub start_hours: Vec<f64>,
    pub end_hours: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

impl SleepStats {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SleepStatsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Local hour separating two sleep days
    pub cutoff_hour: u32,
    pub timezone: Tz,
    pub start_time_cutoff_hour: u32,
    pub end_time_cutoff_hour: u32,
    pub filter_start_time_after: f64,
    pub filter_end_time_after: f64,
    pub decay_factor: f64,
    pub window_size: usize,
}

impl SleepStatsQuery {
    pub const DEFAULT_CUTOFF_HOUR: u32 = 18;
    pub const DEFAULT_TIMEZONE: Tz = Tz::Asia__Shanghai;
    pub const DEFAULT_START_TIME_CUTOFF_HOUR: u32 = 8;
    pub const DEFAULT_END_TIME_CUTOFF_HOUR: u32 = 14;
    pub const DEFAULT_FILTER_START_TIME_AFTER: f64 = 20.0;
    pub const DEFAULT_FILTER_END_TIME_AFTER: f64 = 27.0;
    pub const DEFAULT_DECAY_FACTOR: f64 = 0.1;
    pub const DEFAULT_WINDOW_SIZE: usize = 7;

    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            cutoff_hour: Self::DEFAULT_CUTOFF_HOUR,
            timezone: Self::DEFAULT_TIMEZONE,
            start_time_cutoff_hour: Self::DEFAULT_START_TIME_CUTOFF_HOUR,
            end_time_cutoff_hour: Self::DEFAULT_END_TIME_CUTOFF_HOUR,
            filter_start_time_after: Self::DEFAULT_FILTER_START_TIME_AFTER,
            filter_end_time_after: Self::DEFAULT_FILTER_END_TIME_AFTER,
            decay_factor: Self::DEFAULT_DECAY_FACTOR,
            window_size: Self::DEFAULT_WINDOW_SIZE,
        }
    }

    pub fn with_cutoff_hour(mut self, cutoff_hour: u32) -> Self {
        self.cutoff_hour = cutoff_hour;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_time_cutoff_hours(mut self, start: u32, end: u32) -> Self {
        self.start_time_cutoff_hour = start;
        self.end_time_cutoff_hour = end;
        self
    }

    pub fn with_filters(mut self, start_time_after: f64, end_time_after: f64) -> Self {
        self.filter_start_time_after = start_time_after;
        self.filter_end_time_after = end_time_after;
        self
    }

    pub fn with_decay_factor(mut self, decay_factor: f64) -> Self {
        self.decay_factor = decay_factor;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
}
