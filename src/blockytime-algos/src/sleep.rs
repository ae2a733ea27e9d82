use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;

use blockytime_types::{
    events::{BLOCK_HOURS, Event, TimeRange},
    sleep::{SleepSession, SleepStats, SleepStatsQuery},
};

use crate::{
    DecayingWindow, Result,
    helpers::{
        format_hm::FormatHM,
        time_math::{
            SECONDS_PER_DAY, SECONDS_PER_HOUR, check_hour, day_boundaries, epoch_day_to_date,
            normalize_hour, round_float, utc_offset_at,
        },
    },
};

/// Span not covered by logged blocks that a session may have before it is
/// considered fragmented.
const MAX_MISSING_HOURS: f64 = 1.0;

/// Turns sleep blocks into sessions and smoothed start/end/duration trends.
///
/// The timezone offset is taken once at the reference instant passed to
/// [`SleepTrendAnalyzer::new`] and applied to every event, so results near a
/// DST transition follow the offset of the reference instant, not of the night.
pub struct SleepTrendAnalyzer {
    query: SleepStatsQuery,
    utc_offset: i64,
    window: DecayingWindow,
}

#[derive(Clone, Copy, Debug)]
struct Night {
    day: i64,
    start_hour: f64,
    end_hour: f64,
    duration: f64,
}

impl SleepTrendAnalyzer {
    pub fn new(query: SleepStatsQuery, reference: DateTime<Utc>) -> Result<Self> {
        check_hour(query.cutoff_hour)?;
        check_hour(query.start_time_cutoff_hour)?;
        check_hour(query.end_time_cutoff_hour)?;
        let window = DecayingWindow::new(query.window_size, query.decay_factor)?;
        let utc_offset = utc_offset_at(query.timezone, reference);

        Ok(Self {
            query,
            utc_offset,
            window,
        })
    }

    pub fn query(&self) -> &SleepStatsQuery {
        &self.query
    }

    pub fn utc_offset(&self) -> i64 {
        self.utc_offset
    }

    /// Timestamps covered by the query: from the start of the first sleep day to
    /// the end of the last one. `None` when the date range is empty.
    pub fn time_range(&self) -> Result<Option<TimeRange>> {
        let query = &self.query;
        if query.start_date >= query.end_date {
            return Ok(None);
        }

        let start = day_boundaries(query.start_date, query.cutoff_hour, query.timezone)?;
        let end = day_boundaries(query.end_date, query.cutoff_hour, query.timezone)?;
        Ok(Some(TimeRange::new(start.start, end.end)))
    }

    /// Bucket key of a timestamp, days since the epoch.
    pub fn sleep_day(&self, timestamp: i64) -> i64 {
        let shift = (24 - i64::from(self.query.cutoff_hour)) * SECONDS_PER_HOUR + self.utc_offset;
        (timestamp - shift).div_euclid(SECONDS_PER_DAY)
    }

    /// Sleep sessions ordered by session day, fragmented sessions removed.
    pub fn extract_sessions(
        &self,
        events: &[Event],
        sleep_type_ids: &[i32],
    ) -> Result<Vec<SleepSession>> {
        let Some(range) = self.time_range()? else {
            return Ok(Vec::new());
        };

        let mut buckets: BTreeMap<i64, SleepSession> = BTreeMap::new();
        for event in events
            .iter()
            .filter(|e| sleep_type_ids.contains(&e.type_id) && range.contains(e.timestamp))
        {
            let day = self.sleep_day(event.timestamp);
            buckets
                .entry(day)
                .and_modify(|session| {
                    session.start_time = session.start_time.min(event.timestamp);
                    session.end_time = session.end_time.max(event.timestamp);
                    session.event_count += 1;
                })
                .or_insert(SleepSession {
                    session_day: day,
                    start_time: event.timestamp,
                    end_time: event.timestamp,
                    duration_hours: 0.0,
                    event_count: 1,
                });
        }

        let total = buckets.len();
        let sessions = buckets
            .into_values()
            .map(|mut session| {
                session.duration_hours =
                    (session.end_time - session.start_time) as f64 / SECONDS_PER_HOUR as f64;
                session
            })
            .filter(is_contiguous)
            .collect::<Vec<_>>();

        debug!(
            "sleep sessions: {} kept, {} fragmented",
            sessions.len(),
            total - sessions.len()
        );

        Ok(sessions)
    }

    pub fn calculate(&self, events: &[Event], sleep_type_ids: &[i32]) -> Result<SleepStats> {
        let query = &self.query;
        let mut nights = self
            .extract_sessions(events, sleep_type_ids)?
            .into_iter()
            .map(|session| Night {
                day: session.session_day,
                start_hour: normalize_hour(
                    session.start_time,
                    self.utc_offset,
                    query.start_time_cutoff_hour,
                ),
                end_hour: normalize_hour(
                    session.end_time,
                    self.utc_offset,
                    query.end_time_cutoff_hour,
                ),
                duration: session.duration_hours,
            })
            .filter(|night| {
                night.start_hour > query.filter_start_time_after
                    && night.end_hour > query.filter_end_time_after
            })
            .collect::<Vec<_>>();
        nights.sort_by_key(|night| night.day);

        let dates = nights
            .iter()
            .map(|night| epoch_day_to_date(night.day))
            .collect::<Result<Vec<_>>>()?;
        let start_hours = nights.iter().map(|n| n.start_hour).collect::<Vec<_>>();
        let end_hours = nights.iter().map(|n| n.end_hour).collect::<Vec<_>>();
        let durations = nights.iter().map(|n| n.duration).collect::<Vec<_>>();

        let moving_avg_dates = dates
            .iter()
            .skip(self.window.window_size() - 1)
            .copied()
            .collect();

        Ok(SleepStats {
            start_moving_avg: self.window.apply(&start_hours),
            end_moving_avg: self.window.apply(&end_hours),
            duration_moving_avg: self.window.apply(&durations),
            moving_avg_dates,
            start_hours,
            end_hours,
            dates,
        })
    }
}

fn is_contiguous(session: &SleepSession) -> bool {
    session.duration_hours - session.event_count as f64 * BLOCK_HOURS <= MAX_MISSING_HOURS
}

/// Most recent moving averages of a [`SleepStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SleepSummary {
    pub nights: usize,
    pub latest: Option<NaiveDate>,
    pub start_hour: Option<f64>,
    pub end_hour: Option<f64>,
    pub duration_hours: Option<f64>,
}

impl From<&SleepStats> for SleepSummary {
    fn from(stats: &SleepStats) -> Self {
        Self {
            nights: stats.dates.len(),
            latest: stats.moving_avg_dates.last().copied(),
            start_hour: stats.start_moving_avg.last().copied(),
            end_hour: stats.end_moving_avg.last().copied(),
            duration_hours: stats.duration_moving_avg.last().copied(),
        }
    }
}

impl Display for SleepSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nights: {}", self.nights)?;
        let (Some(latest), Some(start), Some(end), Some(duration)) = (
            self.latest,
            self.start_hour,
            self.end_hour,
            self.duration_hours,
        ) else {
            return write!(f, "Not enough nights for a moving average");
        };

        writeln!(f, "Moving average as of {}:", latest)?;
        writeln!(f, "\tStart: {}", start.format_hm())?;
        writeln!(f, "\tEnd: {}", end.format_hm())?;
        write!(f, "\tDuration: {}h", round_float(duration))
    }
}
