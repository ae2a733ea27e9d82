use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

use blockytime_types::{
    events::{BLOCK_HOURS, Event, TimeRange, TypeInfo},
    statistics::{StatisticsQuery, TimeSlot, TypeDuration},
};

use crate::{
    AnalyticsError, Result,
    helpers::time_math::{local_date_range, local_datetime},
};

const SLOT_SIZES: [u32; 2] = [15, 30];

/// Hours logged per type over a date range of the reporting timezone.
#[derive(Clone, Copy, Debug)]
pub struct StatisticsAggregator {
    timezone: Tz,
}

impl StatisticsAggregator {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn time_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Option<TimeRange> {
        local_date_range(start_date, end_date, self.timezone)
    }

    pub fn validate(query: &StatisticsQuery) -> Result<()> {
        let Some(slot) = query.time_slot else {
            return Ok(());
        };

        if !SLOT_SIZES.contains(&slot.slot_minutes) {
            return Err(AnalyticsError::InvalidTimeSlot(format!(
                "slot must be 15 or 30 minutes, got {}",
                slot.slot_minutes
            )));
        }
        if slot.hour > 23 {
            return Err(AnalyticsError::InvalidTimeSlot(format!(
                "hour must be within 0..=23, got {}",
                slot.hour
            )));
        }
        if slot.minute >= 60 || slot.minute % slot.slot_minutes != 0 {
            return Err(AnalyticsError::InvalidTimeSlot(format!(
                "minute {} is not a multiple of {}",
                slot.minute, slot.slot_minutes
            )));
        }

        Ok(())
    }

    /// Types without a matching event are left out; results are ordered by type id.
    pub fn aggregate(
        &self,
        query: &StatisticsQuery,
        events: &[Event],
        catalog: &[TypeInfo],
    ) -> Result<Vec<TypeDuration>> {
        Self::validate(query)?;
        let Some(range) = self.time_range(query.start_date, query.end_date) else {
            return Ok(Vec::new());
        };

        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for event in events {
            if !range.contains(event.timestamp) {
                continue;
            }
            if let Some(type_ids) = &query.type_ids {
                if !type_ids.contains(&event.type_id) {
                    continue;
                }
            }
            if !self.matches_local_filters(query, event.timestamp)? {
                continue;
            }
            *counts.entry(event.type_id).or_default() += 1;
        }

        let types = catalog
            .iter()
            .map(|type_info| (type_info.uid, type_info))
            .collect::<BTreeMap<_, _>>();

        Ok(counts
            .into_iter()
            .filter_map(|(uid, blocks)| {
                types.get(&uid).map(|type_info| TypeDuration {
                    type_info: (*type_info).clone(),
                    duration_hours: blocks as f64 * BLOCK_HOURS,
                })
            })
            .collect())
    }

    fn matches_local_filters(&self, query: &StatisticsQuery, timestamp: i64) -> Result<bool> {
        if query.time_slot.is_none() && query.weekday.is_none() {
            return Ok(true);
        }

        let local = local_datetime(timestamp, self.timezone)?;
        if let Some(weekday) = query.weekday {
            if local.weekday() != weekday {
                return Ok(false);
            }
        }

        Ok(query
            .time_slot
            .is_none_or(|slot| in_slot(slot, local.hour() * 60 + local.minute())))
    }
}

fn in_slot(slot: TimeSlot, minute_of_day: u32) -> bool {
    let start = slot.hour * 60 + slot.minute;
    (start..start + slot.slot_minutes).contains(&minute_of_day)
}
