use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;

use blockytime_types::{
    events::{BLOCK_HOURS, Event, TimeRange, TypeInfo},
    trends::{GroupBy, TrendPoint, TrendSeries},
};

use crate::{
    Result,
    helpers::time_math::{local_date_range, local_datetime},
};

/// Buckets events into calendar periods of a fixed reporting timezone.
#[derive(Clone, Copy, Debug)]
pub struct TrendAggregator {
    timezone: Tz,
}

impl Default for TrendAggregator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEZONE)
    }
}

impl TrendAggregator {
    pub const DEFAULT_TIMEZONE: Tz = Tz::Asia__Hong_Kong;

    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn time_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Option<TimeRange> {
        local_date_range(start_date, end_date, self.timezone)
    }

    pub fn period_label(&self, timestamp: i64, group_by: GroupBy) -> Result<String> {
        let local = local_datetime(timestamp, self.timezone)?;
        Ok(local.format(group_by.label_format()).to_string())
    }

    /// One series per catalog type, each holding a point for every period label
    /// covered by `events` in the date range. Periods without events of a type
    /// are reported as zero hours.
    pub fn aggregate(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        group_by: GroupBy,
        events: &[Event],
        catalog: &[TypeInfo],
    ) -> Result<Vec<TrendSeries>> {
        let Some(range) = self.time_range(start_date, end_date) else {
            return Ok(Vec::new());
        };

        let mut labels = BTreeSet::new();
        // type -> label -> blocks
        let mut counts: HashMap<i32, HashMap<String, usize>> = HashMap::new();
        for event in events.iter().filter(|e| range.contains(e.timestamp)) {
            let label = self.period_label(event.timestamp, group_by)?;
            *counts
                .entry(event.type_id)
                .or_default()
                .entry(label.clone())
                .or_default() += 1;
            labels.insert(label);
        }

        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let types = catalog
            .iter()
            .map(|type_info| (type_info.uid, type_info))
            .collect::<BTreeMap<_, _>>();

        let series = types
            .into_values()
            .map(|type_info| {
                let per_label = counts.get(&type_info.uid);
                let points = labels
                    .iter()
                    .map(|label| {
                        let blocks = per_label
                            .and_then(|m| m.get(label))
                            .copied()
                            .unwrap_or_default();
                        TrendPoint {
                            time_label: label.clone(),
                            duration_hours: blocks as f64 * BLOCK_HOURS,
                        }
                    })
                    .collect();

                TrendSeries {
                    type_info: type_info.clone(),
                    points,
                }
            })
            .collect();

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hk(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Tz::Asia__Hong_Kong
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp()
    }

    fn type_info(uid: i32, name: &str, priority: i32) -> TypeInfo {
        TypeInfo {
            uid,
            category_uid: 0,
            name: name.to_owned(),
            color: Some(0xFF00_FF00),
            hidden: Some(false),
            priority: Some(priority),
        }
    }

    #[test]
    fn three_days_one_event_each() {
        let catalog = vec![type_info(1, "Work", 0)];
        let events = vec![
            Event::new(1, hk(2024, 1, 1, 9)),
            Event::new(1, hk(2024, 1, 2, 9)),
            Event::new(1, hk(2024, 1, 3, 9)),
        ];

        let series = TrendAggregator::default()
            .aggregate(date(2024, 1, 1), date(2024, 1, 4), GroupBy::Day, &events, &catalog)
            .unwrap();

        assert_eq!(series.len(), 1);
        let labels = series[0]
            .points
            .iter()
            .map(|p| p.time_label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert!(series[0].points.iter().all(|p| p.duration_hours == 0.25));
    }

    #[test]
    fn every_type_gets_every_period() {
        let catalog = vec![type_info(2, "Sleep", 5), type_info(1, "Work", 1), type_info(3, "Read", 0)];
        let events = vec![
            Event::new(1, hk(2024, 1, 1, 9)),
            Event::new(1, hk(2024, 1, 1, 10)),
            Event::new(2, hk(2024, 1, 2, 1)),
        ];

        let series = TrendAggregator::default()
            .aggregate(date(2024, 1, 1), date(2024, 1, 5), GroupBy::Day, &events, &catalog)
            .unwrap();

        let uids = series.iter().map(|s| s.type_info.uid).collect::<Vec<_>>();
        assert_eq!(uids, [1, 2, 3]);
        for s in &series {
            assert_eq!(s.points.len(), 2);
        }

        assert_eq!(series[0].points[0].duration_hours, 0.5);
        assert_eq!(series[0].points[1].duration_hours, 0.0);
        assert_eq!(series[1].points[0].duration_hours, 0.0);
        assert_eq!(series[1].points[1].duration_hours, 0.25);
        assert!(series[2].points.iter().all(|p| p.duration_hours == 0.0));
    }

    #[test]
    fn labels_use_local_dates() {
        // 01:00 local is 17:00 UTC on the previous day
        let aggregator = TrendAggregator::default();
        assert_eq!(
            aggregator.period_label(hk(2024, 1, 2, 1), GroupBy::Day).unwrap(),
            "2024-01-02"
        );
    }

    #[test]
    fn week_and_month_labels() {
        let aggregator = TrendAggregator::default();
        // Wednesday of the second Monday-based week
        let ts = hk(2024, 1, 10, 12);
        assert_eq!(aggregator.period_label(ts, GroupBy::Week).unwrap(), "2024-02-1");
        assert_eq!(aggregator.period_label(ts, GroupBy::Month).unwrap(), "2024-01-01");
    }

    #[test]
    fn weekly_grouping_merges_days() {
        let catalog = vec![type_info(1, "Work", 0)];
        // Mon 8th .. Sun 14th share a week, Mon 15th starts the next
        let events = (8..=15)
            .map(|d| Event::new(1, hk(2024, 1, d, 9)))
            .collect::<Vec<_>>();

        let series = TrendAggregator::default()
            .aggregate(date(2024, 1, 1), date(2024, 2, 1), GroupBy::Week, &events, &catalog)
            .unwrap();

        let points = &series[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time_label, "2024-02-1");
        assert_eq!(points[0].duration_hours, 7.0 * 0.25);
        assert_eq!(points[1].time_label, "2024-03-1");
        assert_eq!(points[1].duration_hours, 0.25);
    }

    #[test]
    fn events_outside_range_are_ignored() {
        let catalog = vec![type_info(1, "Work", 0)];
        let events = vec![
            Event::new(1, hk(2023, 12, 31, 23)),
            Event::new(1, hk(2024, 1, 1, 0)),
            Event::new(1, hk(2024, 1, 3, 0)),
        ];

        let series = TrendAggregator::default()
            .aggregate(date(2024, 1, 1), date(2024, 1, 3), GroupBy::Day, &events, &catalog)
            .unwrap();

        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].time_label, "2024-01-01");
    }

    #[test]
    fn unknown_types_contribute_periods_only() {
        let catalog = vec![type_info(1, "Work", 0)];
        let events = vec![
            Event::new(1, hk(2024, 1, 1, 9)),
            Event::new(99, hk(2024, 1, 2, 9)),
        ];

        let series = TrendAggregator::default()
            .aggregate(date(2024, 1, 1), date(2024, 1, 3), GroupBy::Day, &events, &catalog)
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[0].points[1].duration_hours, 0.0);
    }

    #[test]
    fn empty_ranges_and_feeds() {
        let catalog = vec![type_info(1, "Work", 0)];
        let aggregator = TrendAggregator::default();

        let series = aggregator
            .aggregate(date(2024, 1, 3), date(2024, 1, 3), GroupBy::Day, &[], &catalog)
            .unwrap();
        assert!(series.is_empty());

        let series = aggregator
            .aggregate(date(2024, 1, 1), date(2024, 1, 3), GroupBy::Month, &[], &catalog)
            .unwrap();
        assert!(series.is_empty());
    }
}
