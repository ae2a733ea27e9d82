use std::time::Instant;

use blockytime_algos::StatisticsAggregator;
use blockytime_types::statistics::{StatisticsQuery, TypeDuration};

use crate::{DatabaseHandler, SearchEvents};

impl DatabaseHandler {
    pub async fn get_statistics(&self, query: StatisticsQuery) -> anyhow::Result<Vec<TypeDuration>> {
        StatisticsAggregator::validate(&query)?;

        let started = Instant::now();
        let aggregator = StatisticsAggregator::new(self.reporting_tz);
        let Some(range) = aggregator.time_range(query.start_date, query.end_date) else {
            return Ok(Vec::new());
        };

        let mut search = SearchEvents::in_range(range);
        if let Some(type_ids) = &query.type_ids {
            search = search.with_type_ids(type_ids.clone());
        }
        let events = self.fetch_events(search).await?;
        let catalog = self.fetch_type_catalog().await?;
        let durations = aggregator.aggregate(&query, &events, &catalog)?;

        info!(
            "statistics: {} types from {} blocks in {:?}",
            durations.len(),
            events.len(),
            started.elapsed()
        );

        Ok(durations)
    }
}

#[cfg(test)]
mod tests {
    use blockytime_types::{events::Event, statistics::TimeSlot};
    use chrono::{NaiveDate, TimeZone, Weekday};
    use chrono_tz::Tz;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hong_kong(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Tz::Asia__Hong_Kong
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp()
    }

    async fn seeded() -> (DatabaseHandler, i32, i32, i32) {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        let work = db.create_type("Work", None, None).await.unwrap().uid;
        let read = db.create_type("Read", None, None).await.unwrap().uid;
        let idle = db.create_type("Idle", None, None).await.unwrap().uid;

        // 2024-03-04 is a Monday
        let events = vec![
            Event::new(work, hong_kong(2024, 3, 4, 9, 0)),
            Event::new(work, hong_kong(2024, 3, 4, 9, 15)),
            Event::new(work, hong_kong(2024, 3, 5, 9, 0)),
            Event::new(read, hong_kong(2024, 3, 5, 21, 30)),
        ];
        db.create_blocks(events).await.unwrap();

        (db, work, read, idle)
    }

    #[tokio::test]
    async fn totals_per_type() {
        let (db, work, read, _) = seeded().await;

        let stats = db
            .get_statistics(StatisticsQuery::new(date(2024, 3, 4), date(2024, 3, 6)))
            .await
            .unwrap();
        let totals = stats
            .iter()
            .map(|s| (s.type_info.uid, s.duration_hours))
            .collect::<Vec<_>>();
        // types without blocks are left out
        assert_eq!(totals, [(work, 0.75), (read, 0.25)]);
    }

    #[tokio::test]
    async fn filtered_by_type_and_weekday() {
        let (db, work, read, _) = seeded().await;

        let query = StatisticsQuery::new(date(2024, 3, 4), date(2024, 3, 6))
            .with_type_ids(vec![read]);
        let stats = db.get_statistics(query).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].type_info.uid, read);

        let query = StatisticsQuery::new(date(2024, 3, 4), date(2024, 3, 6))
            .with_weekday(Weekday::Mon);
        let stats = db.get_statistics(query).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].type_info.uid, work);
        assert_eq!(stats[0].duration_hours, 0.5);
    }

    #[tokio::test]
    async fn filtered_by_time_slot() {
        let (db, work, _, _) = seeded().await;

        let slot = TimeSlot {
            slot_minutes: 15,
            hour: 9,
            minute: 0,
        };
        let query = StatisticsQuery::new(date(2024, 3, 4), date(2024, 3, 6)).with_time_slot(slot);
        let stats = db.get_statistics(query).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].type_info.uid, work);
        assert_eq!(stats[0].duration_hours, 0.5);
    }

    #[tokio::test]
    async fn invalid_slot_is_rejected() {
        let (db, _, _, _) = seeded().await;

        let slot = TimeSlot {
            slot_minutes: 20,
            hour: 9,
            minute: 0,
        };
        let query = StatisticsQuery::new(date(2024, 3, 4), date(2024, 3, 6)).with_time_slot(slot);
        assert!(db.get_statistics(query).await.is_err());
    }
}
