use std::time::Instant;

use blockytime_algos::SleepTrendAnalyzer;
use blockytime_types::sleep::{SLEEP_TYPE_NAME, SleepStats, SleepStatsQuery};
use chrono::{DateTime, Utc};

use crate::{DatabaseHandler, SearchEvents};

impl DatabaseHandler {
    pub async fn calculate_sleep_stats(&self, query: SleepStatsQuery) -> anyhow::Result<SleepStats> {
        self.calculate_sleep_stats_at(query, Utc::now()).await
    }

    /// Same as [`DatabaseHandler::calculate_sleep_stats`], with the timezone
    /// offset taken at `reference` instead of the current time.
    pub async fn calculate_sleep_stats_at(
        &self,
        query: SleepStatsQuery,
        reference: DateTime<Utc>,
    ) -> anyhow::Result<SleepStats> {
        let started = Instant::now();
        let analyzer = SleepTrendAnalyzer::new(query, reference)?;

        let sleep_type_ids = self
            .find_types_by_name(SLEEP_TYPE_NAME)
            .await?
            .into_iter()
            .map(|type_info| type_info.uid)
            .collect::<Vec<_>>();
        if sleep_type_ids.is_empty() {
            warn!("no `{SLEEP_TYPE_NAME}` type in catalog");
            return Ok(SleepStats::default());
        }
        let Some(range) = analyzer.time_range()? else {
            return Ok(SleepStats::default());
        };

        let events = self
            .fetch_events(SearchEvents::in_range(range).with_type_ids(sleep_type_ids.clone()))
            .await?;
        let stats = analyzer.calculate(&events, &sleep_type_ids)?;

        info!(
            "sleep stats: {} nights from {} blocks in {:?}",
            stats.dates.len(),
            events.len(),
            started.elapsed()
        );

        Ok(stats)
    }
}
