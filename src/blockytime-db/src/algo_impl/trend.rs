use std::time::Instant;

use blockytime_algos::TrendAggregator;
use blockytime_types::trends::{GroupBy, TrendSeries};
use chrono::NaiveDate;

use crate::{DatabaseHandler, SearchEvents};

impl DatabaseHandler {
    /// Hours per type and period in the reporting timezone. Served from the
    /// trend cache while an entry for the same arguments is fresh.
    pub async fn get_trends(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        group_by: GroupBy,
    ) -> anyhow::Result<Vec<TrendSeries>> {
        let key = (start_date, end_date, group_by);
        if let Some(series) = self.trend_cache.get(&key) {
            debug!("trend cache hit for {start_date}..{end_date} by {group_by}");
            return Ok(series);
        }

        let started = Instant::now();
        let aggregator = TrendAggregator::new(self.reporting_tz);
        let Some(range) = aggregator.time_range(start_date, end_date) else {
            return Ok(Vec::new());
        };

        let events = self.fetch_events(SearchEvents::in_range(range)).await?;
        let catalog = self.fetch_type_catalog().await?;
        let series = aggregator.aggregate(start_date, end_date, group_by, &events, &catalog)?;

        info!(
            "trends by {group_by}: {} series from {} blocks in {:?}",
            series.len(),
            events.len(),
            started.elapsed()
        );

        self.trend_cache.insert(key, series.clone());
        Ok(series)
    }
}
