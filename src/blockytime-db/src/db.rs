use std::{sync::Arc, time::Duration};

use blockytime_algos::TrendAggregator;
use blockytime_entities::{block, type_};
use blockytime_migration::{Migrator, MigratorTrait};
use blockytime_types::{
    events::{Event, TypeInfo},
    trends::{GroupBy, TrendSeries},
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, Set,
};

use crate::QueryCache;

// SQLite allows 999 bound variables per statement, blocks bind 4 columns each
const BLOCK_INSERT_BATCH: usize = 200;

pub(crate) type TrendKey = (NaiveDate, NaiveDate, GroupBy);

#[derive(Clone)]
pub struct DatabaseHandler {
    pub(crate) db: DatabaseConnection,
    pub(crate) reporting_tz: Tz,
    pub(crate) trend_cache: Arc<QueryCache<TrendKey, Vec<TrendSeries>>>,
}

impl DatabaseHandler {
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn new<C>(path: C) -> anyhow::Result<Self>
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(path).await?;
        Migrator::up(&db, None).await?;

        Ok(Self {
            db,
            reporting_tz: TrendAggregator::DEFAULT_TIMEZONE,
            trend_cache: Arc::new(QueryCache::disabled()),
        })
    }

    /// Timezone used to bucket trends and statistics.
    pub fn with_reporting_timezone(mut self, timezone: Tz) -> Self {
        self.reporting_tz = timezone;
        self
    }

    /// Keep trend results for `ttl`; a zero duration turns caching off.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.trend_cache = Arc::new(QueryCache::new(ttl));
        self
    }

    pub fn reporting_timezone(&self) -> Tz {
        self.reporting_tz
    }

    pub async fn create_type(
        &self,
        name: &str,
        color: Option<i64>,
        priority: Option<i32>,
    ) -> anyhow::Result<TypeInfo> {
        let model = type_::ActiveModel {
            uid: NotSet,
            category_uid: Set(0),
            name: Set(name.to_owned()),
            color: Set(color),
            hidden: Set(Some(false)),
            priority: Set(priority),
        };

        let model = model.insert(&self.db).await?;
        Ok(Self::map_type(model))
    }

    pub async fn create_block(&self, event: Event) -> anyhow::Result<i32> {
        let model = block::ActiveModel {
            uid: NotSet,
            date: Set(event.timestamp),
            type_uid: Set(event.type_id),
            project_uid: Set(0),
            comment: Set(None),
        };

        let model = model.insert(&self.db).await?;
        Ok(model.uid)
    }

    pub async fn create_blocks(&self, events: Vec<Event>) -> anyhow::Result<()> {
        for chunk in events.chunks(BLOCK_INSERT_BATCH) {
            let models = chunk.iter().map(|event| block::ActiveModel {
                uid: NotSet,
                date: Set(event.timestamp),
                type_uid: Set(event.type_id),
                project_uid: Set(0),
                comment: Set(None),
            });

            block::Entity::insert_many(models).exec(&self.db).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_type_assigns_uid() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();

        let work = db.create_type("Work", Some(0xFF33_6699), Some(2)).await.unwrap();
        let sleep = db.create_type("Sleep", None, None).await.unwrap();

        assert_ne!(work.uid, sleep.uid);
        assert_eq!(work.name, "Work");
        assert_eq!(work.color, Some(0xFF33_6699));
        assert_eq!(work.priority, Some(2));
        assert_eq!(sleep.hidden, Some(false));
    }

    #[tokio::test]
    async fn create_blocks_in_batches() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        let work = db.create_type("Work", None, None).await.unwrap();

        let events = (0..450)
            .map(|i| Event::new(work.uid, 1_704_067_200 + i * 900))
            .collect::<Vec<_>>();
        db.create_blocks(events).await.unwrap();

        let stored = db
            .fetch_events(crate::SearchEvents::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 450);
    }

    #[tokio::test]
    async fn create_blocks_empty() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        db.create_blocks(Vec::new()).await.unwrap();
    }

    #[tokio::test]
    async fn builder_settings() {
        let db = DatabaseHandler::new("sqlite::memory:")
            .await
            .unwrap()
            .with_reporting_timezone(Tz::Europe__Berlin)
            .with_cache_ttl(Duration::from_secs(30));

        assert_eq!(db.reporting_timezone(), Tz::Europe__Berlin);
        assert!(db.trend_cache.is_enabled());
    }
}
