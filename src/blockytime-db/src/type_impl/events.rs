use blockytime_entities::block;
use blockytime_types::events::{Event, TimeRange};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

use crate::DatabaseHandler;

/// Filter for the event feed; `from` is inclusive, `to` exclusive.
#[derive(Clone, Default, Debug)]
pub struct SearchEvents {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub type_ids: Option<Vec<i32>>,
}

impl SearchEvents {
    pub fn in_range(range: TimeRange) -> Self {
        Self {
            from: Some(range.start),
            to: Some(range.end),
            type_ids: None,
        }
    }

    pub fn with_type_ids(mut self, type_ids: Vec<i32>) -> Self {
        self.type_ids = Some(type_ids);
        self
    }

    pub(crate) fn conditions(self) -> Condition {
        Condition::all()
            .add_option(self.from.map(|from| block::Column::Date.gte(from)))
            .add_option(self.to.map(|to| block::Column::Date.lt(to)))
            .add_option(self.type_ids.map(|ids| block::Column::TypeUid.is_in(ids)))
    }
}

impl DatabaseHandler {
    /// Events ordered by timestamp.
    pub async fn fetch_events(&self, options: SearchEvents) -> anyhow::Result<Vec<Event>> {
        let events = block::Entity::find()
            .filter(options.conditions())
            .order_by_asc(block::Column::Date)
            .all(&self.db)
            .await?
            .into_iter()
            .map(map_event)
            .collect();

        Ok(events)
    }
}

fn map_event(model: block::Model) -> Event {
    Event {
        type_id: model.type_uid,
        timestamp: model.date,
    }
}
