use blockytime_entities::type_;
use blockytime_types::events::TypeInfo;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::DatabaseHandler;

impl DatabaseHandler {
    pub async fn fetch_type_catalog(&self) -> anyhow::Result<Vec<TypeInfo>> {
        Ok(type_::Entity::find()
            .order_by_asc(type_::Column::Uid)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::map_type)
            .collect())
    }

    /// Every type with exactly this name, case sensitive.
    pub async fn find_types_by_name(&self, name: &str) -> anyhow::Result<Vec<TypeInfo>> {
        Ok(type_::Entity::find()
            .filter(type_::Column::Name.eq(name))
            .order_by_asc(type_::Column::Uid)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::map_type)
            .collect())
    }

    pub(crate) fn map_type(model: type_::Model) -> TypeInfo {
        TypeInfo {
            uid: model.uid,
            category_uid: model.category_uid,
            name: model.name,
            color: model.color,
            hidden: model.hidden,
            priority: model.priority,
        }
    }
}
