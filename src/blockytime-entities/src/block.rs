use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "Block")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub uid: i32,
    /// Unix seconds of the block start
    pub date: i64,
    pub type_uid: i32,
    pub project_uid: i32,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::type_::Entity",
        from = "Column::TypeUid",
        to = "super::type_::Column::Uid"
    )]
    Type,
}

impl Related<super::type_::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
