use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "agenda_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub platform: String,
    /// Hex SHA-256 of the trimmed, lowercased content.
    pub content_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
