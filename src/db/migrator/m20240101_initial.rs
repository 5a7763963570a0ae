use crate::entities::prelude::*;
use crate::entities::{agenda_items, chat_messages};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // `platform` carries a unique constraint from the entity definition,
        // which the upsert relies on.
        manager
            .create_table(
                schema
                    .create_table_from_entity(HashtagCache)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ChatMessages)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AgendaItems)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_messages_chat_id")
                    .table(ChatMessages)
                    .col(chat_messages::Column::ChatId)
                    .col(chat_messages::Column::Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_agenda_items_content_hash")
                    .table(AgendaItems)
                    .col(agenda_items::Column::ContentHash)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_agenda_items_date")
                    .table(AgendaItems)
                    .col(agenda_items::Column::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgendaItems).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatMessages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HashtagCache).to_owned())
            .await
    }
}
