use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Paragraphs {
    Table,
    Id,
    PostId,
    Position,
    Content,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Paragraphs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Paragraphs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Paragraphs::PostId).uuid().not_null())
                    .col(ColumnDef::new(Paragraphs::Position).integer().not_null())
                    .col(ColumnDef::new(Paragraphs::Content).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_paragraphs_post_id")
                            .from(Paragraphs::Table, Paragraphs::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_paragraphs_post_id")
                    .table(Paragraphs::Table)
                    .col(Paragraphs::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Paragraphs::Table).to_owned())
            .await
    }
}
