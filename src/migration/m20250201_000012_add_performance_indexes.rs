use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Posts {
    Table,
    CreatedAt,
    IsApproved,
}

#[derive(DeriveIden)]
enum Complaints {
    Table,
    PostId,
    CommentId,
}

#[derive(DeriveIden)]
enum Paragraphs {
    Table,
    PostId,
    Position,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Feed queries order by created_at and filter on is_approved.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_created_at")
                    .table(Posts::Table)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_is_approved")
                    .table(Posts::Table)
                    .col(Posts::IsApproved)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_post_id")
                    .table(Complaints::Table)
                    .col(Complaints::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_comment_id")
                    .table(Complaints::Table)
                    .col(Complaints::CommentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_paragraphs_post_position")
                    .table(Paragraphs::Table)
                    .col(Paragraphs::PostId)
                    .col(Paragraphs::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_paragraphs_post_position").table(Paragraphs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_complaints_comment_id").table(Complaints::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_complaints_post_id").table(Complaints::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_posts_is_approved").table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_posts_created_at").table(Posts::Table).to_owned())
            .await
    }
}
