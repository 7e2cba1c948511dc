use sea_orm_migration::prelude::*;

mod m20250201_000001_create_users_table;
mod m20250201_000002_create_places_table;
mod m20250201_000003_create_posts_table;
mod m20250201_000004_create_paragraphs_table;
mod m20250201_000005_create_photos_table;
mod m20250201_000006_create_tags_tables;
mod m20250201_000007_create_likes_table;
mod m20250201_000008_create_comments_table;
mod m20250201_000009_create_favourites_table;
mod m20250201_000010_create_complaints_table;
mod m20250201_000011_create_follows_table;
mod m20250201_000012_add_performance_indexes;
mod m20250201_000013_create_reviews_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250201_000001_create_users_table::Migration),
            Box::new(m20250201_000002_create_places_table::Migration),
            Box::new(m20250201_000003_create_posts_table::Migration),
            Box::new(m20250201_000004_create_paragraphs_table::Migration),
            Box::new(m20250201_000005_create_photos_table::Migration),
            Box::new(m20250201_000006_create_tags_tables::Migration),
            Box::new(m20250201_000007_create_likes_table::Migration),
            Box::new(m20250201_000008_create_comments_table::Migration),
            Box::new(m20250201_000009_create_favourites_table::Migration),
            Box::new(m20250201_000010_create_complaints_table::Migration),
            Box::new(m20250201_000011_create_follows_table::Migration),
            Box::new(m20250201_000012_add_performance_indexes::Migration),
            Box::new(m20250201_000013_create_reviews_table::Migration),
        ]
    }
}
