use crate::{
    error::{AppError, AppResult},
    models::{favourite, Favourite, Post, PostModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

/// Same uniqueness contract as likes, but favourites feed a private list
/// instead of a public counter.
pub struct FavouriteService {
    db: DatabaseConnection,
}

impl FavouriteService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn add(&self, user_id: i32, post_id: Uuid) -> AppResult<()> {
        Post::find_by_id(post_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let insert = favourite::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(_) => Ok(()),
            Err(err) => Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Post already in favourites".to_string())
                }
                _ => AppError::Database(err),
            }),
        }
    }

    pub async fn remove(&self, user_id: i32, post_id: Uuid) -> AppResult<()> {
        let deleted = Favourite::delete_many()
            .filter(favourite::Column::UserId.eq(user_id))
            .filter(favourite::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn contains(&self, user_id: i32, post_id: Uuid) -> AppResult<bool> {
        let found = Favourite::find()
            .filter(favourite::Column::UserId.eq(user_id))
            .filter(favourite::Column::PostId.eq(post_id))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    /// The user's favourites with the post rows joined in, newest first.
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<PostModel>> {
        let rows = Favourite::find()
            .filter(favourite::Column::UserId.eq(user_id))
            .order_by_desc(favourite::Column::CreatedAt)
            .find_also_related(Post)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, post)| post).collect())
    }
}
