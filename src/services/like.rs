use crate::{
    error::{AppError, AppResult},
    models::{like, Like, Post},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, SqlErr, Statement, TransactionTrait,
};
use uuid::Uuid;

pub struct LikeService {
    db: DatabaseConnection,
}

impl LikeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a like and bump the post's denormalized counter in the same
    /// transaction. A second like by the same user is a Conflict; the
    /// (user_id, post_id) unique index catches the race the pre-check misses.
    pub async fn like(&self, user_id: i32, post_id: Uuid) -> AppResult<()> {
        Post::find_by_id(post_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let already = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(&self.db)
            .await?;
        if already.is_some() {
            return Err(AppError::Conflict("Post already liked".to_string()));
        }

        let txn = self.db.begin().await?;

        let insert = like::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        if let Err(err) = insert {
            return Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Post already liked".to_string())
                }
                _ => AppError::Database(err),
            });
        }

        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE posts SET likes_count = likes_count + 1 WHERE id = $1",
            vec![post_id.into()],
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Remove a like and decrement the counter, floored at zero. Deleting a
    /// like that does not exist is NotFound and leaves the counter untouched.
    pub async fn unlike(&self, user_id: i32, post_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let deleted = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE posts SET likes_count = GREATEST(likes_count - 1, 0) WHERE id = $1",
            vec![post_id.into()],
        ))
        .await?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn has_liked(&self, user_id: i32, post_id: Uuid) -> AppResult<bool> {
        let found = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn count(&self, post_id: Uuid) -> AppResult<u64> {
        let count = Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
