use crate::{
    error::{AppError, AppResult},
    models::{follow, user, Follow, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

pub struct FollowService {
    db: DatabaseConnection,
}

impl FollowService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn follow(&self, follower_id: i32, followed_id: i32) -> AppResult<()> {
        if follower_id == followed_id {
            return Err(AppError::Validation("Cannot follow yourself".to_string()));
        }
        User::find_by_id(followed_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let insert = follow::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(_) => Ok(()),
            Err(err) => Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Already following this user".to_string())
                }
                _ => AppError::Database(err),
            }),
        }
    }

    pub async fn unfollow(&self, follower_id: i32, followed_id: i32) -> AppResult<()> {
        let deleted = Follow::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .exec(&self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn followers(&self, user_id: i32) -> AppResult<Vec<UserModel>> {
        let follower_ids: Vec<i32> = Follow::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| f.follower_id)
            .collect();

        if follower_ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = User::find()
            .filter(user::Column::Id.is_in(follower_ids))
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn following(&self, user_id: i32) -> AppResult<Vec<UserModel>> {
        let followed_ids: Vec<i32> = Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| f.followed_id)
            .collect();

        if followed_ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = User::find()
            .filter(user::Column::Id.is_in(followed_ids))
            .all(&self.db)
            .await?;
        Ok(users)
    }
}
