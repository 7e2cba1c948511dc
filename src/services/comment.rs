use crate::{
    error::{AppError, AppResult},
    models::{comment, Comment, CommentModel, Post},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        post_id: Uuid,
        parent_id: Option<i32>,
        content: &str,
    ) -> AppResult<CommentModel> {
        Post::find_by_id(post_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(parent_id) = parent_id {
            let parent = Comment::find_by_id(parent_id)
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound)?;
            if parent.post_id != post_id {
                return Err(AppError::Validation(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let created = comment::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
            parent_id: Set(parent_id),
            content: Set(content.to_string()),
            is_approved: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(created)
    }

    /// Approved comments for a post, oldest first. Soft-deleted comments are
    /// filtered out but stay in the table so replies keep a valid parent_id.
    pub async fn list_for_post(&self, post_id: Uuid) -> AppResult<Vec<CommentModel>> {
        let comments = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::IsApproved.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(comments)
    }

    pub async fn update(&self, user_id: i32, id: i32, content: &str) -> AppResult<CommentModel> {
        let existing = self.owned(id, user_id).await?;

        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Author-initiated removal is a soft delete so threaded replies keep
    /// their parent. Only post deletion removes comment rows for good.
    pub async fn delete(&self, user_id: i32, id: i32) -> AppResult<()> {
        let existing = self.owned(id, user_id).await?;

        let mut active: comment::ActiveModel = existing.into();
        active.is_approved = Set(false);
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn owned(&self, id: i32, user_id: i32) -> AppResult<CommentModel> {
        Comment::find_by_id(id)
            .filter(comment::Column::UserId.eq(user_id))
            .filter(comment::Column::IsApproved.eq(true))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}
