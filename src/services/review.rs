use crate::{
    error::{AppError, AppResult},
    models::{place, review, Place, Post, Review, ReviewModel},
    services::post::PlacePayload,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, Set, SqlErr, Statement, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub struct ReviewPayload {
    pub rating: i32,
    pub content: String,
    pub is_public: bool,
}

/// Partial update; None leaves the field as it is.
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

/// Review row joined with its author and place for listings.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct ReviewListItem {
    pub id: Uuid,
    pub user_id: i32,
    pub place_id: Uuid,
    pub rating: i32,
    pub content: String,
    pub is_public: bool,
    pub created_at: chrono::NaiveDateTime,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub place_name: String,
}

pub struct ReviewService {
    db: DatabaseConnection,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rate an existing place. One review per user per place: a second
    /// submit is a Conflict, with the (user_id, place_id) unique index
    /// catching the race the pre-check misses.
    pub async fn create(
        &self,
        user_id: i32,
        place_id: Uuid,
        payload: ReviewPayload,
    ) -> AppResult<ReviewModel> {
        Place::find_by_id(place_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let already = Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::PlaceId.eq(place_id))
            .one(&self.db)
            .await?;
        if already.is_some() {
            return Err(AppError::Conflict(
                "You have already reviewed this place".to_string(),
            ));
        }

        insert_review(&self.db, user_id, place_id, &payload).await
    }

    /// Review a place that is not in the catalogue yet: create the Place and
    /// the review in one transaction. When `post_id` is given the review
    /// attaches to that post's place instead and no Place row is created.
    pub async fn create_with_place(
        &self,
        user_id: i32,
        place: PlacePayload,
        payload: ReviewPayload,
        post_id: Option<Uuid>,
    ) -> AppResult<ReviewModel> {
        let txn = self.db.begin().await?;

        let place_id = match post_id {
            Some(post_id) => {
                let post = Post::find_by_id(post_id)
                    .one(&txn)
                    .await?
                    .ok_or(AppError::NotFound)?;
                post.place_id
            }
            None => {
                let place_id = Uuid::new_v4();
                place::ActiveModel {
                    id: Set(place_id),
                    name: Set(place.name.clone()),
                    description: Set(place.description.clone()),
                    latitude: Set(place.latitude),
                    longitude: Set(place.longitude),
                    created_at: Set(chrono::Utc::now().naive_utc()),
                }
                .insert(&txn)
                .await?;
                place_id
            }
        };

        let created = insert_review(&txn, user_id, place_id, &payload).await?;
        txn.commit().await?;
        Ok(created)
    }

    /// Author's own reviews, private ones included, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ReviewListItem>> {
        let sql = "SELECT r.id, r.user_id, r.place_id, r.rating, r.content, r.is_public, \
                r.created_at, u.username AS author_username, u.avatar_url AS author_avatar, \
                p.name AS place_name \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             JOIN places p ON p.id = r.place_id \
             WHERE r.user_id = $1 \
             ORDER BY r.created_at DESC, r.id";

        let rows = ReviewListItem::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            sql,
            vec![user_id.into()],
        ))
        .all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Public reviews of a place, newest first.
    pub async fn list_for_place(&self, place_id: Uuid) -> AppResult<Vec<ReviewListItem>> {
        let sql = "SELECT r.id, r.user_id, r.place_id, r.rating, r.content, r.is_public, \
                r.created_at, u.username AS author_username, u.avatar_url AS author_avatar, \
                p.name AS place_name \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             JOIN places p ON p.id = r.place_id \
             WHERE r.place_id = $1 AND r.is_public = TRUE \
             ORDER BY r.created_at DESC, r.id";

        let rows = ReviewListItem::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            sql,
            vec![place_id.into()],
        ))
        .all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Ownership folded into the lookup: someone else's review reads as
    /// NotFound.
    pub async fn update(
        &self,
        user_id: i32,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> AppResult<ReviewModel> {
        let existing = self.owned(user_id, review_id).await?;

        let mut active: review::ActiveModel = existing.into();
        if let Some(rating) = patch.rating {
            active.rating = Set(rating);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(is_public) = patch.is_public {
            active.is_public = Set(is_public);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, user_id: i32, review_id: Uuid) -> AppResult<()> {
        let existing = self.owned(user_id, review_id).await?;
        Review::delete_by_id(existing.id).exec(&self.db).await?;
        Ok(())
    }

    async fn owned(&self, user_id: i32, review_id: Uuid) -> AppResult<ReviewModel> {
        Review::find_by_id(review_id)
            .filter(review::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

async fn insert_review<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    place_id: Uuid,
    payload: &ReviewPayload,
) -> AppResult<ReviewModel> {
    let now = chrono::Utc::now().naive_utc();
    let insert = review::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        place_id: Set(place_id),
        rating: Set(payload.rating),
        content: Set(payload.content.clone()),
        is_public: Set(payload.is_public),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await;
    match insert {
        Ok(created) => Ok(created),
        Err(err) => Err(match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("You have already reviewed this place".to_string())
            }
            _ => AppError::Database(err),
        }),
    }
}
