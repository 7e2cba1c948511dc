use crate::{
    error::{AppError, AppResult},
    models::{
        complaint, favourite, like, paragraph, photo, place, place_tag, post, Comment, Complaint,
        Favourite, Like, Paragraph, ParagraphModel, Photo, PhotoModel, Place, PlaceModel,
        PlaceTag, Post, PostModel, TagModel,
    },
    services::tag::{find_or_create_tag, normalize_tag_names},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub struct PlacePayload {
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

pub struct ParagraphPayload {
    pub position: i32,
    pub content: String,
}

pub struct PhotoPayload {
    pub url: String,
    pub position: i32,
}

/// Everything a post is made of. Create and update take the same shape;
/// update replaces children wholesale rather than merging.
pub struct PostPayload {
    pub title: String,
    pub place: PlacePayload,
    pub tags: Vec<String>,
    pub paragraphs: Vec<ParagraphPayload>,
    pub photos: Vec<PhotoPayload>,
}

#[derive(Serialize, ToSchema)]
pub struct PostDetail {
    pub post: PostModel,
    pub place: PlaceModel,
    pub paragraphs: Vec<ParagraphModel>,
    pub photos: Vec<PhotoModel>,
    pub tags: Vec<TagModel>,
}

pub struct PostService {
    db: DatabaseConnection,
}

impl PostService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert the full post aggregate in one transaction: a fresh Place, the
    /// Post row, ordered paragraphs, photos, and find-or-create tags linked
    /// through place_tags. Returns the new post id.
    pub async fn create(&self, user_id: i32, payload: PostPayload) -> AppResult<Uuid> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let place_id = Uuid::new_v4();
        place::ActiveModel {
            id: Set(place_id),
            name: Set(payload.place.name.clone()),
            description: Set(payload.place.description.clone()),
            latitude: Set(payload.place.latitude),
            longitude: Set(payload.place.longitude),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let post_id = Uuid::new_v4();
        post::ActiveModel {
            id: Set(post_id),
            user_id: Set(user_id),
            place_id: Set(place_id),
            title: Set(payload.title.clone()),
            is_approved: Set(true),
            likes_count: Set(0),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        insert_children(&txn, post_id, place_id, &payload).await?;

        txn.commit().await?;
        Ok(post_id)
    }

    /// Full-replace update. Ownership is folded into the lookup: a post that
    /// exists but belongs to someone else reads as NotFound.
    pub async fn update(&self, user_id: i32, post_id: Uuid, payload: PostPayload) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = owned_post(&txn, post_id, user_id).await?;
        let place_id = existing.place_id;

        let mut active: post::ActiveModel = existing.into();
        active.title = Set(payload.title.clone());
        active.update(&txn).await?;

        let place = Place::find_by_id(place_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let mut place_active: place::ActiveModel = place.into();
        place_active.name = Set(payload.place.name.clone());
        place_active.description = Set(payload.place.description.clone());
        place_active.latitude = Set(payload.place.latitude);
        place_active.longitude = Set(payload.place.longitude);
        place_active.update(&txn).await?;

        Paragraph::delete_many()
            .filter(paragraph::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Photo::delete_many()
            .filter(photo::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        PlaceTag::delete_many()
            .filter(place_tag::Column::PlaceId.eq(place_id))
            .exec(&txn)
            .await?;

        insert_children(&txn, post_id, place_id, &payload).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Delete the aggregate, children first, then garbage-collect the Place
    /// if this was its last referencing post. The Place row is locked so the
    /// reference count cannot race against attach_to_place.
    pub async fn delete(&self, user_id: i32, post_id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = owned_post(&txn, post_id, user_id).await?;
        let place_id = existing.place_id;

        Like::delete_many()
            .filter(like::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        // Comment complaints carry the owning post id, so one filter sweeps
        // complaints against the post and against its comments.
        Complaint::delete_many()
            .filter(complaint::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Comment::delete_many()
            .filter(crate::models::comment::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Favourite::delete_many()
            .filter(favourite::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Paragraph::delete_many()
            .filter(paragraph::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Photo::delete_many()
            .filter(photo::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        PlaceTag::delete_many()
            .filter(place_tag::Column::PlaceId.eq(place_id))
            .exec(&txn)
            .await?;
        Post::delete_by_id(post_id).exec(&txn).await?;

        let place = Place::find_by_id(place_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        if place.is_some() {
            let remaining = Post::find()
                .filter(post::Column::PlaceId.eq(place_id))
                .count(&txn)
                .await?;
            if remaining == 0 {
                Place::delete_by_id(place_id).exec(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    /// Repoint a post at an existing place, optionally refreshing the
    /// place's coordinates. The target Place is locked to serialize against
    /// delete's orphan collection.
    pub async fn attach_to_place(
        &self,
        user_id: i32,
        post_id: Uuid,
        place_id: Uuid,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = owned_post(&txn, post_id, user_id).await?;

        let place = Place::find_by_id(place_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: post::ActiveModel = existing.into();
        active.place_id = Set(place_id);
        active.update(&txn).await?;

        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            let mut place_active: place::ActiveModel = place.into();
            place_active.latitude = Set(lat);
            place_active.longitude = Set(lon);
            place_active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn get(&self, post_id: Uuid) -> AppResult<PostDetail> {
        let post = Post::find_by_id(post_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        let place = Place::find_by_id(post.place_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let paragraphs = Paragraph::find()
            .filter(paragraph::Column::PostId.eq(post_id))
            .order_by_asc(paragraph::Column::Position)
            .order_by_asc(paragraph::Column::Id)
            .all(&self.db)
            .await?;
        let photos = Photo::find()
            .filter(photo::Column::PostId.eq(post_id))
            .order_by_asc(photo::Column::Position)
            .all(&self.db)
            .await?;

        let tags = crate::services::TagService::new(self.db.clone())
            .list_for_place(place.id)
            .await?;

        Ok(PostDetail {
            post,
            place,
            paragraphs,
            photos,
            tags,
        })
    }

    pub async fn list_by_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<PostModel>, u64)> {
        let paginator = Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((posts, total))
    }

    /// Public feed: approved posts only, newest first.
    pub async fn feed(&self, page: u64, per_page: u64) -> AppResult<(Vec<PostModel>, u64)> {
        let paginator = Post::find()
            .filter(post::Column::IsApproved.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((posts, total))
    }
}

/// Look up a post by id AND owner. A miss for either reason is NotFound;
/// existence is never leaked to non-owners as Forbidden.
async fn owned_post<C: ConnectionTrait>(
    conn: &C,
    post_id: Uuid,
    user_id: i32,
) -> AppResult<PostModel> {
    Post::find_by_id(post_id)
        .filter(post::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Shared tail of create and update: paragraphs, photos, and tag links for
/// an already-persisted (post, place) pair. Caller owns the transaction.
async fn insert_children(
    txn: &DatabaseTransaction,
    post_id: Uuid,
    place_id: Uuid,
    payload: &PostPayload,
) -> AppResult<()> {
    for p in &payload.paragraphs {
        paragraph::ActiveModel {
            post_id: Set(post_id),
            position: Set(p.position),
            content: Set(p.content.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    for ph in &payload.photos {
        photo::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
            url: Set(ph.url.clone()),
            position: Set(ph.position),
            is_approved: Set(true),
        }
        .insert(txn)
        .await?;
    }

    for name in normalize_tag_names(&payload.tags) {
        let tag = find_or_create_tag(txn, &name).await?;
        // The (place_id, tag_id) unique index absorbs links that already
        // exist from an earlier revision of the post.
        txn.execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO place_tags (id, place_id, tag_id) VALUES ($1, $2, $3) \
             ON CONFLICT (place_id, tag_id) DO NOTHING",
            vec![Uuid::new_v4().into(), place_id.into(), tag.id.into()],
        ))
        .await?;
    }

    Ok(())
}
