use crate::{
    error::{AppError, AppResult},
    models::{
        comment, complaint, post, user, Comment, Complaint, ComplaintModel, ComplaintStatus,
        ComplaintType, Post, User, UserModel,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QuerySelect, Set, SqlErr, Statement, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// What a complaint points at. Persisted as a discriminator plus two
/// nullable foreign keys; comment complaints also store the owning post id
/// so post deletion sweeps them in one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComplaintTarget {
    Post(Uuid),
    Comment(i32),
}

/// Moderator queue row: the complaint plus enough context to act on it
/// without loading the target separately.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct ComplaintListItem {
    pub id: Uuid,
    pub user_id: i32,
    pub target_type: ComplaintType,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<i32>,
    pub reason: String,
    pub status: ComplaintStatus,
    pub created_at: chrono::NaiveDateTime,
    pub target_snippet: String,
    pub author_username: String,
    pub open_count: i64,
    pub target_is_approved: bool,
}

#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct UserComplaintSummary {
    pub user_id: i32,
    pub username: String,
    pub is_blocked: bool,
    pub open_count: i64,
    pub resolved_count: i64,
    pub rejected_count: i64,
}

/// First `max` characters of a snapshot shown in the moderation queue.
pub fn snippet(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

pub struct ModerationService {
    db: DatabaseConnection,
}

impl ModerationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// File a complaint. The target must exist, and a reporter gets at most
    /// one OPEN complaint per target; filing again while one is open is a
    /// Conflict. Reporting never hides the target by itself.
    pub async fn report(
        &self,
        user_id: i32,
        target: ComplaintTarget,
        reason: &str,
    ) -> AppResult<ComplaintModel> {
        let (target_type, post_id, comment_id) = match target {
            ComplaintTarget::Post(id) => {
                Post::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound)?;
                (ComplaintType::Post, Some(id), None)
            }
            ComplaintTarget::Comment(id) => {
                let comment = Comment::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(AppError::NotFound)?;
                (ComplaintType::Comment, Some(comment.post_id), Some(id))
            }
        };

        let mut dedup = Complaint::find()
            .filter(complaint::Column::UserId.eq(user_id))
            .filter(complaint::Column::TargetType.eq(target_type))
            .filter(
                complaint::Column::Status
                    .is_in([ComplaintStatus::New, ComplaintStatus::Processing]),
            );
        dedup = match target {
            ComplaintTarget::Post(id) => dedup.filter(complaint::Column::PostId.eq(id)),
            ComplaintTarget::Comment(id) => dedup.filter(complaint::Column::CommentId.eq(id)),
        };
        if dedup.one(&self.db).await?.is_some() {
            return Err(AppError::Conflict(
                "You already have an open complaint for this target".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let insert = complaint::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            target_type: Set(target_type),
            post_id: Set(post_id),
            comment_id: Set(comment_id),
            reason: Set(reason.to_string()),
            status: Set(ComplaintStatus::New),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;
        match insert {
            Ok(created) => Ok(created),
            // Partial unique indexes on open complaints catch the race the
            // pre-check misses, same as the likes pair index.
            Err(err) => Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                    "You already have an open complaint for this target".to_string(),
                ),
                _ => AppError::Database(err),
            }),
        }
    }

    /// Open complaints across both target kinds, newest first, annotated
    /// with a target snapshot, the target author, how many open complaints
    /// the same target has collected, and its current visibility.
    pub async fn list_complaints(&self) -> AppResult<Vec<ComplaintListItem>> {
        let post_sql = "SELECT c.id, c.user_id, c.target_type, c.post_id, c.comment_id, \
                c.reason, c.status, c.created_at, \
                p.title AS target_snippet, u.username AS author_username, \
                p.is_approved AS target_is_approved, \
                (SELECT COUNT(*) FROM complaints c2 \
                 WHERE c2.target_type = 'POST' AND c2.post_id = c.post_id \
                 AND c2.status IN ('NEW', 'PROCESSING')) AS open_count \
             FROM complaints c \
             JOIN posts p ON p.id = c.post_id \
             JOIN users u ON u.id = p.user_id \
             WHERE c.target_type = 'POST' AND c.status IN ('NEW', 'PROCESSING')";

        let comment_sql = "SELECT c.id, c.user_id, c.target_type, c.post_id, c.comment_id, \
                c.reason, c.status, c.created_at, \
                cm.content AS target_snippet, u.username AS author_username, \
                cm.is_approved AS target_is_approved, \
                (SELECT COUNT(*) FROM complaints c2 \
                 WHERE c2.target_type = 'COMMENT' AND c2.comment_id = c.comment_id \
                 AND c2.status IN ('NEW', 'PROCESSING')) AS open_count \
             FROM complaints c \
             JOIN comments cm ON cm.id = c.comment_id \
             JOIN users u ON u.id = cm.user_id \
             WHERE c.target_type = 'COMMENT' AND c.status IN ('NEW', 'PROCESSING')";

        let mut items = ComplaintListItem::find_by_statement(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            post_sql,
        ))
        .all(&self.db)
        .await?;
        let comment_items = ComplaintListItem::find_by_statement(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            comment_sql,
        ))
        .all(&self.db)
        .await?;

        items.extend(comment_items);
        for item in &mut items {
            item.target_snippet = snippet(&item.target_snippet, 100);
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Move a complaint through the state machine: NEW to PROCESSING, or
    /// either open state to RESOLVED or REJECTED. Everything else, including
    /// moving back to NEW or out of a terminal state, is a Conflict.
    pub async fn update_status(
        &self,
        complaint_id: Uuid,
        status: ComplaintStatus,
    ) -> AppResult<ComplaintModel> {
        let existing = Complaint::find_by_id(complaint_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        if existing.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Complaint is already {}",
                existing.status
            )));
        }
        let allowed = matches!(
            (existing.status, status),
            (ComplaintStatus::New, ComplaintStatus::Processing)
                | (
                    ComplaintStatus::New | ComplaintStatus::Processing,
                    ComplaintStatus::Resolved | ComplaintStatus::Rejected,
                )
        );
        if !allowed {
            return Err(AppError::Conflict(format!(
                "Cannot move complaint from {} to {}",
                existing.status, status
            )));
        }

        let mut active: complaint::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Show or hide a post. Hiding resolves every open complaint against the
    /// post in the same transaction, so the queue and the visibility flag
    /// never disagree.
    pub async fn toggle_post_visibility(&self, post_id: Uuid, approved: bool) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let existing = Post::find_by_id(post_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let mut active: post::ActiveModel = existing.into();
        active.is_approved = Set(approved);
        active.update(&txn).await?;

        if !approved {
            txn.execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE complaints SET status = 'RESOLVED', updated_at = NOW() \
                 WHERE target_type = 'POST' AND post_id = $1 \
                 AND status IN ('NEW', 'PROCESSING')",
                vec![post_id.into()],
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn toggle_comment_visibility(&self, comment_id: i32, approved: bool) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let existing = Comment::find_by_id(comment_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let mut active: comment::ActiveModel = existing.into();
        active.is_approved = Set(approved);
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        active.update(&txn).await?;

        if !approved {
            txn.execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE complaints SET status = 'RESOLVED', updated_at = NOW() \
                 WHERE target_type = 'COMMENT' AND comment_id = $1 \
                 AND status IN ('NEW', 'PROCESSING')",
                vec![comment_id.into()],
            ))
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn block_user(&self, actor_id: i32, target_id: i32) -> AppResult<UserModel> {
        let target = self.moderation_target(actor_id, target_id).await?;
        if target.is_moderator() {
            return Err(AppError::Forbidden);
        }
        if target.is_blocked {
            return Err(AppError::Conflict("User is already blocked".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.is_blocked = Set(true);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn unblock_user(&self, actor_id: i32, target_id: i32) -> AppResult<UserModel> {
        let target = self.moderation_target(actor_id, target_id).await?;
        if !target.is_blocked {
            return Err(AppError::Conflict("User is not blocked".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.is_blocked = Set(false);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn assign_moderator(&self, actor_id: i32, target_id: i32) -> AppResult<UserModel> {
        let target = self.moderation_target(actor_id, target_id).await?;
        if target.is_blocked {
            return Err(AppError::Conflict(
                "Cannot assign a blocked user as moderator".to_string(),
            ));
        }
        if target.is_moderator() {
            return Err(AppError::Conflict("User is already a moderator".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.role_id = Set(user::ROLE_MODERATOR);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn remove_moderator(&self, actor_id: i32, target_id: i32) -> AppResult<UserModel> {
        let target = self.moderation_target(actor_id, target_id).await?;
        if !target.is_moderator() {
            return Err(AppError::Conflict("User is not a moderator".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.role_id = Set(user::ROLE_MEMBER);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Authors whose content has drawn complaints, with per-status tallies.
    pub async fn users_with_complaints(&self) -> AppResult<Vec<UserComplaintSummary>> {
        let sql = "SELECT u.id AS user_id, u.username, u.is_blocked, \
                COUNT(*) FILTER (WHERE c.status IN ('NEW', 'PROCESSING')) AS open_count, \
                COUNT(*) FILTER (WHERE c.status = 'RESOLVED') AS resolved_count, \
                COUNT(*) FILTER (WHERE c.status = 'REJECTED') AS rejected_count \
             FROM complaints c \
             LEFT JOIN posts p ON c.target_type = 'POST' AND p.id = c.post_id \
             LEFT JOIN comments cm ON c.target_type = 'COMMENT' AND cm.id = c.comment_id \
             JOIN users u ON u.id = COALESCE(cm.user_id, p.user_id) \
             GROUP BY u.id, u.username, u.is_blocked \
             ORDER BY open_count DESC, u.id ASC";

        let rows = UserComplaintSummary::find_by_statement(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            sql,
        ))
        .all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Username/email substring search for the moderator console. The actor
    /// is excluded so the console never offers self-moderation.
    pub async fn search_users(&self, actor_id: i32, query: &str) -> AppResult<Vec<UserModel>> {
        let users = User::find()
            .filter(user::Column::Id.ne(actor_id))
            .filter(
                Condition::any()
                    .add(user::Column::Username.contains(query))
                    .add(user::Column::Email.contains(query)),
            )
            .limit(50)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Shared guard for user-directed moderation: the target must exist and
    /// must not be the acting moderator.
    async fn moderation_target(&self, actor_id: i32, target_id: i32) -> AppResult<UserModel> {
        if actor_id == target_id {
            return Err(AppError::Validation(
                "Cannot run moderation actions on yourself".to_string(),
            ));
        }
        User::find_by_id(target_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_leaves_short_text_alone() {
        assert_eq!(snippet("short", 100), "short");
    }

    #[test]
    fn snippet_truncates_at_char_boundary() {
        let long: String = "я".repeat(150);
        let cut = snippet(&long, 100);
        assert_eq!(cut.chars().count(), 100);
    }

    #[test]
    fn snippet_exact_length_untouched() {
        let text: String = "a".repeat(100);
        assert_eq!(snippet(&text, 100), text);
    }
}
