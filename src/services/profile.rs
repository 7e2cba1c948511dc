use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

/// Partial profile update; None leaves the field alone, an empty string
/// clears an optional field.
pub struct ProfilePatch {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct ProfileService {
    db: DatabaseConnection,
}

impl ProfileService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i32) -> AppResult<UserModel> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Username changes go through a uniqueness pre-check; the column's
    /// unique key catches the race and maps to the same Conflict.
    pub async fn update(&self, user_id: i32, patch: ProfilePatch) -> AppResult<UserModel> {
        let existing = self.get(user_id).await?;

        if let Some(username) = &patch.username {
            if *username != existing.username {
                let taken = User::find()
                    .filter(user::Column::Username.eq(username.clone()))
                    .one(&self.db)
                    .await?;
                if taken.is_some() {
                    return Err(AppError::Conflict("Username is already taken".to_string()));
                }
            }
        }

        let mut active: user::ActiveModel = existing.into();
        if let Some(username) = patch.username {
            active.username = Set(username);
        }
        if let Some(bio) = patch.bio {
            active.bio = Set(if bio.is_empty() { None } else { Some(bio) });
        }
        if let Some(avatar_url) = patch.avatar_url {
            active.avatar_url = Set(if avatar_url.is_empty() {
                None
            } else {
                Some(avatar_url)
            });
        }
        match active.update(&self.db).await {
            Ok(updated) => Ok(updated),
            Err(err) => Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Username is already taken".to_string())
                }
                _ => AppError::Database(err),
            }),
        }
    }
}
