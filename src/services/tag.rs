use crate::{
    error::{AppError, AppResult},
    models::{place_tag, tag, PlaceTag, Tag, TagModel},
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Statement,
};
use uuid::Uuid;

/// Trim, drop blanks, and collapse duplicates while preserving first-seen
/// order. Tag names are matched exactly (case-sensitive).
pub fn normalize_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if seen.iter().any(|s: &String| s == name) {
            continue;
        }
        seen.push(name.to_string());
    }
    seen
}

/// Find a tag by exact name, creating it if missing. Runs on any connection
/// so callers can keep it inside their transaction.
///
/// Concurrent creators race on the unique name index: the insert is
/// ON CONFLICT DO NOTHING and the re-select returns whichever row won.
pub async fn find_or_create_tag<C: ConnectionTrait>(conn: &C, name: &str) -> AppResult<TagModel> {
    if let Some(existing) = Tag::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    conn.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        vec![Uuid::new_v4().into(), name.into()],
    ))
    .await?;

    Tag::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or(AppError::Internal(anyhow::anyhow!(
            "tag missing after upsert"
        )))
}

pub struct TagService {
    db: DatabaseConnection,
}

impl TagService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_for_place(&self, place_id: Uuid) -> AppResult<Vec<TagModel>> {
        let tag_ids: Vec<Uuid> = PlaceTag::find()
            .filter(place_tag::Column::PlaceId.eq(place_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|pt| pt.tag_id)
            .collect();

        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags = Tag::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_blanks_and_duplicates() {
        let input = vec![
            "  hiking ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "food".to_string(),
            "hiking".to_string(),
        ];
        assert_eq!(normalize_tag_names(&input), vec!["hiking", "food"]);
    }

    #[test]
    fn normalize_is_case_sensitive() {
        let input = vec!["Hiking".to_string(), "hiking".to_string()];
        assert_eq!(normalize_tag_names(&input), vec!["Hiking", "hiking"]);
    }

    #[test]
    fn normalize_empty_input() {
        assert!(normalize_tag_names(&[]).is_empty());
    }
}
