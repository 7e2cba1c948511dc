use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// What kind of content a complaint targets.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintType {
    #[sea_orm(string_value = "POST")]
    Post,
    #[sea_orm(string_value = "COMMENT")]
    Comment,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "PROCESSING")]
    Processing,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ComplaintStatus {
    /// NEW and PROCESSING complaints still need moderator attention.
    pub fn is_open(self) -> bool {
        matches!(self, Self::New | Self::Processing)
    }

    /// RESOLVED and REJECTED are final; no transition out is exposed.
    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Resolved => "RESOLVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "RESOLVED" => Ok(Self::Resolved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The reporting user.
    pub user_id: i32,
    pub target_type: ComplaintType,
    /// Set for post complaints, and for comment complaints it carries the
    /// owning post so post deletion can sweep both kinds in one pass.
    pub post_id: Option<Uuid>,
    pub comment_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id"
    )]
    Comment,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_statuses() {
        assert!(ComplaintStatus::New.is_open());
        assert!(ComplaintStatus::Processing.is_open());
        assert!(!ComplaintStatus::Resolved.is_open());
        assert!(!ComplaintStatus::Rejected.is_open());
    }

    #[test]
    fn parse_valid_statuses() {
        assert_eq!("NEW".parse(), Ok(ComplaintStatus::New));
        assert_eq!("PROCESSING".parse(), Ok(ComplaintStatus::Processing));
        assert_eq!("RESOLVED".parse(), Ok(ComplaintStatus::Resolved));
        assert_eq!("REJECTED".parse(), Ok(ComplaintStatus::Rejected));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!("OPEN".parse::<ComplaintStatus>().is_err());
        assert!("new".parse::<ComplaintStatus>().is_err());
        assert!("".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for status in [
            ComplaintStatus::New,
            ComplaintStatus::Processing,
            ComplaintStatus::Resolved,
            ComplaintStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse(), Ok(status));
        }
    }
}
