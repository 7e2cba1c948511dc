pub mod comment;
pub mod favourite;
pub mod follow;
pub mod like;
pub mod moderation;
pub mod post;
pub mod profile;
pub mod review;
pub mod tag;

pub use comment::CommentService;
pub use favourite::FavouriteService;
pub use follow::FollowService;
pub use like::LikeService;
pub use moderation::{ComplaintTarget, ModerationService};
pub use post::PostService;
pub use profile::ProfileService;
pub use review::ReviewService;
pub use tag::TagService;
