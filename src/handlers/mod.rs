pub mod comment;
pub mod favourite;
pub mod follow;
pub mod like;
pub mod moderation;
pub mod post;
pub mod profile;
pub mod review;
