pub mod comment;
pub mod complaint;
pub mod favourite;
pub mod follow;
pub mod like;
pub mod paragraph;
pub mod photo;
pub mod place;
pub mod place_tag;
pub mod post;
pub mod review;
pub mod tag;
pub mod user;

pub use comment::{Entity as Comment, Model as CommentModel};
pub use complaint::{
    ComplaintStatus, ComplaintType, Entity as Complaint, Model as ComplaintModel,
};
pub use favourite::Entity as Favourite;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use paragraph::{Entity as Paragraph, Model as ParagraphModel};
pub use photo::{Entity as Photo, Model as PhotoModel};
pub use place::{Entity as Place, Model as PlaceModel};
#[allow(unused_imports)]
pub use place_tag::Entity as PlaceTag;
pub use post::{Entity as Post, Model as PostModel};
pub use review::{Entity as Review, Model as ReviewModel};
pub use tag::{Entity as Tag, Model as TagModel};
pub use user::{Entity as User, Model as UserModel};
