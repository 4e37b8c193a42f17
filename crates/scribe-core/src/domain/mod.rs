//! Domain entities and value objects - the core business objects.

mod ids;
mod post;
mod status;
mod tag;
mod user;
mod value_objects;

pub use ids::{PostId, TagId, UserId};
pub use post::{MAX_TAGS_PER_POST, Post, PostRecord};
pub use status::PostStatus;
pub use tag::Tag;
pub use user::User;
pub use value_objects::{
    MAX_CONTENT_LENGTH, MAX_ESCAPED_TITLE_LENGTH, MAX_TAG_NAME_LENGTH, MAX_TITLE_LENGTH,
    PostContent, PostTitle, TagName,
};
