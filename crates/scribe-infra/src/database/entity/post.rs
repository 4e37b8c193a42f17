//! Post entity for SeaORM.
//!
//! The title column holds the HTML-escaped form; status is stored as its
//! lowercase name.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use scribe_core::domain::{Post, PostContent, PostRecord, PostStatus, PostTitle, TagName};
use scribe_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub first_published_at: Option<DateTimeWithTimeZone>,
    pub content_updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rebuild the aggregate from a row and its ordered tag names.
    pub fn into_domain(self, tags: Vec<TagName>) -> Result<Post, RepoError> {
        let id = self.id;
        let corrupt = |err: scribe_core::DomainError| {
            RepoError::Query(format!("stored post {id} is invalid: {err}"))
        };

        Post::restore(PostRecord {
            id: self.id.into(),
            user_id: self.user_id.into(),
            title: PostTitle::from_escaped(self.title).map_err(corrupt)?,
            content: PostContent::new(self.content).map_err(corrupt)?,
            status: PostStatus::parse(&self.status).map_err(corrupt)?,
            tags,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            first_published_at: self.first_published_at.map(Into::into),
            content_updated_at: self.content_updated_at.map(Into::into),
        })
        .map_err(corrupt)
    }
}

impl From<&Post> for ActiveModel {
    fn from(post: &Post) -> Self {
        Self {
            id: Set(post.id().into()),
            user_id: Set(post.user_id().into()),
            title: Set(post.title().as_str().to_owned()),
            content: Set(post.content().as_str().to_owned()),
            status: Set(post.status().as_str().to_owned()),
            created_at: Set(post.created_at().into()),
            updated_at: Set(post.updated_at().into()),
            first_published_at: Set(post.first_published_at().map(Into::into)),
            content_updated_at: Set(post.content_updated_at().map(Into::into)),
        }
    }
}
