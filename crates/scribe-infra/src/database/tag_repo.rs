//! PostgreSQL tag repository.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};

use scribe_core::domain::{Tag, TagName};
use scribe_core::error::RepoError;
use scribe_core::ports::TagRepository;

use super::entity::tag;
use super::error::map_db_err;

/// Find-or-create runs as an insert that ignores a name clash followed by a
/// lookup, so concurrent callers converge on the same row.
#[derive(Default)]
pub struct PostgresTagRepository;

impl PostgresTagRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TagRepository<DatabaseTransaction> for PostgresTagRepository {
    async fn find_or_create_by_name(
        &self,
        tx: &DatabaseTransaction,
        name: &TagName,
    ) -> Result<Tag, RepoError> {
        let candidate = Tag::new(name.clone());

        let inserted = tag::Entity::insert(tag::ActiveModel::from(&candidate))
            .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
            .exec_without_returning(tx)
            .await
            .map_err(map_db_err)?;
        if inserted > 0 {
            tracing::debug!(tag = %name, "tag created");
        }

        let model = tag::Entity::find()
            .filter(tag::Column::Name.eq(name.as_str()))
            .one(tx)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        Tag::try_from(model)
    }
}
