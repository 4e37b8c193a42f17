//! PostgreSQL post repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, DbConn, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use scribe_core::domain::{Post, PostId, Tag, TagName};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostListQuery, PostRepository, SortField, SortOrder};

use super::entity::{post, post_tag, tag};
use super::error::map_db_err;

/// Posts live in `posts`; their ordered tag links in `post_tags`.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Ordered tag names for each of `post_ids`.
    async fn load_tags(
        &self,
        post_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<TagName>>, RepoError> {
        let mut tags: HashMap<Uuid, Vec<TagName>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(tags);
        }

        let rows = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .order_by_asc(post_tag::Column::Position)
            .find_also_related(tag::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        for (link, tag) in rows {
            let Some(tag) = tag else { continue };
            let name = Tag::try_from(tag)?.name;
            tags.entry(link.post_id).or_default().push(name);
        }

        Ok(tags)
    }
}

#[async_trait]
impl PostRepository<DatabaseTransaction> for PostgresPostRepository {
    async fn create(&self, tx: &DatabaseTransaction, post: &Post) -> Result<(), RepoError> {
        post::Entity::insert(post::ActiveModel::from(post))
            .exec_without_returning(tx)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(&self, tx: &DatabaseTransaction, post: &Post) -> Result<(), RepoError> {
        let mut changes = post::ActiveModel::from(post);
        changes.id = NotSet;
        changes.user_id = NotSet;
        changes.created_at = NotSet;

        let result = post::Entity::update_many()
            .set(changes)
            .filter(post::Column::Id.eq(Uuid::from(post.id())))
            .exec(tx)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn set_tags(
        &self,
        tx: &DatabaseTransaction,
        post_id: PostId,
        tags: &[Tag],
    ) -> Result<(), RepoError> {
        let post_id = Uuid::from(post_id);

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(tx)
            .await
            .map_err(map_db_err)?;

        if tags.is_empty() {
            return Ok(());
        }

        let links = tags
            .iter()
            .enumerate()
            .map(|(position, tag)| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag.id.into()),
                position: Set(position as i32),
            });

        post_tag::Entity::insert_many(links)
            .exec_without_returning(tx)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let Some(model) = post::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut tags = self.load_tags(vec![model.id]).await?;
        let names = tags.remove(&model.id).unwrap_or_default();
        model.into_domain(names).map(Some)
    }

    async fn list(&self, query: &PostListQuery) -> Result<(Vec<Post>, u64), RepoError> {
        let mut select =
            post::Entity::find().filter(post::Column::UserId.eq(Uuid::from(query.user_id)));
        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(status.as_str()));
        }

        let total = select.clone().count(&self.db).await.map_err(map_db_err)?;

        let column = match query.sort_by {
            SortField::CreatedAt => post::Column::CreatedAt,
            SortField::UpdatedAt => post::Column::UpdatedAt,
        };
        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let models = select
            .order_by(column, order.clone())
            .order_by(post::Column::Id, order)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut tags = self
            .load_tags(models.iter().map(|model| model.id).collect())
            .await?;

        let posts = models
            .into_iter()
            .map(|model| {
                let names = tags.remove(&model.id).unwrap_or_default();
                model.into_domain(names)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((posts, total))
    }
}
