//! Post handlers - thin controllers over the post use cases.
//!
//! The author id always comes from the access token. Posts owned by someone
//! else answer 404, the same as posts that do not exist.

use actix_web::{HttpResponse, web};

use scribe_core::DomainError;
use scribe_core::domain::{Post, PostId};
use scribe_core::ports::{SortField, SortOrder};
use scribe_core::services::{
    CreatePostInput, ListPostsInput, PatchPostInput, PostPage, UpdatePostInput,
};
use scribe_shared::dto::{
    CreatePostRequest, ListPostsQuery, PatchPostRequest, PostListResponse, PostResponse,
    UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id().to_string(),
        user_id: post.user_id().to_string(),
        title: post.title().to_string(),
        content: post.content().as_str().to_string(),
        status: post.status().to_string(),
        tags: post.tags().iter().map(ToString::to_string).collect(),
        created_at: post.created_at(),
        updated_at: post.updated_at(),
        first_published_at: post.first_published_at(),
        content_updated_at: post.content_updated_at(),
    }
}

fn page_response(page: PostPage) -> PostListResponse {
    PostListResponse {
        posts: page.posts.iter().map(post_response).collect(),
        total: page.total,
        limit: page.limit,
        offset: page.offset,
        has_more: page.has_more,
    }
}

fn parse_sort_field(raw: Option<&str>) -> AppResult<SortField> {
    match raw {
        None => Ok(SortField::default()),
        Some("created_at") => Ok(SortField::CreatedAt),
        Some("updated_at") => Ok(SortField::UpdatedAt),
        Some(other) => Err(AppError::BadRequest(format!(
            "sort_by must be created_at or updated_at, got {other:?}"
        ))),
    }
}

fn parse_sort_order(raw: Option<&str>) -> AppResult<SortOrder> {
    match raw {
        None => Ok(SortOrder::default()),
        Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(other) => Err(AppError::BadRequest(format!(
            "order must be asc or desc, got {other:?}"
        ))),
    }
}

/// Load a post the caller owns.
async fn owned_post(state: &AppState, identity: &Identity, id: PostId) -> AppResult<Post> {
    let post = state.posts.get_post(id).await?;
    if post.user_id() != identity.user_id {
        return Err(DomainError::not_found("post", id).into());
    }
    Ok(post)
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create_post(CreatePostInput {
            user_id: identity.user_id,
            title: req.title,
            content: req.content,
            status: req.status,
            tags: req.tags,
        })
        .await?;

    Ok(HttpResponse::Created().json(post_response(&post)))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let page = state
        .posts
        .list_posts(ListPostsInput {
            user_id: identity.user_id,
            status: query.status,
            sort_by: parse_sort_field(query.sort_by.as_deref())?,
            order: parse_sort_order(query.order.as_deref())?,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::parse(&path.into_inner())?;

    let post = owned_post(&state, &identity, id).await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = PostId::parse(&path.into_inner())?;
    let req = body.into_inner();
    owned_post(&state, &identity, id).await?;

    let post = state
        .posts
        .update_post(UpdatePostInput {
            id,
            title: req.title,
            content: req.content,
            tags: req.tags,
            status: req.status,
        })
        .await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// PATCH /api/posts/{id}
pub async fn patch_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PatchPostRequest>,
) -> AppResult<HttpResponse> {
    let id = PostId::parse(&path.into_inner())?;
    let req = body.into_inner();
    owned_post(&state, &identity, id).await?;

    let post = state
        .posts
        .patch_post(PatchPostInput {
            id,
            title: req.title,
            content: req.content,
            status: req.status,
            tags: req.tags,
        })
        .await?;

    Ok(HttpResponse::Ok().json(post_response(&post)))
}
