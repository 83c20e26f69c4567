//! Blog post and blog image endpoints
//!
//! Anonymous callers only ever see published posts. Staff also see drafts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolhub_common::db::blog::{self, BlogFilter, BLOG_DEFAULT_SORT, BLOG_SORT_COLUMNS};
use toolhub_common::db::models::BlogPostRow;
use toolhub_common::db::{BlogPostImageInput, BlogPostInput, Sort};
use toolhub_common::serializers::{
    blog_image_record, blog_post_record, BlogImageRecord, BlogPostRecord,
};
use tracing::info;

use super::auth::{AuthUser, MaybeUser, StaffUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, RequestContext};
use crate::pagination::{calculate_pagination, Page};
use crate::AppState;

/// Query parameters of `GET /api/blog-posts`
#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub page: Option<i64>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

async fn post_record(
    state: &AppState,
    ctx: &RequestContext,
    post: &BlogPostRow,
) -> ApiResult<BlogPostRecord> {
    let images = blog::list_images(&state.db, post.id).await?;
    Ok(blog_post_record(
        &ctx.serializer(state.storage.as_ref()),
        post,
        &images,
    ))
}

async fn load_post(
    state: &AppState,
    ctx: &RequestContext,
    id: i64,
    include_unpublished: bool,
) -> ApiResult<BlogPostRecord> {
    let post = blog::get_blog_post(&state.db, id, include_unpublished)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Blog post {} not found", id)))?;
    post_record(state, ctx, &post).await
}

/// GET /api/blog-posts
pub async fn list_posts(
    State(state): State<AppState>,
    caller: MaybeUser,
    ctx: RequestContext,
    Query(query): Query<BlogListQuery>,
) -> ApiResult<Json<Page<BlogPostRecord>>> {
    let filter = BlogFilter {
        category: query.category.filter(|v| !v.is_empty()),
        author: query.author.filter(|v| !v.is_empty()),
        search: query.search,
        sort: Sort::parse(query.ordering.as_deref(), BLOG_SORT_COLUMNS, BLOG_DEFAULT_SORT),
        include_unpublished: caller.is_staff(),
    };

    let count = blog::count_blog_posts(&state.db, &filter).await?;
    let pagination = calculate_pagination(count, query.page.unwrap_or(1), state.config.page_size);
    let rows = blog::list_blog_posts(&state.db, &filter, pagination.window()).await?;

    let mut results = Vec::with_capacity(rows.len());
    for post in &rows {
        results.push(post_record(&state, &ctx, post).await?);
    }

    Ok(Json(Page::new(count, pagination, results)))
}

/// GET /api/blog-posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    caller: MaybeUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<BlogPostRecord>> {
    Ok(Json(load_post(&state, &ctx, id, caller.is_staff()).await?))
}

/// POST /api/blog-posts (any authenticated user)
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: RequestContext,
    JsonBody(mut input): JsonBody<BlogPostInput>,
) -> ApiResult<(StatusCode, Json<BlogPostRecord>)> {
    input.validate()?;
    let id = blog::create_blog_post(&state.db, &input).await?;
    info!("Blog post {} '{}' created by {}", id, input.title, user.username);

    Ok((StatusCode::CREATED, Json(load_post(&state, &ctx, id, true).await?)))
}

/// PUT /api/blog-posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(mut input): JsonBody<BlogPostInput>,
) -> ApiResult<Json<BlogPostRecord>> {
    input.validate()?;
    if !blog::update_blog_post(&state.db, id, &input).await? {
        return Err(ApiError::NotFound(format!("Blog post {} not found", id)));
    }
    info!("Blog post {} updated by {}", id, user.username);

    Ok(Json(load_post(&state, &ctx, id, true).await?))
}

/// DELETE /api/blog-posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !blog::delete_blog_post(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Blog post {} not found", id)));
    }
    info!("Blog post {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/blog-posts/:id/increment_views
///
/// Public; returns the post with its updated counter.
pub async fn increment_views(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<BlogPostRecord>> {
    if !blog::increment_views(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Blog post {} not found", id)));
    }
    Ok(Json(load_post(&state, &ctx, id, false).await?))
}

/// POST /api/blog-posts/:id/images
pub async fn add_image(
    State(state): State<AppState>,
    StaffUser(_user): StaffUser,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
    JsonBody(mut input): JsonBody<BlogPostImageInput>,
) -> ApiResult<(StatusCode, Json<BlogImageRecord>)> {
    input.validate()?;
    let id = blog::add_image(&state.db, post_id, &input).await?;

    let image = blog::list_images(&state.db, post_id)
        .await?
        .into_iter()
        .find(|image| image.id == id)
        .ok_or_else(|| ApiError::Internal(format!("Blog image {} vanished after insert", id)))?;

    Ok((
        StatusCode::CREATED,
        Json(blog_image_record(&ctx.serializer(state.storage.as_ref()), &image)),
    ))
}

/// DELETE /api/blog-post-images/:id
pub async fn delete_image(
    State(state): State<AppState>,
    StaffUser(_user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !blog::delete_image(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Blog image {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
