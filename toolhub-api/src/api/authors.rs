//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolhub_common::db::authors::{self, AUTHOR_DEFAULT_SORT, AUTHOR_SORT_COLUMNS};
use toolhub_common::db::{AuthorInput, Sort};
use toolhub_common::serializers::{author_record, AuthorRecord};
use tracing::info;

use super::auth::StaffUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, RequestContext};
use crate::pagination::{calculate_pagination, Page};
use crate::AppState;

/// Query parameters of `GET /api/authors`
#[derive(Debug, Default, Deserialize)]
pub struct AuthorListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

async fn load_author(state: &AppState, ctx: &RequestContext, id: i64) -> ApiResult<AuthorRecord> {
    let author = authors::get_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Author {} not found", id)))?;
    Ok(author_record(&ctx.serializer(state.storage.as_ref()), &author))
}

/// GET /api/authors
pub async fn list_authors(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<AuthorListQuery>,
) -> ApiResult<Json<Page<AuthorRecord>>> {
    let search = query.search.as_deref();
    let sort = Sort::parse(query.ordering.as_deref(), AUTHOR_SORT_COLUMNS, AUTHOR_DEFAULT_SORT);

    let count = authors::count_authors(&state.db, search).await?;
    let pagination = calculate_pagination(count, query.page.unwrap_or(1), state.config.page_size);
    let rows = authors::list_authors(&state.db, search, sort, pagination.window()).await?;

    let serializer = ctx.serializer(state.storage.as_ref());
    let results = rows.iter().map(|author| author_record(&serializer, author)).collect();

    Ok(Json(Page::new(count, pagination, results)))
}

/// GET /api/authors/by_slug?slug=
pub async fn get_author_by_slug(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<SlugQuery>,
) -> ApiResult<Json<AuthorRecord>> {
    let slug = query
        .slug
        .filter(|slug| !slug.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("slug parameter is required".to_string()))?;

    let author = authors::get_author_by_slug(&state.db, slug.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Author not found".to_string()))?;

    Ok(Json(author_record(&ctx.serializer(state.storage.as_ref()), &author)))
}

/// GET /api/authors/:id
pub async fn get_author(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<AuthorRecord>> {
    Ok(Json(load_author(&state, &ctx, id).await?))
}

/// POST /api/authors
pub async fn create_author(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    JsonBody(mut input): JsonBody<AuthorInput>,
) -> ApiResult<(StatusCode, Json<AuthorRecord>)> {
    input.validate()?;
    let id = authors::create_author(&state.db, &input).await?;
    info!("Author {} '{}' created by {}", id, input.slug, user.username);

    Ok((StatusCode::CREATED, Json(load_author(&state, &ctx, id).await?)))
}

/// PUT /api/authors/:id
pub async fn update_author(
    State(state): State<AppState>,
    StaffUser(_user): StaffUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(mut input): JsonBody<AuthorInput>,
) -> ApiResult<Json<AuthorRecord>> {
    input.validate()?;
    if !authors::update_author(&state.db, id, &input).await? {
        return Err(ApiError::NotFound(format!("Author {} not found", id)));
    }
    Ok(Json(load_author(&state, &ctx, id).await?))
}

/// DELETE /api/authors/:id
pub async fn delete_author(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !authors::delete_author(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Author {} not found", id)));
    }
    info!("Author {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
