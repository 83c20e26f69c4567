//! News endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolhub_common::db::news::{self, NewsFilter, NEWS_DEFAULT_SORT, NEWS_SORT_COLUMNS};
use toolhub_common::db::{NewsInput, Sort};
use toolhub_common::serializers::{news_record, NewsRecord};
use tracing::info;

use super::auth::{MaybeUser, StaffUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, RequestContext};
use crate::pagination::{calculate_pagination, Page};
use crate::AppState;

/// Query parameters of `GET /api/news`
#[derive(Debug, Default, Deserialize)]
pub struct NewsListQuery {
    pub page: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

async fn load_news(
    state: &AppState,
    ctx: &RequestContext,
    id: i64,
    include_unpublished: bool,
) -> ApiResult<NewsRecord> {
    let item = news::get_news(&state.db, id, include_unpublished)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("News item {} not found", id)))?;
    Ok(news_record(&ctx.serializer(state.storage.as_ref()), &item))
}

/// GET /api/news
pub async fn list_news(
    State(state): State<AppState>,
    caller: MaybeUser,
    ctx: RequestContext,
    Query(query): Query<NewsListQuery>,
) -> ApiResult<Json<Page<NewsRecord>>> {
    let filter = NewsFilter {
        category: query.category.filter(|v| !v.is_empty()),
        search: query.search,
        sort: Sort::parse(query.ordering.as_deref(), NEWS_SORT_COLUMNS, NEWS_DEFAULT_SORT),
        include_unpublished: caller.is_staff(),
    };

    let count = news::count_news(&state.db, &filter).await?;
    let pagination = calculate_pagination(count, query.page.unwrap_or(1), state.config.page_size);
    let rows = news::list_news(&state.db, &filter, pagination.window()).await?;

    let serializer = ctx.serializer(state.storage.as_ref());
    let results = rows.iter().map(|item| news_record(&serializer, item)).collect();

    Ok(Json(Page::new(count, pagination, results)))
}

/// GET /api/news/:id
pub async fn get_news(
    State(state): State<AppState>,
    caller: MaybeUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<NewsRecord>> {
    Ok(Json(load_news(&state, &ctx, id, caller.is_staff()).await?))
}

/// POST /api/news
pub async fn create_news(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    JsonBody(mut input): JsonBody<NewsInput>,
) -> ApiResult<(StatusCode, Json<NewsRecord>)> {
    input.validate()?;
    let id = news::create_news(&state.db, &input).await?;
    info!("News item {} created by {}", id, user.username);

    Ok((StatusCode::CREATED, Json(load_news(&state, &ctx, id, true).await?)))
}

/// PUT /api/news/:id
pub async fn update_news(
    State(state): State<AppState>,
    StaffUser(_user): StaffUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(mut input): JsonBody<NewsInput>,
) -> ApiResult<Json<NewsRecord>> {
    input.validate()?;
    if !news::update_news(&state.db, id, &input).await? {
        return Err(ApiError::NotFound(format!("News item {} not found", id)));
    }
    Ok(Json(load_news(&state, &ctx, id, true).await?))
}

/// DELETE /api/news/:id
pub async fn delete_news(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !news::delete_news(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("News item {} not found", id)));
    }
    info!("News item {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
