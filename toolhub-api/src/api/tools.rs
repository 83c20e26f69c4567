//! Tool endpoints
//!
//! The tool list is not paginated; it supports filters, search, ordering and
//! an optional `limit`. Records embed their text lists and demos.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use toolhub_common::db::models::ToolRow;
use toolhub_common::db::tools::{self, ToolFilter, TOOL_DEFAULT_SORT, TOOL_SORT_COLUMNS};
use toolhub_common::db::{demos, Sort, ToolInput};
use toolhub_common::serializers::{tool_record, ToolRecord};
use tracing::info;

use super::auth::StaffUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, RequestContext};
use crate::AppState;

/// Query parameters of `GET /api/tools`
#[derive(Debug, Default, Deserialize)]
pub struct ToolListQuery {
    pub category: Option<String>,
    pub pricing: Option<String>,
    pub difficulty: Option<String>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
}

impl ToolListQuery {
    fn into_filter(self) -> ToolFilter {
        ToolFilter {
            sort: Sort::parse(self.ordering.as_deref(), TOOL_SORT_COLUMNS, TOOL_DEFAULT_SORT),
            category: self.category.filter(|v| !v.is_empty()),
            pricing: self.pricing.filter(|v| !v.is_empty()),
            difficulty: self.difficulty.filter(|v| !v.is_empty()),
            is_featured: self.is_featured,
            search: self.search,
            limit: self.limit.filter(|limit| *limit > 0),
        }
    }
}

/// Load the nested lists of `tool` and serialize it
async fn load_tool_record(
    state: &AppState,
    ctx: &RequestContext,
    tool: &ToolRow,
) -> ApiResult<ToolRecord> {
    let lists = tools::load_text_lists(&state.db, tool.id).await?;
    let demos = demos::list_demos(&state.db, tool.id).await?;
    Ok(tool_record(
        &ctx.serializer(state.storage.as_ref()),
        tool,
        &lists,
        &demos,
    ))
}

async fn load_tool_by_id(state: &AppState, ctx: &RequestContext, id: i64) -> ApiResult<ToolRecord> {
    let tool = tools::get_tool(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tool {} not found", id)))?;
    load_tool_record(state, ctx, &tool).await
}

/// GET /api/tools
pub async fn list_tools(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ToolListQuery>,
) -> ApiResult<Json<Vec<ToolRecord>>> {
    let rows = tools::list_tools(&state.db, &query.into_filter()).await?;

    let mut records = Vec::with_capacity(rows.len());
    for tool in &rows {
        records.push(load_tool_record(&state, &ctx, tool).await?);
    }

    Ok(Json(records))
}

/// GET /api/tools/:id
pub async fn get_tool(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToolRecord>> {
    Ok(Json(load_tool_by_id(&state, &ctx, id).await?))
}

/// POST /api/tools
pub async fn create_tool(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    JsonBody(mut input): JsonBody<ToolInput>,
) -> ApiResult<(StatusCode, Json<ToolRecord>)> {
    input.validate()?;
    let id = tools::create_tool(&state.db, &input).await?;
    info!("Tool {} '{}' created by {}", id, input.name, user.username);

    Ok((StatusCode::CREATED, Json(load_tool_by_id(&state, &ctx, id).await?)))
}

/// PUT /api/tools/:id
pub async fn update_tool(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(mut input): JsonBody<ToolInput>,
) -> ApiResult<Json<ToolRecord>> {
    input.validate()?;
    if !tools::update_tool(&state.db, id, &input).await? {
        return Err(ApiError::NotFound(format!("Tool {} not found", id)));
    }
    info!("Tool {} updated by {}", id, user.username);

    Ok(Json(load_tool_by_id(&state, &ctx, id).await?))
}

/// DELETE /api/tools/:id
pub async fn delete_tool(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !tools::delete_tool(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Tool {} not found", id)));
    }
    info!("Tool {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
