//! Tool demo endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use toolhub_common::db::{demos, tools, ToolDemoInput};
use toolhub_common::serializers::{demo_record, ToolDemoRecord};
use tracing::info;

use super::auth::StaffUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{JsonBody, RequestContext};
use crate::AppState;

async fn load_demo(state: &AppState, ctx: &RequestContext, id: i64) -> ApiResult<ToolDemoRecord> {
    let demo = demos::get_demo(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Tool demo {} not found", id)))?;
    Ok(demo_record(&ctx.serializer(state.storage.as_ref()), &demo))
}

/// GET /api/tools/:id/demos
pub async fn list_tool_demos(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(tool_id): Path<i64>,
) -> ApiResult<Json<Vec<ToolDemoRecord>>> {
    if !tools::tool_exists(&state.db, tool_id).await? {
        return Err(ApiError::NotFound(format!("Tool {} not found", tool_id)));
    }

    let rows = demos::list_demos(&state.db, tool_id).await?;
    let serializer = ctx.serializer(state.storage.as_ref());
    Ok(Json(rows.iter().map(|demo| demo_record(&serializer, demo)).collect()))
}

/// POST /api/tools/:id/demos
pub async fn create_demo(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    ctx: RequestContext,
    Path(tool_id): Path<i64>,
    JsonBody(mut input): JsonBody<ToolDemoInput>,
) -> ApiResult<(StatusCode, Json<ToolDemoRecord>)> {
    input.validate()?;
    let id = demos::create_demo(&state.db, tool_id, &input).await?;
    info!("Demo {} added to tool {} by {}", id, tool_id, user.username);

    Ok((StatusCode::CREATED, Json(load_demo(&state, &ctx, id).await?)))
}

/// GET /api/tool-demos/:id
pub async fn get_demo(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToolDemoRecord>> {
    Ok(Json(load_demo(&state, &ctx, id).await?))
}

/// PUT /api/tool-demos/:id
pub async fn update_demo(
    State(state): State<AppState>,
    StaffUser(_user): StaffUser,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(mut input): JsonBody<ToolDemoInput>,
) -> ApiResult<Json<ToolDemoRecord>> {
    input.validate()?;
    if !demos::update_demo(&state.db, id, &input).await? {
        return Err(ApiError::NotFound(format!("Tool demo {} not found", id)));
    }
    Ok(Json(load_demo(&state, &ctx, id).await?))
}

/// DELETE /api/tool-demos/:id
pub async fn delete_demo(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !demos::delete_demo(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Tool demo {} not found", id)));
    }
    info!("Demo {} deleted by {}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
