//! Bearer token authentication
//!
//! `session_middleware` runs in front of every `/api` route. A valid
//! `Authorization: Bearer <token>` header attaches a [`CurrentUser`] to the
//! request; anything else leaves the request anonymous. Handlers then state
//! their requirement through an extractor:
//!
//! - [`MaybeUser`]: anyone (staff get to see unpublished records)
//! - [`AuthUser`]: any signed-in user, 401 otherwise
//! - [`StaffUser`]: staff only, 401 when anonymous, 403 when not staff

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toolhub_common::auth::parse_bearer;
use toolhub_common::db::users;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::AppState;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub guid: String,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    /// Token the request was authenticated with
    pub token: String,
}

/// Attach the token's user to the request, if the token is valid
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_bearer)
        .map(str::to_string);

    if let Some(token) = token {
        match users::find_session_user(&state.db, &token).await? {
            Some(user) => {
                request.extensions_mut().insert(CurrentUser {
                    guid: user.guid,
                    username: user.username,
                    email: user.email,
                    is_staff: user.is_staff,
                    token,
                });
            }
            None => debug!("Unknown or expired access token"),
        }
    }

    Ok(next.run(request).await)
}

/// Optional caller
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn is_staff(&self) -> bool {
        self.0.as_ref().is_some_and(|user| user.is_staff)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<CurrentUser>().cloned()))
    }
}

/// Any authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                ApiError::Unauthorized("Authentication credentials were not provided".to_string())
            })
    }
}

/// Authenticated staff caller
#[derive(Debug, Clone)]
pub struct StaffUser(pub CurrentUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }
        Ok(Self(user))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = users::authenticate(&state.db, &username, &password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let (access, expires_at) =
        users::create_session(&state.db, &user.guid, state.config.token_ttl_hours).await?;
    info!("User '{}' logged in", user.username);

    Ok(Json(LoginResponse {
        access,
        expires_at,
        user: UserSummary {
            id: user.guid,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
        },
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<StatusCode> {
    users::revoke_session(&state.db, &user.token).await?;
    info!("User '{}' logged out", user.username);
    Ok(StatusCode::NO_CONTENT)
}
