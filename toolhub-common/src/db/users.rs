//! User accounts and access token sessions

use super::models::UserRow;
use crate::auth::{generate_salt, generate_token, hash_password, hash_token, verify_password};
use crate::config::AdminCredentials;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Create a user; returns its guid
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
    is_staff: bool,
) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::InvalidInput("username: this field may not be blank".to_string()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("password: this field may not be blank".to_string()));
    }

    let guid = Uuid::new_v4().to_string();
    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    sqlx::query(
        r#"
        INSERT INTO users (guid, username, email, password_hash, password_salt, is_staff, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(username)
    .bind(email)
    .bind(&hash)
    .bind(&salt)
    .bind(is_staff)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(guid)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Check a username/password pair; `None` for unknown users and wrong passwords alike
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<UserRow>> {
    let Some(user) = find_by_username(pool, username).await? else {
        return Ok(None);
    };

    if verify_password(password, &user.password_salt, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Create the configured staff account if no user with that name exists
///
/// Returns `true` when an account was created. An existing account keeps
/// its stored password.
pub async fn ensure_admin(pool: &SqlitePool, admin: &AdminCredentials) -> Result<bool> {
    if find_by_username(pool, &admin.username).await?.is_some() {
        return Ok(false);
    }

    create_user(pool, &admin.username, "", &admin.password, true).await?;
    info!("Created staff account '{}'", admin.username);
    Ok(true)
}

/// Issue a new access token for `user_guid`
///
/// Returns the plaintext token (only ever handed to the client) and its expiry.
pub async fn create_session(
    pool: &SqlitePool,
    user_guid: &str,
    ttl_hours: i64,
) -> Result<(String, DateTime<Utc>)> {
    let token = generate_token();
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    sqlx::query(
        "INSERT INTO sessions (token_hash, user_guid, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(hash_token(&token))
    .bind(user_guid)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok((token, expires_at))
}

/// User owning a non-expired session for `token`
pub async fn find_session_user(pool: &SqlitePool, token: &str) -> Result<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.* FROM users u
        JOIN sessions s ON s.user_guid = u.guid
        WHERE s.token_hash = ? AND s.expires_at > ?
        "#,
    )
    .bind(hash_token(token))
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Drop a session; `false` when the token was unknown
pub async fn revoke_session(pool: &SqlitePool, token: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete expired sessions; returns how many were removed
pub async fn purge_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
