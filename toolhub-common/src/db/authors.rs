//! Author persistence

use super::inputs::AuthorInput;
use super::models::AuthorRow;
use super::{like_pattern, Sort, Window};
use crate::Result;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub const AUTHOR_SORT_COLUMNS: &[&str] = &["name", "created_at"];

pub const AUTHOR_DEFAULT_SORT: Sort = Sort::asc("name");

fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, search: Option<&str>) {
    if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR bio LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn count_authors(pool: &SqlitePool, search: Option<&str>) -> Result<i64> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM authors WHERE 1 = 1");
    push_search(&mut qb, search);

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

pub async fn list_authors(
    pool: &SqlitePool,
    search: Option<&str>,
    sort: Sort,
    window: Window,
) -> Result<Vec<AuthorRow>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM authors WHERE 1 = 1");
    push_search(&mut qb, search);
    qb.push(sort.to_sql());
    qb.push(" LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);

    let authors = qb.build_query_as::<AuthorRow>().fetch_all(pool).await?;
    Ok(authors)
}

pub async fn get_author(pool: &SqlitePool, id: i64) -> Result<Option<AuthorRow>> {
    let author = sqlx::query_as::<_, AuthorRow>("SELECT * FROM authors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(author)
}

pub async fn get_author_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<AuthorRow>> {
    let author = sqlx::query_as::<_, AuthorRow>("SELECT * FROM authors WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(author)
}

/// Insert a validated author; a duplicate slug surfaces as a unique violation
pub async fn create_author(pool: &SqlitePool, input: &AuthorInput) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO authors (
            name, slug, bio, bio_ge, profile_image, location,
            linkedin_url, twitter_url, instagram_url, github_url, personal_website,
            is_verified, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.slug)
    .bind(&input.bio)
    .bind(&input.bio_ge)
    .bind(&input.profile_image)
    .bind(&input.location)
    .bind(&input.linkedin_url)
    .bind(&input.twitter_url)
    .bind(&input.instagram_url)
    .bind(&input.github_url)
    .bind(&input.personal_website)
    .bind(input.is_verified)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_author(pool: &SqlitePool, id: i64, input: &AuthorInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE authors SET
            name = ?, slug = ?, bio = ?, bio_ge = ?, profile_image = ?, location = ?,
            linkedin_url = ?, twitter_url = ?, instagram_url = ?, github_url = ?,
            personal_website = ?, is_verified = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.slug)
    .bind(&input.bio)
    .bind(&input.bio_ge)
    .bind(&input.profile_image)
    .bind(&input.location)
    .bind(&input.linkedin_url)
    .bind(&input.twitter_url)
    .bind(&input.instagram_url)
    .bind(&input.github_url)
    .bind(&input.personal_website)
    .bind(input.is_verified)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_author(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
