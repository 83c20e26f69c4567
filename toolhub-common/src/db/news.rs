//! News item persistence

use super::inputs::NewsInput;
use super::models::NewsRow;
use super::{like_pattern, Sort, Window};
use crate::Result;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub const NEWS_SORT_COLUMNS: &[&str] = &["created_at"];

pub const NEWS_DEFAULT_SORT: Sort = Sort::desc("created_at");

#[derive(Debug, Clone)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Sort,
    pub include_unpublished: bool,
}

impl Default for NewsFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            sort: NEWS_DEFAULT_SORT,
            include_unpublished: false,
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &NewsFilter) {
    if !filter.include_unpublished {
        qb.push(" AND published = 1");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR summary LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR source LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR tags LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn count_news(pool: &SqlitePool, filter: &NewsFilter) -> Result<i64> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM news WHERE 1 = 1");
    push_filter(&mut qb, filter);

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

pub async fn list_news(pool: &SqlitePool, filter: &NewsFilter, window: Window) -> Result<Vec<NewsRow>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM news WHERE 1 = 1");
    push_filter(&mut qb, filter);
    qb.push(filter.sort.to_sql());
    qb.push(" LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);

    let items = qb.build_query_as::<NewsRow>().fetch_all(pool).await?;
    Ok(items)
}

pub async fn get_news(pool: &SqlitePool, id: i64, include_unpublished: bool) -> Result<Option<NewsRow>> {
    let sql = if include_unpublished {
        "SELECT * FROM news WHERE id = ?"
    } else {
        "SELECT * FROM news WHERE id = ? AND published = 1"
    };

    let item = sqlx::query_as::<_, NewsRow>(sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn create_news(pool: &SqlitePool, input: &NewsInput) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO news (
            title, title_ge, summary, summary_ge, category, source, external_url,
            tags, published, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.summary)
    .bind(&input.summary_ge)
    .bind(&input.category)
    .bind(&input.source)
    .bind(&input.external_url)
    .bind(Json(&input.tags))
    .bind(input.published)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_news(pool: &SqlitePool, id: i64, input: &NewsInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE news SET
            title = ?, title_ge = ?, summary = ?, summary_ge = ?, category = ?, source = ?,
            external_url = ?, tags = ?, published = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.summary)
    .bind(&input.summary_ge)
    .bind(&input.category)
    .bind(&input.source)
    .bind(&input.external_url)
    .bind(Json(&input.tags))
    .bind(input.published)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_news(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM news WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
