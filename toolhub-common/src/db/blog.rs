//! Blog post and blog image persistence

use super::inputs::{BlogPostImageInput, BlogPostInput};
use super::models::{BlogPostImageRow, BlogPostRow};
use super::{like_pattern, Sort, Window};
use crate::ordering::sort_by_declared_order;
use crate::{Error, Result};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub const BLOG_SORT_COLUMNS: &[&str] = &["created_at", "views"];

pub const BLOG_DEFAULT_SORT: Sort = Sort::desc("created_at");

#[derive(Debug, Clone)]
pub struct BlogFilter {
    pub category: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub sort: Sort,
    /// Staff can see drafts; everyone else only sees published posts
    pub include_unpublished: bool,
}

impl Default for BlogFilter {
    fn default() -> Self {
        Self {
            category: None,
            author: None,
            search: None,
            sort: BLOG_DEFAULT_SORT,
            include_unpublished: false,
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BlogFilter) {
    if !filter.include_unpublished {
        qb.push(" AND published = 1");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(author) = &filter.author {
        qb.push(" AND author = ").push_bind(author.clone());
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR author LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR content LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR tags LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

pub async fn count_blog_posts(pool: &SqlitePool, filter: &BlogFilter) -> Result<i64> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM blog_posts WHERE 1 = 1");
    push_filter(&mut qb, filter);

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

pub async fn list_blog_posts(
    pool: &SqlitePool,
    filter: &BlogFilter,
    window: Window,
) -> Result<Vec<BlogPostRow>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM blog_posts WHERE 1 = 1");
    push_filter(&mut qb, filter);
    qb.push(filter.sort.to_sql());
    qb.push(" LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);

    let posts = qb.build_query_as::<BlogPostRow>().fetch_all(pool).await?;
    Ok(posts)
}

pub async fn get_blog_post(
    pool: &SqlitePool,
    id: i64,
    include_unpublished: bool,
) -> Result<Option<BlogPostRow>> {
    let sql = if include_unpublished {
        "SELECT * FROM blog_posts WHERE id = ?"
    } else {
        "SELECT * FROM blog_posts WHERE id = ? AND published = 1"
    };

    let post = sqlx::query_as::<_, BlogPostRow>(sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(post)
}

pub async fn create_blog_post(pool: &SqlitePool, input: &BlogPostInput) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO blog_posts (
            title, title_ge, excerpt, excerpt_ge, content, content_ge,
            author, author_avatar, author_bio, author_bio_ge,
            category, tags, featured_image, views, read_time, published,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.excerpt)
    .bind(&input.excerpt_ge)
    .bind(&input.content)
    .bind(&input.content_ge)
    .bind(&input.author)
    .bind(&input.author_avatar)
    .bind(&input.author_bio)
    .bind(&input.author_bio_ge)
    .bind(&input.category)
    .bind(Json(&input.tags))
    .bind(&input.featured_image)
    .bind(input.read_time)
    .bind(input.published)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Replace a post's editable fields; the view counter is left untouched
pub async fn update_blog_post(pool: &SqlitePool, id: i64, input: &BlogPostInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE blog_posts SET
            title = ?, title_ge = ?, excerpt = ?, excerpt_ge = ?, content = ?, content_ge = ?,
            author = ?, author_avatar = ?, author_bio = ?, author_bio_ge = ?,
            category = ?, tags = ?, featured_image = ?, read_time = ?, published = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.excerpt)
    .bind(&input.excerpt_ge)
    .bind(&input.content)
    .bind(&input.content_ge)
    .bind(&input.author)
    .bind(&input.author_avatar)
    .bind(&input.author_bio)
    .bind(&input.author_bio_ge)
    .bind(&input.category)
    .bind(Json(&input.tags))
    .bind(&input.featured_image)
    .bind(input.read_time)
    .bind(input.published)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_blog_post(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Atomically bump the view counter of a published post
///
/// Returns `false` when no published post has this id.
pub async fn increment_views(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("UPDATE blog_posts SET views = views + 1 WHERE id = ? AND published = 1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Images of a post in declared order
pub async fn list_images(pool: &SqlitePool, blog_post_id: i64) -> Result<Vec<BlogPostImageRow>> {
    let mut images = sqlx::query_as::<_, BlogPostImageRow>(
        "SELECT * FROM blog_post_images WHERE blog_post_id = ? \
         ORDER BY display_order ASC, created_at ASC, id ASC",
    )
    .bind(blog_post_id)
    .fetch_all(pool)
    .await?;

    sort_by_declared_order(&mut images);
    Ok(images)
}

pub async fn add_image(
    pool: &SqlitePool,
    blog_post_id: i64,
    input: &BlogPostImageInput,
) -> Result<i64> {
    if get_blog_post(pool, blog_post_id, true).await?.is_none() {
        return Err(Error::NotFound(format!("Blog post {} not found", blog_post_id)));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO blog_post_images (
            blog_post_id, image, caption, caption_ge, alt_text, display_order, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(blog_post_id)
    .bind(&input.image)
    .bind(&input.caption)
    .bind(&input.caption_ge)
    .bind(&input.alt_text)
    .bind(input.order)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn delete_image(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blog_post_images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
