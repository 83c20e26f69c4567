//! Tool persistence (tools plus their feature/pro/con/step lists)

use super::inputs::{TextItemInput, ToolInput};
use super::models::{TextItemRow, ToolRow};
use super::{like_pattern, Sort};
use crate::locale::secondary_column;
use crate::ordering::sort_by_declared_order;
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// Columns accepted by `?ordering=` on the tool list
pub const TOOL_SORT_COLUMNS: &[&str] = &["created_at", "rating", "name"];

/// Default tool list order: newest first
pub const TOOL_DEFAULT_SORT: Sort = Sort::desc("created_at");

/// Tool-owned text lists; each has its own table and text column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextList {
    KeyFeatures,
    Pros,
    Cons,
    UsageSteps,
}

impl TextList {
    pub const ALL: [TextList; 4] = [
        TextList::KeyFeatures,
        TextList::Pros,
        TextList::Cons,
        TextList::UsageSteps,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            TextList::KeyFeatures => "key_features",
            TextList::Pros => "pros",
            TextList::Cons => "cons",
            TextList::UsageSteps => "usage_steps",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            TextList::KeyFeatures => "feature",
            TextList::Pros | TextList::Cons => "text",
            TextList::UsageSteps => "step",
        }
    }

    pub fn secondary_column(&self) -> String {
        secondary_column(self.column())
    }
}

/// Filters of the tool list endpoint
#[derive(Debug, Clone)]
pub struct ToolFilter {
    pub category: Option<String>,
    pub pricing: Option<String>,
    pub difficulty: Option<String>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub sort: Sort,
    pub limit: Option<i64>,
}

impl Default for ToolFilter {
    fn default() -> Self {
        Self {
            category: None,
            pricing: None,
            difficulty: None,
            is_featured: None,
            search: None,
            sort: TOOL_DEFAULT_SORT,
            limit: None,
        }
    }
}

/// The four text lists of one tool, each in declared order
#[derive(Debug, Clone, Default)]
pub struct ToolTextLists {
    pub key_features: Vec<TextItemRow>,
    pub pros: Vec<TextItemRow>,
    pub cons: Vec<TextItemRow>,
    pub usage_steps: Vec<TextItemRow>,
}

pub async fn list_tools(pool: &SqlitePool, filter: &ToolFilter) -> Result<Vec<ToolRow>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM tools WHERE 1 = 1");

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(pricing) = &filter.pricing {
        qb.push(" AND pricing = ").push_bind(pricing.clone());
    }
    if let Some(difficulty) = &filter.difficulty {
        qb.push(" AND difficulty = ").push_bind(difficulty.clone());
    }
    if let Some(is_featured) = filter.is_featured {
        qb.push(" AND is_featured = ").push_bind(is_featured);
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.trim().is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR category LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    qb.push(filter.sort.to_sql());

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    let tools = qb.build_query_as::<ToolRow>().fetch_all(pool).await?;
    Ok(tools)
}

pub async fn get_tool(pool: &SqlitePool, id: i64) -> Result<Option<ToolRow>> {
    let tool = sqlx::query_as::<_, ToolRow>("SELECT * FROM tools WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(tool)
}

pub async fn tool_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tools WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert a validated tool and its text lists; returns the new id
pub async fn create_tool(pool: &SqlitePool, input: &ToolInput) -> Result<i64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO tools (
            name, name_ge, description, description_ge, category, overview, overview_ge,
            logo_url, featured_image, pricing, difficulty, rating, website_url, is_featured,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_ge)
    .bind(&input.description)
    .bind(&input.description_ge)
    .bind(&input.category)
    .bind(&input.overview)
    .bind(&input.overview_ge)
    .bind(&input.logo_url)
    .bind(&input.featured_image)
    .bind(&input.pricing)
    .bind(&input.difficulty)
    .bind(input.rating)
    .bind(&input.website_url)
    .bind(input.is_featured)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let tool_id = result.last_insert_rowid();

    for (list, items) in lists_of(input) {
        if let Some(items) = items {
            insert_text_items(&mut tx, list, tool_id, items, now).await?;
        }
    }

    tx.commit().await?;
    Ok(tool_id)
}

/// Replace a tool's fields; text lists are replaced only when present in `input`
///
/// Returns `false` when the tool does not exist.
pub async fn update_tool(pool: &SqlitePool, id: i64, input: &ToolInput) -> Result<bool> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE tools SET
            name = ?, name_ge = ?, description = ?, description_ge = ?, category = ?,
            overview = ?, overview_ge = ?, logo_url = ?, featured_image = ?, pricing = ?,
            difficulty = ?, rating = ?, website_url = ?, is_featured = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_ge)
    .bind(&input.description)
    .bind(&input.description_ge)
    .bind(&input.category)
    .bind(&input.overview)
    .bind(&input.overview_ge)
    .bind(&input.logo_url)
    .bind(&input.featured_image)
    .bind(&input.pricing)
    .bind(&input.difficulty)
    .bind(input.rating)
    .bind(&input.website_url)
    .bind(input.is_featured)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    for (list, items) in lists_of(input) {
        if let Some(items) = items {
            sqlx::query(&format!("DELETE FROM {} WHERE tool_id = ?", list.table()))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_text_items(&mut tx, list, id, items, now).await?;
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// Delete a tool; demos and text lists cascade
pub async fn delete_tool(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tools WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_text_items(
    pool: &SqlitePool,
    list: TextList,
    tool_id: i64,
) -> Result<Vec<TextItemRow>> {
    let sql = format!(
        "SELECT id, tool_id, {column} AS text, {column_ge} AS text_ge, display_order, created_at \
         FROM {table} WHERE tool_id = ? ORDER BY display_order ASC, created_at ASC, id ASC",
        column = list.column(),
        column_ge = list.secondary_column(),
        table = list.table(),
    );

    let mut items = sqlx::query_as::<_, TextItemRow>(&sql)
        .bind(tool_id)
        .fetch_all(pool)
        .await?;
    sort_by_declared_order(&mut items);
    Ok(items)
}

pub async fn load_text_lists(pool: &SqlitePool, tool_id: i64) -> Result<ToolTextLists> {
    Ok(ToolTextLists {
        key_features: list_text_items(pool, TextList::KeyFeatures, tool_id).await?,
        pros: list_text_items(pool, TextList::Pros, tool_id).await?,
        cons: list_text_items(pool, TextList::Cons, tool_id).await?,
        usage_steps: list_text_items(pool, TextList::UsageSteps, tool_id).await?,
    })
}

fn lists_of(input: &ToolInput) -> [(TextList, Option<&Vec<TextItemInput>>); 4] {
    [
        (TextList::KeyFeatures, input.key_features.as_ref()),
        (TextList::Pros, input.pros.as_ref()),
        (TextList::Cons, input.cons.as_ref()),
        (TextList::UsageSteps, input.usage_steps.as_ref()),
    ]
}

async fn insert_text_items(
    conn: &mut SqliteConnection,
    list: TextList,
    tool_id: i64,
    items: &[TextItemInput],
    now: DateTime<Utc>,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {table} (tool_id, {column}, {column_ge}, display_order, created_at) \
         VALUES (?, ?, ?, ?, ?)",
        table = list.table(),
        column = list.column(),
        column_ge = list.secondary_column(),
    );

    for (position, item) in items.iter().enumerate() {
        sqlx::query(&sql)
            .bind(tool_id)
            .bind(item.text.trim())
            .bind(item.text_ge.trim())
            .bind(item.order.unwrap_or(position as i64))
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
