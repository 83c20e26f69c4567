use super::SerializeContext;
use crate::db::models::NewsRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NewsRecord {
    pub id: i64,
    pub title: String,
    pub title_localized: String,
    pub summary: String,
    pub summary_localized: String,
    pub category: String,
    pub source: String,
    pub external_url: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn news_record(ctx: &SerializeContext<'_>, item: &NewsRow) -> NewsRecord {
    NewsRecord {
        id: item.id,
        title: item.title.clone(),
        title_localized: ctx.text(&item.title, &item.title_ge),
        summary: item.summary.clone(),
        summary_localized: ctx.text(&item.summary, &item.summary_ge),
        category: item.category.clone(),
        source: item.source.clone(),
        external_url: item.external_url.clone(),
        tags: item.tags.0.clone(),
        published: item.published,
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}
