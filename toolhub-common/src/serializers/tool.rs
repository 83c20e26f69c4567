use super::demo::{demo_record, ToolDemoRecord};
use super::SerializeContext;
use crate::db::models::{TextItemRow, ToolDemoRow, ToolRow};
use crate::db::tools::ToolTextLists;
use crate::ordering::sort_by_declared_order;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Key feature, pro, con or usage step as returned to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextItemRecord {
    pub id: i64,
    pub text: String,
    pub text_localized: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolRecord {
    pub id: i64,
    pub name: String,
    pub name_localized: String,
    pub description: String,
    pub description_localized: String,
    pub category: String,
    pub pricing: String,
    pub difficulty: String,
    pub rating: f64,
    pub overview: String,
    pub overview_localized: String,
    pub logo_url: Option<String>,
    pub featured_image: Option<String>,
    pub website_url: Option<String>,
    pub is_featured: bool,
    pub key_features: Vec<TextItemRecord>,
    pub pros: Vec<TextItemRecord>,
    pub cons: Vec<TextItemRecord>,
    pub usage_steps: Vec<TextItemRecord>,
    pub demos: Vec<ToolDemoRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn text_item_record(ctx: &SerializeContext<'_>, item: &TextItemRow) -> TextItemRecord {
    TextItemRecord {
        id: item.id,
        text: item.text.clone(),
        text_localized: ctx.text(&item.text, &item.text_ge),
        order: item.display_order,
    }
}

fn text_items(ctx: &SerializeContext<'_>, items: &[TextItemRow]) -> Vec<TextItemRecord> {
    let mut items = items.to_vec();
    sort_by_declared_order(&mut items);
    items.iter().map(|item| text_item_record(ctx, item)).collect()
}

/// Full tool record with its text lists and demos
pub fn tool_record(
    ctx: &SerializeContext<'_>,
    tool: &ToolRow,
    lists: &ToolTextLists,
    demos: &[ToolDemoRow],
) -> ToolRecord {
    let mut demos = demos.to_vec();
    sort_by_declared_order(&mut demos);

    ToolRecord {
        id: tool.id,
        name: tool.name.clone(),
        name_localized: ctx.text(&tool.name, &tool.name_ge),
        description: tool.description.clone(),
        description_localized: ctx.text(&tool.description, &tool.description_ge),
        category: tool.category.clone(),
        pricing: tool.pricing.clone(),
        difficulty: tool.difficulty.clone(),
        rating: tool.rating,
        overview: tool.overview.clone(),
        overview_localized: ctx.text(&tool.overview, &tool.overview_ge),
        logo_url: tool.logo_url.clone(),
        featured_image: ctx.media("featured_image", None, tool.featured_image.as_deref()),
        website_url: tool.website_url.clone(),
        is_featured: tool.is_featured,
        key_features: text_items(ctx, &lists.key_features),
        pros: text_items(ctx, &lists.pros),
        cons: text_items(ctx, &lists.cons),
        usage_steps: text_items(ctx, &lists.usage_steps),
        demos: demos.iter().map(|demo| demo_record(ctx, demo)).collect(),
        created_at: tool.created_at,
        updated_at: tool.updated_at,
    }
}
