//! Database row models
//!
//! One struct per table, decoded with `sqlx::FromRow`. Secondary-language
//! columns carry the `_ge` suffix; declared order is `display_order`.

use crate::ordering::DeclaredOrder;
use chrono::{DateTime, Utc};
use sqlx::types::Json;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ToolRow {
    pub id: i64,
    pub name: String,
    pub name_ge: String,
    pub description: String,
    pub description_ge: String,
    pub category: String,
    pub overview: String,
    pub overview_ge: String,
    pub logo_url: Option<String>,
    pub featured_image: Option<String>,
    pub pricing: String,
    pub difficulty: String,
    pub rating: f64,
    pub website_url: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Key feature, pro, con or usage step of a tool
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TextItemRow {
    pub id: i64,
    pub tool_id: i64,
    pub text: String,
    pub text_ge: String,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ToolDemoRow {
    pub id: i64,
    pub tool_id: i64,
    pub demo_type: String,
    pub title: String,
    pub title_ge: String,
    pub description: String,
    pub description_ge: String,
    pub input_prompt: String,
    pub input_prompt_ge: String,
    pub input_image_file: Option<String>,
    pub input_image_url: Option<String>,
    pub input_audio_file: Option<String>,
    pub input_audio_url: Option<String>,
    pub input_video_file: Option<String>,
    pub input_video_url: Option<String>,
    pub output_text: Option<String>,
    pub output_text_ge: Option<String>,
    pub output_image_file: Option<String>,
    pub output_image_url: Option<String>,
    pub output_audio_file: Option<String>,
    pub output_audio_url: Option<String>,
    pub output_video_file: Option<String>,
    pub output_video_url: Option<String>,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: i64,
    pub title: String,
    pub title_ge: String,
    pub excerpt: String,
    pub excerpt_ge: String,
    pub content: String,
    pub content_ge: String,
    pub author: String,
    pub author_avatar: Option<String>,
    pub author_bio: String,
    pub author_bio_ge: String,
    pub category: String,
    pub tags: Json<Vec<String>>,
    pub featured_image: Option<String>,
    pub views: i64,
    pub read_time: Option<i64>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPostImageRow {
    pub id: i64,
    pub blog_post_id: i64,
    pub image: String,
    pub caption: String,
    pub caption_ge: String,
    pub alt_text: String,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsRow {
    pub id: i64,
    pub title: String,
    pub title_ge: String,
    pub summary: String,
    pub summary_ge: String,
    pub category: String,
    pub source: String,
    pub external_url: Option<String>,
    pub tags: Json<Vec<String>>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub bio: String,
    pub bio_ge: String,
    pub profile_image: Option<String>,
    pub location: String,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub github_url: Option<String>,
    pub personal_website: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub guid: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl DeclaredOrder for TextItemRow {
    fn declared_order(&self) -> i64 {
        self.display_order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> i64 {
        self.id
    }
}

impl DeclaredOrder for ToolDemoRow {
    fn declared_order(&self) -> i64 {
        self.display_order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> i64 {
        self.id
    }
}

impl DeclaredOrder for BlogPostImageRow {
    fn declared_order(&self) -> i64 {
        self.display_order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> i64 {
        self.id
    }
}
