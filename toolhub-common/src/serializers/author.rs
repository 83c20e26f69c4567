use super::SerializeContext;
use crate::db::models::AuthorRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AuthorRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub bio: String,
    pub bio_localized: String,
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

pub fn author_record(ctx: &SerializeContext<'_>, author: &AuthorRow) -> AuthorRecord {
    AuthorRecord {
        id: author.id,
        name: author.name.clone(),
        slug: author.slug.clone(),
        bio: author.bio.clone(),
        bio_localized: ctx.text(&author.bio, &author.bio_ge),
        profile_image: ctx.media("profile_image", None, author.profile_image.as_deref()),
        location: author.location.clone(),
        linkedin_url: author.linkedin_url.clone(),
        twitter_url: author.twitter_url.clone(),
        instagram_url: author.instagram_url.clone(),
        github_url: author.github_url.clone(),
        personal_website: author.personal_website.clone(),
        is_verified: author.is_verified,
        created_at: author.created_at,
    }
}
