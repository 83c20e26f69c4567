//! Write payloads for record create/update
//!
//! Payloads are deserialized from request bodies, then checked with
//! `validate()` before touching the database. Media file fields hold a file
//! name relative to the media root (uploading happens out of band).

use super::choices::{
    validate_choice, BLOG_CATEGORIES, DEMO_TYPES, DIFFICULTY, NEWS_CATEGORIES, PRICING,
    TOOL_CATEGORIES,
};
use crate::{Error, Result};
use serde::Deserialize;
use url::Url;

fn default_true() -> bool {
    true
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{}: this field may not be blank", field)));
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::InvalidInput(format!(
            "{}: ensure this field has no more than {} characters",
            field, max
        )));
    }
    Ok(())
}

/// External links must be absolute `http(s)` URLs with a host
fn validate_url(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(raw) = value {
        let valid = !raw.contains(char::is_whitespace)
            && Url::parse(raw)
                .ok()
                .filter(|u| matches!(u.scheme(), "http" | "https"))
                .is_some_and(|u| u.host_str().is_some_and(|host| !host.is_empty()));
        if !valid {
            return Err(Error::InvalidInput(format!("{}: enter a valid URL", field)));
        }
    }
    Ok(())
}

/// Stored file names are relative to the media root and may not escape it
fn validate_file_name(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(name) = value {
        if name.starts_with('/')
            || name.contains('\\')
            || name.split('/').any(|segment| segment == "..")
        {
            return Err(Error::InvalidInput(format!(
                "{}: file name must be relative to the media root",
                field
            )));
        }
    }
    Ok(())
}

fn validate_order(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(Error::InvalidInput(format!("{}: order must be zero or positive", field)));
    }
    Ok(())
}

/// Blank optional strings are stored as NULL
fn blank_to_none(value: &mut Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            *value = None;
        } else if trimmed.len() != v.len() {
            *value = Some(trimmed.to_string());
        }
    }
}

/// A key feature, pro, con or usage step
#[derive(Debug, Clone, Deserialize)]
pub struct TextItemInput {
    pub text: String,
    #[serde(default)]
    pub text_ge: String,
    /// Defaults to the item's position in the submitted list
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolInput {
    pub name: String,
    #[serde(default)]
    pub name_ge: String,
    pub description: String,
    #[serde(default)]
    pub description_ge: String,
    pub category: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub overview_ge: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub pricing: String,
    pub difficulty: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    /// Nested lists replace the stored ones when present
    #[serde(default)]
    pub key_features: Option<Vec<TextItemInput>>,
    #[serde(default)]
    pub pros: Option<Vec<TextItemInput>>,
    #[serde(default)]
    pub cons: Option<Vec<TextItemInput>>,
    #[serde(default)]
    pub usage_steps: Option<Vec<TextItemInput>>,
}

impl ToolInput {
    /// Validate and normalize in place
    pub fn validate(&mut self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        max_len("name", &self.name, 200)?;
        max_len("name_ge", &self.name_ge, 200)?;
        require_non_empty("description", &self.description)?;
        validate_choice("category", &self.category, TOOL_CATEGORIES)?;
        validate_choice("pricing", &self.pricing, PRICING)?;
        validate_choice("difficulty", &self.difficulty, DIFFICULTY)?;

        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(Error::InvalidInput(
                "rating: must be between 0 and 5".to_string(),
            ));
        }

        blank_to_none(&mut self.logo_url);
        blank_to_none(&mut self.website_url);
        blank_to_none(&mut self.featured_image);
        validate_url("logo_url", self.logo_url.as_deref())?;
        validate_url("website_url", self.website_url.as_deref())?;
        validate_file_name("featured_image", self.featured_image.as_deref())?;

        for (field, items) in [
            ("key_features", &self.key_features),
            ("pros", &self.pros),
            ("cons", &self.cons),
            ("usage_steps", &self.usage_steps),
        ] {
            for item in items.iter().flatten() {
                require_non_empty(field, &item.text)?;
                max_len(field, &item.text, 255)?;
                max_len(field, &item.text_ge, 255)?;
                if let Some(order) = item.order {
                    validate_order(field, order)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolDemoInput {
    pub demo_type: String,
    pub title: String,
    #[serde(default)]
    pub title_ge: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_ge: String,
    #[serde(default)]
    pub input_prompt: String,
    #[serde(default)]
    pub input_prompt_ge: String,
    #[serde(default)]
    pub input_image_file: Option<String>,
    #[serde(default)]
    pub input_image_url: Option<String>,
    #[serde(default)]
    pub input_audio_file: Option<String>,
    #[serde(default)]
    pub input_audio_url: Option<String>,
    #[serde(default)]
    pub input_video_file: Option<String>,
    #[serde(default)]
    pub input_video_url: Option<String>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output_text_ge: Option<String>,
    #[serde(default)]
    pub output_image_file: Option<String>,
    #[serde(default)]
    pub output_image_url: Option<String>,
    #[serde(default)]
    pub output_audio_file: Option<String>,
    #[serde(default)]
    pub output_audio_url: Option<String>,
    #[serde(default)]
    pub output_video_file: Option<String>,
    #[serde(default)]
    pub output_video_url: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl ToolDemoInput {
    pub fn validate(&mut self) -> Result<()> {
        validate_choice("demo_type", &self.demo_type, DEMO_TYPES)?;
        require_non_empty("title", &self.title)?;
        max_len("title", &self.title, 255)?;
        max_len("title_ge", &self.title_ge, 255)?;
        validate_order("order", self.order)?;

        for (field, value) in [
            ("input_image_url", &mut self.input_image_url),
            ("input_audio_url", &mut self.input_audio_url),
            ("input_video_url", &mut self.input_video_url),
            ("output_image_url", &mut self.output_image_url),
            ("output_audio_url", &mut self.output_audio_url),
            ("output_video_url", &mut self.output_video_url),
        ] {
            blank_to_none(value);
            validate_url(field, value.as_deref())?;
        }

        for (field, value) in [
            ("input_image_file", &mut self.input_image_file),
            ("input_audio_file", &mut self.input_audio_file),
            ("input_video_file", &mut self.input_video_file),
            ("output_image_file", &mut self.output_image_file),
            ("output_audio_file", &mut self.output_audio_file),
            ("output_video_file", &mut self.output_video_file),
        ] {
            blank_to_none(value);
            validate_file_name(field, value.as_deref())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    #[serde(default)]
    pub title_ge: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub excerpt_ge: String,
    pub content: String,
    #[serde(default)]
    pub content_ge: String,
    pub author: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub author_bio: String,
    #[serde(default)]
    pub author_bio_ge: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub read_time: Option<i64>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl BlogPostInput {
    pub fn validate(&mut self) -> Result<()> {
        require_non_empty("title", &self.title)?;
        max_len("title", &self.title, 300)?;
        max_len("title_ge", &self.title_ge, 300)?;
        max_len("excerpt", &self.excerpt, 500)?;
        max_len("excerpt_ge", &self.excerpt_ge, 500)?;
        require_non_empty("content", &self.content)?;
        require_non_empty("author", &self.author)?;
        max_len("author", &self.author, 200)?;
        validate_choice("category", &self.category, BLOG_CATEGORIES)?;

        if let Some(minutes) = self.read_time {
            if minutes < 0 {
                return Err(Error::InvalidInput(
                    "read_time: must be zero or positive".to_string(),
                ));
            }
        }

        self.tags.retain(|tag| !tag.trim().is_empty());
        blank_to_none(&mut self.author_avatar);
        blank_to_none(&mut self.featured_image);
        validate_url("author_avatar", self.author_avatar.as_deref())?;
        validate_file_name("featured_image", self.featured_image.as_deref())?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostImageInput {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub caption_ge: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub order: i64,
}

impl BlogPostImageInput {
    pub fn validate(&mut self) -> Result<()> {
        require_non_empty("image", &self.image)?;
        self.image = self.image.trim().to_string();
        validate_file_name("image", Some(&self.image))?;
        max_len("caption", &self.caption, 255)?;
        max_len("caption_ge", &self.caption_ge, 255)?;
        max_len("alt_text", &self.alt_text, 255)?;
        validate_order("order", self.order)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsInput {
    pub title: String,
    #[serde(default)]
    pub title_ge: String,
    pub summary: String,
    #[serde(default)]
    pub summary_ge: String,
    pub category: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl NewsInput {
    pub fn validate(&mut self) -> Result<()> {
        require_non_empty("title", &self.title)?;
        max_len("title", &self.title, 300)?;
        max_len("title_ge", &self.title_ge, 300)?;
        require_non_empty("summary", &self.summary)?;
        max_len("summary", &self.summary, 500)?;
        max_len("summary_ge", &self.summary_ge, 500)?;
        validate_choice("category", &self.category, NEWS_CATEGORIES)?;
        max_len("source", &self.source, 200)?;

        self.tags.retain(|tag| !tag.trim().is_empty());
        blank_to_none(&mut self.external_url);
        validate_url("external_url", self.external_url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub bio_ge: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub personal_website: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl AuthorInput {
    pub fn validate(&mut self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        max_len("name", &self.name, 200)?;
        max_len("location", &self.location, 200)?;

        self.slug = self.slug.trim().to_string();
        let slug_ok = !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !slug_ok {
            return Err(Error::InvalidInput(
                "slug: use only letters, numbers, underscores or hyphens".to_string(),
            ));
        }

        blank_to_none(&mut self.profile_image);
        validate_file_name("profile_image", self.profile_image.as_deref())?;

        for (field, value) in [
            ("linkedin_url", &mut self.linkedin_url),
            ("twitter_url", &mut self.twitter_url),
            ("instagram_url", &mut self.instagram_url),
            ("github_url", &mut self.github_url),
            ("personal_website", &mut self.personal_website),
        ] {
            blank_to_none(value);
            validate_url(field, value.as_deref())?;
        }

        Ok(())
    }
}
