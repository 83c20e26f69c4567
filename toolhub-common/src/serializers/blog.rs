use super::SerializeContext;
use crate::db::models::{BlogPostImageRow, BlogPostRow};
use crate::ordering::sort_by_declared_order;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BlogImageRecord {
    pub id: i64,
    pub image: Option<String>,
    pub caption: String,
    pub caption_localized: String,
    pub alt_text: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostRecord {
    pub id: i64,
    pub title: String,
    pub title_localized: String,
    pub excerpt: String,
    pub excerpt_localized: String,
    pub content: String,
    pub content_localized: String,
    pub author: String,
    pub author_avatar: Option<String>,
    pub author_bio: String,
    pub author_bio_localized: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub images: Vec<BlogImageRecord>,
    pub views: i64,
    pub read_time: Option<i64>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn blog_image_record(ctx: &SerializeContext<'_>, image: &BlogPostImageRow) -> BlogImageRecord {
    BlogImageRecord {
        id: image.id,
        image: ctx.media("image", None, Some(&image.image)),
        caption: image.caption.clone(),
        caption_localized: ctx.text(&image.caption, &image.caption_ge),
        alt_text: image.alt_text.clone(),
        order: image.display_order,
    }
}

pub fn blog_post_record(
    ctx: &SerializeContext<'_>,
    post: &BlogPostRow,
    images: &[BlogPostImageRow],
) -> BlogPostRecord {
    let mut images = images.to_vec();
    sort_by_declared_order(&mut images);

    BlogPostRecord {
        id: post.id,
        title: post.title.clone(),
        title_localized: ctx.text(&post.title, &post.title_ge),
        excerpt: post.excerpt.clone(),
        excerpt_localized: ctx.text(&post.excerpt, &post.excerpt_ge),
        content: post.content.clone(),
        content_localized: ctx.text(&post.content, &post.content_ge),
        author: post.author.clone(),
        author_avatar: post.author_avatar.clone(),
        author_bio: post.author_bio.clone(),
        author_bio_localized: ctx.text(&post.author_bio, &post.author_bio_ge),
        category: post.category.clone(),
        tags: post.tags.0.clone(),
        featured_image: ctx.media("featured_image", None, post.featured_image.as_deref()),
        images: images.iter().map(|image| blog_image_record(ctx, image)).collect(),
        views: post.views,
        read_time: post.read_time,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
