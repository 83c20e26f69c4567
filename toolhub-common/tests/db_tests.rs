//! Database initialization and query tests on a temporary SQLite file

use serde_json::json;
use sqlx::SqlitePool;
use toolhub_common::config::AdminCredentials;
use toolhub_common::db::authors::{self, AUTHOR_DEFAULT_SORT};
use toolhub_common::db::blog::{self, BlogFilter};
use toolhub_common::db::init::{init_database, CURRENT_SCHEMA_VERSION};
use toolhub_common::db::news::{self, NewsFilter};
use toolhub_common::db::tools::{self, ToolFilter};
use toolhub_common::db::{demos, users, Sort, Window};
use toolhub_common::db::{
    AuthorInput, BlogPostImageInput, BlogPostInput, NewsInput, ToolDemoInput, ToolInput,
};

async fn setup() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("toolhub.db")).await.unwrap();
    (dir, pool)
}

fn tool_input(name: &str, rating: f64) -> ToolInput {
    let mut input: ToolInput = serde_json::from_value(json!({
        "name": name,
        "description": format!("{} description", name),
        "category": "Writing",
        "pricing": "Free",
        "difficulty": "Beginner",
        "rating": rating,
        "key_features": [
            {"text": "third", "order": 2},
            {"text": "first", "order": 0},
            {"text": "second", "order": 1}
        ],
        "pros": [{"text": "Fast", "text_ge": "სწრაფი"}]
    }))
    .unwrap();
    input.validate().unwrap();
    input
}

fn blog_input(title: &str, published: bool) -> BlogPostInput {
    let mut input: BlogPostInput = serde_json::from_value(json!({
        "title": title,
        "content": "Body text about agents",
        "author": "Nino",
        "category": "Tutorials",
        "tags": ["agents"],
        "published": published
    }))
    .unwrap();
    input.validate().unwrap();
    input
}

#[tokio::test]
async fn test_database_creation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("toolhub.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists());
    drop(pool);

    let pool = init_database(&db_path).await.unwrap();
    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);

    for table in [
        "users", "sessions", "tools", "key_features", "pros", "cons", "usage_steps",
        "tool_demos", "blog_posts", "blog_post_images", "news", "authors",
    ] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_tool_lifecycle_and_cascade() {
    let (_dir, pool) = setup().await;

    let id = tools::create_tool(&pool, &tool_input("Writer", 4.0)).await.unwrap();
    let lists = tools::load_text_lists(&pool, id).await.unwrap();

    let features: Vec<&str> = lists.key_features.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(features, vec!["first", "second", "third"]);
    assert_eq!(lists.pros[0].text_ge, "სწრაფი");
    assert!(lists.cons.is_empty());

    let mut demo: ToolDemoInput = serde_json::from_value(json!({
        "demo_type": "text-to-text",
        "title": "Summary",
        "order": 0
    }))
    .unwrap();
    demo.validate().unwrap();
    demos::create_demo(&pool, id, &demo).await.unwrap();

    // Update without lists keeps the stored ones
    let mut update = tool_input("Writer Pro", 4.5);
    update.key_features = None;
    assert!(tools::update_tool(&pool, id, &update).await.unwrap());
    let lists = tools::load_text_lists(&pool, id).await.unwrap();
    assert_eq!(lists.key_features.len(), 3);

    assert!(tools::delete_tool(&pool, id).await.unwrap());
    assert!(demos::list_demos(&pool, id).await.unwrap().is_empty());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM key_features")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_tool_filters_and_ordering() {
    let (_dir, pool) = setup().await;

    tools::create_tool(&pool, &tool_input("Alpha", 3.0)).await.unwrap();
    tools::create_tool(&pool, &tool_input("Beta", 5.0)).await.unwrap();
    tools::create_tool(&pool, &tool_input("Gamma_50%", 1.0)).await.unwrap();

    let filter = ToolFilter {
        sort: Sort::desc("rating"),
        ..Default::default()
    };
    let names: Vec<String> = tools::list_tools(&pool, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Beta", "Alpha", "Gamma_50%"]);

    let filter = ToolFilter {
        search: Some("50%".to_string()),
        ..Default::default()
    };
    assert_eq!(tools::list_tools(&pool, &filter).await.unwrap().len(), 1);

    let filter = ToolFilter {
        sort: Sort::asc("name"),
        limit: Some(2),
        ..Default::default()
    };
    assert_eq!(tools::list_tools(&pool, &filter).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_demo_requires_existing_tool() {
    let (_dir, pool) = setup().await;

    let demo: ToolDemoInput = serde_json::from_value(json!({
        "demo_type": "other",
        "title": "Orphan"
    }))
    .unwrap();

    assert!(demos::create_demo(&pool, 999, &demo).await.is_err());
}

#[tokio::test]
async fn test_blog_published_filter_and_views() {
    let (_dir, pool) = setup().await;

    let public_id = blog::create_blog_post(&pool, &blog_input("Public", true)).await.unwrap();
    let draft_id = blog::create_blog_post(&pool, &blog_input("Draft", false)).await.unwrap();

    let filter = BlogFilter::default();
    assert_eq!(blog::count_blog_posts(&pool, &filter).await.unwrap(), 1);
    assert!(blog::get_blog_post(&pool, draft_id, false).await.unwrap().is_none());
    assert!(blog::get_blog_post(&pool, draft_id, true).await.unwrap().is_some());

    let staff = BlogFilter {
        include_unpublished: true,
        ..Default::default()
    };
    assert_eq!(blog::count_blog_posts(&pool, &staff).await.unwrap(), 2);

    assert!(blog::increment_views(&pool, public_id).await.unwrap());
    assert!(blog::increment_views(&pool, public_id).await.unwrap());
    assert!(!blog::increment_views(&pool, draft_id).await.unwrap());

    let post = blog::get_blog_post(&pool, public_id, false).await.unwrap().unwrap();
    assert_eq!(post.views, 2);
    assert_eq!(post.tags.0, vec!["agents".to_string()]);

    let search = BlogFilter {
        search: Some("agents".to_string()),
        ..Default::default()
    };
    let found = blog::list_blog_posts(&pool, &search, Window { limit: 10, offset: 0 })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_blog_images_in_declared_order() {
    let (_dir, pool) = setup().await;
    let post_id = blog::create_blog_post(&pool, &blog_input("Gallery", true)).await.unwrap();

    for (name, order) in [("c.jpg", 2), ("a.jpg", 0), ("b.jpg", 1)] {
        let mut image: BlogPostImageInput = serde_json::from_value(json!({
            "image": format!("blog_images/{}", name),
            "order": order
        }))
        .unwrap();
        image.validate().unwrap();
        blog::add_image(&pool, post_id, &image).await.unwrap();
    }

    let images = blog::list_images(&pool, post_id).await.unwrap();
    let orders: Vec<i64> = images.iter().map(|i| i.display_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(images[0].image, "blog_images/a.jpg");
}

#[tokio::test]
async fn test_news_pagination_window() {
    let (_dir, pool) = setup().await;

    for i in 0..5 {
        let mut input: NewsInput = serde_json::from_value(json!({
            "title": format!("Item {}", i),
            "summary": "Summary",
            "category": "Research",
            "source": "Lab"
        }))
        .unwrap();
        input.validate().unwrap();
        news::create_news(&pool, &input).await.unwrap();
    }

    let filter = NewsFilter::default();
    assert_eq!(news::count_news(&pool, &filter).await.unwrap(), 5);

    let page = news::list_news(&pool, &filter, Window { limit: 2, offset: 4 })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_author_slug_is_unique() {
    let (_dir, pool) = setup().await;

    let mut input: AuthorInput = serde_json::from_value(json!({
        "name": "Nino",
        "slug": "nino"
    }))
    .unwrap();
    input.validate().unwrap();

    authors::create_author(&pool, &input).await.unwrap();
    let err = authors::create_author(&pool, &input).await.unwrap_err();
    assert!(err.is_unique_violation());

    let found = authors::get_author_by_slug(&pool, "nino").await.unwrap();
    assert_eq!(found.map(|a| a.name), Some("Nino".to_string()));

    let all = authors::list_authors(&pool, Some("ni"), AUTHOR_DEFAULT_SORT, Window { limit: 10, offset: 0 })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_users_and_sessions() {
    let (_dir, pool) = setup().await;
    let admin = AdminCredentials {
        username: "admin".to_string(),
        password: "s3cret".to_string(),
    };

    assert!(users::ensure_admin(&pool, &admin).await.unwrap());
    assert!(!users::ensure_admin(&pool, &admin).await.unwrap());

    assert!(users::authenticate(&pool, "admin", "wrong").await.unwrap().is_none());
    assert!(users::authenticate(&pool, "nobody", "s3cret").await.unwrap().is_none());
    let user = users::authenticate(&pool, "admin", "s3cret").await.unwrap().unwrap();
    assert!(user.is_staff);

    let (token, expires_at) = users::create_session(&pool, &user.guid, 1).await.unwrap();
    assert!(expires_at > chrono::Utc::now());

    let found = users::find_session_user(&pool, &token).await.unwrap();
    assert_eq!(found.map(|u| u.username), Some("admin".to_string()));

    assert!(users::revoke_session(&pool, &token).await.unwrap());
    assert!(users::find_session_user(&pool, &token).await.unwrap().is_none());

    // A zero-hour session is already expired
    let (expired, _) = users::create_session(&pool, &user.guid, 0).await.unwrap();
    assert!(users::find_session_user(&pool, &expired).await.unwrap().is_none());
    assert_eq!(users::purge_expired_sessions(&pool).await.unwrap(), 1);
}
