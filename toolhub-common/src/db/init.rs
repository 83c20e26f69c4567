//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates every table
//! idempotently. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Schema version written to `schema_version` by this build
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas set on the connect options apply to every pooled connection
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema_version_table(&pool).await?;
    create_users_table(&pool).await?;
    create_sessions_table(&pool).await?;

    create_tools_table(&pool).await?;
    create_tool_text_tables(&pool).await?;
    create_tool_demos_table(&pool).await?;

    create_blog_posts_table(&pool).await?;
    create_blog_post_images_table(&pool).await?;
    create_news_table(&pool).await?;
    create_authors_table(&pool).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(&pool)
        .await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL DEFAULT '',
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            is_staff BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            user_guid TEXT NOT NULL REFERENCES users(guid) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL,
            expires_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_tools_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tools (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            name_ge TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            description_ge TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            overview TEXT NOT NULL DEFAULT '',
            overview_ge TEXT NOT NULL DEFAULT '',
            logo_url TEXT,
            featured_image TEXT,
            pricing TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            rating REAL NOT NULL DEFAULT 0 CHECK (rating >= 0 AND rating <= 5),
            website_url TEXT,
            is_featured BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Key features, pros, cons and usage steps share one layout
async fn create_tool_text_tables(pool: &SqlitePool) -> Result<()> {
    for list in super::tools::TextList::ALL {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
                {column} TEXT NOT NULL,
                {column_ge} TEXT NOT NULL DEFAULT '',
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL
            )
            "#,
            table = list.table(),
            column = list.column(),
            column_ge = list.secondary_column(),
        );
        sqlx::query(&sql).execute(pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_tool ON {table}(tool_id)",
            table = list.table()
        );
        sqlx::query(&index).execute(pool).await?;
    }

    Ok(())
}

async fn create_tool_demos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tool_demos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
            demo_type TEXT NOT NULL,
            title TEXT NOT NULL,
            title_ge TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            description_ge TEXT NOT NULL DEFAULT '',
            input_prompt TEXT NOT NULL DEFAULT '',
            input_prompt_ge TEXT NOT NULL DEFAULT '',
            input_image_file TEXT,
            input_image_url TEXT,
            input_audio_file TEXT,
            input_audio_url TEXT,
            input_video_file TEXT,
            input_video_url TEXT,
            output_text TEXT,
            output_text_ge TEXT,
            output_image_file TEXT,
            output_image_url TEXT,
            output_audio_file TEXT,
            output_audio_url TEXT,
            output_video_file TEXT,
            output_video_url TEXT,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tool_demos_tool ON tool_demos(tool_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_blog_posts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            title_ge TEXT NOT NULL DEFAULT '',
            excerpt TEXT NOT NULL DEFAULT '',
            excerpt_ge TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            content_ge TEXT NOT NULL DEFAULT '',
            author TEXT NOT NULL,
            author_avatar TEXT,
            author_bio TEXT NOT NULL DEFAULT '',
            author_bio_ge TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            featured_image TEXT,
            views INTEGER NOT NULL DEFAULT 0,
            read_time INTEGER,
            published BOOLEAN NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_blog_post_images_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_post_images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            blog_post_id INTEGER NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
            image TEXT NOT NULL,
            caption TEXT NOT NULL DEFAULT '',
            caption_ge TEXT NOT NULL DEFAULT '',
            alt_text TEXT NOT NULL DEFAULT '',
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_blog_post_images_post ON blog_post_images(blog_post_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_news_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS news (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            title_ge TEXT NOT NULL DEFAULT '',
            summary TEXT NOT NULL,
            summary_ge TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT '',
            external_url TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            published BOOLEAN NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_authors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            bio TEXT NOT NULL DEFAULT '',
            bio_ge TEXT NOT NULL DEFAULT '',
            profile_image TEXT,
            location TEXT NOT NULL DEFAULT '',
            linkedin_url TEXT,
            twitter_url TEXT,
            instagram_url TEXT,
            github_url TEXT,
            personal_website TEXT,
            is_verified BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
