//! Tool demo persistence

use super::inputs::ToolDemoInput;
use super::models::ToolDemoRow;
use crate::ordering::sort_by_declared_order;
use crate::{Error, Result};
use chrono::Utc;
use sqlx::SqlitePool;

/// Demos of a tool in declared order
pub async fn list_demos(pool: &SqlitePool, tool_id: i64) -> Result<Vec<ToolDemoRow>> {
    let mut demos = sqlx::query_as::<_, ToolDemoRow>(
        "SELECT * FROM tool_demos WHERE tool_id = ? ORDER BY display_order ASC, created_at ASC, id ASC",
    )
    .bind(tool_id)
    .fetch_all(pool)
    .await?;

    sort_by_declared_order(&mut demos);
    Ok(demos)
}

pub async fn get_demo(pool: &SqlitePool, id: i64) -> Result<Option<ToolDemoRow>> {
    let demo = sqlx::query_as::<_, ToolDemoRow>("SELECT * FROM tool_demos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(demo)
}

/// Insert a validated demo for `tool_id`; returns the new id
pub async fn create_demo(pool: &SqlitePool, tool_id: i64, input: &ToolDemoInput) -> Result<i64> {
    if !super::tools::tool_exists(pool, tool_id).await? {
        return Err(Error::NotFound(format!("Tool {} not found", tool_id)));
    }

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO tool_demos (
            tool_id, demo_type, title, title_ge, description, description_ge,
            input_prompt, input_prompt_ge,
            input_image_file, input_image_url, input_audio_file, input_audio_url,
            input_video_file, input_video_url,
            output_text, output_text_ge,
            output_image_file, output_image_url, output_audio_file, output_audio_url,
            output_video_file, output_video_url,
            display_order, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tool_id)
    .bind(&input.demo_type)
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.description)
    .bind(&input.description_ge)
    .bind(&input.input_prompt)
    .bind(&input.input_prompt_ge)
    .bind(&input.input_image_file)
    .bind(&input.input_image_url)
    .bind(&input.input_audio_file)
    .bind(&input.input_audio_url)
    .bind(&input.input_video_file)
    .bind(&input.input_video_url)
    .bind(&input.output_text)
    .bind(&input.output_text_ge)
    .bind(&input.output_image_file)
    .bind(&input.output_image_url)
    .bind(&input.output_audio_file)
    .bind(&input.output_audio_url)
    .bind(&input.output_video_file)
    .bind(&input.output_video_url)
    .bind(input.order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Replace a demo's fields; `false` when it does not exist
pub async fn update_demo(pool: &SqlitePool, id: i64, input: &ToolDemoInput) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE tool_demos SET
            demo_type = ?, title = ?, title_ge = ?, description = ?, description_ge = ?,
            input_prompt = ?, input_prompt_ge = ?,
            input_image_file = ?, input_image_url = ?, input_audio_file = ?, input_audio_url = ?,
            input_video_file = ?, input_video_url = ?,
            output_text = ?, output_text_ge = ?,
            output_image_file = ?, output_image_url = ?, output_audio_file = ?, output_audio_url = ?,
            output_video_file = ?, output_video_url = ?,
            display_order = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.demo_type)
    .bind(&input.title)
    .bind(&input.title_ge)
    .bind(&input.description)
    .bind(&input.description_ge)
    .bind(&input.input_prompt)
    .bind(&input.input_prompt_ge)
    .bind(&input.input_image_file)
    .bind(&input.input_image_url)
    .bind(&input.input_audio_file)
    .bind(&input.input_audio_url)
    .bind(&input.input_video_file)
    .bind(&input.input_video_url)
    .bind(&input.output_text)
    .bind(&input.output_text_ge)
    .bind(&input.output_image_file)
    .bind(&input.output_image_url)
    .bind(&input.output_audio_file)
    .bind(&input.output_audio_url)
    .bind(&input.output_video_file)
    .bind(&input.output_video_url)
    .bind(input.order)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_demo(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tool_demos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
