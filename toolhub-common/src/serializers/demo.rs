use super::SerializeContext;
use crate::db::models::ToolDemoRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tool demo with every input/output media pair collapsed to one URL
#[derive(Debug, Clone, Serialize)]
pub struct ToolDemoRecord {
    pub id: i64,
    pub tool_id: i64,
    pub demo_type: String,
    pub title: String,
    pub title_localized: String,
    pub description: String,
    pub description_localized: String,
    pub order: i64,
    pub input_prompt: String,
    pub input_prompt_localized: String,
    pub input_image: Option<String>,
    pub input_audio: Option<String>,
    pub input_video: Option<String>,
    pub output_text: Option<String>,
    pub output_text_localized: Option<String>,
    pub output_image: Option<String>,
    pub output_audio: Option<String>,
    pub output_video: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn demo_record(ctx: &SerializeContext<'_>, demo: &ToolDemoRow) -> ToolDemoRecord {
    ToolDemoRecord {
        id: demo.id,
        tool_id: demo.tool_id,
        demo_type: demo.demo_type.clone(),
        title: demo.title.clone(),
        title_localized: ctx.text(&demo.title, &demo.title_ge),
        description: demo.description.clone(),
        description_localized: ctx.text(&demo.description, &demo.description_ge),
        order: demo.display_order,
        input_prompt: demo.input_prompt.clone(),
        input_prompt_localized: ctx.text(&demo.input_prompt, &demo.input_prompt_ge),
        input_image: ctx.media(
            "input_image",
            demo.input_image_url.as_deref(),
            demo.input_image_file.as_deref(),
        ),
        input_audio: ctx.media(
            "input_audio",
            demo.input_audio_url.as_deref(),
            demo.input_audio_file.as_deref(),
        ),
        input_video: ctx.media(
            "input_video",
            demo.input_video_url.as_deref(),
            demo.input_video_file.as_deref(),
        ),
        output_text: demo.output_text.clone(),
        output_text_localized: ctx.text_opt(
            demo.output_text.as_deref(),
            demo.output_text_ge.as_deref(),
        ),
        output_image: ctx.media(
            "output_image",
            demo.output_image_url.as_deref(),
            demo.output_image_file.as_deref(),
        ),
        output_audio: ctx.media(
            "output_audio",
            demo.output_audio_url.as_deref(),
            demo.output_audio_file.as_deref(),
        ),
        output_video: ctx.media(
            "output_video",
            demo.output_video_url.as_deref(),
            demo.output_video_file.as_deref(),
        ),
        created_at: demo.created_at,
        updated_at: demo.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{at, base, storage};
    use super::super::tool_record;
    use super::*;
    use crate::db::models::ToolRow;
    use crate::db::tools::ToolTextLists;
    use crate::locale::Locale;

    fn demo(id: i64, order: i64) -> ToolDemoRow {
        ToolDemoRow {
            id,
            tool_id: 1,
            demo_type: "text-to-image".to_string(),
            title: format!("Demo {}", id),
            title_ge: String::new(),
            description: String::new(),
            description_ge: String::new(),
            input_prompt: "A lighthouse at dusk".to_string(),
            input_prompt_ge: "შუქურა".to_string(),
            input_image_file: None,
            input_image_url: None,
            input_audio_file: None,
            input_audio_url: None,
            input_video_file: None,
            input_video_url: None,
            output_text: None,
            output_text_ge: None,
            output_image_file: Some("demo_outputs/lighthouse.png".to_string()),
            output_image_url: None,
            output_audio_file: None,
            output_audio_url: None,
            output_video_file: Some("demo_outputs/clip.mp4".to_string()),
            output_video_url: Some("https://video.example.com/clip".to_string()),
            display_order: order,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn test_demo_media_pairs() {
        let storage = storage();
        let base = base();
        let ctx = SerializeContext::new(&storage, Some(&base), Locale::Ka);

        let record = demo_record(&ctx, &demo(1, 0));

        assert_eq!(
            record.output_image.as_deref(),
            Some("https://tools.example.ge/media/demo_outputs/lighthouse.png")
        );
        assert_eq!(
            record.output_video.as_deref(),
            Some("https://video.example.com/clip"),
            "URL wins over the stored file"
        );
        assert_eq!(record.input_image, None);
        assert_eq!(record.input_audio, None);
        assert_eq!(record.output_text, None);
        assert_eq!(record.output_text_localized, None);
        assert_eq!(record.input_prompt_localized, "შუქურა");
        assert_eq!(record.title_localized, "Demo 1");
    }

    #[test]
    fn test_tool_demos_sorted_by_declared_order() {
        let storage = storage();
        let ctx = SerializeContext::new(&storage, None, Locale::En);
        let tool = ToolRow {
            id: 1,
            name: "Tool".to_string(),
            name_ge: String::new(),
            description: "d".to_string(),
            description_ge: String::new(),
            category: "Other".to_string(),
            overview: String::new(),
            overview_ge: String::new(),
            logo_url: None,
            featured_image: None,
            pricing: "Free".to_string(),
            difficulty: "Beginner".to_string(),
            rating: 0.0,
            website_url: None,
            is_featured: false,
            created_at: at(0),
            updated_at: at(0),
        };

        let demos = vec![demo(10, 2), demo(11, 0), demo(12, 1)];
        let record = tool_record(&ctx, &tool, &ToolTextLists::default(), &demos);

        let orders: Vec<i64> = record.demos.iter().map(|d| d.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(record.demos[0].id, 11);
        assert_eq!(record.featured_image, None);
    }
}
