//! Allowed values of enumerated text columns

use crate::{Error, Result};

pub const TOOL_CATEGORIES: &[&str] = &[
    "Writing",
    "Design",
    "Presentation",
    "Productivity",
    "Image Generation",
    "Video Editing",
    "Code Assistant",
    "Voice & Audio",
    "Research",
    "Marketing",
    "Data Analysis",
    "Education",
    "Business",
    "Music & Audio",
    "3D & Animation",
    "Translation",
    "Customer Service",
    "Content Creation",
    "Other",
];

pub const PRICING: &[&str] = &["Free", "Freemium", "Paid", "Enterprise"];

pub const DIFFICULTY: &[&str] = &["Beginner", "Intermediate", "Advanced"];

pub const DEMO_TYPES: &[&str] = &[
    "text-to-text",
    "text-to-image",
    "text-to-video",
    "text-to-audio",
    "image-to-image",
    "image-to-video",
    "image-to-text",
    "audio-to-text",
    "video-to-text",
    "multi-modal",
    "other",
];

pub const BLOG_CATEGORIES: &[&str] = &[
    "AI Tools",
    "Tutorials",
    "Reviews",
    "Updates",
    "Case Studies",
    "Productivity",
    "Education",
];

pub const NEWS_CATEGORIES: &[&str] = &[
    "Product Launch",
    "Feature Update",
    "Industry News",
    "Company Announcement",
    "Research",
    "Events",
];

/// Reject `value` unless it is one of `allowed` (exact match)
pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{}: \"{}\" is not a valid choice",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_choice() {
        assert!(validate_choice("pricing", "Freemium", PRICING).is_ok());
        assert!(validate_choice("pricing", "freemium", PRICING).is_err());
        assert!(validate_choice("demo_type", "multi-modal", DEMO_TYPES).is_ok());
        assert!(validate_choice("category", "", TOOL_CATEGORIES).is_err());
    }
}
