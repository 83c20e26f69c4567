//! Public record serialization
//!
//! Turns database rows into the JSON records returned by the API. Every
//! translatable field is emitted twice (`field` and `field_localized`),
//! every media pair is collapsed into one resolved URL, and nested lists are
//! emitted in declared order.
//!
//! The request-dependent inputs (locale, base URL, media storage) arrive in
//! an explicit [`SerializeContext`]; nothing here reads global state.

mod author;
mod blog;
mod demo;
mod news;
mod tool;

pub use author::{author_record, AuthorRecord};
pub use blog::{blog_image_record, blog_post_record, BlogImageRecord, BlogPostRecord};
pub use demo::{demo_record, ToolDemoRecord};
pub use news::{news_record, NewsRecord};
pub use tool::{text_item_record, tool_record, TextItemRecord, ToolRecord};

use crate::locale::{localized, localized_opt, Locale};
use crate::media::{resolve_media, BaseUrl, FileRef, MediaStorage};
use tracing::debug;

/// Per-request inputs of serialization
#[derive(Clone, Copy)]
pub struct SerializeContext<'a> {
    pub storage: &'a dyn MediaStorage,
    pub base: Option<&'a BaseUrl>,
    pub locale: Locale,
}

impl<'a> SerializeContext<'a> {
    pub fn new(storage: &'a dyn MediaStorage, base: Option<&'a BaseUrl>, locale: Locale) -> Self {
        Self { storage, base, locale }
    }

    /// Localized value of a base/`_ge` pair
    pub fn text(&self, base: &str, secondary: &str) -> String {
        localized(base, Some(secondary), self.locale)
    }

    pub fn text_opt(&self, base: Option<&str>, secondary: Option<&str>) -> Option<String> {
        localized_opt(base, secondary, self.locale)
    }

    /// Resolve a media field; `field` only names it in logs
    ///
    /// A stored file that cannot be resolved yields `None` and a debug line.
    pub fn media(&self, field: &str, url: Option<&str>, file: Option<&str>) -> Option<String> {
        let resolved = resolve_media(
            url,
            file.map(|name| FileRef::new(name, self.storage)),
            self.base,
        );

        if resolved.is_none() {
            if let Some(name) = file.filter(|name| !name.trim().is_empty()) {
                if let Err(e) = self.storage.url(name) {
                    debug!("Media field {} unresolved ({}): {}", field, name, e);
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::media::{BaseUrl, LocalMediaStorage};
    use chrono::{DateTime, TimeZone, Utc};

    pub fn storage() -> LocalMediaStorage {
        LocalMediaStorage::new("/srv/toolhub/media", "/media/")
    }

    pub fn base() -> BaseUrl {
        BaseUrl::parse("https://tools.example.ge").unwrap()
    }

    pub fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{base, storage};
    use super::*;
    use crate::media::StorageError;

    struct BrokenStorage;

    impl MediaStorage for BrokenStorage {
        fn url(&self, name: &str) -> Result<String, StorageError> {
            Err(StorageError::Missing(name.to_string()))
        }
    }

    #[test]
    fn test_media_prefers_url() {
        let storage = storage();
        let base = base();
        let ctx = SerializeContext::new(&storage, Some(&base), Locale::En);

        assert_eq!(
            ctx.media("image", Some("https://cdn.example.com/a.png"), Some("demo/a.png")),
            Some("https://cdn.example.com/a.png".to_string())
        );
        assert_eq!(
            ctx.media("image", None, Some("demo/a.png")),
            Some("https://tools.example.ge/media/demo/a.png".to_string())
        );
        assert_eq!(ctx.media("image", None, None), None);
    }

    #[test]
    fn test_media_failure_is_null() {
        let base = base();
        let ctx = SerializeContext::new(&BrokenStorage, Some(&base), Locale::En);
        assert_eq!(ctx.media("image", None, Some("gone.png")), None);
        assert_eq!(ctx.media("image", Some(""), Some("gone.png")), None);
    }

    #[test]
    fn test_text_follows_locale() {
        let storage = storage();
        let en = SerializeContext::new(&storage, None, Locale::En);
        let ka = SerializeContext::new(&storage, None, Locale::Ka);

        assert_eq!(en.text("Hello", "Gamarjoba"), "Hello");
        assert_eq!(ka.text("Hello", "Gamarjoba"), "Gamarjoba");
        assert_eq!(ka.text("Hello", ""), "Hello");
        assert_eq!(ka.text_opt(Some("Out"), None), Some("Out".to_string()));
        assert_eq!(ka.text_opt(None, None), None);
    }
}
