//! Localized text resolution
//!
//! Every translatable field is stored twice: the English base value in
//! `<field>` and the Georgian translation in `<field>_ge`. Output records
//! carry the base value plus `<field>_localized`, the value for the locale
//! the client asked for.

use serde::{Deserialize, Serialize};

/// Column suffix of secondary-language (Georgian) fields
pub const SECONDARY_SUFFIX: &str = "_ge";

/// Requested locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, the base language
    #[default]
    En,
    /// Georgian, the secondary language
    Ka,
}

impl Locale {
    /// Parse a language code (`en`, `ka`, `ge`, `ka-GE`, ...)
    ///
    /// Unknown codes return `None` so callers can fall through to the next source.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(Locale::En),
            "ka" | "ge" | "geo" => Some(Locale::Ka),
            _ => None,
        }
    }

    /// Pick the locale from the first tag of an `Accept-Language` header
    ///
    /// A first tag of `ka*` (or `ge`) selects Georgian, any other tag English.
    /// Later tags and quality values are ignored. `None` for an empty header.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let first = header
            .split(',')
            .next()
            .and_then(|tag| tag.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty())?;

        match Self::from_code(first) {
            Some(Locale::Ka) => Some(Locale::Ka),
            _ => Some(Locale::En),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ka => "ka",
        }
    }
}

/// Resolve a base/secondary text pair for `locale`
///
/// Empty translations count as "not translated" and fall back to the base value.
pub fn localized(base: &str, secondary: Option<&str>, locale: Locale) -> String {
    match (locale, secondary) {
        (Locale::Ka, Some(text)) if !text.is_empty() => text.to_string(),
        _ => base.to_string(),
    }
}

/// Optional-base variant of [`localized`], for nullable base fields
pub fn localized_opt(base: Option<&str>, secondary: Option<&str>, locale: Locale) -> Option<String> {
    match (locale, secondary) {
        (Locale::Ka, Some(text)) if !text.is_empty() => Some(text.to_string()),
        _ => base.map(str::to_string),
    }
}

/// Storage column holding the translation of `field`
pub fn secondary_column(field: &str) -> String {
    format!("{}{}", field, SECONDARY_SUFFIX)
}
