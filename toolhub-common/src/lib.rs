//! # Toolhub Common Library
//!
//! Shared code for the toolhub content service:
//! - Configuration loading and root folder resolution
//! - Database schema, models and queries
//! - Media reference resolution (uploaded file vs. external URL)
//! - Localized text resolution (base vs. Georgian translation)
//! - Public record serialization for tools, demos, blog posts, news and authors
//! - Password hashing and access token helpers

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod locale;
pub mod media;
pub mod ordering;
pub mod serializers;

pub use error::{Error, Result};
pub use locale::{localized, Locale};
pub use media::{resolve_media, BaseUrl, LocalMediaStorage, MediaStorage, StorageError};
pub use ordering::{sort_by_declared_order, DeclaredOrder};
