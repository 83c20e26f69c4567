//! Media reference resolution
//!
//! Image, audio and video fields can be stored in two ways at once: an
//! externally hosted URL and a file kept in local media storage. The public
//! representation is always a single value:
//!
//! 1. a non-empty external URL wins and is returned unchanged
//! 2. otherwise the stored file is turned into its storage URL and, when a
//!    base URL is known, made absolute
//! 3. any storage failure, or no media at all, resolves to `None`
//!
//! Without a base URL the storage-relative URL is returned as-is.

use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Storage lookup failures
///
/// These never leave [`resolve_media`]; they only exist so storage
/// implementations and the serialization layer can say what went wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("empty file name")]
    EmptyName,

    #[error("file name escapes media root: {0}")]
    InvalidName(String),

    #[error("file not found in media storage: {0}")]
    Missing(String),
}

/// Storage backend able to map a stored file name to a public URL
///
/// The returned URL is usually relative to the site (`/media/tools/x.png`),
/// but a backend may also return an absolute URL (e.g. a CDN).
pub trait MediaStorage: Send + Sync {
    fn url(&self, name: &str) -> Result<String, StorageError>;
}

/// File system storage rooted at `<root_folder>/media`
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    url_prefix: String,
    verify_exists: bool,
}

impl LocalMediaStorage {
    /// Create storage serving files under `root` at `url_prefix` (e.g. `/media/`)
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        let trimmed = url_prefix.trim().trim_matches('/');
        let url_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };

        Self {
            root: root.into(),
            url_prefix,
            verify_exists: false,
        }
    }

    /// Reject file names whose file is not present on disk
    pub fn with_existence_check(mut self, verify: bool) -> Self {
        self.verify_exists = verify;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }
}

impl MediaStorage for LocalMediaStorage {
    fn url(&self, name: &str) -> Result<String, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyName);
        }

        if name.starts_with('/')
            || name.contains('\\')
            || name.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        if self.verify_exists && !self.root.join(name).is_file() {
            return Err(StorageError::Missing(name.to_string()));
        }

        storage_path(&self.url_prefix, name).ok_or_else(|| StorageError::InvalidName(name.to_string()))
    }
}

/// Site-relative, percent-encoded path of `name` under `prefix`
fn storage_path(prefix: &str, name: &str) -> Option<String> {
    let mut url = Url::parse("http://media.invalid/").ok()?;
    url.path_segments_mut()
        .ok()?
        .clear()
        .extend(prefix.split('/').filter(|segment| !segment.is_empty()))
        .extend(name.split('/'));
    Some(url.path().to_string())
}

/// Scheme + authority used to make storage URLs absolute
///
/// Only `http`/`https` origins are accepted: a host, an optional port and
/// nothing else (no credentials, path, query or fragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse a configured base URL such as `https://tools.example.ge/`
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        Self::from_url(url)
    }

    /// Build a base URL from a request scheme and `Host` header value
    ///
    /// Returns `None` for anything that is not a plain `host[:port]`.
    pub fn from_host(scheme: &str, host: &str) -> Option<Self> {
        let scheme = scheme.trim().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return None;
        }

        let host = host.trim();
        if host.is_empty() {
            return None;
        }

        let url = Url::parse(&format!("{}://{}", scheme, host)).ok()?;
        Self::from_url(url)
    }

    fn from_url(url: Url) -> Option<Self> {
        let origin_only = matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| !host.is_empty())
            && url.username().is_empty()
            && url.password().is_none()
            && url.path() == "/"
            && url.query().is_none()
            && url.fragment().is_none();

        origin_only.then_some(Self(url))
    }

    /// The origin without a trailing slash, e.g. `https://tools.example.ge`
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// Join a storage URL onto this base
    ///
    /// Absolute `http(s)` URLs are returned unchanged. `None` when the
    /// result would not be a valid URL.
    pub fn join(&self, path: &str) -> Option<String> {
        if let Ok(absolute) = Url::parse(path) {
            return matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string());
        }

        self.0.join(path).ok().map(String::from)
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored file together with the storage able to locate it
#[derive(Clone, Copy)]
pub struct FileRef<'a> {
    pub name: &'a str,
    pub storage: &'a dyn MediaStorage,
}

impl<'a> FileRef<'a> {
    pub fn new(name: &'a str, storage: &'a dyn MediaStorage) -> Self {
        Self { name, storage }
    }

    /// Storage URL of the file
    pub fn url(&self) -> Result<String, StorageError> {
        self.storage.url(self.name)
    }
}

/// Resolve a (URL, file) pair into one public media reference
///
/// Never fails: an unusable file reference resolves to `None`.
pub fn resolve_media(
    preferred_url: Option<&str>,
    fallback_file: Option<FileRef<'_>>,
    base: Option<&BaseUrl>,
) -> Option<String> {
    if let Some(url) = preferred_url {
        if !url.trim().is_empty() {
            return Some(url.to_string());
        }
    }

    let file = fallback_file?;
    if file.name.trim().is_empty() {
        return None;
    }

    let relative = file.url().ok()?;
    match base {
        Some(base) => base.join(&relative),
        None => Some(relative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage whose lookups always fail
    struct BrokenStorage;

    impl MediaStorage for BrokenStorage {
        fn url(&self, name: &str) -> Result<String, StorageError> {
            Err(StorageError::Missing(name.to_string()))
        }
    }

    fn storage() -> LocalMediaStorage {
        LocalMediaStorage::new("/srv/toolhub/media", "/media/")
    }

    fn base() -> BaseUrl {
        BaseUrl::parse("https://tools.example.ge").unwrap()
    }

    #[test]
    fn test_url_wins_over_file() {
        let storage = storage();
        let file = FileRef::new("demo_inputs/cat.png", &storage);

        let resolved = resolve_media(Some("https://cdn.example.com/cat.png"), Some(file), Some(&base()));
        assert_eq!(resolved.as_deref(), Some("https://cdn.example.com/cat.png"));

        // Unchanged even when it is not an absolute URL
        let resolved = resolve_media(Some("cat.png"), Some(file), None);
        assert_eq!(resolved.as_deref(), Some("cat.png"));
    }

    #[test]
    fn test_file_with_base_is_absolute() {
        let storage = storage();
        let file = FileRef::new("tools/logo.png", &storage);

        let resolved = resolve_media(None, Some(file), Some(&base()));
        assert_eq!(
            resolved.as_deref(),
            Some("https://tools.example.ge/media/tools/logo.png")
        );
    }

    #[test]
    fn test_file_without_base_is_relative() {
        let storage = storage();
        let file = FileRef::new("tools/logo.png", &storage);

        let resolved = resolve_media(None, Some(file), None);
        assert_eq!(resolved.as_deref(), Some("/media/tools/logo.png"));
    }

    #[test]
    fn test_empty_url_falls_back_to_file() {
        let storage = storage();
        let file = FileRef::new("blog/header.jpg", &storage);

        let resolved = resolve_media(Some(""), Some(file), Some(&base()));
        assert_eq!(
            resolved.as_deref(),
            Some("https://tools.example.ge/media/blog/header.jpg")
        );

        let resolved = resolve_media(Some("   "), Some(file), None);
        assert_eq!(resolved.as_deref(), Some("/media/blog/header.jpg"));
    }

    #[test]
    fn test_nothing_set_is_none() {
        assert_eq!(resolve_media(None, None, Some(&base())), None);
        assert_eq!(resolve_media(Some(""), None, None), None);

        let storage = storage();
        assert_eq!(resolve_media(None, Some(FileRef::new("", &storage)), None), None);
    }

    #[test]
    fn test_storage_failure_is_none() {
        let broken = BrokenStorage;
        let file = FileRef::new("authors/me.png", &broken);
        assert_eq!(resolve_media(None, Some(file), Some(&base())), None);

        let storage = storage();
        let escaping = FileRef::new("../../etc/passwd", &storage);
        assert_eq!(resolve_media(None, Some(escaping), Some(&base())), None);
    }

    #[test]
    fn test_existence_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tools")).unwrap();
        std::fs::write(dir.path().join("tools/present.png"), b"png").unwrap();

        let storage = LocalMediaStorage::new(dir.path(), "media").with_existence_check(true);
        assert_eq!(storage.url("tools/present.png").unwrap(), "/media/tools/present.png");
        assert_eq!(
            storage.url("tools/absent.png"),
            Err(StorageError::Missing("tools/absent.png".to_string()))
        );
    }

    #[test]
    fn test_storage_encodes_names() {
        let storage = storage();
        assert_eq!(
            storage.url("blog/content_images/my photo.jpg").unwrap(),
            "/media/blog/content_images/my%20photo.jpg"
        );
        assert_eq!(storage.url("/abs.png"), Err(StorageError::InvalidName("/abs.png".to_string())));
        assert_eq!(storage.url("  "), Err(StorageError::EmptyName));
    }

    #[test]
    fn test_base_url_parsing() {
        assert_eq!(
            BaseUrl::parse("http://localhost:5740/").unwrap().as_str(),
            "http://localhost:5740"
        );
        assert!(BaseUrl::parse("ftp://example.com").is_none());
        assert!(BaseUrl::parse("https://").is_none());
        assert!(BaseUrl::parse("").is_none());

        assert_eq!(
            BaseUrl::from_host("HTTPS", "api.example.ge").unwrap().as_str(),
            "https://api.example.ge"
        );
        assert!(BaseUrl::from_host("http", "").is_none());
        assert!(BaseUrl::from_host("gopher", "example.com").is_none());
        assert!(BaseUrl::from_host("http", "evil.com/path").is_none());
    }

    #[test]
    fn test_base_rejects_more_than_an_origin() {
        for host in [
            "evil.com?x=",
            "evil.com#frag",
            "[::1",
            "a@evil.com",
            "user:pw@evil.com",
            "h:notaport",
            "evil.com\\x",
        ] {
            assert!(BaseUrl::from_host("http", host).is_none(), "accepted {:?}", host);
        }

        assert!(BaseUrl::parse("https://tools.example.ge/api").is_none());
        assert!(BaseUrl::parse("https://tools.example.ge/?page=1").is_none());

        assert_eq!(BaseUrl::from_host("http", "[::1]:8080").unwrap().as_str(), "http://[::1]:8080");
        assert_eq!(BaseUrl::from_host("http", "Example.GE").unwrap().as_str(), "http://example.ge");
    }

    #[test]
    fn test_malformed_host_falls_back_to_relative() {
        let storage = storage();
        let file = FileRef::new("a.png", &storage);

        let base = BaseUrl::from_host("http", "evil.com?x=");
        assert_eq!(resolve_media(None, Some(file), base.as_ref()).as_deref(), Some("/media/a.png"));
    }

    #[test]
    fn test_base_join() {
        let base = base();
        assert_eq!(
            base.join("https://cdn.example.com/x.png").as_deref(),
            Some("https://cdn.example.com/x.png")
        );
        assert_eq!(base.join("media/x.png").as_deref(), Some("https://tools.example.ge/media/x.png"));
        assert_eq!(
            base.join("/media/my%20photo.jpg").as_deref(),
            Some("https://tools.example.ge/media/my%20photo.jpg")
        );
        assert_eq!(base.join("javascript:alert(1)"), None);
        assert_eq!(base.to_string(), "https://tools.example.ge");
    }
}
