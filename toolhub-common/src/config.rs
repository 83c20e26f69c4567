//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TOOLHUB_ROOT_FOLDER`, then `TOOLHUB_ROOT` environment variables
//! 3. TOML config file `root_folder`
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or broken TOML file is never fatal: a warning is logged and
//! compiled defaults are used.

use crate::media::BaseUrl;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "toolhub.db";

/// Media directory name inside the root folder
pub const MEDIA_DIR: &str = "media";

/// Largest page size accepted from configuration
pub const MAX_PAGE_SIZE: i64 = 100;

/// Compiled-in defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub bind_address: String,
    pub port: u16,
    pub media_url: String,
    pub page_size: i64,
    pub token_ttl_hours: i64,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: "info".to_string(),
            bind_address: "127.0.0.1".to_string(),
            port: 5740,
            media_url: "/media/".to_string(),
            page_size: 20,
            token_ttl_hours: 24,
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/toolhub (or /var/lib/toolhub for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("toolhub"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/toolhub"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("toolhub"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/toolhub"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("toolhub"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\toolhub"))
    } else {
        PathBuf::from("./toolhub_data")
    }
}

/// `[logging]` section of the TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub public_base_url: Option<String>,
    pub media_url: Option<String>,
    pub page_size: Option<i64>,
    pub token_ttl_hours: Option<i64>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the config file, falling back to defaults on any problem
    ///
    /// `explicit` is a path given on the command line; otherwise the platform
    /// locations are searched. Nothing is logged here: this runs before the
    /// tracing subscriber exists, so the caller reports the returned
    /// [`ConfigSource`] once logging is up.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, ConfigSource) {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return (Self::default(), ConfigSource::Defaults),
            },
        };

        match Self::load(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(error) => (Self::default(), ConfigSource::Failed { path, error }),
        }
    }

    /// First existing platform config file
    ///
    /// Linux: `~/.config/toolhub/config.toml`, then `/etc/toolhub/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let user_config = dirs::config_dir().map(|d| d.join("toolhub").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }

        if cfg!(target_os = "linux") {
            let system_config = PathBuf::from("/etc/toolhub/config.toml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }
}

/// Where the effective [`TomlConfig`] came from
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No config file found; compiled defaults
    Defaults,
    /// The file exists or was named but could not be loaded; compiled defaults
    Failed { path: PathBuf, error: Error },
}

impl ConfigSource {
    /// Log how the configuration was obtained
    pub fn report(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigSource::Defaults => debug!("No config file found, using compiled defaults"),
            ConfigSource::Failed { path, error } => warn!(
                "Could not load config file {}: {} (using defaults)",
                path.display(),
                error
            ),
        }
    }
}

/// Resolves the root folder following the documented priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("{}: root folder from command line", self.module_name);
            return path.clone();
        }

        for var in ["TOOLHUB_ROOT_FOLDER", "TOOLHUB_ROOT"] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    debug!("{}: root folder from {}", self.module_name, var);
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("{}: root folder from config file", self.module_name);
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder layout (database file location and media directory)
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create root and media directories if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating root folder: {}", self.root_folder.display());
        }
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.media_path())?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn media_path(&self) -> PathBuf {
        self.root_folder.join(MEDIA_DIR)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

/// Values given on the command line (each already merged with its env var by clap)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub public_base_url: Option<String>,
}

/// Bootstrap administrator credentials
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Effective service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub public_base_url: Option<BaseUrl>,
    pub media_url: String,
    pub page_size: i64,
    pub token_ttl_hours: i64,
    pub admin: Option<AdminCredentials>,
    pub cors_allowed_origins: Vec<String>,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge overrides, environment, TOML and compiled defaults
    ///
    /// Admin credentials come from `TOOLHUB_ADMIN_USERNAME` /
    /// `TOOLHUB_ADMIN_PASSWORD` when set, else from the TOML file.
    pub fn resolve(
        root_folder: PathBuf,
        toml: &TomlConfig,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let public_base_url = match overrides
            .public_base_url
            .as_deref()
            .or(toml.public_base_url.as_deref())
            .filter(|raw| !raw.trim().is_empty())
        {
            Some(raw) => Some(BaseUrl::parse(raw).ok_or_else(|| {
                Error::Config(format!("public_base_url must be an http(s) origin such as https://tools.example.ge, got {}", raw))
            })?),
            None => None,
        };

        let page_size = toml.page_size.unwrap_or(defaults.page_size);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        let token_ttl_hours = toml.token_ttl_hours.unwrap_or(defaults.token_ttl_hours);
        if token_ttl_hours < 1 {
            return Err(Error::Config(format!(
                "token_ttl_hours must be at least 1, got {}",
                token_ttl_hours
            )));
        }

        let username = std::env::var("TOOLHUB_ADMIN_USERNAME")
            .ok()
            .or_else(|| toml.admin_username.clone());
        let password = std::env::var("TOOLHUB_ADMIN_PASSWORD")
            .ok()
            .or_else(|| toml.admin_password.clone());
        let admin = match (username, password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Some(AdminCredentials {
                    username: username.trim().to_string(),
                    password,
                })
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("Admin bootstrap needs both username and password; skipping");
                None
            }
            _ => None,
        };

        Ok(Self {
            root_folder,
            bind_address: overrides
                .bind_address
                .clone()
                .or_else(|| toml.bind_address.clone())
                .unwrap_or(defaults.bind_address),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            public_base_url,
            media_url: toml.media_url.clone().unwrap_or(defaults.media_url),
            page_size,
            token_ttl_hours,
            admin,
            cors_allowed_origins: toml.cors_allowed_origins.clone(),
            log_level: toml.logging.level.clone().unwrap_or(defaults.log_level),
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
