//! Configuration management for acton-admin
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_ADMIN_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-admin/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-admin/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! route_prefix = "/admin"
//!
//! [cache]
//! enabled = true
//! ttl_secs = 4
//! backend = "memory"
//!
//! [query_tags]
//! param = "query-tag"
//!
//! [labels]
//! save = "Save"
//! delete = "Delete"
//! confirm_message = "Are you sure?"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Which shared cache backs the related-values lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local in-memory cache
    #[default]
    Memory,
    /// Redis (requires the `redis` feature)
    Redis,
}

/// Short-lived result cache settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheSettings {
    /// Disable to always hit the store
    pub enabled: bool,

    /// Time-to-live for cached related records, in seconds
    #[validate(range(min = 1, max = 3600))]
    pub ttl_secs: u64,

    /// Backend selection
    pub backend: CacheBackend,

    /// Redis connection URL, used when `backend = "redis"`
    pub redis_url: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 4,
            backend: CacheBackend::Memory,
            redis_url: None,
        }
    }
}

/// Query tag settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryTagSettings {
    /// Request parameter carrying the selected tag URI
    #[validate(length(min = 1))]
    pub param: String,
}

impl Default for QueryTagSettings {
    fn default() -> Self {
        Self {
            param: "query-tag".to_string(),
        }
    }
}

/// UI labels used by generated forms and buttons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Submit label of relation forms
    pub save: String,
    /// Delete button and modal title
    pub delete: String,
    /// Text shown in the delete confirmation modal
    pub confirm_message: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            save: "Save".to_string(),
            delete: "Delete".to_string(),
            confirm_message: "Are you sure?".to_string(),
        }
    }
}

/// Complete acton-admin configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AdminConfig {
    /// Path prefix of every generated admin route
    #[validate(length(min = 1))]
    pub route_prefix: String,

    /// Result cache settings
    #[validate(nested)]
    pub cache: CacheSettings,

    /// Query tag settings
    #[validate(nested)]
    pub query_tags: QueryTagSettings,

    /// UI labels
    pub labels: Labels,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/admin".to_string(),
            cache: CacheSettings::default(),
            query_tags: QueryTagSettings::default(),
            labels: Labels::default(),
        }
    }
}

impl AdminConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - The merged configuration fails validation
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_admin::config::AdminConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AdminConfig::load_for_service("my-app")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 5. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 4. System config: /etc/acton-admin/{service_name}/config.toml
        let system_config = PathBuf::from("/etc/acton-admin")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        // 3. User config: ~/.config/acton-admin/{service_name}/config.toml
        if let Some(user_config) = Self::recommended_path(service_name) {
            if user_config.exists() {
                figment = figment.merge(Toml::file(&user_config));
            }
        }

        // 2. Local config: ./config.toml
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        // 1. Environment variables
        figment = figment.merge(Env::prefixed("ACTON_ADMIN_").split("__").lowercase(true));

        Self::finish(figment)
    }

    /// Load configuration from a specific file, layered over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the result fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()));

        Self::finish(figment)
    }

    /// XDG config path for a service, if a home directory is known
    #[must_use]
    pub fn recommended_path(service_name: &str) -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;

        Some(base.join("acton-admin").join(service_name).join("config.toml"))
    }

    fn finish(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
