//! Configuration management for the storefront renderer.
//!
//! Parses `storefront.toml` configuration files with serde and provides
//! auto-discovery of the config file in parent directories. Every section
//! is optional; [`EngineConfig::default`] is a complete, valid configuration.
//!
//! ```toml
//! [cache]
//! enabled = true
//! max_pages = 50
//! warm_on_init = true
//!
//! [navigation]
//! mobile_breakpoint = 768
//!
//! [events]
//! buffer_size = 50
//!
//! [assets]
//! icon_css_url = "https://${CDN_HOST:-unpkg.com}/primeicons@7.0.0/primeicons.css"
//!
//! [document]
//! lang = "en"
//! title_suffix = "My Shop"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Asset URLs support `${VAR}` and `${VAR:-default}` expansion.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "storefront.toml";

/// Renderer configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rendering cache settings.
    pub cache: CacheConfig,
    /// Navigation rendering settings.
    pub navigation: NavigationSettings,
    /// Event buffer settings.
    pub events: EventsConfig,
    /// External stylesheet URLs linked from every page.
    pub assets: AssetsConfig,
    /// Document-level settings.
    pub document: DocumentConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering cache settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether rendered output is cached.
    pub enabled: bool,
    /// Page limit used by cache optimization (components get twice as many).
    pub max_pages: usize,
    /// Render every page once right after initialization.
    pub warm_on_init: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pages: 50,
            warm_on_init: true,
        }
    }
}

/// Navigation rendering settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Viewport width (px) at which the desktop menu replaces the mobile one.
    pub mobile_breakpoint: u32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768,
        }
    }
}

/// Event buffer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Number of most recent events kept.
    pub buffer_size: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { buffer_size: 50 }
    }
}

/// External stylesheet URLs.
///
/// Each stylesheet has a fallback that the page swaps in when the primary
/// fails to load. An empty URL disables that stylesheet.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Web font stylesheet.
    pub font_url: String,
    /// Web font stylesheet fallback.
    pub font_fallback_url: String,
    /// Icon font stylesheet.
    pub icon_css_url: String,
    /// Icon font stylesheet fallback.
    pub icon_css_fallback_url: String,
    /// Widget theme stylesheet.
    pub theme_css_url: String,
    /// Widget theme stylesheet fallback.
    pub theme_css_fallback_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            font_url: "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap"
                .to_owned(),
            font_fallback_url: "https://fonts.bunny.net/css?family=inter:400,500,600,700".to_owned(),
            icon_css_url: "https://unpkg.com/primeicons@7.0.0/primeicons.css".to_owned(),
            icon_css_fallback_url: "https://cdn.jsdelivr.net/npm/primeicons@7.0.0/primeicons.css"
                .to_owned(),
            theme_css_url:
                "https://unpkg.com/primeng@17.18.0/resources/themes/lara-light-blue/theme.css"
                    .to_owned(),
            theme_css_fallback_url:
                "https://cdn.jsdelivr.net/npm/primeng@17.18.0/resources/themes/lara-light-blue/theme.css"
                    .to_owned(),
        }
    }
}

impl AssetsConfig {
    /// Iterate over `(field name, url)` pairs.
    fn fields_mut(&mut self) -> [(&'static str, &mut String); 6] {
        [
            ("assets.font_url", &mut self.font_url),
            ("assets.font_fallback_url", &mut self.font_fallback_url),
            ("assets.icon_css_url", &mut self.icon_css_url),
            ("assets.icon_css_fallback_url", &mut self.icon_css_fallback_url),
            ("assets.theme_css_url", &mut self.theme_css_url),
            ("assets.theme_css_fallback_url", &mut self.theme_css_fallback_url),
        ]
    }

    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("assets.font_url", self.font_url.as_str()),
            ("assets.font_fallback_url", self.font_fallback_url.as_str()),
            ("assets.icon_css_url", self.icon_css_url.as_str()),
            ("assets.icon_css_fallback_url", self.icon_css_fallback_url.as_str()),
            ("assets.theme_css_url", self.theme_css_url.as_str()),
            ("assets.theme_css_fallback_url", self.theme_css_fallback_url.as_str()),
        ]
    }
}

/// Document-level settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// `lang` attribute of the `<html>` element.
    pub lang: String,
    /// Appended to every page title as `"{page} | {suffix}"`.
    pub title_suffix: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_owned(),
            title_suffix: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`assets.font_url`").
        field: String,
        /// Error message (e.g., "${`CDN_HOST`} not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl EngineConfig {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `storefront.toml` in the current directory and parents, falling
    /// back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the loaded values are invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// Expands environment variables and validates the result.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_cache()?;
        self.validate_navigation()?;
        self.validate_assets()?;

        if self.events.buffer_size == 0 {
            return Err(ConfigError::Validation(
                "events.buffer_size must be greater than 0".to_owned(),
            ));
        }
        if self.document.lang.trim().is_empty() {
            return Err(ConfigError::Validation(
                "document.lang cannot be empty".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_cache(&self) -> Result<(), ConfigError> {
        if self.cache.max_pages == 0 {
            return Err(ConfigError::Validation(
                "cache.max_pages must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        const BREAKPOINTS: std::ops::RangeInclusive<u32> = 320..=4096;

        let breakpoint = self.navigation.mobile_breakpoint;
        if !BREAKPOINTS.contains(&breakpoint) {
            return Err(ConfigError::Validation(format!(
                "navigation.mobile_breakpoint must be between {} and {}",
                BREAKPOINTS.start(),
                BREAKPOINTS.end()
            )));
        }
        Ok(())
    }

    fn validate_assets(&self) -> Result<(), ConfigError> {
        for (field, url) in self.assets.fields() {
            if !url.is_empty() {
                require_http_url(url, field)?;
            }
        }
        Ok(())
    }

    /// Expand `${VAR}` and `${VAR:-default}` references in asset URLs.
    ///
    /// URLs without `${` are left alone, so a literal `$` in a path survives.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (field, url) in self.assets.fields_mut() {
            if !url.contains("${") {
                continue;
            }
            let expanded = shellexpand::env_with_context(url.as_str(), |var| {
                std::env::var(var).map(Some)
            })
            .map_err(|e| ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{}}} not set", e.var_name),
            })?;
            *url = expanded.into_owned();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_pages, 50);
        assert!(config.cache.warm_on_init);
        assert_eq!(config.navigation.mobile_breakpoint, 768);
        assert_eq!(config.events.buffer_size, 50);
        assert_eq!(config.document.lang, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = EngineConfig::from_toml("").unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.navigation.mobile_breakpoint, 768);
    }

    #[test]
    fn test_parse_cache_config() {
        let toml = r"
[cache]
enabled = false
max_pages = 10
";
        let config = EngineConfig::from_toml(toml).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_pages, 10);
        assert!(config.cache.warm_on_init);
    }

    #[test]
    fn test_parse_document_config() {
        let toml = r#"
[document]
lang = "de"
title_suffix = "Bäckerei Schmidt"
"#;
        let config = EngineConfig::from_toml(toml).unwrap();
        assert_eq!(config.document.lang, "de");
        assert_eq!(
            config.document.title_suffix.as_deref(),
            Some("Bäckerei Schmidt")
        );
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let err = EngineConfig::from_toml("[cache]\nmax_pages = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("cache.max_pages"));
    }

    #[test]
    fn test_breakpoint_out_of_range_rejected() {
        let err = EngineConfig::from_toml("[navigation]\nmobile_breakpoint = 10\n").unwrap_err();
        assert!(err.to_string().contains("navigation.mobile_breakpoint"));
    }

    #[test]
    fn test_zero_event_buffer_rejected() {
        let err = EngineConfig::from_toml("[events]\nbuffer_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("events.buffer_size"));
    }

    #[test]
    fn test_non_http_asset_url_rejected() {
        let err =
            EngineConfig::from_toml("[assets]\nicon_css_url = \"ftp://cdn/icons.css\"\n").unwrap_err();
        assert!(err.to_string().contains("assets.icon_css_url"));
    }

    #[test]
    fn test_empty_asset_url_disables_stylesheet() {
        let config = EngineConfig::from_toml("[assets]\ntheme_css_url = \"\"\n").unwrap();
        assert!(config.assets.theme_css_url.is_empty());
        assert!(!config.assets.font_url.is_empty());
    }

    #[test]
    fn test_asset_urls_expand_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("SF_TEST_CDN_HOST", "cdn.example.com");
            std::env::remove_var("SF_TEST_UNSET_FONT_HOST");
        }
        let config = EngineConfig::from_toml(
            "[assets]\nicon_css_url = \"https://${SF_TEST_CDN_HOST}/icons.css\"\n\
             font_url = \"https://${SF_TEST_UNSET_FONT_HOST:-fonts.example.com}/inter.css\"\n\
             theme_css_url = \"https://example.com/$theme.css\"\n",
        )
        .unwrap();
        unsafe {
            std::env::remove_var("SF_TEST_CDN_HOST");
        }

        assert_eq!(config.assets.icon_css_url, "https://cdn.example.com/icons.css");
        assert_eq!(config.assets.font_url, "https://fonts.example.com/inter.css");
        assert_eq!(config.assets.theme_css_url, "https://example.com/$theme.css");
    }

    #[test]
    fn test_unset_env_var_in_asset_url() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("SF_TEST_MISSING_HOST");
        }
        let err = EngineConfig::from_toml("[assets]\ntheme_css_url = \"https://${SF_TEST_MISSING_HOST}/t.css\"\n")
            .unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("assets.theme_css_url"));
        assert!(err.to_string().contains("${SF_TEST_MISSING_HOST} not set"));
    }

    #[test]
    fn test_parse_error() {
        let err = EngineConfig::from_toml("[cache\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("storefront.toml");
        std::fs::write(&path, "[cache]\nwarm_on_init = false\n").unwrap();

        let config = EngineConfig::load(Some(&path)).unwrap();
        assert!(!config.cache.warm_on_init);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = EngineConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
