//! Configuration management
//!
//! This module holds the host options the view layer consumes: date and time
//! formats, the site-wide comment order, preview defaults and the site base URL.
//! Configuration can be loaded from:
//! - a YAML file (`postview.yml` by convention)
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::models::SortOrder;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Site configuration
    #[serde(default)]
    pub site: SiteConfig,
    /// Date and time display configuration
    #[serde(default)]
    pub dates: DateConfig,
    /// Comment configuration
    #[serde(default)]
    pub comments: CommentConfig,
    /// Preview (excerpt) configuration
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            dates: DateConfig::default(),
            comments: CommentConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL used to build permalinks
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Date and time display configuration
///
/// Formats use chrono's strftime syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateConfig {
    /// Default date format
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Default time format
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

fn default_date_format() -> String {
    "%B %-d, %Y".to_string()
}

fn default_time_format() -> String {
    "%-I:%M %p".to_string()
}

/// Comment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentConfig {
    /// Site-wide order used when a caller asks for the host's order
    #[serde(default)]
    pub order: SortOrder,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::default(),
        }
    }
}

/// Preview configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Word count used when no length is given
    #[serde(default = "default_preview_length")]
    pub length: usize,
    /// Link text appended to previews; empty disables the link
    #[serde(default = "default_read_more")]
    pub read_more: String,
    /// Strip markup from previews
    #[serde(default = "default_strip")]
    pub strip: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            length: default_preview_length(),
            read_more: default_read_more(),
            strip: default_strip(),
        }
    }
}

fn default_preview_length() -> usize {
    50
}

fn default_read_more() -> String {
    "Read More".to_string()
}

fn default_strip() -> bool {
    true
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl ViewConfig {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: ViewConfig = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - POSTVIEW_BASE_URL
    /// - POSTVIEW_DATE_FORMAT
    /// - POSTVIEW_TIME_FORMAT
    /// - POSTVIEW_COMMENT_ORDER
    /// - POSTVIEW_PREVIEW_LENGTH
    /// - POSTVIEW_READ_MORE
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject values that would make every preview empty
    fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.length == 0 {
            return Err(ConfigError::ValidationError(
                "preview.length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("POSTVIEW_BASE_URL") {
            self.site.base_url = base_url;
        }

        if let Ok(format) = std::env::var("POSTVIEW_DATE_FORMAT") {
            self.dates.date_format = format;
        }
        if let Ok(format) = std::env::var("POSTVIEW_TIME_FORMAT") {
            self.dates.time_format = format;
        }

        if let Ok(order) = std::env::var("POSTVIEW_COMMENT_ORDER") {
            if let Some(order) = SortOrder::from_str(&order) {
                self.comments.order = order;
            }
        }

        if let Ok(length) = std::env::var("POSTVIEW_PREVIEW_LENGTH") {
            match length.parse::<usize>() {
                Ok(length) if length > 0 => self.preview.length = length,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(read_more) = std::env::var("POSTVIEW_READ_MORE") {
            self.preview.read_more = read_more;
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
