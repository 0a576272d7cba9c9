use std::env;
use std::str::FromStr;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use grocer_shopping::Category;
use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ObservabilityConfig {
    pub fn log_format(&self) -> Result<LogFormat, String> {
        LogFormat::from_str(&self.format).map_err(|_| format!("Unknown log format: {}", self.format))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Pretty-print JSON results
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListConfig {
    /// Category given to new items the categoriser cannot place
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
        }
    }
}

impl ListConfig {
    pub fn fallback_category(&self) -> Result<Category, String> {
        Category::from_str(self.default_category.trim())
            .map_err(|_| format!("Unknown default category: {}", self.default_category))
    }
}

fn default_category() -> String {
    Category::Other.to_string()
}

impl Config {
    /// Load configuration from defaults, an optional TOML file and `GROCER__*`
    /// environment variables, in that order of precedence
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Set defaults
        builder = builder
            .set_default("observability.log_level", default_log_level())?
            .set_default("observability.format", default_log_format())?
            .set_default("output.pretty", default_pretty())?
            .set_default("list.default_category", default_category())?;

        // Load config file if path provided or CONFIG_PATH env var set
        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Try to load config file (optional - ignore if not found)
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        // Override with environment variables (GROCER__OBSERVABILITY__LOG_LEVEL, etc.)
        builder = builder.add_source(
            Environment::with_prefix("GROCER")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.observability.log_level.trim().is_empty() {
            return Err("Log level must not be empty".to_string());
        }
        self.observability.log_format()?;
        if self.list.default_category.trim().is_empty() {
            return Err("Default category must not be empty".to_string());
        }
        self.list.fallback_category()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_unknown_format() {
        let config = Config {
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                format: "xml".to_string(),
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_category() {
        let config = Config {
            list: ListConfig {
                default_category: "  ".to_string(),
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_category() {
        let config = Config {
            list: ListConfig {
                default_category: "Snacks".to_string(),
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_is_case_insensitive() {
        let config = ObservabilityConfig {
            log_level: "info".to_string(),
            format: "JSON".to_string(),
        };

        assert_eq!(config.log_format(), Ok(LogFormat::Json));
    }
}
