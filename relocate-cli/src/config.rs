//! Layered CLI configuration: flags override the TOML file, which overrides
//! built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::output::OutputFormat;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RATE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_RATE_ENDPOINT: &str = "https://open.er-api.com/v6/latest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// The file as written; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    rate_timeout_ms: Option<u64>,
    rate_endpoint: Option<String>,
    format: Option<OutputFormat>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub offline: bool,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub rate_timeout: Duration,
    pub rate_endpoint: String,
    pub format: OutputFormat,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            rate_timeout: Duration::from_millis(DEFAULT_RATE_TIMEOUT_MS),
            rate_endpoint: DEFAULT_RATE_ENDPOINT.to_string(),
            format: OutputFormat::default(),
            offline: false,
        }
    }
}

impl Config {
    /// Builds the configuration from an optional file plus command-line overrides.
    pub fn load(
        path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                parse_file(&content, &path.display().to_string())?
            }
            None => FileConfig::default(),
        };
        Self::resolve(file, overrides)
    }

    /// Same as [`Config::load`] from TOML text.
    pub fn from_toml(
        content: &str,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        Self::resolve(parse_file(content, "<string>")?, overrides)
    }

    fn resolve(
        file: FileConfig,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let rate_timeout = match file.rate_timeout_ms {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "rate_timeout_ms",
                    message: "must be greater than 0".to_string(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.rate_timeout,
        };

        let rate_endpoint = file.rate_endpoint.unwrap_or(defaults.rate_endpoint);
        if !rate_endpoint.starts_with("http://") && !rate_endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "rate_endpoint",
                message: format!("'{rate_endpoint}' is not an http(s) URL"),
            });
        }

        Ok(Self {
            data_dir: overrides
                .data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or(defaults.data_dir),
            rate_timeout,
            rate_endpoint: rate_endpoint.trim_end_matches('/').to_string(),
            format: overrides.format.or(file.format).unwrap_or(defaults.format),
            offline: overrides.offline,
        })
    }
}

fn parse_file(
    content: &str,
    origin: &str,
) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("", &Overrides::default()).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            data_dir = "/srv/relocate"
            rate_timeout_ms = 500
            rate_endpoint = "https://rates.example.org/latest/"
            format = "json"
        "#;

        let config = Config::from_toml(toml, &Overrides::default()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/relocate"));
        assert_eq!(config.rate_timeout, Duration::from_millis(500));
        assert_eq!(config.rate_endpoint, "https://rates.example.org/latest");
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn flags_override_file_values() {
        let overrides = Overrides {
            data_dir: Some(PathBuf::from("./fixtures")),
            format: Some(OutputFormat::Table),
            offline: true,
        };

        let toml = "data_dir = \"/srv/relocate\"\nformat = \"json\"";
        let config = Config::from_toml(toml, &overrides).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("./fixtures"));
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.offline);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml("rate_timeout_ms = 0", &Overrides::default()).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { field: "rate_timeout_ms", .. }));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let err = Config::from_toml("rate_endpoint = \"ftp://rates\"", &Overrides::default())
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { field: "rate_endpoint", .. }));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = Config::from_toml("colour = \"blue\"", &Overrides::default()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(
            Some(Path::new("/nonexistent/relocate.toml")),
            &Overrides::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
