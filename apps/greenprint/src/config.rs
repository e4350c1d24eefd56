//! # Application Configuration
//!
//! Optional TOML configuration for the binary (`greenprint.toml` in the
//! working directory, or an explicit `--config` path):
//!
//! ```toml
//! [data]
//! factors = "data/emission_factors.csv"
//! averages = "data/per_capita_monthly.csv"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```
//!
//! Resolution order for every setting: CLI flag, then config file, then
//! built-in default. Security-sensitive server settings (API key, rate
//! limit, CORS origins) are environment-only and never live in the file.

use greenprint_core::GreenprintError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the emission-factor table.
pub const DEFAULT_FACTORS_PATH: &str = "data/emission_factors.csv";

/// Default location of the per-capita averages table.
pub const DEFAULT_AVERAGES_PATH: &str = "data/per_capita_monthly.csv";

/// Default bind host for the HTTP server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Config file looked up implicitly in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "greenprint.toml";

// =============================================================================
// CONFIG STRUCTURES
// =============================================================================

/// Parsed application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Reference-data locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub factors: Option<PathBuf>,
    pub averages: Option<PathBuf>,
}

/// Server bind settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse; the implicit
    /// `greenprint.toml` is optional and its absence yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, GreenprintError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = std::fs::read_to_string(&path).map_err(|e| {
            GreenprintError::IoError(format!("Cannot read config {:?}: {}", path, e))
        })?;
        Self::parse(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn parse(raw: &str) -> Result<Self, GreenprintError> {
        toml::from_str(raw)
            .map_err(|e| GreenprintError::MalformedTable(format!("Invalid config: {}", e)))
    }

    /// Resolve the factor-table path: flag, then file, then default.
    #[must_use]
    pub fn factors_path(&self, flag: Option<&PathBuf>) -> PathBuf {
        flag.cloned()
            .or_else(|| self.data.factors.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FACTORS_PATH))
    }

    /// Resolve the per-capita table path: flag, then file, then default.
    #[must_use]
    pub fn averages_path(&self, flag: Option<&PathBuf>) -> PathBuf {
        flag.cloned()
            .or_else(|| self.data.averages.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AVERAGES_PATH))
    }

    /// Resolve the bind host: flag, then file, then default.
    #[must_use]
    pub fn host(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    /// Resolve the bind port: flag, then file, then default.
    #[must_use]
    pub fn port(&self, flag: Option<u16>) -> u16 {
        flag.or(self.server.port).unwrap_or(DEFAULT_PORT)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let config = AppConfig::parse("").expect("empty config is valid");
        assert_eq!(
            config.factors_path(None),
            PathBuf::from(DEFAULT_FACTORS_PATH)
        );
        assert_eq!(config.host(None), DEFAULT_HOST);
        assert_eq!(config.port(None), DEFAULT_PORT);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = AppConfig::parse(
            "[data]\nfactors = \"x/factors.csv\"\n[server]\nport = 9000\n",
        )
        .expect("valid config");
        assert_eq!(config.factors_path(None), PathBuf::from("x/factors.csv"));
        assert_eq!(config.port(None), 9000);
        // Unset fields still fall back
        assert_eq!(
            config.averages_path(None),
            PathBuf::from(DEFAULT_AVERAGES_PATH)
        );
    }

    #[test]
    fn flags_override_file_values() {
        let config =
            AppConfig::parse("[server]\nhost = \"0.0.0.0\"\nport = 9000\n").expect("valid");
        assert_eq!(config.host(Some("10.0.0.1")), "10.0.0.1");
        assert_eq!(config.port(Some(7777)), 7777);

        let flag = PathBuf::from("cli/factors.csv");
        assert_eq!(config.factors_path(Some(&flag)), flag);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::parse("[data]\nfactor = \"typo.csv\"\n");
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/greenprint.toml")));
        assert!(matches!(err, Err(GreenprintError::IoError(_))));
    }
}
