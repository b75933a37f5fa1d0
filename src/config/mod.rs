//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `JUPITER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use jupiter_docs::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Reading from {}", config.source.data_dir.display());
//! ```

mod error;
mod logging;
mod output;
mod pipeline;
mod source;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use output::{OutputConfig, OutputFormat};
pub use pipeline::PipelineConfig;
pub use source::SourceConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration reading `./data` and writing `./output`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Upstream export location
    #[serde(default)]
    pub source: SourceConfig,

    /// Output location and format
    #[serde(default)]
    pub output: OutputConfig,

    /// Phase settings (QC scope)
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `JUPITER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `JUPITER__SOURCE__DATA_DIR=./data` -> `source.data_dir = ./data`
    /// - `JUPITER__OUTPUT__FORMAT=yaml` -> `output.format = yaml`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("JUPITER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        if self.source.data_dir == self.output.dir {
            return Err(ValidationError::OutputOverwritesSource);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "JUPITER__SOURCE__DATA_DIR",
        "JUPITER__OUTPUT__DIR",
        "JUPITER__OUTPUT__FORMAT",
        "JUPITER__PIPELINE__QC_OUT_OF_SCOPE_TYPES",
        "JUPITER__LOGGING__LEVEL",
        "JUPITER__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.source.data_dir, PathBuf::from("./data"));
        assert_eq!(config.output.dir, PathBuf::from("./output"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JUPITER__SOURCE__DATA_DIR", "/srv/export");
        env::set_var("JUPITER__OUTPUT__FORMAT", "yaml");
        env::set_var(
            "JUPITER__PIPELINE__QC_OUT_OF_SCOPE_TYPES",
            "Master Service Agreement,Memorandum",
        );
        env::set_var("JUPITER__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.source.data_dir, PathBuf::from("/srv/export"));
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert_eq!(config.pipeline.qc_out_of_scope_types_list().len(), 2);
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_rejects_shared_directory() {
        let config = AppConfig {
            output: OutputConfig {
                dir: PathBuf::from("./data"),
                ..OutputConfig::default()
            },
            ..AppConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::OutputOverwritesSource));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JUPITER__LOGGING__LEVEL", "loud");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogLevel(_))
        ));
    }
}
