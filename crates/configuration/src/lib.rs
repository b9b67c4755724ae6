use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{CacheSettings, Config, EngineSettings, ProviderSettings, ServerSettings};

/// Prefix for environment overrides, e.g. `EXECCOMP__PROVIDER__API_KEY`.
pub const ENV_PREFIX: &str = "EXECCOMP";

/// Loads the application configuration.
///
/// Values come from the TOML file at `path` (if it exists), overlaid by `EXECCOMP__*`
/// environment variables. The result is validated before it is returned, so callers can
/// rely on every section being usable.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Parses and validates configuration from a TOML document, without consulting the environment.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
