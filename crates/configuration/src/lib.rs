use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod catalog;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use catalog::{CategoryCatalog, CrimeCategory};
pub use settings::{
    DatabaseSettings, ForecastSettings, LoggingSettings, ServerOverrides, ServerSettings, Settings,
};

/// Prefix of the environment variables that override file values,
/// e.g. `FORESEE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "FORESEE";

/// Loads the application configuration.
///
/// Reads the optional TOML file at `path`, layers `FORESEE__*` environment
/// variables on top, deserializes into `Settings` and validates the result.
/// Every field has a default, so a missing file is not an error.
pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Same as [`load_config`] but from an in-memory TOML document, without the
/// environment layer.
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Settings, ConfigError> {
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    tracing::debug!(
        categories = settings.categories.len(),
        port = settings.server.port,
        "Configuration loaded."
    );
    Ok(settings)
}
