use crate::error::ConfigError;
use config::{Environment, File, Source};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig, StorageBackend};

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "boxoffice";

/// Prefix for environment overrides, e.g. `BOXOFFICE__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "BOXOFFICE";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file
/// (`boxoffice.toml` if present, or the explicit `path` which must exist),
/// then `BOXOFFICE__*` environment variables. `DATABASE_URL` fills in the
/// database URL when no other source set one.
///
/// Cross-field rules are not checked here; call [`AppConfig::validate`] once
/// command-line overrides have been applied.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => assemble(File::from(path).required(true))?,
        None => assemble(File::with_name(DEFAULT_CONFIG_FILE).required(false))?,
    };
    tracing::debug!(backend = ?config.database.backend, "Configuration loaded.");
    Ok(config)
}

fn assemble<S>(file: S) -> Result<AppConfig, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.backend", "postgres")?
        .set_default("database.max_connections", 20)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("logging.level", "info")?
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config = builder.try_deserialize::<AppConfig>()?;
    if config.database.url.is_none() {
        config.database.url = std::env::var("DATABASE_URL").ok();
    }
    Ok(config)
}
