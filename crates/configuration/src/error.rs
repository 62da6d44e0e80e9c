use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source (defaults, TOML file or `BOXOFFICE__*` variable) could not be
    /// read or did not match the settings types.
    #[error("Could not assemble settings from defaults, file and environment: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The merged settings break a cross-field rule.
    #[error("Invalid settings: {0}")]
    ValidationError(String),
}
