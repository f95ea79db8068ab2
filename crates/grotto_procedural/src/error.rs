//! # Configuration Error Types
//!
//! Generation itself never fails: out-of-range numbers are clamped where they
//! are used. Only reading and validating a configuration can go wrong.

use thiserror::Error;

/// Errors raised while loading or validating a [`GeneratorConfig`](crate::config::GeneratorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value generation cannot work with.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
