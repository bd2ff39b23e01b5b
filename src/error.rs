//! Configuration errors.
//!
//! The simulation itself is total over valid inputs; the only failures are
//! rejected configuration at construction time and host-side file access.

use std::fmt;

/// Errors raised while building or loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A weapon was declared without any muzzle slot.
    EmptyMuzzles {
        /// Which weapon table the weapon came from.
        weapon: String,
    },

    /// A ship descriptor carries no weapon tiers.
    EmptyWeaponSet {
        /// Ship descriptor name.
        ship: String,
    },

    /// A tuning value lies outside its valid range.
    InvalidValue {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f32,
        /// Human-readable description of the accepted range.
        range: &'static str,
    },

    /// Reading or writing a config file failed.
    Io(std::io::Error),

    /// A config file is not valid JSON for the expected shape.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyMuzzles { weapon } => {
                write!(f, "weapon '{weapon}' has no muzzle slots")
            }
            ConfigError::EmptyWeaponSet { ship } => {
                write!(f, "ship '{ship}' has no weapons")
            }
            ConfigError::InvalidValue { name, value, range } => {
                write!(f, "{name} = {value} is outside the valid range {range}")
            }
            ConfigError::Io(err) => write!(f, "config file error: {err}"),
            ConfigError::Json(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

/// Convenience alias used by constructors and loaders.
pub type ConfigResult<T> = Result<T, ConfigError>;
