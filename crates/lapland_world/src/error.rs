//! # World Error Types
//!
//! Block queries and mutations never fail; out-of-range coordinates, unloaded
//! chunks and unknown codes all degrade to AIR. Only loading configuration
//! can go wrong.

use thiserror::Error;

/// Errors raised while setting up a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for a world config.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for world setup.
pub type WorldResult<T> = Result<T, WorldError>;
