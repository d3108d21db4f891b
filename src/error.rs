//! Setup-time errors
//!
//! Everything that can go wrong happens while building a table. Once a
//! `Machine` exists, ticking it cannot fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating tunables and layouts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A wall or actuator geometry has zero length.
    #[error("entity {index}: {geometry} segment has zero length")]
    DegenerateSegment {
        /// Position of the descriptor in the layout.
        index: usize,
        /// Which geometry was degenerate ("wall", "rest" or "extended").
        geometry: &'static str,
    },

    /// Disk bounding box is not square.
    #[error("entity {index}: disk is not symmetric ({width} x {height})")]
    AsymmetricDisk {
        index: usize,
        width: f32,
        height: f32,
    },

    /// Disk diameter is zero or negative.
    #[error("entity {index}: disk diameter must be positive, got {diameter}")]
    InvalidDiameter { index: usize, diameter: f32 },

    /// A region has a negative friction override.
    #[error("region {index}: friction override must be non-negative, got {friction}")]
    InvalidRegion { index: usize, friction: f32 },

    /// A global tunable is out of range.
    #[error("invalid tunable {name}: {value}")]
    InvalidTunable { name: &'static str, value: String },

    /// Reading a config file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid JSON for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates an invalid tunable error.
    pub fn tunable(name: &'static str, value: impl std::fmt::Display) -> Self {
        Self::InvalidTunable {
            name,
            value: value.to_string(),
        }
    }
}
