//! Error types for entity construction, selection building and configuration.

use thiserror::Error;

/// A change description that cannot be turned into a live entity.
#[derive(Debug, Error, PartialEq)]
pub enum ConstructionError {
    #[error("{kind} {id} has color {color}, expected < {max}")]
    ColorOutOfRange {
        kind: &'static str,
        id: u64,
        color: u8,
        max: usize,
    },
    #[error("{kind} {id} has non-finite {field}")]
    NonFinite {
        kind: &'static str,
        id: u64,
        field: &'static str,
    },
    #[error("{kind} {id} has invalid energy {energy}")]
    InvalidEnergy {
        kind: &'static str,
        id: u64,
        energy: f64,
    },
    #[error("cell {id} lists {bonds} bonds but allows at most {max_connections}")]
    TooManyBonds {
        id: u64,
        bonds: usize,
        max_connections: u32,
    },
}

/// Failures while encoding, decoding or rebuilding a selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("selection codec failed: {0}")]
    Codec(#[from] bincode::Error),
    #[error("selection format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("{kind} id {id} appears more than once in one selection")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// Failures while loading simulation parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameter file: {0}")]
    Json(#[from] serde_json::Error),
}
