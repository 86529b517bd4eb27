use std::path::PathBuf;

use thiserror::Error;

use crate::blocks::BlockType;

/// Errors raised by the chunk store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("chunk ({cx}, {cz}) is not loaded")]
    ChunkNotLoaded { cx: i32, cz: i32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("block '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("block type {0:?} is already registered")]
    DuplicateType(BlockType),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to encode record {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode record {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("remote store is disconnected")]
    Disconnected,
}

/// Why a break/place action produced no mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditRejected {
    #[error("no block within reach")]
    NoTarget,

    #[error("no block type selected")]
    NothingSelected,

    #[error("placement would overlap the observer")]
    OverlapsObserver,

    #[error("target cell is already occupied")]
    Occupied,

    #[error(transparent)]
    World(#[from] WorldError),
}
