// Asset management system
//
// Animation clips are decoded by a host-provided `ClipSource`; this module
// resolves formats, loads a named clip table and reports failures.

mod loader;

pub use loader::{
    load_clips, ClipData, ClipFormat, ClipLoadReport, ClipPaths, ClipSource, InMemoryClipSource,
};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Unsupported asset format: {0}")]
    UnsupportedFormat(String),

    #[error("Asset contains no animation clips: {0}")]
    EmptyClipSet(String),
}
