//! Partitioned thermal sample storage

use std::io;
use std::path::PathBuf;

use crate::frames::{self, FrameCodec};

mod collection;
mod source;
mod spill;
mod store;

#[cfg(test)]
mod tests;

pub use collection::SampleCollection;
pub use source::{JsonDirSource, SampleSource};
pub use store::{SampleStore, StoreStats};

/// Common error type for storage operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Failed to decode sample {timestamp}: {source}")]
    Decode {
        timestamp: String,
        #[source]
        source: frames::Error,
    },
    #[error("Sample source error: {0}")]
    Source(String),
    #[error("Memory limit exceeded: {0}")]
    MemoryLimit(String),
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration for the sample store
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Decoded bytes kept in memory before partitions are spilled
    pub memory_limit: Option<usize>,
    pub spill_path: Option<PathBuf>,
    /// Samples fetched per partition when a limited load is requested
    pub debug_limit: usize,
    pub codec: FrameCodec,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_limit: None,
            spill_path: None,
            debug_limit: 100,
            codec: FrameCodec::default(),
        }
    }
}
