use std::path::PathBuf;

use crate::frames::FrameCodec;
use crate::storage::StorageConfig;

/// Settings for one labeling session
#[derive(Clone, Debug)]
pub struct LabelerConfig {
    pub labels_path: PathBuf,
    pub samples_dir: PathBuf,
    pub codec: FrameCodec,
    pub debug_limit: usize,
    pub memory_limit: Option<usize>,
    pub spill_path: Option<PathBuf>,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            labels_path: PathBuf::from("data/labels.json"),
            samples_dir: PathBuf::from("data/samples"),
            codec: FrameCodec::default(),
            debug_limit: 100,
            memory_limit: None,
            spill_path: None,
        }
    }
}

impl LabelerConfig {
    pub fn storage(&self) -> StorageConfig {
        StorageConfig {
            memory_limit: self.memory_limit,
            spill_path: self.spill_path.clone(),
            debug_limit: self.debug_limit,
            codec: self.codec,
        }
    }
}
