//! Thermal frame browsing and range labeling

pub mod config;
pub mod frames;
pub mod labels;
pub mod storage;

pub use config::LabelerConfig;
pub use frames::{DecodedFrame, FrameCodec};
pub use labels::{Interval, JsonLabelStore, LabelKind, LabelSet, LabelStore};
pub use storage::{JsonDirSource, SampleCollection, SampleSource, SampleStore, StorageConfig};
