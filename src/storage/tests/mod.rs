
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::tempdir;

use super::*;
use crate::frames::{FRAME_LEN, encode};

/// Payload whose frame holds `value` everywhere.
pub fn flat_payload(value: f32) -> String {
    encode(&vec![value; FRAME_LEN], &FrameCodec::default())
}

pub fn write_partition(root: &Path, partition: &str, timestamps: &[i64]) {
    let samples: BTreeMap<String, String> = timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| (ts.to_string(), flat_payload(25.0 + i as f32)))
        .collect();
    JsonDirSource::new(root).write_partition(partition, &samples).unwrap();
}

/// Counts calls into a wrapped source.
pub struct CountingSource {
    inner: JsonDirSource,
    pub lists: Arc<AtomicUsize>,
    pub fetches: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: JsonDirSource::new(root),
            lists: Arc::new(AtomicUsize::new(0)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SampleSource for CountingSource {
    fn list_partitions(&self) -> Result<Vec<String>, Error> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_partitions()
    }

    fn fetch(&self, partition: &str, limit: Option<usize>) -> Result<Vec<(String, String)>, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(partition, limit)
    }
}
