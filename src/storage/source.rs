use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::Error;

/// Boundary to the service that holds encoded samples.
///
/// Implementations return raw `(timestamp, payload)` pairs. Decoding is
/// left to the [`SampleStore`](super::SampleStore).
pub trait SampleSource: Send + Sync {
    /// Available partition keys, e.g. one per calendar date
    fn list_partitions(&self) -> Result<Vec<String>, Error>;

    /// Encoded samples of one partition ordered by key, at most `limit` of them.
    fn fetch(&self, partition: &str, limit: Option<usize>) -> Result<Vec<(String, String)>, Error>;
}

/// Reads partitions from a directory of `<partition>.json` documents, each a
/// JSON object mapping timestamp keys to encoded payloads.
#[derive(Clone, Debug)]
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn partition_path(&self, partition: &str) -> Result<PathBuf, Error> {
        if partition.is_empty() || partition.contains(['/', '\\']) || partition.starts_with('.') {
            return Err(Error::InvalidPartition(partition.to_string()));
        }
        Ok(self.root.join(format!("{}.json", partition)))
    }

    /// Writes a partition document. Used to seed a local mirror of the remote store.
    pub fn write_partition(
        &self,
        partition: &str,
        samples: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let path = self.partition_path(partition)?;
        std::fs::create_dir_all(&self.root)?;
        let serialized = serde_json::to_string_pretty(samples)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(temp_path, &path)?;
        Ok(())
    }
}

impl SampleSource for JsonDirSource {
    fn list_partitions(&self) -> Result<Vec<String>, Error> {
        let mut partitions = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    partitions.push(stem.to_string());
                }
            }
        }
        partitions.sort();
        Ok(partitions)
    }

    fn fetch(&self, partition: &str, limit: Option<usize>) -> Result<Vec<(String, String)>, Error> {
        let path = self.partition_path(partition)?;
        if !path.exists() {
            return Err(Error::InvalidPartition(partition.to_string()));
        }

        let contents = std::fs::read_to_string(&path)?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&contents)?;

        let mut samples: Vec<(String, String)> = raw.into_iter().collect();
        samples.sort_by(|a, b| super::collection::compare_keys(&a.0, &b.0));
        if let Some(limit) = limit {
            samples.truncate(limit);
        }
        Ok(samples)
    }
}
