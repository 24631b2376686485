use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::frames;

use super::{Error, SampleCollection, SampleSource, StorageConfig, spill};

enum CachedPartition {
    InMemory(Arc<SampleCollection>),
    Spilled(PathBuf),
}

struct StoreState {
    partitions: Option<Vec<String>>,
    cache: BTreeMap<String, CachedPartition>,
    memory_usage: usize,
    stats: StoreStats,
}

#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub fetched_partitions: usize,
    pub decoded_frames: usize,
    pub spilled_partitions: usize,
    pub cache_hits: usize,
}

/// Decoding, caching front for a [`SampleSource`].
///
/// Build one per process and share it by reference. Partition listings and
/// decoded partitions are kept for the lifetime of the store.
pub struct SampleStore<S: SampleSource> {
    source: S,
    config: StorageConfig,
    state: Mutex<StoreState>,
}

impl<S: SampleSource> SampleStore<S> {
    pub fn new(source: S, config: StorageConfig) -> Result<Self, Error> {
        if let Some(spill_path) = &config.spill_path {
            std::fs::create_dir_all(spill_path)?;
        }

        Ok(Self {
            source,
            config,
            state: Mutex::new(StoreState {
                partitions: None,
                cache: BTreeMap::new(),
                memory_usage: 0,
                stats: StoreStats::default(),
            }),
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn memory_usage(&self) -> usize {
        self.state.lock().memory_usage
    }

    pub fn stats(&self) -> StoreStats {
        self.state.lock().stats.clone()
    }

    /// Sorted partition keys, fetched from the source once.
    pub fn list_partitions(&self) -> Result<Vec<String>, Error> {
        let mut state = self.state.lock();
        if let Some(partitions) = &state.partitions {
            return Ok(partitions.clone());
        }

        let mut partitions = self.source.list_partitions()?;
        partitions.sort();
        state.partitions = Some(partitions.clone());
        Ok(partitions)
    }

    /// Decoded frames of `partition`. A `limited` load fetches only the
    /// first `debug_limit` samples; the first load of a key decides what is cached.
    pub fn load_partition(&self, partition: &str, limited: bool) -> Result<Arc<SampleCollection>, Error> {
        if let Some(collection) = self.cached(partition)? {
            return Ok(collection);
        }

        let limit = limited.then_some(self.config.debug_limit);
        let raw = self.source.fetch(partition, limit)?;
        log::info!("Fetched {} samples for partition {}", raw.len(), partition);

        let mut frames = Vec::with_capacity(raw.len());
        for (timestamp, payload) in raw {
            let frame = frames::decode_frame(&payload, &self.config.codec)
                .map_err(|source| Error::Decode { timestamp: timestamp.clone(), source })?;
            frames.push((timestamp, frame));
        }
        let collection = Arc::new(SampleCollection::new(partition, frames));
        let size = collection.memory_size();

        {
            let mut state = self.state.lock();
            // Another caller may have loaded the same key meanwhile
            if let Some(CachedPartition::InMemory(existing)) = state.cache.get(partition) {
                return Ok(Arc::clone(existing));
            }
            state.cache.insert(
                partition.to_string(),
                CachedPartition::InMemory(Arc::clone(&collection)),
            );
            state.memory_usage += size;
            state.stats.fetched_partitions += 1;
            state.stats.decoded_frames += collection.len();
        }

        self.enforce_memory_limit()?;
        Ok(collection)
    }

    fn cached(&self, partition: &str) -> Result<Option<Arc<SampleCollection>>, Error> {
        let spilled_path = {
            let mut state = self.state.lock();
            let hit = match state.cache.get(partition) {
                None => return Ok(None),
                Some(CachedPartition::InMemory(collection)) => Ok(Arc::clone(collection)),
                Some(CachedPartition::Spilled(path)) => Err(path.clone()),
            };
            state.stats.cache_hits += 1;
            match hit {
                Ok(collection) => return Ok(Some(collection)),
                Err(path) => path,
            }
        };

        log::debug!("Reloading spilled partition {} from {}", partition, spilled_path.display());
        Ok(Some(Arc::new(spill::load(partition, &spilled_path)?)))
    }

    /// Spills the largest in-memory partitions until usage fits the limit.
    fn enforce_memory_limit(&self) -> Result<(), Error> {
        let Some(limit) = self.config.memory_limit else {
            return Ok(());
        };

        loop {
            let victim = {
                let state = self.state.lock();
                if state.memory_usage <= limit {
                    return Ok(());
                }
                state
                    .cache
                    .iter()
                    .filter_map(|(key, entry)| match entry {
                        CachedPartition::InMemory(collection) => Some((key.clone(), Arc::clone(collection))),
                        CachedPartition::Spilled(_) => None,
                    })
                    .max_by_key(|(_, collection)| collection.memory_size())
            };

            let Some((key, collection)) = victim else {
                return Err(Error::MemoryLimit("No partitions available to spill".into()));
            };

            let spill_path = self
                .config
                .spill_path
                .as_ref()
                .ok_or(Error::MemoryLimit("No spill path configured".into()))?;

            let file_path = spill::spill(&collection, spill_path)?;
            log::info!("Spilled partition {} to {}", key, file_path.display());

            let mut state = self.state.lock();
            state.memory_usage = state.memory_usage.saturating_sub(collection.memory_size());
            state.stats.spilled_partitions += 1;
            state.cache.insert(key, CachedPartition::Spilled(file_path));
        }
    }
}

impl<S: SampleSource> Drop for SampleStore<S> {
    /// Spill files only live as long as the store that wrote them.
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for (key, entry) in &state.cache {
            if let CachedPartition::Spilled(path) = entry {
                if let Err(e) = std::fs::remove_file(path) {
                    log::warn!("Failed to remove spill file for {} at {}: {}", key, path.display(), e);
                }
            }
        }
    }
}
