pub mod placement;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tempfile::tempdir;

use super::*;

/// In-memory store that can be told to fail its next writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<Vec<Interval>>>,
    saves: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn with(labels: Vec<Interval>) -> Self {
        let store = Self::default();
        *store.saved.lock() = labels;
        store
    }

    pub fn saved(&self) -> Vec<Interval> {
        self.saved.lock().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl LabelStore for MemoryStore {
    fn load(&self) -> Result<Vec<Interval>, Error> {
        Ok(self.saved())
    }

    fn save(&self, labels: &[Interval]) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Persistence("disk full".into()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock() = labels.to_vec();
        Ok(())
    }
}

pub fn label(start: i64, end: i64, name: &str) -> Interval {
    Interval::new(start, end, name)
}

pub fn set_with(labels: Vec<Interval>) -> (LabelSet, MemoryStore) {
    let store = MemoryStore::with(labels);
    let set = LabelSet::open(store.clone()).unwrap();
    (set, store)
}
