//! Labeled frame ranges
//!
//! A [`LabelSet`] keeps `[start, end] -> name` intervals sorted by `start`
//! with `prev.end < next.start` between neighbours. Every accepted insertion
//! is written through to a [`LabelStore`] before the call returns.

use std::fmt;

use parking_lot::Mutex;
use serde::de::Deserializer;
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

mod persist;
mod vocabulary;

#[cfg(test)]
mod tests;

pub use persist::{JsonLabelStore, LabelStore};
pub use vocabulary::{LabelKind, UnknownLabel};

pub const OVERLAP_MESSAGE: &str =
    "Label could not be appended. Check if label is overlapping with another label(s).";

pub const EMPTY_DISPLAY: &str = "No Labels selected";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Label could not be appended. Check if label is overlapping with another label(s).")]
    Overlap,
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// A labeled span of the timeline, stored on disk as `[start, end, name]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
    pub name: String,
}

impl Interval {
    pub fn new(start: i64, end: i64, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.start, self.end, self.name)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.start)?;
        tuple.serialize_element(&self.end)?;
        tuple.serialize_element(&self.name)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (start, end, name) = <(i64, i64, String)>::deserialize(deserializer)?;
        Ok(Self { start, end, name })
    }
}

/// Renders a label list the way the operator sees it.
pub fn display_labels(labels: &[Interval]) -> Vec<String> {
    if labels.is_empty() {
        return vec![EMPTY_DISPLAY.to_string()];
    }
    labels.iter().map(ToString::to_string).collect()
}

/// Returns true when the sequence is sorted by start with no touching neighbours.
pub fn is_well_formed(labels: &[Interval]) -> bool {
    labels.windows(2).all(|pair| pair[0].end < pair[1].start)
}

/// Ordered, non-overlapping labels backed by a durable store.
pub struct LabelSet {
    state: Mutex<Vec<Interval>>,
    store: Box<dyn LabelStore>,
}

impl LabelSet {
    /// Loads the current labels from `store`, creating an empty document if needed.
    pub fn open(store: impl LabelStore + 'static) -> Result<Self, Error> {
        let labels = store.load()?;
        if !is_well_formed(&labels) {
            log::warn!("Loaded label document is not sorted and overlap free");
        }
        log::debug!("Loaded {} labels", labels.len());

        Ok(Self {
            state: Mutex::new(labels),
            store: Box::new(store),
        })
    }

    /// Snapshot of the labels in timeline order
    pub fn data(&self) -> Vec<Interval> {
        self.state.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Places `candidate` without overlapping existing labels and persists the set.
    ///
    /// The placement check and the write run under one lock. The new sequence
    /// is built on a working copy, so a rejected candidate or a failed write
    /// leaves the set untouched.
    pub fn add_label(&self, candidate: Interval) -> Result<(), Error> {
        if candidate.is_inverted() {
            log::warn!("Candidate label {} ends before it starts", candidate);
        }

        let mut state = self.state.lock();
        let mut next = state.clone();

        if !place(&mut next, &candidate) {
            log::info!("Rejected label {}", candidate);
            return Err(Error::Overlap);
        }

        self.store.save(&next)?;
        *state = next;
        log::info!("Added label {}", candidate);
        Ok(())
    }
}

/// Inserts `candidate` into `labels`. Returns false if no position fits.
///
/// The prepend, between and append rules are evaluated one after another
/// against the sequence as it stands, each independently of the others.
fn place(labels: &mut Vec<Interval>, candidate: &Interval) -> bool {
    if labels.is_empty() {
        labels.push(candidate.clone());
        return true;
    }

    let mut appended = false;

    if candidate.end < labels[0].start {
        labels.insert(0, candidate.clone());
        appended = true;
    }

    if labels.len() > 1 {
        let gap = labels.windows(2).find_map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            let fits = prev.end < candidate.start
                && candidate.start < next.start
                && prev.end < candidate.end
                && candidate.end < next.start;
            fits.then(|| next.clone())
        });
        // Lands before the first label equal to `next`, which differs from
        // its own position only when the sequence holds duplicates
        if let Some(next) = gap {
            let index = labels.iter().position(|label| *label == next).unwrap_or(labels.len());
            labels.insert(index, candidate.clone());
            appended = true;
        }
    }

    if let Some(last) = labels.last() {
        if candidate.start > last.end {
            labels.push(candidate.clone());
            appended = true;
        }
    }

    appended
}
