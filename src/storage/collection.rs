use std::cmp::Ordering;

use crate::frames::DecodedFrame;
use crate::labels::Interval;

use super::Error;

/// Orders timestamp keys numerically when both parse, lexically otherwise.
pub(crate) fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Decoded frames of one partition in timestamp order.
#[derive(Clone, Debug, Default)]
pub struct SampleCollection {
    partition: String,
    frames: Vec<(String, DecodedFrame)>,
}

impl SampleCollection {
    pub fn new(partition: impl Into<String>, mut frames: Vec<(String, DecodedFrame)>) -> Self {
        frames.sort_by(|a, b| compare_keys(&a.0, &b.0));
        Self {
            partition: partition.into(),
            frames,
        }
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DecodedFrame)> {
        self.frames.iter().map(|(key, frame)| (key.as_str(), frame))
    }

    pub fn first_key(&self) -> Option<&str> {
        self.frames.first().map(|(key, _)| key.as_str())
    }

    pub fn last_key(&self) -> Option<&str> {
        self.frames.last().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&DecodedFrame> {
        self.frames
            .binary_search_by(|(k, _)| compare_keys(k, key))
            .ok()
            .map(|idx| &self.frames[idx].1)
    }

    /// Frame at a slider position
    pub fn at(&self, index: usize) -> Option<(&str, &DecodedFrame)> {
        self.frames.get(index).map(|(key, frame)| (key.as_str(), frame))
    }

    /// Integer timestamp at a slider position
    pub fn timestamp_at(&self, index: usize) -> Result<i64, Error> {
        let (key, _) = self.frames.get(index).ok_or_else(|| {
            Error::InvalidTimestamp(format!(
                "position {} is outside partition {} ({} frames)",
                index,
                self.partition,
                self.frames.len()
            ))
        })?;
        key.parse::<i64>()
            .map_err(|_| Error::InvalidTimestamp(format!("{} is not an integer timestamp", key)))
    }

    /// Frames between two slider positions, both ends included.
    pub fn window(&self, start: usize, end: usize) -> &[(String, DecodedFrame)] {
        let end = end.min(self.frames.len().saturating_sub(1));
        if self.frames.is_empty() || start > end {
            return &[];
        }
        &self.frames[start..=end]
    }

    /// Builds a label candidate from two slider positions.
    pub fn candidate(&self, start: usize, end: usize, name: impl Into<String>) -> Result<Interval, Error> {
        Ok(Interval::new(
            self.timestamp_at(start)?,
            self.timestamp_at(end)?,
            name,
        ))
    }

    /// Size of the decoded frames in bytes
    pub fn memory_size(&self) -> usize {
        self.frames
            .iter()
            .map(|(key, frame)| key.len() + frame.memory_size())
            .sum()
    }
}
