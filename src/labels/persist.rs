use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{Error, Interval};

/// Durable home of a label set.
pub trait LabelStore: Send + Sync {
    /// Reads the saved labels, creating an empty document if there is none.
    fn load(&self) -> Result<Vec<Interval>, Error>;

    /// Replaces the saved document with `labels`.
    fn save(&self, labels: &[Interval]) -> Result<(), Error>;
}

/// Labels kept in a pretty-printed JSON array of `[start, end, name]` arrays.
#[derive(Clone, Debug)]
pub struct JsonLabelStore {
    path: PathBuf,
}

impl JsonLabelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JsonLabelStore {
    fn io_error(&self, action: &str, e: std::io::Error) -> Error {
        Error::Persistence(format!("Failed to {} {}: {}", action, self.path.display(), e))
    }
}

impl LabelStore for JsonLabelStore {
    fn load(&self) -> Result<Vec<Interval>, Error> {
        if !self.path.exists() {
            log::info!("Creating empty label document at {}", self.path.display());
            self.save(&[])?;
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))?;
        let labels = serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("{} is not a label document: {}", self.path.display(), e))
        })?;
        Ok(labels)
    }

    fn save(&self, labels: &[Interval]) -> Result<(), Error> {
        let serialized = to_pretty_json(labels)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create the directory of", e))?;
        }

        // Write beside the target so the rename stays on one filesystem
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| Error::Persistence(format!("{} has no file name", self.path.display())))?;
        let temp_path = self.path.with_file_name(format!(
            "{}.{}.tmp",
            file_name.to_string_lossy(),
            generate_random_string(10)
        ));

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(serialized.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&temp_path, &self.path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error("write", e));
        }

        log::debug!("Saved {} labels to {}", labels.len(), self.path.display());
        Ok(())
    }
}

/// Four-space indented JSON, matching documents written by earlier tooling.
fn to_pretty_json(labels: &[Interval]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    labels
        .serialize(&mut serializer)
        .map_err(|e| Error::Persistence(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| Error::Persistence(e.to_string()))
}

fn generate_random_string(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
