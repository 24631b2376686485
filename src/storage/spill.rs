use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, FixedSizeListArray, Float32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

use crate::frames::{DecodedFrame, FRAME_LEN};

use super::{Error, SampleCollection};

pub fn frame_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time", DataType::Utf8, false),
        Field::new(
            "frame",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, false)),
                FRAME_LEN as i32,
            ),
            false,
        ),
    ]))
}

/// Columnar form of a partition: one row per frame.
pub fn to_record_batch(collection: &SampleCollection) -> Result<RecordBatch, Error> {
    let schema = frame_schema();
    let times = StringArray::from(collection.keys().collect::<Vec<_>>());

    let mut values = Vec::with_capacity(collection.len() * FRAME_LEN);
    for (_, frame) in collection.iter() {
        values.extend_from_slice(frame.values());
    }
    let item = Arc::new(Field::new("item", DataType::Float32, false));
    let frames = FixedSizeListArray::try_new(
        item,
        FRAME_LEN as i32,
        Arc::new(Float32Array::from(values)),
        None,
    )?;

    Ok(RecordBatch::try_new(schema, vec![Arc::new(times), Arc::new(frames)])?)
}

pub fn from_record_batches(partition: &str, batches: &[RecordBatch]) -> Result<SampleCollection, Error> {
    let mut frames = Vec::new();

    for batch in batches {
        let times = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or(Error::InvalidTimestamp("First column must be a string key".to_string()))?;
        let lists = batch
            .column(1)
            .as_any()
            .downcast_ref::<FixedSizeListArray>()
            .ok_or(Error::Source("Second column must be a frame list".to_string()))?;

        for row in 0..batch.num_rows() {
            let timestamp = times.value(row).to_string();
            let list = lists.value(row);
            let values = list
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or(Error::Source("Frame values must be Float32".to_string()))?;
            let frame = DecodedFrame::from_values(values.values().to_vec()).map_err(|source| {
                Error::Decode {
                    timestamp: timestamp.clone(),
                    source,
                }
            })?;
            frames.push((timestamp, frame));
        }
    }

    Ok(SampleCollection::new(partition, frames))
}

/// Writes a partition as an Arrow IPC file under `dir` and returns its path.
pub fn spill(collection: &SampleCollection, dir: &Path) -> Result<PathBuf, Error> {
    let batch = to_record_batch(collection)?;

    let file_path = dir.join(format!(
        "{}_{}.arrow",
        collection.partition().replace([':', '/', '\\'], "-"),
        generate_random_string(10)
    ));
    let temp_path = file_path.with_extension("tmp");

    let written = write_ipc(&batch, &temp_path)
        .and_then(|_| std::fs::rename(&temp_path, &file_path).map_err(Error::from));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(file_path)
}

fn write_ipc(batch: &RecordBatch, path: &Path) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    let mut writer = FileWriter::try_new(file, &batch.schema())?;
    writer.write(batch)?;
    writer.finish()?;
    Ok(())
}

pub fn load(partition: &str, path: &Path) -> Result<SampleCollection, Error> {
    let file = std::fs::File::open(path)?;
    let reader = FileReader::try_new(file, None)?;

    let mut batches = Vec::new();
    for maybe_batch in reader {
        batches.push(maybe_batch?);
    }

    from_record_batches(partition, &batches)
}

fn generate_random_string(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
