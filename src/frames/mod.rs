//! Thermal frame decoding
//!
//! A frame arrives as a base64 string packing 16-bit little-endian samples.
//! Each raw sample maps to a temperature as `raw / divisor + offset`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[cfg(test)]
mod tests;

/// Rows in a decoded thermal frame
pub const ROWS: usize = 24;
/// Columns in a decoded thermal frame
pub const COLS: usize = 32;
/// Values in one frame
pub const FRAME_LEN: usize = ROWS * COLS;

const SAMPLE_BYTES: usize = 2;

/// Decoding failures. Every variant means the frame is unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Invalid byte length: {0} is not a whole number of samples")]
    InvalidByteLength(usize),
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Scaling law applied to raw samples
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCodec {
    pub offset: f32,
    pub divisor: f32,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            offset: 0.0,
            divisor: 100.0,
        }
    }
}

/// Decodes a payload into physical values without enforcing the frame shape.
pub fn decode(payload: &str, offset: f32, scale: f32) -> Result<Vec<f32>, Error> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::InvalidEncoding(e.to_string()))?;

    if bytes.len() % SAMPLE_BYTES != 0 {
        return Err(Error::InvalidByteLength(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) as f32 / scale + offset)
        .collect())
}

/// Decodes a payload and reshapes it into a 24x32 frame.
pub fn decode_frame(payload: &str, codec: &FrameCodec) -> Result<DecodedFrame, Error> {
    let values = decode(payload, codec.offset, codec.divisor)?;
    DecodedFrame::from_values(values)
}

/// Inverse of [`decode`]. Values are rounded to the nearest raw sample and
/// clamped to the 16-bit range.
pub fn encode(values: &[f32], codec: &FrameCodec) -> String {
    let mut bytes = Vec::with_capacity(values.len() * SAMPLE_BYTES);
    for value in values {
        let raw = ((value - codec.offset) * codec.divisor)
            .round()
            .clamp(0.0, u16::MAX as f32) as u16;
        bytes.extend_from_slice(&raw.to_le_bytes());
    }
    STANDARD.encode(bytes)
}

/// Immutable 24x32 temperature grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedFrame {
    values: Box<[f32]>,
}

impl DecodedFrame {
    pub fn from_values(values: Vec<f32>) -> Result<Self, Error> {
        if values.len() != FRAME_LEN {
            return Err(Error::ShapeMismatch {
                expected: FRAME_LEN,
                actual: values.len(),
            });
        }
        Ok(Self {
            values: values.into_boxed_slice(),
        })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(self.values[row * COLS + col])
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= ROWS {
            return None;
        }
        Some(&self.values[row * COLS..(row + 1) * COLS])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(COLS)
    }

    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn mean(&self) -> f32 {
        self.values.iter().sum::<f32>() / FRAME_LEN as f32
    }

    /// Size of the decoded values in bytes
    pub fn memory_size(&self) -> usize {
        self.values.len() * std::mem::size_of::<f32>()
    }
}

impl fmt::Display for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|v| format!("{:5.1}", v)).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
