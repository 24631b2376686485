
use super::*;

/// Encodes raw samples exactly as a sensor would pack them.
pub fn pack_raw(raw: &[u16]) -> String {
    let mut bytes = Vec::with_capacity(raw.len() * 2);
    for sample in raw {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    STANDARD.encode(bytes)
}

pub fn ramp_raw() -> Vec<u16> {
    (0..FRAME_LEN as u16).map(|i| 2500 + i).collect()
}
