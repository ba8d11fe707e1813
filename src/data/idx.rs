//! IDX binary archives, the format MNIST ships in.
//!
//! ```text
//! bytes 0-1:  0x00 0x00   (reserved)
//! byte  2:    0x08        (dtype = uint8)
//! byte  3:    D           (number of dimensions; 3 for images, 1 for labels)
//! then D big-endian u32 sizes, then the uint8 payload in row-major order
//! ```

use crate::data::example::Example;
use crate::error::{NetworkError, Result};

/// Parses an IDX header with `dims` dimensions. Returns the dimension sizes
/// and the payload that follows, which is checked to be long enough.
fn parse_header<'a>(bytes: &'a [u8], dims: u8, what: &str) -> Result<(Vec<usize>, &'a [u8])> {
    let header_len = 4 + 4 * dims as usize;
    if bytes.len() < header_len {
        return Err(NetworkError::InvalidData(format!(
            "IDX {what} file too short: expected at least {header_len} header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NetworkError::InvalidData(format!(
            "IDX {what} file: reserved bytes must be zero, got 0x{:02X} 0x{:02X}",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NetworkError::InvalidData(format!(
            "IDX {what} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(NetworkError::InvalidData(format!(
            "IDX {what} file: expected {dims} dimensions, got {}",
            bytes[3]
        )));
    }

    let sizes: Vec<usize> = bytes[4..header_len]
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
        .collect();
    let payload_len = sizes
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| {
            NetworkError::InvalidData(format!("IDX {what} file: payload size overflows"))
        })?;

    let payload = &bytes[header_len..];
    if payload.len() < payload_len {
        return Err(NetworkError::InvalidData(format!(
            "IDX {what} file truncated: header declares {payload_len} data bytes, found {}",
            payload.len()
        )));
    }
    Ok((sizes, &payload[..payload_len]))
}

/// Parses an IDX3 image file and its IDX1 label file into examples.
///
/// Pixels are scaled to `[0, 1]`; labels become one-hot targets of length
/// `n_classes`.
pub fn parse_idx_pair(
    image_bytes: &[u8],
    label_bytes: &[u8],
    n_classes: usize,
) -> Result<Vec<Example>> {
    if n_classes < 2 {
        return Err(NetworkError::InvalidData(format!(
            "n_classes must be at least 2, got {n_classes}"
        )));
    }

    let (image_dims, pixels) = parse_header(image_bytes, 3, "image")?;
    let (label_dims, labels) = parse_header(label_bytes, 1, "label")?;

    let n_items = image_dims[0];
    if label_dims[0] != n_items {
        return Err(NetworkError::InvalidData(format!(
            "image file declares {n_items} items but label file declares {}",
            label_dims[0]
        )));
    }
    let n_pixels = image_dims[1] * image_dims[2];
    if n_pixels == 0 {
        return Err(NetworkError::InvalidData("IDX image file declares empty images".to_owned()));
    }

    pixels
        .chunks_exact(n_pixels)
        .zip(labels)
        .enumerate()
        .map(|(i, (chunk, &label))| {
            let input = chunk.iter().map(|&px| px as f64 / 255.0).collect();
            Example::one_hot(input, label as usize, n_classes).map_err(|e| match e {
                NetworkError::InvalidData(msg) => {
                    NetworkError::InvalidData(format!("label {i}: {msg}"))
                }
                other => other,
            })
        })
        .collect()
}
