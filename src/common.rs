use std::mem;

use thiserror::Error;

use crate::control::{tail_len, total_len};

/// Number of values described by one control byte.
pub const GROUP_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamVbyteError {
    /// The stream ends before the control bytes or the data bytes they declare.
    #[error("stream of {available} bytes is too short, {needed} bytes are required")]
    DecodeOutOfBounds { needed: usize, available: usize },
}

/// Worst-case length of an encoded stream of `input_len` values.
pub fn max_compressed_len(input_len: usize) -> usize {
    control_bytes_len(input_len) + input_len * mem::size_of::<u32>()
}

/// Exact number of control bytes in an encoded stream.
pub fn control_bytes_len(input_len: usize) -> usize {
    // 2 bits per input, round up to next byte
    (input_len + 3) / 4
}

/// Compute the exact encoded length in bytes, control bytes included. `O(n)`
/// because it needs to read the full input.
pub fn exact_compressed_len(input: &[u32]) -> usize {
    let mut len = control_bytes_len(input.len());
    for value in input {
        len += crate::control::length_class(*value) as usize;
    }
    len
}

/// Number of data bytes declared by `ctrls` for a stream of `count` values.
/// The last control byte only contributes its first `count % 4` lanes when the
/// count is not a multiple of four.
///
/// # Panics
///
/// Panics if `ctrls` is shorter than `control_bytes_len(count)`.
pub fn encoded_data_len(ctrls: &[u8], count: usize) -> usize {
    let ctrls = &ctrls[..control_bytes_len(count)];
    let full = count / GROUP_LEN;
    let mut len: usize = ctrls[..full].iter().map(|&c| total_len(c)).sum();
    if count % GROUP_LEN != 0 {
        len += tail_len(ctrls[full], count % GROUP_LEN);
    }
    len
}

/// Checks that `stream` holds everything needed to decode `count` values.
pub(crate) fn validate_stream(count: usize, stream: &[u8]) -> Result<(), StreamVbyteError> {
    let ctrl_len = control_bytes_len(count);
    if stream.len() < ctrl_len {
        return Err(StreamVbyteError::DecodeOutOfBounds {
            needed: ctrl_len,
            available: stream.len(),
        });
    }
    let needed = ctrl_len + encoded_data_len(stream, count);
    if stream.len() < needed {
        return Err(StreamVbyteError::DecodeOutOfBounds {
            needed,
            available: stream.len(),
        });
    }
    Ok(())
}
