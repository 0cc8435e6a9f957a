use crate::common::{control_bytes_len, validate_stream, StreamVbyteError, GROUP_LEN};
use crate::simd::{Accelerated, GROUP8};
use crate::stream::coding::{Delta, GroupCoding, Plain};
use crate::stream::{ACCELERATED_BATCH, SAFETY_MARGIN, SCALAR_BATCH};

/// Decodes `count` values from `stream` using the process-wide mode.
///
/// The count is not stored in the stream and must come from the caller.
/// Bytes after the encoded values are ignored.
///
/// # Panics
///
/// Panics if `stream` is shorter than the control bytes and data bytes it
/// declares for `count` values. Use [`try_read_all`] for untrusted input.
pub fn read_all(count: usize, stream: &[u8]) -> Vec<u32> {
    decode_with(count, stream, Plain)
}

/// Decodes a stream written by [`crate::write_all_delta`] with the same
/// `prev`.
pub fn read_all_delta(count: usize, stream: &[u8], prev: u32) -> Vec<u32> {
    decode_with(count, stream, Delta::new(prev))
}

pub fn read_all_scalar(count: usize, stream: &[u8]) -> Vec<u32> {
    decode_scalar(count, stream, Plain)
}

pub fn read_all_delta_scalar(count: usize, stream: &[u8], prev: u32) -> Vec<u32> {
    decode_scalar(count, stream, Delta::new(prev))
}

pub fn read_all_accelerated(kernel: Accelerated, count: usize, stream: &[u8]) -> Vec<u32> {
    decode_accelerated(kernel, count, stream, Plain)
}

pub fn read_all_delta_accelerated(
    kernel: Accelerated,
    count: usize,
    stream: &[u8],
    prev: u32,
) -> Vec<u32> {
    decode_accelerated(kernel, count, stream, Delta::new(prev))
}

/// Like [`read_all`], but checks first that `stream` holds every byte its
/// control bytes declare. Never panics on a short stream.
pub fn try_read_all(count: usize, stream: &[u8]) -> Result<Vec<u32>, StreamVbyteError> {
    validate_stream(count, stream)?;
    Ok(read_all(count, stream))
}

/// Checked version of [`read_all_delta`].
pub fn try_read_all_delta(
    count: usize,
    stream: &[u8],
    prev: u32,
) -> Result<Vec<u32>, StreamVbyteError> {
    validate_stream(count, stream)?;
    Ok(read_all_delta(count, stream, prev))
}

fn decode_with<C: GroupCoding>(count: usize, stream: &[u8], coding: C) -> Vec<u32> {
    log::trace!("decoding {} values from {} bytes", count, stream.len());
    match Accelerated::new() {
        Some(kernel) => decode_accelerated(kernel, count, stream, coding),
        None => decode_scalar(count, stream, coding),
    }
}

fn decode_scalar<C: GroupCoding>(count: usize, stream: &[u8], mut coding: C) -> Vec<u32> {
    let (ctrls, data) = stream.split_at(control_bytes_len(count));
    let mut out = vec![0u32; count];

    let mut decoded = 0;
    let mut ctrl_pos = 0;
    let mut data_pos = 0;

    let bulk_end = count - count % SCALAR_BATCH;
    while decoded < bulk_end {
        for quad in out[decoded..decoded + SCALAR_BATCH].chunks_exact_mut(GROUP_LEN) {
            data_pos += coding.get4(&data[data_pos..], quad, ctrls[ctrl_pos]);
            ctrl_pos += 1;
        }
        decoded += SCALAR_BATCH;
    }

    decode_tail(&mut coding, ctrls, data, &mut out, decoded, data_pos);
    out
}

fn decode_accelerated<C: GroupCoding>(
    kernel: Accelerated,
    count: usize,
    stream: &[u8],
    mut coding: C,
) -> Vec<u32> {
    let (ctrls, data) = stream.split_at(control_bytes_len(count));
    let mut out = vec![0u32; count];

    let mut decoded = 0;
    let mut ctrl_pos = 0;
    let mut data_pos = 0;

    // Each later value owns at least one data byte, so keeping 12 values in
    // reserve keeps the second 16-byte load of a group inside `data`.
    let safe_end = count.saturating_sub(SAFETY_MARGIN);
    let bulk_end = safe_end - safe_end % ACCELERATED_BATCH;
    while decoded < bulk_end {
        for octet in out[decoded..decoded + ACCELERATED_BATCH].chunks_exact_mut(GROUP8) {
            let ctrl = u16::from_le_bytes([ctrls[ctrl_pos], ctrls[ctrl_pos + 1]]);
            data_pos += coding.get8(kernel, &data[data_pos..], octet, ctrl);
            ctrl_pos += 2;
        }
        decoded += ACCELERATED_BATCH;
    }

    while decoded + GROUP8 <= safe_end {
        let ctrl = u16::from_le_bytes([ctrls[ctrl_pos], ctrls[ctrl_pos + 1]]);
        data_pos += coding.get8(kernel, &data[data_pos..], &mut out[decoded..], ctrl);
        ctrl_pos += 2;
        decoded += GROUP8;
    }

    decode_tail(&mut coding, ctrls, data, &mut out, decoded, data_pos);
    out
}

/// Scalar groups of four from `decoded` on, then the partial group. Returns
/// the final data position.
fn decode_tail<C: GroupCoding>(
    coding: &mut C,
    ctrls: &[u8],
    data: &[u8],
    out: &mut [u32],
    mut decoded: usize,
    mut data_pos: usize,
) -> usize {
    let count = out.len();
    let mut ctrl_pos = decoded / GROUP_LEN;
    while decoded + GROUP_LEN <= count {
        data_pos += coding.get4(&data[data_pos..], &mut out[decoded..], ctrls[ctrl_pos]);
        ctrl_pos += 1;
        decoded += GROUP_LEN;
    }
    if decoded < count {
        data_pos += coding.get_tail(
            &data[data_pos..],
            &mut out[decoded..],
            ctrls[ctrl_pos],
            count - decoded,
        );
    }
    data_pos
}
