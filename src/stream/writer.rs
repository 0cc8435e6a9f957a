use crate::common::{control_bytes_len, max_compressed_len, GROUP_LEN};
use crate::control::{total_len, total_len_word};
use crate::simd::{Accelerated, GROUP8};
use crate::stream::coding::{Delta, GroupCoding, Plain};
use crate::stream::{ACCELERATED_BATCH, SAFETY_MARGIN, SCALAR_BATCH};

/// Encodes `values` into a new stream using the process-wide mode.
pub fn write_all(values: &[u32]) -> Vec<u8> {
    encode_with(values, Plain)
}

/// Encodes the differences between consecutive values, the first one taken
/// against `prev`. Decreasing inputs wrap modulo 2^32 and still round-trip.
pub fn write_all_delta(values: &[u32], prev: u32) -> Vec<u8> {
    encode_with(values, Delta::new(prev))
}

pub fn write_all_scalar(values: &[u32]) -> Vec<u8> {
    encode_scalar(values, Plain)
}

pub fn write_all_delta_scalar(values: &[u32], prev: u32) -> Vec<u8> {
    encode_scalar(values, Delta::new(prev))
}

pub fn write_all_accelerated(kernel: Accelerated, values: &[u32]) -> Vec<u8> {
    encode_accelerated(kernel, values, Plain)
}

pub fn write_all_delta_accelerated(kernel: Accelerated, values: &[u32], prev: u32) -> Vec<u8> {
    encode_accelerated(kernel, values, Delta::new(prev))
}

fn encode_with<C: GroupCoding>(values: &[u32], coding: C) -> Vec<u8> {
    log::trace!("encoding {} values", values.len());
    match Accelerated::new() {
        Some(kernel) => encode_accelerated(kernel, values, coding),
        None => encode_scalar(values, coding),
    }
}

fn encode_scalar<C: GroupCoding>(values: &[u32], mut coding: C) -> Vec<u8> {
    let count = values.len();
    let ctrl_len = control_bytes_len(count);
    let mut stream = vec![0u8; max_compressed_len(count)];
    let (ctrls, data) = stream.split_at_mut(ctrl_len);

    let mut encoded = 0;
    let mut ctrl_pos = 0;
    let mut data_pos = 0;

    let bulk_end = count - count % SCALAR_BATCH;
    while encoded < bulk_end {
        for quad in values[encoded..encoded + SCALAR_BATCH].chunks_exact(GROUP_LEN) {
            let ctrl = coding.put4(quad, &mut data[data_pos..]);
            ctrls[ctrl_pos] = ctrl;
            ctrl_pos += 1;
            data_pos += total_len(ctrl);
        }
        encoded += SCALAR_BATCH;
    }

    let data_pos = encode_tail(&mut coding, values, encoded, ctrls, data, data_pos);
    stream.truncate(ctrl_len + data_pos);
    stream
}

fn encode_accelerated<C: GroupCoding>(kernel: Accelerated, values: &[u32], mut coding: C) -> Vec<u8> {
    let count = values.len();
    let ctrl_len = control_bytes_len(count);
    // The data region holds 4 bytes per value, so any group of 8 with at
    // least 12 values after it keeps both 16-byte stores inside it.
    let mut stream = vec![0u8; max_compressed_len(count)];
    let (ctrls, data) = stream.split_at_mut(ctrl_len);

    let mut encoded = 0;
    let mut ctrl_pos = 0;
    let mut data_pos = 0;

    let safe_end = count.saturating_sub(SAFETY_MARGIN);
    let bulk_end = safe_end - safe_end % ACCELERATED_BATCH;
    while encoded < bulk_end {
        for octet in values[encoded..encoded + ACCELERATED_BATCH].chunks_exact(GROUP8) {
            let ctrl = coding.put8(kernel, octet, &mut data[data_pos..]);
            ctrls[ctrl_pos..ctrl_pos + 2].copy_from_slice(&ctrl.to_le_bytes());
            ctrl_pos += 2;
            data_pos += total_len_word(ctrl);
        }
        encoded += ACCELERATED_BATCH;
    }

    while encoded + GROUP8 <= safe_end {
        let ctrl = coding.put8(kernel, &values[encoded..], &mut data[data_pos..]);
        ctrls[ctrl_pos..ctrl_pos + 2].copy_from_slice(&ctrl.to_le_bytes());
        ctrl_pos += 2;
        data_pos += total_len_word(ctrl);
        encoded += GROUP8;
    }

    let data_pos = encode_tail(&mut coding, values, encoded, ctrls, data, data_pos);
    stream.truncate(ctrl_len + data_pos);
    stream
}

/// Scalar groups of four from `encoded` on, then the partial group. Returns
/// the final data position.
fn encode_tail<C: GroupCoding>(
    coding: &mut C,
    values: &[u32],
    mut encoded: usize,
    ctrls: &mut [u8],
    data: &mut [u8],
    mut data_pos: usize,
) -> usize {
    let count = values.len();
    let mut ctrl_pos = encoded / GROUP_LEN;
    while encoded + GROUP_LEN <= count {
        let ctrl = coding.put4(&values[encoded..], &mut data[data_pos..]);
        ctrls[ctrl_pos] = ctrl;
        ctrl_pos += 1;
        data_pos += total_len(ctrl);
        encoded += GROUP_LEN;
    }
    if encoded < count {
        let (ctrl, written) = coding.put_tail(&values[encoded..], &mut data[data_pos..]);
        ctrls[ctrl_pos] = ctrl;
        data_pos += written;
    }
    data_pos
}
