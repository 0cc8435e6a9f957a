use crate::common::GROUP_LEN;
use crate::control::{lengths, total_len};

#[inline]
fn decode_one(input: &[u8], len: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes[..len].copy_from_slice(&input[..len]);
    u32::from_le_bytes(bytes)
}

/// Unpacks the first `count` lanes of `ctrl` from `input` into `out` and
/// returns the number of input bytes consumed.
#[inline]
fn decode_lanes(input: &[u8], out: &mut [u32], ctrl: u8, count: usize) -> usize {
    let lens = lengths(ctrl);
    let mut pos = 0;
    for (value, &len) in out[..count].iter_mut().zip(&lens) {
        let len = len as usize;
        *value = decode_one(&input[pos..], len);
        pos += len;
    }
    pos
}

/// Running prefix sum of `values` starting from `prev`. Returns the last sum.
#[inline]
fn undo_delta(values: &mut [u32], prev: u32) -> u32 {
    let mut acc = prev;
    for value in values {
        acc = acc.wrapping_add(*value);
        *value = acc;
    }
    acc
}

/// Unpacks one group of four values described by `ctrl` and returns the
/// number of input bytes consumed, `total_len(ctrl)`.
///
/// # Panics
///
/// Panics if `out` has room for fewer than 4 values or `input` is shorter
/// than the group.
#[inline]
pub fn get4(input: &[u8], out: &mut [u32], ctrl: u8) -> usize {
    decode_lanes(input, out, ctrl, GROUP_LEN);
    total_len(ctrl)
}

/// Unpacks two groups described by the control word `ctrl`.
#[inline]
pub fn get8(input: &[u8], out: &mut [u32], ctrl: u16) -> usize {
    let (lo, hi) = out[..2 * GROUP_LEN].split_at_mut(GROUP_LEN);
    let consumed = get4(input, lo, ctrl as u8);
    consumed + get4(&input[consumed..], hi, (ctrl >> 8) as u8)
}

/// Unpacks a group of stored differences and adds them up starting from
/// `prev`.
#[inline]
pub fn get4_delta(input: &[u8], out: &mut [u32], ctrl: u8, prev: u32) -> usize {
    let consumed = get4(input, out, ctrl);
    undo_delta(&mut out[..GROUP_LEN], prev);
    consumed
}

#[inline]
pub fn get8_delta(input: &[u8], out: &mut [u32], ctrl: u16, prev: u32) -> usize {
    let consumed = get8(input, out, ctrl);
    undo_delta(&mut out[..2 * GROUP_LEN], prev);
    consumed
}

/// Unpacks the final partial group of a stream. Only the first `count` lanes
/// of `ctrl` are read; the padding lanes are ignored.
///
/// # Panics
///
/// Panics if `count` is 4 or more.
pub fn get_tail(input: &[u8], out: &mut [u32], ctrl: u8, count: usize) -> usize {
    assert!(count < GROUP_LEN, "tail of {} values", count);
    decode_lanes(input, out, ctrl, count)
}

pub fn get_tail_delta(input: &[u8], out: &mut [u32], ctrl: u8, count: usize, prev: u32) -> usize {
    let consumed = get_tail(input, out, ctrl, count);
    undo_delta(&mut out[..count], prev);
    consumed
}
