//! Control bytes: two bits per value holding `length - 1`, lane 0 in the low
//! bits. A control word packs two control bytes as `lo | hi << 8`.

use crate::tables::{PER_CONTROL_LEN_TABLE, PER_NUM_LEN_TABLE};

/// Minimal number of bytes (1..=4) needed to store `value`.
#[inline]
pub fn length_class(value: u32) -> u8 {
    // `| 1` keeps zero at one byte.
    4 - ((value | 1).leading_zeros() / 8) as u8
}

/// Control byte for the first four values of `values`.
///
/// # Panics
///
/// Panics if `values` holds fewer than 4 values.
#[inline]
pub fn control_byte(values: &[u32]) -> u8 {
    let v = &values[..4];
    (length_class(v[0]) - 1)
        | (length_class(v[1]) - 1) << 2
        | (length_class(v[2]) - 1) << 4
        | (length_class(v[3]) - 1) << 6
}

/// Control word for the first eight values of `values`.
#[inline]
pub fn control_word(values: &[u32]) -> u16 {
    let v = &values[..8];
    control_byte(&v[..4]) as u16 | (control_byte(&v[4..]) as u16) << 8
}

/// Per-value byte lengths encoded in `ctrl`.
#[inline]
pub fn lengths(ctrl: u8) -> [u8; 4] {
    PER_NUM_LEN_TABLE[ctrl as usize]
}

/// Data bytes covered by one control byte.
#[inline]
pub fn total_len(ctrl: u8) -> usize {
    PER_CONTROL_LEN_TABLE[ctrl as usize] as usize
}

/// Data bytes covered by a control word.
#[inline]
pub fn total_len_word(ctrl: u16) -> usize {
    total_len(ctrl as u8) + total_len((ctrl >> 8) as u8)
}

/// Data bytes for only the first `count` lanes of `ctrl`. Used for the final
/// partial group of a stream, whose padding lanes own no data bytes.
#[inline]
pub fn tail_len(ctrl: u8, count: usize) -> usize {
    debug_assert!(count <= 4);
    lengths(ctrl)[..count].iter().map(|&l| l as usize).sum()
}
