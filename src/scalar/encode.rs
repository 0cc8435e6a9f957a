use crate::common::GROUP_LEN;
use crate::control::length_class;

/// Writes `value` little-endian using its minimal byte count and returns that
/// count.
#[inline]
fn encode_one(value: u32, out: &mut [u8]) -> usize {
    let len = length_class(value) as usize;
    out[..len].copy_from_slice(&value.to_le_bytes()[..len]);
    len
}

/// Packs the first four values of `input` into `out` and returns the control
/// byte. The number of bytes written is `control::total_len(ctrl)`.
///
/// # Panics
///
/// Panics if `input` holds fewer than 4 values or `out` cannot hold the
/// encoded bytes.
#[inline]
pub fn put4(input: &[u32], out: &mut [u8]) -> u8 {
    let input = &input[..GROUP_LEN];
    let mut key = 0u8;
    let mut pos = 0;
    for (i, &value) in input.iter().enumerate() {
        let len = encode_one(value, &mut out[pos..]);
        key |= ((len - 1) as u8) << (2 * i);
        pos += len;
    }
    key
}

/// Packs the first eight values of `input` and returns the control word.
#[inline]
pub fn put8(input: &[u32], out: &mut [u8]) -> u16 {
    let lo = put4(&input[..GROUP_LEN], out);
    let hi = put4(
        &input[GROUP_LEN..2 * GROUP_LEN],
        &mut out[crate::control::total_len(lo)..],
    );
    lo as u16 | (hi as u16) << 8
}

/// Like [`put4`] but stores the differences `input[0] - prev, input[1] -
/// input[0], ...` using wrapping arithmetic.
#[inline]
pub fn put4_delta(input: &[u32], out: &mut [u8], prev: u32) -> u8 {
    let input = &input[..GROUP_LEN];
    let deltas = [
        input[0].wrapping_sub(prev),
        input[1].wrapping_sub(input[0]),
        input[2].wrapping_sub(input[1]),
        input[3].wrapping_sub(input[2]),
    ];
    put4(&deltas, out)
}

/// Delta version of [`put8`]. The second group is differenced against the
/// last value of the first.
#[inline]
pub fn put8_delta(input: &[u32], out: &mut [u8], prev: u32) -> u16 {
    let lo = put4_delta(&input[..GROUP_LEN], out, prev);
    let hi = put4_delta(
        &input[GROUP_LEN..2 * GROUP_LEN],
        &mut out[crate::control::total_len(lo)..],
        input[GROUP_LEN - 1],
    );
    lo as u16 | (hi as u16) << 8
}

/// Encodes a final group of fewer than four values. Missing lanes are treated
/// as zero, so they show up as one-byte fields in the control byte, but only
/// the bytes of the real values are written. Returns the control byte and the
/// number of bytes written.
///
/// # Panics
///
/// Panics if `input` holds more than 3 values.
pub fn put_tail(input: &[u32], out: &mut [u8]) -> (u8, usize) {
    assert!(input.len() < GROUP_LEN, "tail of {} values", input.len());
    let mut key = 0u8;
    let mut pos = 0;
    for (i, &value) in input.iter().enumerate() {
        let len = encode_one(value, &mut out[pos..]);
        key |= ((len - 1) as u8) << (2 * i);
        pos += len;
    }
    (key, pos)
}

/// Delta version of [`put_tail`]. Padding lanes repeat the last value, which
/// keeps their deltas at zero.
pub fn put_tail_delta(input: &[u32], out: &mut [u8], prev: u32) -> (u8, usize) {
    assert!(input.len() < GROUP_LEN, "tail of {} values", input.len());
    let mut deltas = [0u32; GROUP_LEN - 1];
    let mut last = prev;
    for (delta, &value) in deltas.iter_mut().zip(input) {
        *delta = value.wrapping_sub(last);
        last = value;
    }
    put_tail(&deltas[..input.len()], out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short() {
        let mut out = [0u8; 16];
        assert_eq!(put_tail(&[], &mut out), (0, 0));

        assert_eq!(put_tail(&[300], &mut out), (0x1, 2));
        assert_eq!(out[..2], [44, 1]);

        assert_eq!(put_tail(&[70000], &mut out), (0x2, 3));
        assert_eq!(out[..3], [112, 17, 1]);

        assert_eq!(put_tail(&[0x12345678], &mut out), (3, 4));
        assert_eq!(out[..4], [0x78, 0x56, 0x34, 0x12]);

        assert_eq!(put4(&[1, 2, 3, 4], &mut out), 0);
        assert_eq!(out[..4], [1, 2, 3, 4]);
    }

    #[test]
    fn mixed_lengths() {
        let mut out = [0u8; 16];
        let ctrl = put4(&[0, 23, 99, 301], &mut out);
        assert_eq!(ctrl, 64);
        assert_eq!(out[..5], [0, 23, 99, 45, 1]);

        let (ctrl, len) = put_tail(&[70211, 89902932], &mut out);
        assert_eq!((ctrl, len), (14, 7));
        assert_eq!(out[..7], [67, 18, 1, 84, 207, 91, 5]);
    }

    #[test]
    fn reference_group_of_eight() {
        let mut out = [0u8; 32];
        let ctrl = put8(&[1024, 3, 2, 1, 1073741824, 10, 12, 1024], &mut out);
        assert_eq!(ctrl, 0b0100_0011_0000_0001);
        assert_eq!(
            out[..13],
            [0x00, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, 0x40, 0x0a, 0x0c, 0x00, 0x04]
        );
    }

    #[test]
    fn writes_only_the_needed_bytes() {
        let mut out = [0u8; 4];
        assert_eq!(put4(&[1, 2, 3, 4], &mut out), 0);
        let (ctrl, len) = put_tail(&[u32::MAX], &mut out);
        assert_eq!((ctrl, len), (3, 4));
    }

    #[test]
    #[should_panic]
    fn undersized_output_panics() {
        let mut out = [0u8; 3];
        put4(&[1, 2, 3, 300], &mut out);
    }

    #[test]
    fn delta_groups() {
        let mut out = [0u8; 32];
        let ctrl = put4_delta(&[10, 11, 13, 300], &mut out, 8);
        // deltas: 2, 1, 2, 287
        assert_eq!(ctrl, 0b01_00_00_00);
        assert_eq!(out[..5], [2, 1, 2, 31, 1]);

        let ctrl = put8_delta(&[1, 2, 3, 4, 5, 6, 7, 8], &mut out, 0);
        assert_eq!(ctrl, 0);
        assert_eq!(out[..8], [1; 8]);

        // A decreasing sequence wraps instead of failing.
        let ctrl = put4_delta(&[5, 4, 4, 4], &mut out, 5);
        assert_eq!(ctrl, 0b00_00_11_00);
        assert_eq!(out[..7], [0, 0xff, 0xff, 0xff, 0xff, 0, 0]);

        let (ctrl, len) = put_tail_delta(&[100, 400], &mut out, 90);
        assert_eq!((ctrl, len), (0b01_00, 3));
        assert_eq!(out[..3], [10, 44, 1]);
    }
}
