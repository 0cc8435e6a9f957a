use std::arch::x86_64::{
    __m128i, _mm_adds_epu16, _mm_alignr_epi8, _mm_loadu_si128, _mm_min_epi16, _mm_min_epu8,
    _mm_movemask_epi8, _mm_packus_epi16, _mm_set1_epi16, _mm_set1_epi32, _mm_set1_epi8,
    _mm_shuffle_epi8, _mm_storeu_si128, _mm_sub_epi32,
};

use multiversion::target;

use crate::tables::{ENCODE_SHUFFLE_TABLE, PER_CONTROL_LEN_TABLE};

/// Derives the control word of two 4-lane registers without a scalar loop.
/// Bit `2i` and `2i + 1` of the movemask hold the length class of lane `i`.
#[target("x86_64+ssse3")]
#[inline]
unsafe fn control_word(first: __m128i, second: __m128i) -> u16 {
    let ones = _mm_set1_epi8(1);
    // Every non-zero byte becomes 1.
    let first = _mm_min_epu8(first, ones);
    let second = _mm_min_epu8(second, ones);
    // Each 16-bit half collapses to one byte: 0, 1 or 0xff.
    let packed = _mm_packus_epi16(first, second);
    // Drops the low marker of 3-byte values; 4-byte values are negative and
    // pass through.
    let clamped = _mm_min_epi16(packed, _mm_set1_epi16(0x0101));
    // Sets the high bit of the low byte for 2-byte and 4-byte values and of
    // the high byte for 3-byte and 4-byte values.
    let marked = _mm_adds_epu16(clamped, _mm_set1_epi16(0x7f00));
    _mm_movemask_epi8(marked) as u16
}

/// Writes 16 bytes at `out` and 16 bytes at `out + total_len(lo)`.
#[target("x86_64+ssse3")]
#[inline]
unsafe fn pack(first: __m128i, second: __m128i, ctrl: u16, out: *mut u8) {
    let lo = (ctrl & 0xff) as usize;
    let hi = (ctrl >> 8) as usize;
    // Safety: table rows are 16 bytes and we allow unaligned reads.
    let mask_lo = _mm_loadu_si128(ENCODE_SHUFFLE_TABLE[lo].as_ptr() as *const __m128i);
    let mask_hi = _mm_loadu_si128(ENCODE_SHUFFLE_TABLE[hi].as_ptr() as *const __m128i);
    _mm_storeu_si128(out as *mut __m128i, _mm_shuffle_epi8(first, mask_lo));
    let out = out.add(PER_CONTROL_LEN_TABLE[lo] as usize);
    _mm_storeu_si128(out as *mut __m128i, _mm_shuffle_epi8(second, mask_hi));
}

/// Packs 8 values and returns their control word.
///
/// # Safety
///
/// The CPU must support SSSE3. `input` must point to 8 readable values and
/// `out` to 32 writable bytes. Bytes past the packed length are clobbered.
#[target("x86_64+ssse3")]
pub unsafe fn put8(input: *const u32, out: *mut u8) -> u16 {
    let first = _mm_loadu_si128(input as *const __m128i);
    let second = _mm_loadu_si128(input.add(4) as *const __m128i);
    let ctrl = control_word(first, second);
    pack(first, second, ctrl, out);
    ctrl
}

/// Differences 8 values against their predecessors, starting from `prev`,
/// then packs them like [`put8`].
///
/// # Safety
///
/// Same as [`put8`].
#[target("x86_64+ssse3")]
pub unsafe fn put8_delta(input: *const u32, out: *mut u8, prev: u32) -> u16 {
    let first = _mm_loadu_si128(input as *const __m128i);
    let second = _mm_loadu_si128(input.add(4) as *const __m128i);
    // [prev, a, b, c] and [d, e, f, g]
    let shifted_first = _mm_alignr_epi8::<12>(first, _mm_set1_epi32(prev as i32));
    let shifted_second = _mm_alignr_epi8::<12>(second, first);
    let first = _mm_sub_epi32(first, shifted_first);
    let second = _mm_sub_epi32(second, shifted_second);
    let ctrl = control_word(first, second);
    pack(first, second, ctrl, out);
    ctrl
}

#[cfg(test)]
mod tests {
    use super::{put8, put8_delta};

    #[test]
    fn reference_group_of_eight() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let input: [u32; 8] = [1024, 3, 2, 1, 1073741824, 10, 12, 1024];
        let mut out = [0u8; 32];
        let ctrl = unsafe { put8(input.as_ptr(), out.as_mut_ptr()) };
        assert_eq!(ctrl, 0b0100_0011_0000_0001);
        assert_eq!(
            out[..13],
            [0x00, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, 0x40, 0x0a, 0x0c, 0x00, 0x04]
        );
    }

    #[test]
    fn delta_against_previous_lane() {
        if !is_x86_feature_detected!("ssse3") {
            return;
        }
        let input: [u32; 8] = [10, 20, 30, 40, 50, 60, 70, 80];
        let mut out = [0u8; 32];
        let ctrl = unsafe { put8_delta(input.as_ptr(), out.as_mut_ptr(), 5) };
        assert_eq!(ctrl, 0);
        assert_eq!(out[..8], [5, 10, 10, 10, 10, 10, 10, 10]);
    }
}
