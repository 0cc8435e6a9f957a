use std::arch::x86_64::{
    __m128i, _mm_add_epi32, _mm_loadu_si128, _mm_set1_epi32, _mm_shuffle_epi32,
    _mm_shuffle_epi8, _mm_slli_si128, _mm_storeu_si128,
};

use multiversion::target;

use crate::tables::{DECODE_SHUFFLE_TABLE, PER_CONTROL_LEN_TABLE};

/// Loads 16 bytes at `input` and at `input + total_len(lo)` and spreads each
/// into four lanes.
#[target("x86_64+ssse3")]
#[inline]
unsafe fn unpack(input: *const u8, ctrl: u16) -> (__m128i, __m128i) {
    let lo = (ctrl & 0xff) as usize;
    let hi = (ctrl >> 8) as usize;
    // Safety: table rows are 16 bytes and we allow unaligned reads.
    let mask_lo = _mm_loadu_si128(DECODE_SHUFFLE_TABLE[lo].as_ptr() as *const __m128i);
    let mask_hi = _mm_loadu_si128(DECODE_SHUFFLE_TABLE[hi].as_ptr() as *const __m128i);
    let first = _mm_loadu_si128(input as *const __m128i);
    let second = _mm_loadu_si128(input.add(PER_CONTROL_LEN_TABLE[lo] as usize) as *const __m128i);
    (
        _mm_shuffle_epi8(first, mask_lo),
        _mm_shuffle_epi8(second, mask_hi),
    )
}

/// Lane-wise prefix sum of `four`, offset by the broadcast `prev`.
#[target("x86_64+ssse3")]
#[inline]
unsafe fn prefix_sum(four: __m128i, prev: __m128i) -> __m128i {
    // [a, a+b, b+c, c+d]
    let four = _mm_add_epi32(four, _mm_slli_si128::<4>(four));
    // [a, a+b, a+b+c, a+b+c+d]
    let four = _mm_add_epi32(four, _mm_slli_si128::<8>(four));
    _mm_add_epi32(four, prev)
}

/// Unpacks 8 values described by `ctrl` into `out`.
///
/// # Safety
///
/// The CPU must support SSSE3. `input` must have `total_len(ctrl & 0xff) + 16`
/// readable bytes and `out` room for 8 values.
#[target("x86_64+ssse3")]
pub unsafe fn get8(input: *const u8, out: *mut u32, ctrl: u16) {
    let (first, second) = unpack(input, ctrl);
    _mm_storeu_si128(out as *mut __m128i, first);
    _mm_storeu_si128(out.add(4) as *mut __m128i, second);
}

/// Unpacks 8 stored differences and accumulates them starting from `prev`.
///
/// # Safety
///
/// Same as [`get8`].
#[target("x86_64+ssse3")]
pub unsafe fn get8_delta(input: *const u8, out: *mut u32, ctrl: u16, prev: u32) {
    let (first, second) = unpack(input, ctrl);
    let first = prefix_sum(first, _mm_set1_epi32(prev as i32));
    let second = prefix_sum(second, _mm_shuffle_epi32::<0xff>(first));
    _mm_storeu_si128(out as *mut __m128i, first);
    _mm_storeu_si128(out.add(4) as *mut __m128i, second);
}
