use std::arch::aarch64::{
    uint32x4_t, vaddq_u32, vdupq_laneq_u32, vdupq_n_u32, vextq_u32, vld1q_u8, vqtbl1q_u8,
    vreinterpretq_u32_u8, vst1q_u32,
};

use multiversion::target;

use crate::tables::{DECODE_SHUFFLE_TABLE, PER_CONTROL_LEN_TABLE};

#[target("aarch64+neon")]
#[inline]
unsafe fn unpack(input: *const u8, ctrl: u16) -> (uint32x4_t, uint32x4_t) {
    let lo = (ctrl & 0xff) as usize;
    let hi = (ctrl >> 8) as usize;
    let mask_lo = vld1q_u8(DECODE_SHUFFLE_TABLE[lo].as_ptr());
    let mask_hi = vld1q_u8(DECODE_SHUFFLE_TABLE[hi].as_ptr());
    // Safety: the caller guarantees 16 readable bytes at both offsets.
    let first = vld1q_u8(input);
    let second = vld1q_u8(input.add(PER_CONTROL_LEN_TABLE[lo] as usize));
    (
        vreinterpretq_u32_u8(vqtbl1q_u8(first, mask_lo)),
        vreinterpretq_u32_u8(vqtbl1q_u8(second, mask_hi)),
    )
}

#[target("aarch64+neon")]
#[inline]
unsafe fn prefix_sum(four: uint32x4_t, prev: uint32x4_t) -> uint32x4_t {
    let zero = vdupq_n_u32(0);
    let four = vaddq_u32(four, vextq_u32::<3>(zero, four));
    let four = vaddq_u32(four, vextq_u32::<2>(zero, four));
    vaddq_u32(four, prev)
}

/// # Safety
///
/// `input` must have `total_len(ctrl & 0xff) + 16` readable bytes and `out`
/// room for 8 values.
#[target("aarch64+neon")]
pub unsafe fn get8(input: *const u8, out: *mut u32, ctrl: u16) {
    let (first, second) = unpack(input, ctrl);
    vst1q_u32(out, first);
    vst1q_u32(out.add(4), second);
}

/// # Safety
///
/// Same as [`get8`].
#[target("aarch64+neon")]
pub unsafe fn get8_delta(input: *const u8, out: *mut u32, ctrl: u16, prev: u32) {
    let (first, second) = unpack(input, ctrl);
    let first = prefix_sum(first, vdupq_n_u32(prev));
    let second = prefix_sum(second, vdupq_laneq_u32::<3>(first));
    vst1q_u32(out, first);
    vst1q_u32(out.add(4), second);
}
