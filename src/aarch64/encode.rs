use std::arch::aarch64::{
    uint32x4_t, uint8x16_t, vaddv_u8, vcombine_u8, vdupq_n_s16, vdupq_n_u16, vdupq_n_u32,
    vdupq_n_u8, vextq_u32, vget_high_u8, vget_low_u8, vld1q_u32, vld1q_u8, vminq_s16, vminq_u8,
    vmulq_u8, vqaddq_u16, vqmovun_s16, vqtbl1q_u8, vreinterpretq_s16_u8, vreinterpretq_u16_s16,
    vreinterpretq_u8_u16, vreinterpretq_u8_u32, vshrq_n_u8, vst1q_u8, vsubq_u32,
};

use multiversion::target;

use crate::tables::{ENCODE_SHUFFLE_TABLE, PER_CONTROL_LEN_TABLE};

static BIT_WEIGHTS: [u8; 16] = [1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128];

/// NEON has no movemask; weight each byte's high bit and add across halves.
#[target("aarch64+neon")]
#[inline]
unsafe fn movemask(bytes: uint8x16_t) -> u16 {
    let high_bits = vshrq_n_u8::<7>(bytes);
    let weighted = vmulq_u8(high_bits, vld1q_u8(BIT_WEIGHTS.as_ptr()));
    let lo = vaddv_u8(vget_low_u8(weighted)) as u16;
    let hi = vaddv_u8(vget_high_u8(weighted)) as u16;
    lo | hi << 8
}

#[target("aarch64+neon")]
#[inline]
unsafe fn control_word(first: uint32x4_t, second: uint32x4_t) -> u16 {
    let ones = vdupq_n_u8(1);
    let first = vminq_u8(vreinterpretq_u8_u32(first), ones);
    let second = vminq_u8(vreinterpretq_u8_u32(second), ones);
    let packed = vcombine_u8(
        vqmovun_s16(vreinterpretq_s16_u8(first)),
        vqmovun_s16(vreinterpretq_s16_u8(second)),
    );
    let clamped = vminq_s16(vreinterpretq_s16_u8(packed), vdupq_n_s16(0x0101));
    let marked = vqaddq_u16(vreinterpretq_u16_s16(clamped), vdupq_n_u16(0x7f00));
    movemask(vreinterpretq_u8_u16(marked))
}

#[target("aarch64+neon")]
#[inline]
unsafe fn pack(first: uint32x4_t, second: uint32x4_t, ctrl: u16, out: *mut u8) {
    let lo = (ctrl & 0xff) as usize;
    let hi = (ctrl >> 8) as usize;
    let mask_lo: uint8x16_t = vld1q_u8(ENCODE_SHUFFLE_TABLE[lo].as_ptr());
    let mask_hi: uint8x16_t = vld1q_u8(ENCODE_SHUFFLE_TABLE[hi].as_ptr());
    vst1q_u8(out, vqtbl1q_u8(vreinterpretq_u8_u32(first), mask_lo));
    let out = out.add(PER_CONTROL_LEN_TABLE[lo] as usize);
    vst1q_u8(out, vqtbl1q_u8(vreinterpretq_u8_u32(second), mask_hi));
}

/// # Safety
///
/// `input` must point to 8 readable values and `out` to 32 writable bytes.
#[target("aarch64+neon")]
pub unsafe fn put8(input: *const u32, out: *mut u8) -> u16 {
    let first = vld1q_u32(input);
    let second = vld1q_u32(input.add(4));
    let ctrl = control_word(first, second);
    pack(first, second, ctrl, out);
    ctrl
}

/// # Safety
///
/// Same as [`put8`].
#[target("aarch64+neon")]
pub unsafe fn put8_delta(input: *const u32, out: *mut u8, prev: u32) -> u16 {
    let first = vld1q_u32(input);
    let second = vld1q_u32(input.add(4));
    let shifted_first = vextq_u32::<3>(vdupq_n_u32(prev), first);
    let shifted_second = vextq_u32::<3>(first, second);
    let first = vsubq_u32(first, shifted_first);
    let second = vsubq_u32(second, shifted_second);
    let ctrl = control_word(first, second);
    pack(first, second, ctrl, out);
    ctrl
}
