//! Safe access to the 8-value SIMD kernels.
//!
//! The kernels load and store 16 bytes at a time, so a call may touch bytes
//! past the end of the group it works on. Every method here slices its buffers
//! to that full footprint first; a buffer that is too short panics instead of
//! being read or written out of bounds.

use crate::common::GROUP_LEN;
use crate::control::{total_len, total_len_word};
use crate::mode::{self, Mode};

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
use crate::aarch64 as kernel;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use crate::x86_64 as kernel;

/// Builds without a vector kernel never hand out an [`Accelerated`] token, so
/// these are unreachable in practice. They keep the token API identical on
/// every target.
#[cfg(not(all(feature = "simd", any(target_arch = "x86_64", target_arch = "aarch64"))))]
mod kernel {
    use super::{ENCODE_FOOTPRINT, GROUP8, VECTOR_BYTES};
    use std::slice;

    pub unsafe fn put8(input: *const u32, out: *mut u8) -> u16 {
        crate::scalar::put8(
            slice::from_raw_parts(input, GROUP8),
            slice::from_raw_parts_mut(out, ENCODE_FOOTPRINT),
        )
    }

    pub unsafe fn put8_delta(input: *const u32, out: *mut u8, prev: u32) -> u16 {
        crate::scalar::put8_delta(
            slice::from_raw_parts(input, GROUP8),
            slice::from_raw_parts_mut(out, ENCODE_FOOTPRINT),
            prev,
        )
    }

    pub unsafe fn get8(input: *const u8, out: *mut u32, ctrl: u16) {
        let len = crate::control::total_len(ctrl as u8) + VECTOR_BYTES;
        crate::scalar::get8(
            slice::from_raw_parts(input, len),
            slice::from_raw_parts_mut(out, GROUP8),
            ctrl,
        );
    }

    pub unsafe fn get8_delta(input: *const u8, out: *mut u32, ctrl: u16, prev: u32) {
        let len = crate::control::total_len(ctrl as u8) + VECTOR_BYTES;
        crate::scalar::get8_delta(
            slice::from_raw_parts(input, len),
            slice::from_raw_parts_mut(out, GROUP8),
            ctrl,
            prev,
        );
    }
}

/// Width of one vector load or store.
pub const VECTOR_BYTES: usize = 16;

/// Values handled by one kernel call.
pub const GROUP8: usize = 2 * GROUP_LEN;

/// Output bytes an encode call may write: two full vector stores, the second
/// starting at most 16 bytes in.
pub const ENCODE_FOOTPRINT: usize = 2 * VECTOR_BYTES;

/// Proof that the running CPU can execute the vector kernel. The only way to
/// get one is [`Accelerated::new`], which consults [`mode::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerated {
    _private: (),
}

impl Accelerated {
    /// Returns a token if the process runs in [`Mode::Accelerated`].
    pub fn new() -> Option<Self> {
        match mode::detect() {
            Mode::Accelerated => Some(Accelerated { _private: () }),
            Mode::Scalar => None,
        }
    }

    /// Packs the first 8 values of `input` into `out` and returns the control
    /// word. `control::total_len_word(ctrl)` bytes are meaningful; the rest of
    /// the footprint holds garbage.
    ///
    /// # Panics
    ///
    /// Panics if `input` has fewer than 8 values or `out` is shorter than
    /// [`ENCODE_FOOTPRINT`].
    #[inline]
    pub fn put8(self, input: &[u32], out: &mut [u8]) -> u16 {
        let input = &input[..GROUP8];
        let out = &mut out[..ENCODE_FOOTPRINT];
        // Safety: the token proves CPU support; both buffers were sliced to
        // the kernel's footprint above.
        unsafe { kernel::put8(input.as_ptr(), out.as_mut_ptr()) }
    }

    /// Delta version of [`Accelerated::put8`].
    #[inline]
    pub fn put8_delta(self, input: &[u32], out: &mut [u8], prev: u32) -> u16 {
        let input = &input[..GROUP8];
        let out = &mut out[..ENCODE_FOOTPRINT];
        // Safety: see `put8`.
        unsafe { kernel::put8_delta(input.as_ptr(), out.as_mut_ptr(), prev) }
    }

    /// Unpacks 8 values and returns the number of input bytes consumed.
    ///
    /// # Panics
    ///
    /// Panics if `out` has room for fewer than 8 values or `input` is shorter
    /// than `total_len(ctrl & 0xff) + 16` bytes, which may be more than the
    /// group itself occupies.
    #[inline]
    pub fn get8(self, input: &[u8], out: &mut [u32], ctrl: u16) -> usize {
        let input = &input[..total_len(ctrl as u8) + VECTOR_BYTES];
        let out = &mut out[..GROUP8];
        // Safety: the token proves CPU support; the second 16-byte load
        // starts at `total_len(lo)`, which the slice above covers.
        unsafe { kernel::get8(input.as_ptr(), out.as_mut_ptr(), ctrl) };
        total_len_word(ctrl)
    }

    /// Delta version of [`Accelerated::get8`].
    #[inline]
    pub fn get8_delta(self, input: &[u8], out: &mut [u32], ctrl: u16, prev: u32) -> usize {
        let input = &input[..total_len(ctrl as u8) + VECTOR_BYTES];
        let out = &mut out[..GROUP8];
        // Safety: see `get8`.
        unsafe { kernel::get8_delta(input.as_ptr(), out.as_mut_ptr(), ctrl, prev) };
        total_len_word(ctrl)
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::scalar;

    /// Value whose length class is drawn uniformly from 1..=4.
    fn any_length(rng: &mut impl Rng) -> u32 {
        match rng.gen_range(1..5) {
            1 => rng.gen::<u8>() as u32,
            2 => rng.gen_range(0x100u32..0x1_0000),
            3 => rng.gen_range(0x1_0000u32..0x100_0000),
            _ => rng.gen_range(0x100_0000u32..=u32::MAX),
        }
    }

    /// Byte-level model of the vector control-word derivation, run on every
    /// target so the algorithm is checked even without a kernel.
    fn modelled_control_word(values: &[u32; 8]) -> u16 {
        // min(byte, 1)
        let mut bytes = [0u8; 32];
        for (i, v) in values.iter().enumerate() {
            for (j, b) in v.to_le_bytes().iter().enumerate() {
                bytes[4 * i + j] = (*b).min(1);
            }
        }
        // unsigned saturating narrow of each 16-bit pair
        let mut packed = [0u8; 16];
        for (i, p) in packed.iter_mut().enumerate() {
            let word = i16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);
            *p = word.clamp(0, 255) as u8;
        }
        // signed min with 0x0101, saturating add of 0x7f00, movemask
        let mut mask = 0u16;
        for i in 0..8 {
            let word = i16::from_le_bytes([packed[2 * i], packed[2 * i + 1]]).min(0x0101);
            let marked = (word as u16).saturating_add(0x7f00);
            mask |= ((marked >> 7) & 1) << (2 * i);
            mask |= ((marked >> 15) & 1) << (2 * i + 1);
        }
        mask
    }

    #[test]
    fn modelled_control_word_matches_scalar() {
        let edges = [
            0, 1, 0xff, 0x100, 0xffff, 0x1_0000, 0xff_ffff, 0x100_0000, 0xff00_0000,
            0x0100_0001, 0xff00_00ff, u32::MAX,
        ];
        for &a in &edges {
            for &b in &edges {
                let values = [a, b, a, b, b, a, b, a];
                assert_eq!(
                    modelled_control_word(&values),
                    crate::control::control_word(&values),
                    "{:#x} {:#x}",
                    a,
                    b
                );
            }
        }
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let values: [u32; 8] = [(); 8].map(|_| any_length(&mut rng));
            assert_eq!(
                modelled_control_word(&values),
                crate::control::control_word(&values)
            );
        }
    }

    #[test]
    fn kernel_matches_scalar() {
        let kernel = match Accelerated::new() {
            Some(kernel) => kernel,
            None => return,
        };
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let values: [u32; 8] = [(); 8].map(|_| any_length(&mut rng));
            let prev = rng.gen();

            let mut expected = [0u8; 32];
            let mut actual = [0u8; 32];
            let ctrl = scalar::put8(&values, &mut expected);
            assert_eq!(kernel.put8(&values, &mut actual), ctrl);
            let len = total_len_word(ctrl);
            assert_eq!(actual[..len], expected[..len]);

            let ctrl = scalar::put8_delta(&values, &mut expected, prev);
            assert_eq!(kernel.put8_delta(&values, &mut actual, prev), ctrl);
            let len = total_len_word(ctrl);
            assert_eq!(actual[..len], expected[..len]);

            let mut padded = [0u8; 48];
            padded[..len].copy_from_slice(&expected[..len]);
            let mut decoded = [0u32; 8];
            assert_eq!(kernel.get8_delta(&padded, &mut decoded, ctrl, prev), len);
            assert_eq!(decoded, values);
        }
    }

    #[test]
    fn kernel_decodes_reference_group() {
        let kernel = match Accelerated::new() {
            Some(kernel) => kernel,
            None => return,
        };
        let mut data = [0u8; 32];
        data[..13].copy_from_slice(&[
            0x00, 0x04, 0x03, 0x02, 0x01, 0x00, 0x00, 0x00, 0x40, 0x0a, 0x0c, 0x00, 0x04,
        ]);
        let mut out = [0u32; 8];
        assert_eq!(kernel.get8(&data, &mut out, 0b0100_0011_0000_0001), 13);
        assert_eq!(out, [1024, 3, 2, 1, 1073741824, 10, 12, 1024]);
    }

    #[test]
    #[should_panic]
    fn short_decode_input_panics() {
        let kernel = match Accelerated::new() {
            Some(kernel) => kernel,
            None => panic!("no kernel"),
        };
        let mut out = [0u32; 8];
        // 8 one-byte values, but the second load needs 4 + 16 bytes.
        kernel.get8(&[0u8; 19], &mut out, 0);
    }
}
