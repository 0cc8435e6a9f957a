//! Per-group transforms shared by the stream writer, the stream reader and
//! [`crate::cursor::DecodeCursor`].

use crate::common::GROUP_LEN;
use crate::scalar;
use crate::simd::{Accelerated, GROUP8};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Plain {}
    impl Sealed for super::Delta {}
}

/// How values map to stored fields. [`Plain`] stores them unchanged, [`Delta`]
/// stores the difference to the previous value and carries that value from one
/// group to the next.
pub trait GroupCoding: sealed::Sealed + Copy {
    /// `true` if decoding a group depends on the groups before it.
    const DIFFERENCED: bool;

    fn put4(&mut self, input: &[u32], out: &mut [u8]) -> u8;
    fn put8(&mut self, kernel: Accelerated, input: &[u32], out: &mut [u8]) -> u16;
    fn put_tail(&mut self, input: &[u32], out: &mut [u8]) -> (u8, usize);

    fn get4(&mut self, input: &[u8], out: &mut [u32], ctrl: u8) -> usize;
    fn get8(&mut self, kernel: Accelerated, input: &[u8], out: &mut [u32], ctrl: u16) -> usize;
    fn get_tail(&mut self, input: &[u8], out: &mut [u32], ctrl: u8, count: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl GroupCoding for Plain {
    const DIFFERENCED: bool = false;

    #[inline]
    fn put4(&mut self, input: &[u32], out: &mut [u8]) -> u8 {
        scalar::put4(input, out)
    }

    #[inline]
    fn put8(&mut self, kernel: Accelerated, input: &[u32], out: &mut [u8]) -> u16 {
        kernel.put8(input, out)
    }

    #[inline]
    fn put_tail(&mut self, input: &[u32], out: &mut [u8]) -> (u8, usize) {
        scalar::put_tail(input, out)
    }

    #[inline]
    fn get4(&mut self, input: &[u8], out: &mut [u32], ctrl: u8) -> usize {
        scalar::get4(input, out, ctrl)
    }

    #[inline]
    fn get8(&mut self, kernel: Accelerated, input: &[u8], out: &mut [u32], ctrl: u16) -> usize {
        kernel.get8(input, out, ctrl)
    }

    #[inline]
    fn get_tail(&mut self, input: &[u8], out: &mut [u32], ctrl: u8, count: usize) -> usize {
        scalar::get_tail(input, out, ctrl, count)
    }
}

/// Delta coding state: the last value written or read so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delta {
    pub prev: u32,
}

impl Delta {
    pub fn new(prev: u32) -> Self {
        Delta { prev }
    }
}

impl GroupCoding for Delta {
    const DIFFERENCED: bool = true;

    #[inline]
    fn put4(&mut self, input: &[u32], out: &mut [u8]) -> u8 {
        let ctrl = scalar::put4_delta(input, out, self.prev);
        self.prev = input[GROUP_LEN - 1];
        ctrl
    }

    #[inline]
    fn put8(&mut self, kernel: Accelerated, input: &[u32], out: &mut [u8]) -> u16 {
        let ctrl = kernel.put8_delta(input, out, self.prev);
        self.prev = input[GROUP8 - 1];
        ctrl
    }

    #[inline]
    fn put_tail(&mut self, input: &[u32], out: &mut [u8]) -> (u8, usize) {
        let written = scalar::put_tail_delta(input, out, self.prev);
        if let Some(&last) = input.last() {
            self.prev = last;
        }
        written
    }

    #[inline]
    fn get4(&mut self, input: &[u8], out: &mut [u32], ctrl: u8) -> usize {
        let consumed = scalar::get4_delta(input, out, ctrl, self.prev);
        self.prev = out[GROUP_LEN - 1];
        consumed
    }

    #[inline]
    fn get8(&mut self, kernel: Accelerated, input: &[u8], out: &mut [u32], ctrl: u16) -> usize {
        let consumed = kernel.get8_delta(input, out, ctrl, self.prev);
        self.prev = out[GROUP8 - 1];
        consumed
    }

    #[inline]
    fn get_tail(&mut self, input: &[u8], out: &mut [u32], ctrl: u8, count: usize) -> usize {
        let consumed = scalar::get_tail_delta(input, out, ctrl, count, self.prev);
        if count > 0 {
            self.prev = out[count - 1];
        }
        consumed
    }
}
