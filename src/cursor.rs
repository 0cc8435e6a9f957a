//! Incremental decoding, for consumers that walk a stream block by block
//! (posting lists, for example) instead of materializing it at once.

use crate::common::{control_bytes_len, validate_stream, StreamVbyteError, GROUP_LEN};
use crate::control::{tail_len, total_len};
use crate::simd::{Accelerated, GROUP8};
use crate::stream::coding::{Delta, GroupCoding, Plain};
use crate::stream::SAFETY_MARGIN;

/// Decodes a stream a few values at a time.
///
/// Every read or skip must cover a multiple of 4 values, except the one that
/// reaches the end of the stream. The cursor then always sits on a control
/// byte boundary.
#[derive(Debug, Clone)]
pub struct DecodeCursor<'a, C: GroupCoding = Plain> {
    ctrls: &'a [u8],
    data: &'a [u8],
    count: usize,
    decoded: usize,
    data_pos: usize,
    coding: C,
    kernel: Option<Accelerated>,
}

impl<'a> DecodeCursor<'a, Plain> {
    /// Cursor over a stream of `count` values written by [`crate::write_all`].
    pub fn new(count: usize, stream: &'a [u8]) -> Self {
        Self::with_coding(count, stream, Plain)
    }
}

impl<'a> DecodeCursor<'a, Delta> {
    /// Cursor over a stream written by [`crate::write_all_delta`] with the
    /// same `prev`.
    pub fn delta(count: usize, stream: &'a [u8], prev: u32) -> Self {
        Self::with_coding(count, stream, Delta::new(prev))
    }
}

impl<'a, C: GroupCoding> DecodeCursor<'a, C> {
    /// # Panics
    ///
    /// Panics if `stream` is shorter than `control_bytes_len(count)`. Data
    /// bytes are only checked as they are read; use
    /// [`DecodeCursor::try_with_coding`] for untrusted input.
    pub fn with_coding(count: usize, stream: &'a [u8], coding: C) -> Self {
        let (ctrls, data) = stream.split_at(control_bytes_len(count));
        DecodeCursor {
            ctrls,
            data,
            count,
            decoded: 0,
            data_pos: 0,
            coding,
            kernel: Accelerated::new(),
        }
    }

    /// Validates the whole stream up front, after which no read panics.
    pub fn try_with_coding(count: usize, stream: &'a [u8], coding: C) -> Result<Self, StreamVbyteError> {
        validate_stream(count, stream)?;
        Ok(Self::with_coding(count, stream, coding))
    }

    /// Restricts this cursor to the scalar codec.
    pub fn scalar(mut self) -> Self {
        self.kernel = None;
        self
    }

    /// Values not yet read or skipped.
    pub fn remaining(&self) -> usize {
        self.count - self.decoded
    }

    /// Stream bytes covering everything read so far, control bytes included.
    /// Equals the encoded length once the cursor is exhausted.
    pub fn input_consumed(&self) -> usize {
        self.ctrls.len() + self.data_pos
    }

    /// Reads up to `n` values.
    pub fn read(&mut self, n: usize) -> Vec<u32> {
        let mut out = vec![0u32; n.min(self.remaining())];
        self.read_into(&mut out);
        out
    }

    /// Fills as much of `out` as the stream allows and returns the number of
    /// values written.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `remaining()` values are requested and the
    /// request is not a multiple of 4.
    pub fn read_into(&mut self, out: &mut [u32]) -> usize {
        let n = out.len().min(self.remaining());
        self.check_alignment(n);
        let mut done = 0;

        if let Some(kernel) = self.kernel {
            let safe_end = self.count.saturating_sub(SAFETY_MARGIN);
            while done + GROUP8 <= n && self.decoded + GROUP8 <= safe_end {
                let ctrl_pos = self.decoded / GROUP_LEN;
                let ctrl = u16::from_le_bytes([self.ctrls[ctrl_pos], self.ctrls[ctrl_pos + 1]]);
                self.data_pos +=
                    self.coding
                        .get8(kernel, &self.data[self.data_pos..], &mut out[done..], ctrl);
                self.decoded += GROUP8;
                done += GROUP8;
            }
        }

        while done + GROUP_LEN <= n {
            let ctrl = self.ctrls[self.decoded / GROUP_LEN];
            self.data_pos += self
                .coding
                .get4(&self.data[self.data_pos..], &mut out[done..], ctrl);
            self.decoded += GROUP_LEN;
            done += GROUP_LEN;
        }

        if done < n {
            let ctrl = self.ctrls[self.decoded / GROUP_LEN];
            let tail = n - done;
            self.data_pos += self
                .coding
                .get_tail(&self.data[self.data_pos..], &mut out[done..], ctrl, tail);
            self.decoded += tail;
        }
        n
    }

    /// Moves past up to `n` values and returns how many were skipped. Plain
    /// streams skip by control bytes alone; delta streams have to decode the
    /// skipped values to keep the running sum.
    ///
    /// # Panics
    ///
    /// Same alignment rule as [`DecodeCursor::read_into`].
    pub fn skip(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.check_alignment(n);

        if C::DIFFERENCED {
            let mut scratch = [0u32; 64];
            let mut left = n;
            while left > 0 {
                let step = left.min(scratch.len());
                self.read_into(&mut scratch[..step]);
                left -= step;
            }
            return n;
        }

        let first = self.decoded / GROUP_LEN;
        let full = n / GROUP_LEN;
        let mut skipped: usize = self.ctrls[first..first + full]
            .iter()
            .map(|&c| total_len(c))
            .sum();
        if n % GROUP_LEN != 0 {
            skipped += tail_len(self.ctrls[first + full], n % GROUP_LEN);
        }
        self.data_pos += skipped;
        self.decoded += n;
        n
    }

    fn check_alignment(&self, n: usize) {
        assert!(
            n % GROUP_LEN == 0 || self.decoded + n == self.count,
            "cursor at {} of {} cannot move by {} values",
            self.decoded,
            self.count,
            n
        );
    }
}
