//! Whole-stream encoding and decoding.
//!
//! A stream is `ceil(n / 4)` control bytes followed by the packed data bytes.
//! The value count is not stored. Work is split in tiers: a bulk loop over 32
//! values (accelerated) or 16 values (scalar), single kernel calls up to the
//! safety margin, scalar groups of four, and a final partial group.

pub mod coding;
pub mod reader;
pub mod writer;

use crate::common::GROUP_LEN;
use crate::simd::GROUP8;

/// Values always left to the scalar path when the vector kernel is used. A
/// kernel call can touch 12 bytes past the end of its group, and every value
/// owns at least one byte.
pub(crate) const SAFETY_MARGIN: usize = 3 * GROUP_LEN;

const SCALAR_BATCH: usize = 4 * GROUP_LEN;

const ACCELERATED_BATCH: usize = 4 * GROUP8;

pub use coding::{Delta, GroupCoding, Plain};
pub use reader::{
    read_all, read_all_accelerated, read_all_delta, read_all_delta_accelerated,
    read_all_delta_scalar, read_all_scalar, try_read_all, try_read_all_delta,
};
pub use writer::{
    write_all, write_all_accelerated, write_all_delta, write_all_delta_accelerated,
    write_all_delta_scalar, write_all_scalar,
};
