//! Stream VByte compression of `u32` sequences.
//!
//! Each value is stored in 1 to 4 little-endian bytes. The byte counts are
//! kept apart from the data, two bits per value, in control bytes at the front
//! of the stream:
//!
//! ```text
//! [ ctrl 0 | ctrl 1 | ... | ctrl ceil(n/4)-1 ][ packed data bytes ]
//! ```
//!
//! Keeping the lengths separate lets a SIMD kernel look up a byte shuffle per
//! control byte and unpack four values with one instruction. On x86_64 with
//! SSSE3 and on aarch64 the kernel is picked at runtime (see [`mode`]); the
//! scalar codec produces the same bytes everywhere.
//!
//! ```
//! let values = [1024, 3, 2, 1, 1 << 30, 10, 12, 1024];
//! let stream = streamvb_simd::write_all(&values);
//! assert_eq!(stream.len(), 2 + 13);
//! assert_eq!(streamvb_simd::read_all(values.len(), &stream), values);
//! ```
//!
//! The stream does not record its length; callers keep the count themselves.

pub mod common;
pub mod control;
pub mod cursor;
pub mod mode;
pub mod scalar;
pub mod simd;
pub mod stream;
pub mod tables;

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod aarch64;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86_64;

pub use common::{
    control_bytes_len, encoded_data_len, exact_compressed_len, max_compressed_len,
    StreamVbyteError,
};
pub use cursor::DecodeCursor;
pub use mode::Mode;
pub use simd::Accelerated;
pub use stream::{
    read_all, read_all_delta, read_all_delta_scalar, read_all_scalar, try_read_all,
    try_read_all_delta, write_all, write_all_delta, write_all_delta_scalar, write_all_scalar,
};
