//! NEON group kernels, the same algorithm as the SSSE3 ones. `tbl` zeroes
//! out-of-range indices, so the shared `0xff` shuffle sentinel works as is.

mod decode;
mod encode;

pub use decode::{get8, get8_delta};
pub use encode::{put8, put8_delta};
