//! Portable group codec. This is the reference for every accelerated path:
//! the SIMD kernels must produce byte-identical output.

pub mod decode;
pub mod encode;

pub use decode::{get4, get4_delta, get8, get8_delta, get_tail, get_tail_delta};
pub use encode::{put4, put4_delta, put8, put8_delta, put_tail, put_tail_delta};
