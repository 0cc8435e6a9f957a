//! SSSE3 group kernels. Every function here requires a CPU with SSSE3 and is
//! only reached through [`crate::simd::Accelerated`].

mod decode;
mod encode;

pub use decode::{get8, get8_delta};
pub use encode::{put8, put8_delta};
