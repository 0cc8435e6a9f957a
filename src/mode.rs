//! Picks the codec implementation once per process.

use std::fmt;
use std::sync::OnceLock;

/// Implementation used by the dispatching entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Portable group codec, one value at a time.
    Scalar,
    /// 8-value SIMD kernel (SSSE3 on x86_64, NEON on aarch64).
    Accelerated,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Scalar => f.write_str("scalar"),
            Mode::Accelerated => f.write_str("accelerated"),
        }
    }
}

static MODE: OnceLock<Mode> = OnceLock::new();

/// Returns the mode for this process. The CPU is probed on the first call;
/// later calls return the cached answer.
pub fn detect() -> Mode {
    *MODE.get_or_init(|| {
        let mode = if has_required_vector_isa() {
            Mode::Accelerated
        } else {
            Mode::Scalar
        };
        log::debug!("stream vbyte codec selected {} mode", mode);
        mode
    })
}

/// Whether this build has a vector kernel and the running CPU can execute it.
#[allow(clippy::needless_return)]
pub fn has_required_vector_isa() -> bool {
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        return is_x86_feature_detected!("ssse3");
    }

    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    {
        return std::arch::is_aarch64_feature_detected!("neon");
    }

    #[allow(unreachable_code)]
    false
}
