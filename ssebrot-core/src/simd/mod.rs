//! Lane-parallel escape-time kernels.
//!
//! Each kernel advances `LANES` orbits in lock-step and must report exactly
//! the counts [`escape_count`](crate::scalar::escape_count) would for the
//! same starting points.  Two things make that hold:
//!
//! * starting points come from [`ComplexRect::real_at`] / [`ComplexRect::imag_at`],
//!   the same float32 expressions the scalar engine evaluates;
//! * a lane's active flag is sticky (`active &= r2 < r2_max`), so once it
//!   crosses the threshold it never counts again, whatever its orbit does next.

mod portable;
#[cfg(target_arch = "x86_64")]
mod x86;

use std::fmt;
use std::sync::OnceLock;

use tracing::info;

use crate::engine::EngineConfig;
use crate::rect::ComplexRect;

pub use portable::Portable;
#[cfg(target_arch = "x86_64")]
pub use x86::{Avx2, Sse};

/// Widest lane count any kernel uses; sizes the per-group scratch arrays.
pub const MAX_LANES: usize = 8;

/// Computes escape counts for one group of `LANES` starting points.
///
/// Implementations are used through static dispatch in
/// [`fill_vectorized`] so the inner loop inlines into the row walk.
pub trait LaneKernel {
    /// Number of pixels processed per call.
    const LANES: usize;

    /// Short name for logs and benchmark labels.
    fn name(&self) -> &'static str;

    /// `x0`, `y0` and `out` must each hold at least `LANES` entries; only
    /// the first `LANES` are read or written.
    fn escape_counts(&self, x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]);
}

/// Fill `out` (row-major, `width * height` entries) using `kernel`.
///
/// Rows are walked in strides of `K::LANES`.  The last stride of a row that
/// is not a multiple of the lane count is padded with points beyond the
/// right edge; their counts are computed and discarded.
pub fn fill_vectorized<K: LaneKernel>(
    kernel: &K,
    rect: &ComplexRect,
    width: u32,
    height: u32,
    config: &EngineConfig,
    out: &mut [u32],
) {
    assert!(K::LANES >= 1 && K::LANES <= MAX_LANES);
    assert_eq!(out.len(), width as usize * height as usize);

    let lanes = K::LANES;
    let mut xs = [0.0f32; MAX_LANES];
    let mut counts = [0u32; MAX_LANES];

    for (iy, row) in (0..height).zip(out.chunks_exact_mut(width as usize)) {
        let ys = [rect.imag_at(iy, height); MAX_LANES];

        for (group, dst) in row.chunks_mut(lanes).enumerate() {
            let ix = (group * lanes) as u32;
            for (lane, x) in xs[..lanes].iter_mut().enumerate() {
                *x = rect.real_at(ix + lane as u32, width);
            }
            kernel.escape_counts(&xs[..lanes], &ys[..lanes], config, &mut counts[..lanes]);
            dst.copy_from_slice(&counts[..dst.len()]);
        }
    }
}

/// The lane kernels this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Plain-array 4-wide loop; runs on any target.
    Portable4,
    /// Plain-array 8-wide loop; runs on any target.
    Portable8,
    /// SSE2 4-wide; part of the x86_64 baseline.
    #[cfg(target_arch = "x86_64")]
    Sse,
    /// AVX2 8-wide; only listed when the CPU reports support.
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

impl Backend {
    /// The widest backend this CPU can run.  Probed once per process.
    pub fn detect() -> Self {
        static DETECTED: OnceLock<Backend> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let best = Self::available()
                .into_iter()
                .max_by_key(|b| (b.lanes(), b.is_native()))
                .unwrap_or(Self::Portable4);
            info!(backend = %best, lanes = best.lanes(), "Selected vector backend");
            best
        })
    }

    /// Every backend usable on this CPU, portable ones first.
    pub fn available() -> Vec<Self> {
        #[allow(unused_mut)]
        let mut backends = vec![Self::Portable4, Self::Portable8];
        #[cfg(target_arch = "x86_64")]
        {
            backends.push(Self::Sse);
            if Avx2::detect().is_some() {
                backends.push(Self::Avx2);
            }
        }
        backends
    }

    pub fn lanes(self) -> usize {
        match self {
            Self::Portable4 => Portable::<4>::LANES,
            Self::Portable8 => Portable::<8>::LANES,
            #[cfg(target_arch = "x86_64")]
            Self::Sse => Sse::LANES,
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => Avx2::LANES,
        }
    }

    /// `true` for intrinsic-based kernels.
    fn is_native(self) -> bool {
        !matches!(self, Self::Portable4 | Self::Portable8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Portable4 => Portable::<4>.name(),
            Self::Portable8 => Portable::<8>.name(),
            #[cfg(target_arch = "x86_64")]
            Self::Sse => Sse.name(),
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => "avx2",
        }
    }

    /// Fill `out` with escape counts using this backend.
    ///
    /// A backend not supported by the running CPU falls back to the
    /// portable kernel of the same width.
    pub fn fill(
        self,
        rect: &ComplexRect,
        width: u32,
        height: u32,
        config: &EngineConfig,
        out: &mut [u32],
    ) {
        match self {
            Self::Portable4 => fill_vectorized(&Portable::<4>, rect, width, height, config, out),
            Self::Portable8 => fill_vectorized(&Portable::<8>, rect, width, height, config, out),
            #[cfg(target_arch = "x86_64")]
            Self::Sse => fill_vectorized(&Sse, rect, width, height, config, out),
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => match Avx2::detect() {
                Some(avx2) => fill_vectorized(&avx2, rect, width, height, config, out),
                None => fill_vectorized(&Portable::<8>, rect, width, height, config, out),
            },
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
