use std::arch::x86_64::*;

use crate::engine::EngineConfig;

use super::LaneKernel;

/// 4-wide SSE2 kernel.
///
/// SSE2 is part of the x86_64 baseline, so this kernel needs no runtime check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sse;

impl LaneKernel for Sse {
    const LANES: usize = 4;

    fn name(&self) -> &'static str {
        "sse"
    }

    fn escape_counts(&self, x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]) {
        assert!(x0.len() >= 4 && y0.len() >= 4 && out.len() >= 4);
        // SAFETY: SSE2 is always present on x86_64 and the slice lengths are checked above.
        unsafe { sse_escape_counts(x0, y0, config, out) }
    }
}

#[inline]
unsafe fn sse_escape_counts(x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]) {
    let r2_max = _mm_set1_ps(config.r2_max());
    let one = _mm_set1_epi32(1);

    let cx = _mm_loadu_ps(x0.as_ptr());
    let cy = _mm_loadu_ps(y0.as_ptr());
    let mut x = cx;
    let mut y = cy;

    let mut n = _mm_setzero_si128();
    let mut active = _mm_castsi128_ps(_mm_set1_epi32(-1));

    for _ in 0..config.iterations() {
        let x2 = _mm_mul_ps(x, x);
        let y2 = _mm_mul_ps(y, y);
        let xy = _mm_mul_ps(x, y);

        let r2 = _mm_add_ps(x2, y2);
        active = _mm_and_ps(active, _mm_cmplt_ps(r2, r2_max));

        if _mm_movemask_ps(active) == 0 {
            break;
        }

        n = _mm_add_epi32(n, _mm_and_si128(_mm_castps_si128(active), one));

        x = _mm_add_ps(_mm_sub_ps(x2, y2), cx);
        y = _mm_add_ps(_mm_add_ps(xy, xy), cy);
    }

    _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, n);
}

/// 8-wide AVX2 kernel.
///
/// Only obtainable through [`Avx2::detect`], which proves the running CPU
/// supports the instructions before any of them execute.
#[derive(Debug, Clone, Copy)]
pub struct Avx2 {
    _detected: (),
}

impl Avx2 {
    pub fn detect() -> Option<Self> {
        if is_x86_feature_detected!("avx2") {
            Some(Self { _detected: () })
        } else {
            None
        }
    }
}

impl LaneKernel for Avx2 {
    const LANES: usize = 8;

    fn name(&self) -> &'static str {
        "avx2"
    }

    fn escape_counts(&self, x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]) {
        assert!(x0.len() >= 8 && y0.len() >= 8 && out.len() >= 8);
        // SAFETY: `self` exists only if AVX2 was detected; slice lengths are checked above.
        unsafe { avx2_escape_counts(x0, y0, config, out) }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn avx2_escape_counts(x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]) {
    let r2_max = _mm256_set1_ps(config.r2_max());
    let one = _mm256_set1_epi32(1);

    let cx = _mm256_loadu_ps(x0.as_ptr());
    let cy = _mm256_loadu_ps(y0.as_ptr());
    let mut x = cx;
    let mut y = cy;

    let mut n = _mm256_setzero_si256();
    let mut active = _mm256_castsi256_ps(_mm256_set1_epi32(-1));

    for _ in 0..config.iterations() {
        let x2 = _mm256_mul_ps(x, x);
        let y2 = _mm256_mul_ps(y, y);
        let xy = _mm256_mul_ps(x, y);

        let r2 = _mm256_add_ps(x2, y2);
        active = _mm256_and_ps(active, _mm256_cmp_ps(r2, r2_max, _CMP_LT_OQ));

        if _mm256_movemask_ps(active) == 0 {
            break;
        }

        n = _mm256_add_epi32(n, _mm256_and_si256(_mm256_castps_si256(active), one));

        x = _mm256_add_ps(_mm256_sub_ps(x2, y2), cx);
        y = _mm256_add_ps(_mm256_add_ps(xy, xy), cy);
    }

    _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, n);
}
