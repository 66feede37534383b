use crate::engine::EngineConfig;
use crate::rect::ComplexRect;

/// Escape-time count for the point `c = x0 + i·y0` under `z ← z² + c`, `z₀ = c`.
///
/// Returns the first step `n` at which `x² + y² >= r2_max`, or
/// `config.iterations()` if the orbit never crosses the threshold.  This is
/// the reference every lane kernel is checked against.
#[inline]
pub fn escape_count(x0: f32, y0: f32, config: &EngineConfig) -> u32 {
    let mut x = x0;
    let mut y = y0;
    let mut n = 0;

    while n < config.iterations() {
        let x2 = x * x;
        let y2 = y * y;
        let xy = x * y;

        let r2 = x2 + y2;
        if r2 >= config.r2_max() {
            break;
        }

        x = x2 - y2 + x0;
        y = xy + xy + y0;
        n += 1;
    }

    n
}

/// Fill `out` (row-major, `width * height` entries) with scalar escape counts.
pub fn fill_scalar(
    rect: &ComplexRect,
    width: u32,
    height: u32,
    config: &EngineConfig,
    out: &mut [u32],
) {
    assert_eq!(out.len(), width as usize * height as usize);

    for (iy, row) in (0..height).zip(out.chunks_exact_mut(width as usize)) {
        let y0 = rect.imag_at(iy, height);
        for (ix, count) in (0..width).zip(row.iter_mut()) {
            let x0 = rect.real_at(ix, width);
            *count = escape_count(x0, y0, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::new(256, 100.0).unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_count(0.0, 0.0, &cfg()), 256);
    }

    #[test]
    fn minus_one_cycles_forever() {
        // c = -1: orbit -1 → 0 → -1 … never grows.
        assert_eq!(escape_count(-1.0, 0.0, &cfg()), 256);
    }

    #[test]
    fn far_point_escapes_immediately() {
        assert_eq!(escape_count(20.0, 0.0, &cfg()), 0);
    }

    #[test]
    fn known_orbit_of_corner_point() {
        // c = -2 - i: z = (-2,-1) r²=5, (1,3) r²=10, (-10,5) r²=125 → stops at n = 2.
        assert_eq!(escape_count(-2.0, -1.0, &cfg()), 2);
    }

    #[test]
    fn threshold_is_inclusive_of_r2_max() {
        // |z₀|² is exactly 100 here, which counts as escaped.
        assert_eq!(escape_count(10.0, 0.0, &cfg()), 0);
        assert_eq!(escape_count(0.0, 10.0, &cfg()), 0);
        // Same orbit as above, with the threshold landing exactly on step 1 and step 2.
        let at_ten = EngineConfig::new(256, 10.0).unwrap();
        assert_eq!(escape_count(-2.0, -1.0, &at_ten), 1);
        let at_125 = EngineConfig::new(256, 125.0).unwrap();
        assert_eq!(escape_count(-2.0, -1.0, &at_125), 2);
    }

    #[test]
    fn count_is_capped_by_iterations() {
        let one = EngineConfig::new(1, 100.0).unwrap();
        assert_eq!(escape_count(0.0, 0.0, &one), 1);
        assert_eq!(escape_count(-2.0, -1.0, &one), 1);
    }

    #[test]
    fn fill_matches_per_pixel_mapping() {
        let rect = ComplexRect::default();
        let (w, h) = (30, 20);
        let mut out = vec![0; (w * h) as usize];
        fill_scalar(&rect, w, h, &cfg(), &mut out);

        for iy in 0..h {
            for ix in 0..w {
                let (x0, y0) = rect.pixel_to_complex(ix, iy, w, h);
                assert_eq!(out[(iy * w + ix) as usize], escape_count(x0, y0, &cfg()));
            }
        }
        assert_eq!(out[0], 2);
    }
}
