use crate::engine::EngineConfig;

use super::LaneKernel;

/// `L`-wide kernel written over plain arrays.
///
/// There are no intrinsics here; the per-lane loops are simple enough for
/// the compiler to auto-vectorize, and the kernel doubles as the fallback
/// on targets without a native backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable<const L: usize>;

impl<const L: usize> LaneKernel for Portable<L> {
    const LANES: usize = L;

    fn name(&self) -> &'static str {
        match L {
            4 => "portable-4",
            8 => "portable-8",
            _ => "portable",
        }
    }

    fn escape_counts(&self, x0: &[f32], y0: &[f32], config: &EngineConfig, out: &mut [u32]) {
        let mut cx = [0.0f32; L];
        let mut cy = [0.0f32; L];
        cx.copy_from_slice(&x0[..L]);
        cy.copy_from_slice(&y0[..L]);

        let mut x = cx;
        let mut y = cy;
        let mut n = [0u32; L];
        let mut active = [true; L];

        for _ in 0..config.iterations() {
            let mut x2 = [0.0f32; L];
            let mut y2 = [0.0f32; L];
            let mut xy = [0.0f32; L];
            for l in 0..L {
                x2[l] = x[l] * x[l];
                y2[l] = y[l] * y[l];
                xy[l] = x[l] * y[l];
                active[l] &= x2[l] + y2[l] < config.r2_max();
            }

            if !active.iter().any(|&a| a) {
                break;
            }

            for l in 0..L {
                n[l] += u32::from(active[l]);
                x[l] = x2[l] - y2[l] + cx[l];
                y[l] = xy[l] + xy[l] + cy[l];
            }
        }

        out[..L].copy_from_slice(&n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_lane_stays_frozen() {
        // Lane 0 escapes at step 0; lane 1 is interior and keeps the group alive.
        let config = EngineConfig::new(64, 100.0).unwrap();
        let mut out = [0u32; 4];
        Portable::<4>.escape_counts(
            &[20.0, 0.0, -2.0, 0.0],
            &[0.0, 0.0, -1.0, 10.0],
            &config,
            &mut out,
        );
        assert_eq!(out, [0, 64, 2, 0]);
    }

    #[test]
    fn all_escaped_group_exits_with_zero() {
        let config = EngineConfig::new(1_000_000, 100.0).unwrap();
        let mut out = [7u32; 8];
        Portable::<8>.escape_counts(&[50.0; 8], &[50.0; 8], &config, &mut out);
        assert_eq!(out, [0; 8]);
    }
}
