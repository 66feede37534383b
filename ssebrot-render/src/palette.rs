use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::iteration_grid::IterationGrid;

/// Color of pixels that never escaped.
pub const INTERIOR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Iterations per radian of the sine waves.
const PERIOD: f32 = 30.0;

/// Per-channel phase offsets (red, green, blue).
const PHASES: [f32; 3] = [0.5, 1.0, 1.7];

/// A color lookup table indexed directly by escape count.
///
/// Holds `iterations + 1` RGBA entries: one per escape step plus the
/// interior color in the last slot.  Built once per iteration limit and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    iterations: u32,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    /// Build the table for counts `0..=iterations`.
    ///
    /// Escape colors are phase-shifted squared sines of the count, which
    /// gives a smooth, periodic colormap; slot `iterations` is black.
    pub fn build(iterations: u32) -> Self {
        let mut colors: Vec<[u8; 4]> = (0..iterations).map(escape_color).collect();
        colors.push(INTERIOR_COLOR);
        Self { iterations, colors }
    }

    /// The iteration limit this palette was built for.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Number of entries (`iterations + 1`).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// Color for an escape count.
    ///
    /// A count above [`iterations`](Self::iterations) means the engine and
    /// palette disagree about the limit; that is a bug, so this panics.
    #[inline]
    pub fn color_for(&self, count: u32) -> [u8; 4] {
        assert!(
            count <= self.iterations,
            "escape count {count} exceeds palette limit {}",
            self.iterations
        );
        self.colors[count as usize]
    }

    /// Colorize a whole grid into an RGBA buffer.
    pub fn colorize(&self, grid: &IterationGrid) -> crate::Result<RenderBuffer> {
        if grid.iterations != self.iterations {
            return Err(RenderError::PaletteMismatch {
                palette: self.iterations,
                grid: grid.iterations,
            });
        }

        let mut buffer = RenderBuffer::new(grid.width, grid.height);
        buffer
            .pixels
            .par_chunks_mut(4)
            .zip(grid.data.par_iter())
            .for_each(|(pixel, &count)| pixel.copy_from_slice(&self.color_for(count)));
        Ok(buffer)
    }
}

fn escape_color(i: u32) -> [u8; 4] {
    let t = i as f32 / PERIOD;
    let channel = |phase: f32| {
        let s = (t + phase).sin();
        (255.0 * s * s) as u8
    };
    [
        channel(PHASES[0]),
        channel(PHASES[1]),
        channel(PHASES[2]),
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_slot_per_count_plus_interior() {
        for n in [1, 2, 255, 256, 1000] {
            let p = Palette::build(n);
            assert_eq!(p.len(), n as usize + 1);
            assert_eq!(p.color_for(n), INTERIOR_COLOR);
            for i in 0..n {
                // Every escape slot is addressable and opaque.
                assert_eq!(p.color_for(i)[3], 255);
            }
        }
    }

    #[test]
    fn first_entry_follows_sine_formula() {
        let p = Palette::build(10);
        let expected = |phase: f32| (255.0 * phase.sin() * phase.sin()) as u8;
        assert_eq!(
            p.color_for(0),
            [expected(0.5), expected(1.0), expected(1.7), 255]
        );
    }

    #[test]
    fn colormap_is_periodic_and_varies() {
        let p = Palette::build(256);
        let distinct: std::collections::HashSet<_> = p.colors().iter().collect();
        assert!(distinct.len() > 50, "colormap should vary across counts");
    }

    #[test]
    #[should_panic(expected = "exceeds palette limit")]
    fn out_of_range_count_panics() {
        Palette::build(16).color_for(17);
    }

    #[test]
    fn colorize_maps_every_pixel() {
        let p = Palette::build(4);
        let grid = IterationGrid {
            width: 3,
            height: 1,
            iterations: 4,
            data: vec![0, 2, 4],
        };
        let buf = p.colorize(&grid).unwrap();
        assert_eq!((buf.width, buf.height), (3, 1));
        assert_eq!(buf.pixels.len(), 12);
        assert_eq!(buf.pixel(0, 0), p.color_for(0));
        assert_eq!(buf.pixel(1, 0), p.color_for(2));
        assert_eq!(buf.pixel(2, 0), INTERIOR_COLOR);
    }

    #[test]
    fn colorize_rejects_mismatched_limit() {
        let p = Palette::build(4);
        let grid = IterationGrid::new(2, 2, 8);
        assert!(matches!(
            p.colorize(&grid),
            Err(RenderError::PaletteMismatch {
                palette: 4,
                grid: 8
            })
        ));
    }
}
