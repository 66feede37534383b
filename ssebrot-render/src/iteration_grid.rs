/// Per-pixel escape counts for a full frame.
///
/// This is the raw engine output before coloring.  Every entry lies in
/// `0..=iterations`; `iterations` marks a pixel that never escaped.  Keeping
/// counts separate from colors lets the palette be swapped without
/// recomputing the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationGrid {
    pub width: u32,
    pub height: u32,
    pub iterations: u32,
    /// Row-major counts, `width * height` entries.
    pub data: Vec<u32>,
}

impl IterationGrid {
    /// A zeroed grid ready to be filled by an engine.
    pub fn new(width: u32, height: u32, iterations: u32) -> Self {
        Self {
            width,
            height,
            iterations,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Count at pixel `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Number of pixels that never escaped.
    pub fn interior_count(&self) -> usize {
        self.data.iter().filter(|&&n| n == self.iterations).count()
    }

    /// First pixel where two grids disagree, as `(x, y, ours, theirs)`.
    ///
    /// Grids of different sizes report `(0, 0, u32::MAX, u32::MAX)`.
    pub fn first_mismatch(&self, other: &IterationGrid) -> Option<(u32, u32, u32, u32)> {
        if self.width != other.width || self.height != other.height {
            return Some((0, 0, u32::MAX, u32::MAX));
        }
        self.data
            .iter()
            .zip(&other.data)
            .position(|(a, b)| a != b)
            .map(|idx| {
                let x = (idx % self.width as usize) as u32;
                let y = (idx / self.width as usize) as u32;
                (x, y, self.data[idx], other.data[idx])
            })
    }
}
