use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A rectangle of the complex plane mapped onto the output image.
///
/// `xa..xb` spans the real axis and `ya..yb` the imaginary axis.  Pixel
/// `(0, 0)` maps to `(xa, ya)`; increasing pixel-y increases the imaginary
/// part.  Construction rejects degenerate, inverted, or non-finite bounds
/// and extents, so every `ComplexRect` in circulation satisfies `xa < xb`,
/// `ya < yb`, and has a finite width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct ComplexRect {
    xa: f32,
    ya: f32,
    xb: f32,
    yb: f32,
}

#[derive(Deserialize)]
struct RawRect {
    xa: f32,
    ya: f32,
    xb: f32,
    yb: f32,
}

impl TryFrom<RawRect> for ComplexRect {
    type Error = CoreError;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        Self::new(raw.xa, raw.ya, raw.xb, raw.yb)
    }
}

impl ComplexRect {
    /// The full-set view the explorer starts from.
    pub const DEFAULT: ComplexRect = ComplexRect {
        xa: -2.0,
        ya: -1.0,
        xb: 1.0,
        yb: 1.0,
    };

    /// Create a rectangle, checking `xa < xb`, `ya < yb`, and finiteness of
    /// both the bounds and the extents.
    pub fn new(xa: f32, ya: f32, xb: f32, yb: f32) -> crate::Result<Self> {
        if ![xa, ya, xb, yb].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidRect {
                reason: format!("bounds must be finite, got ({xa}, {ya}) .. ({xb}, {yb})"),
            });
        }
        if xa >= xb {
            return Err(CoreError::InvalidRect {
                reason: format!("real bounds must satisfy xa < xb, got {xa} >= {xb}"),
            });
        }
        if ya >= yb {
            return Err(CoreError::InvalidRect {
                reason: format!("imaginary bounds must satisfy ya < yb, got {ya} >= {yb}"),
            });
        }
        // Finite bounds can still be too far apart for f32; an infinite extent
        // turns the pixel mapping into NaN.
        if !(xb - xa).is_finite() || !(yb - ya).is_finite() {
            return Err(CoreError::InvalidRect {
                reason: format!("extent overflows f32: ({xa}, {ya}) .. ({xb}, {yb})"),
            });
        }
        Ok(Self { xa, ya, xb, yb })
    }

    #[inline]
    pub fn xa(&self) -> f32 {
        self.xa
    }

    #[inline]
    pub fn ya(&self) -> f32 {
        self.ya
    }

    #[inline]
    pub fn xb(&self) -> f32 {
        self.xb
    }

    #[inline]
    pub fn yb(&self) -> f32 {
        self.yb
    }

    /// Extent along the real axis.
    #[inline]
    pub fn width(&self) -> f32 {
        self.xb - self.xa
    }

    /// Extent along the imaginary axis.
    #[inline]
    pub fn height(&self) -> f32 {
        self.yb - self.ya
    }

    /// Real part of the point under pixel column `ix` of an `img_w`-wide image.
    ///
    /// Every engine must obtain its starting points through this function
    /// (and [`imag_at`](Self::imag_at)): the exact float32 operation order
    /// is what makes scalar and lane-parallel results bit-identical.
    #[inline]
    pub fn real_at(&self, ix: u32, img_w: u32) -> f32 {
        debug_assert!(img_w > 0);
        ix as f32 * (self.xb - self.xa) / img_w as f32 + self.xa
    }

    /// Imaginary part of the point under pixel row `iy` of an `img_h`-tall image.
    #[inline]
    pub fn imag_at(&self, iy: u32, img_h: u32) -> f32 {
        debug_assert!(img_h > 0);
        iy as f32 * (self.yb - self.ya) / img_h as f32 + self.ya
    }

    /// Map a pixel coordinate to a point `(x0, y0)` on the complex plane.
    #[inline]
    pub fn pixel_to_complex(&self, ix: u32, iy: u32, img_w: u32, img_h: u32) -> (f32, f32) {
        (self.real_at(ix, img_w), self.imag_at(iy, img_h))
    }
}

impl Default for ComplexRect {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Check that an image has at least one pixel on each axis.
pub fn check_dimensions(width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    Ok(())
}
