use crate::error::CoreError;
use crate::rect::{check_dimensions, ComplexRect};

/// Direction of a pan step.
///
/// `Right`/`Down` move both bounds of an axis up; `Left`/`Up` move them down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

/// The complex-plane rectangle currently shown, with pan and zoom controls.
///
/// Every mutator validates the rectangle it would produce and leaves the
/// viewport untouched on error.  Callers that keep an undo history push the
/// current [`rect`](Self::rect) before mutating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    rect: ComplexRect,
}

impl Viewport {
    pub fn new(rect: ComplexRect) -> Self {
        Self { rect }
    }

    #[inline]
    pub fn rect(&self) -> &ComplexRect {
        &self.rect
    }

    /// Replace the whole rectangle, e.g. when restoring from history.
    pub fn set_rect(&mut self, rect: ComplexRect) {
        self.rect = rect;
    }

    /// Map a pixel coordinate to a point `(x0, y0)` on the complex plane.
    #[inline]
    pub fn pixel_to_complex(&self, ix: u32, iy: u32, img_w: u32, img_h: u32) -> (f32, f32) {
        self.rect.pixel_to_complex(ix, iy, img_w, img_h)
    }

    /// Shift both bounds of one axis by `fraction` of that axis' extent.
    pub fn pan(&mut self, direction: PanDirection, fraction: f32) -> crate::Result<()> {
        if !fraction.is_finite() {
            return Err(CoreError::InvalidPanFraction(fraction));
        }
        let r = self.rect;
        let dx = r.width() * fraction;
        let dy = r.height() * fraction;

        let next = match direction {
            PanDirection::Right => ComplexRect::new(r.xa() + dx, r.ya(), r.xb() + dx, r.yb()),
            PanDirection::Left => ComplexRect::new(r.xa() - dx, r.ya(), r.xb() - dx, r.yb()),
            PanDirection::Down => ComplexRect::new(r.xa(), r.ya() + dy, r.xb(), r.yb() + dy),
            PanDirection::Up => ComplexRect::new(r.xa(), r.ya() - dy, r.xb(), r.yb() - dy),
        }?;
        self.rect = next;
        Ok(())
    }

    /// Shrink the rectangle symmetrically, removing `fraction` of each extent.
    ///
    /// `fraction` must lie in `[0, 1)`; `1` would collapse the rectangle.
    pub fn zoom_in(&mut self, fraction: f32) -> crate::Result<()> {
        check_zoom_fraction(fraction)?;
        let r = self.rect;
        let w = r.width();
        let h = r.height();
        let d = fraction / 2.0;

        self.rect = ComplexRect::new(
            r.xa() + w * d,
            r.ya() + h * d,
            r.xb() - w * d,
            r.yb() - h * d,
        )?;
        Ok(())
    }

    /// Expand the rectangle symmetrically; the inverse of [`zoom_in`](Self::zoom_in).
    ///
    /// Each extent grows by `w * fraction / (1 - fraction)`, so zooming in
    /// and then out by the same fraction restores the original size.
    /// `fraction >= 1` would flip or blow up the rectangle and is rejected.
    pub fn zoom_out(&mut self, fraction: f32) -> crate::Result<()> {
        check_zoom_fraction(fraction)?;
        let r = self.rect;
        let w = r.width();
        let h = r.height();
        let d = fraction / 2.0;
        let pd = 1.0 - fraction;

        self.rect = ComplexRect::new(
            r.xa() - (w / pd) * d,
            r.ya() - (h / pd) * d,
            r.xb() + (w / pd) * d,
            r.yb() + (h / pd) * d,
        )?;
        Ok(())
    }

    /// Re-target the viewport onto the pixel rectangle `[px, px+pw] × [py, py+ph]`
    /// of an `img_w × img_h` image, as when a selection box is committed.
    pub fn zoom_to_pixel_rect(
        &mut self,
        px: u32,
        py: u32,
        pw: u32,
        ph: u32,
        img_w: u32,
        img_h: u32,
    ) -> crate::Result<()> {
        check_dimensions(img_w, img_h)?;
        if pw == 0 || ph == 0 {
            return Err(CoreError::InvalidRect {
                reason: format!("selection must be at least 1×1 pixels, got {pw}×{ph}"),
            });
        }
        let (Some(px_end), Some(py_end)) = (px.checked_add(pw), py.checked_add(ph)) else {
            return Err(CoreError::InvalidRect {
                reason: format!("selection ({px}, {py}) + {pw}×{ph} overflows pixel space"),
            });
        };

        let (xa, ya) = self.rect.pixel_to_complex(px, py, img_w, img_h);
        let (xb, yb) = self.rect.pixel_to_complex(px_end, py_end, img_w, img_h);
        self.rect = ComplexRect::new(xa, ya, xb, yb)?;
        Ok(())
    }
}

fn check_zoom_fraction(fraction: f32) -> crate::Result<()> {
    if (0.0..1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(CoreError::InvalidZoomFraction(fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_rect_close(a: &ComplexRect, b: &ComplexRect) {
        assert!((a.xa() - b.xa()).abs() < EPSILON, "{a:?} vs {b:?}");
        assert!((a.ya() - b.ya()).abs() < EPSILON, "{a:?} vs {b:?}");
        assert!((a.xb() - b.xb()).abs() < EPSILON, "{a:?} vs {b:?}");
        assert!((a.yb() - b.yb()).abs() < EPSILON, "{a:?} vs {b:?}");
    }

    #[test]
    fn pan_right_and_down_increase_bounds() {
        let mut vp = Viewport::default();
        vp.pan(PanDirection::Right, 0.1).unwrap();
        let expected = ComplexRect::new(-1.7, -1.0, 1.3, 1.0).unwrap();
        assert_rect_close(vp.rect(), &expected);

        let mut vp = Viewport::default();
        vp.pan(PanDirection::Down, 0.5).unwrap();
        let expected = ComplexRect::new(-2.0, 0.0, 1.0, 2.0).unwrap();
        assert_rect_close(vp.rect(), &expected);
    }

    #[test]
    fn pan_left_and_up_decrease_bounds() {
        let mut vp = Viewport::default();
        vp.pan(PanDirection::Left, 0.1).unwrap();
        vp.pan(PanDirection::Up, 0.1).unwrap();
        let expected = ComplexRect::new(-2.3, -1.2, 0.7, 0.8).unwrap();
        assert_rect_close(vp.rect(), &expected);
    }

    #[test]
    fn pan_preserves_extent() {
        let mut vp = Viewport::default();
        vp.pan(PanDirection::Right, 0.37).unwrap();
        assert!((vp.rect().width() - 3.0).abs() < EPSILON);
        assert!((vp.rect().height() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn pan_rejects_non_finite_fraction() {
        let mut vp = Viewport::default();
        assert_eq!(
            vp.pan(PanDirection::Left, f32::INFINITY),
            Err(CoreError::InvalidPanFraction(f32::INFINITY))
        );
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn zoom_in_uses_pre_mutation_extents() {
        let mut vp = Viewport::default();
        vp.zoom_in(0.5).unwrap();
        // w = 3, h = 2, d = 0.25 → trims 0.75 off each real end, 0.5 off each imaginary end.
        let expected = ComplexRect::new(-1.25, -0.5, 0.25, 0.5).unwrap();
        assert_rect_close(vp.rect(), &expected);
    }

    #[test]
    fn zoom_out_inverts_zoom_in() {
        for f in [0.0, 0.1, 0.25, 0.5, 0.9] {
            let mut vp = Viewport::default();
            let before = *vp.rect();
            vp.zoom_in(f).unwrap();
            vp.zoom_out(f).unwrap();
            assert_rect_close(vp.rect(), &before);
        }
    }

    #[test]
    fn zoom_rejects_fraction_outside_unit_interval() {
        let mut vp = Viewport::default();
        for f in [1.0, 1.5, -0.1, f32::NAN] {
            assert!(vp.zoom_out(f).is_err());
            assert!(vp.zoom_in(f).is_err());
        }
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn zoom_to_full_image_is_identity() {
        let mut vp = Viewport::default();
        vp.zoom_to_pixel_rect(0, 0, 900, 600, 900, 600).unwrap();
        assert_eq!(*vp.rect(), ComplexRect::DEFAULT);
    }

    #[test]
    fn zoom_to_pixel_rect_maps_corners() {
        let mut vp = Viewport::default();
        // Middle third horizontally, middle half vertically.
        vp.zoom_to_pixel_rect(300, 150, 300, 300, 900, 600).unwrap();
        let expected = ComplexRect::new(-1.0, -0.5, 0.0, 0.5).unwrap();
        assert_rect_close(vp.rect(), &expected);
    }

    #[test]
    fn zoom_to_pixel_rect_rejects_bad_geometry() {
        let mut vp = Viewport::default();
        assert!(vp.zoom_to_pixel_rect(0, 0, 0, 10, 900, 600).is_err());
        assert!(vp.zoom_to_pixel_rect(0, 0, 10, 10, 0, 600).is_err());
        assert!(vp.zoom_to_pixel_rect(u32::MAX, 0, 10, 10, 900, 600).is_err());
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn overflowing_pan_is_rejected_and_leaves_state() {
        let mut vp = Viewport::default();
        assert!(vp.pan(PanDirection::Right, f32::MAX).is_err());
        assert_eq!(vp, Viewport::default());
    }
}
