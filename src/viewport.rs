//! Viewport transform: zoom/pan state for one rendering surface.
//!
//! The transform maps logical (content) coordinates to CSS pixels of the
//! displayed canvas box. The device pixel ratio is kept separately and only
//! composed in when the transform is handed to the surface, so pointer
//! positions reported in CSS pixels can be inverted with the transform alone.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::MAX_ZOOM;
use crate::geometry::Point;

/// A 2D affine transform `(a, b, c, d, e, f)` with canvas semantics.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. [`translate`](Self::translate)
/// and [`scale`](Self::scale) post-multiply, exactly like the 2D context calls
/// of the same name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// A pure uniform scale.
    #[must_use]
    pub fn scaling(s: f64) -> Self {
        Self { a: s, d: s, ..Self::IDENTITY }
    }

    /// Post-multiply by a translation of `(tx, ty)` in the current local space.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.e += self.a * tx + self.c * ty;
        self.f += self.b * tx + self.d * ty;
    }

    /// Post-multiply by a scale of `(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.a *= sx;
        self.b *= sx;
        self.c *= sy;
        self.d *= sy;
    }

    /// Pre-multiply by a uniform scale, e.g. to compose in the device pixel ratio.
    #[must_use]
    pub fn prescaled(self, s: f64) -> Self {
        Self {
            a: self.a * s,
            b: self.b * s,
            c: self.c * s,
            d: self.d * s,
            e: self.e * s,
            f: self.f * s,
        }
    }

    /// Map a local point through the transform.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Whether every coefficient is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Coefficients in `set_transform` argument order.
    #[must_use]
    pub fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Zoom/pan state and sizing for one canvas.
///
/// `display_*` is the canvas box in CSS pixels; `bitmap_*` is the backing
/// store size (`display × dpr`, floored).
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub transform: AffineTransform,
    pub display_width: f64,
    pub display_height: f64,
    pub bitmap_width: f64,
    pub bitmap_height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            display_width: 0.0,
            display_height: 0.0,
            bitmap_width: 0.0,
            bitmap_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the surface to the media's aspect ratio and reset the view.
    ///
    /// `aspect_ratio` is height over width. A non-positive or non-finite
    /// `device_pixel_ratio` is treated as `1.0`.
    pub fn fit_to_content(&mut self, display_width: f64, aspect_ratio: f64, device_pixel_ratio: f64) {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.display_width = display_width.max(0.0);
        self.display_height = (self.display_width * aspect_ratio).max(0.0);
        self.dpr = dpr;
        self.bitmap_width = (self.display_width * dpr).floor();
        self.bitmap_height = (self.display_height * dpr).floor();
        self.transform = AffineTransform::IDENTITY;
        tracing::debug!(
            display_width = self.display_width,
            display_height = self.display_height,
            dpr,
            "viewport fitted to content"
        );
    }

    /// Scale by `factor` about the logical point under `device_pt`, then clamp.
    ///
    /// The factor is limited so the scale never exceeds [`MAX_ZOOM`].
    /// Non-finite factors, and zooms that would leave any coefficient
    /// non-finite, are ignored.
    pub fn zoom_at(&mut self, device_pt: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let factor = factor.min(MAX_ZOOM / self.transform.a.max(self.transform.d));
        let anchor = self.to_logical(device_pt);
        let mut next = self.transform;
        next.translate(anchor.x, anchor.y);
        next.scale(factor, factor);
        next.translate(-anchor.x, -anchor.y);
        if !next.is_finite() {
            tracing::debug!(factor, "zoom rejected: non-finite transform");
            return;
        }
        self.transform = next;
        self.enforce_bounds();
    }

    /// Translate by a logical delta, then clamp.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.transform.translate(dx, dy);
        self.enforce_bounds();
    }

    /// Clamp zoom to `[1, MAX_ZOOM]` and keep the content covering the display box.
    ///
    /// Scale is clamped first; the translation range is derived from the
    /// clamped scale.
    pub fn enforce_bounds(&mut self) {
        let t = &mut self.transform;
        t.a = t.a.clamp(1.0, MAX_ZOOM);
        t.d = t.d.clamp(1.0, MAX_ZOOM);

        let min_e = -(self.display_width * t.a - self.display_width);
        let min_f = -(self.display_height * t.d - self.display_height);

        // Not `clamp`: the lower bound is NaN when a display size is infinite.
        // `max`/`min` skip a NaN operand, so the result is always a number.
        t.e = t.e.max(min_e).min(0.0);
        t.f = t.f.max(min_f).min(0.0);
    }

    /// Convert a device-space point (CSS pixels in the canvas box) to logical coordinates.
    #[must_use]
    pub fn to_logical(&self, device_pt: Point) -> Point {
        let t = &self.transform;
        Point {
            x: device_pt.x / t.a - t.e / t.a,
            y: device_pt.y / t.d - t.f / t.d,
        }
    }

    /// Convert a logical point to device space (CSS pixels in the canvas box).
    #[must_use]
    pub fn to_device(&self, logical_pt: Point) -> Point {
        self.transform.apply(logical_pt)
    }

    /// Convert a device-space distance to a logical distance along x.
    #[must_use]
    pub fn device_dist_to_logical(&self, device_dist: f64) -> f64 {
        device_dist / self.transform.a
    }

    /// Restore the un-zoomed, un-panned view.
    pub fn reset(&mut self) {
        self.transform = AffineTransform::IDENTITY;
        tracing::debug!("viewport reset");
    }

    /// Current horizontal zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.transform.a
    }

    /// The transform to install on the surface: the view composed with the DPR scale.
    #[must_use]
    pub fn device_transform(&self) -> AffineTransform {
        self.transform.prescaled(self.dpr)
    }
}
