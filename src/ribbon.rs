//! Ribbon construction: a tapering, smoothly curved band through a run of points.
//!
//! The band is built from two polylines offset to either side of the input
//! points. Its half-width starts at `initial_line_width / 2` on the oldest
//! point and shrinks by a constant ratio per segment down to a floor. The two
//! sides are joined into one closed outline, smoothed with quadratic curves
//! through segment midpoints, and filled with a linear gradient running from
//! the oldest to the newest point.

#[cfg(test)]
#[path = "ribbon_test.rs"]
mod ribbon_test;

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::consts::{
    INITIAL_LINE_WIDTH, LINE_WIDTH_REDUCTION_FACTOR, MIN_LINE_WIDTH, RIBBON_BODY_ALPHA, RIBBON_FADE_IN_STOP,
    RIBBON_FADE_OUT_STOP, RIBBON_RGB,
};
use crate::geometry::{Located, Point, angle_between, midpoint, translate_along_angle};

/// Where the ribbon fill fades to transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientPolicy {
    /// Transparent at the tail only.
    TailFade,
    /// Transparent at the tail and again at the very head.
    #[default]
    FadeBothEnds,
}

impl GradientPolicy {
    /// Gradient stops for this policy, ordered by offset.
    #[must_use]
    pub fn stops(self) -> Vec<GradientStop> {
        let mut stops = vec![
            GradientStop { offset: 0.0, alpha: 0.0 },
            GradientStop { offset: RIBBON_FADE_IN_STOP, alpha: RIBBON_BODY_ALPHA },
        ];
        if self == Self::FadeBothEnds {
            stops.push(GradientStop { offset: RIBBON_FADE_OUT_STOP, alpha: RIBBON_BODY_ALPHA });
            stops.push(GradientStop { offset: 1.0, alpha: 0.0 });
        }
        stops
    }
}

/// Width and fill settings for ribbon construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonStyle {
    pub initial_line_width: f64,
    pub min_line_width: f64,
    pub reduction_factor: f64,
    pub rgb: [u8; 3],
    pub gradient: GradientPolicy,
}

impl Default for RibbonStyle {
    fn default() -> Self {
        Self {
            initial_line_width: INITIAL_LINE_WIDTH,
            min_line_width: MIN_LINE_WIDTH,
            reduction_factor: LINE_WIDTH_REDUCTION_FACTOR,
            rgb: RIBBON_RGB,
            gradient: GradientPolicy::default(),
        }
    }
}

/// One colour stop of a [`LinearGradient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Progress along the gradient axis in `[0, 1]`.
    pub offset: f64,
    pub alpha: f64,
}

/// A linear gradient between two logical points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub rgb: [u8; 3],
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// CSS colour string for `stop`.
    #[must_use]
    pub fn css_color(&self, stop: GradientStop) -> String {
        let [r, g, b] = self.rgb;
        format!("rgba({r}, {g}, {b}, {})", stop.alpha)
    }
}

/// One command of a vector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    Close,
}

/// The two offset polylines of a ribbon, index-paired with the source points.
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    pub left: Vec<Point>,
    pub right: Vec<Point>,
    /// Half-width used at each index.
    pub half_widths: Vec<f64>,
}

impl Ribbon {
    /// Offset `points` to both sides with a tapering half-width.
    ///
    /// Returns `None` for fewer than two points. The last point reuses the
    /// angle of the final segment.
    #[must_use]
    pub fn from_points<P: Located>(points: &[P], style: &RibbonStyle) -> Option<Self> {
        let [.., before_last, last] = points else {
            return None;
        };

        let min_half = style.min_line_width / 2.0;
        let mut half = style.initial_line_width / 2.0;
        let mut ribbon = Self {
            left: Vec::with_capacity(points.len()),
            right: Vec::with_capacity(points.len()),
            half_widths: Vec::with_capacity(points.len()),
        };

        for pair in points.windows(2) {
            ribbon.push_offsets(pair[0].location(), angle_between(&pair[0], &pair[1]), half);
            if half > min_half {
                half = (half / style.reduction_factor).max(min_half);
            }
        }
        ribbon.push_offsets(last.location(), angle_between(before_last, last), half);

        Some(ribbon)
    }

    fn push_offsets(&mut self, at: Point, angle: f64, half: f64) {
        self.left.push(translate_along_angle(at, angle - FRAC_PI_2, half));
        self.right.push(translate_along_angle(at, angle + FRAC_PI_2, half));
        self.half_widths.push(half);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Closed outline: down the left side, across the head, back up the right side.
    #[must_use]
    pub fn outline(&self) -> Vec<PathSegment> {
        let (Some(&left_first), Some(&right_last)) = (self.left.first(), self.right.last()) else {
            return Vec::new();
        };

        let mut path = Vec::with_capacity(self.len() * 2 + 4);
        path.push(PathSegment::MoveTo(left_first));
        smooth_through(&self.left, &mut path);
        path.push(PathSegment::LineTo(right_last));
        let reversed: Vec<Point> = self.right.iter().rev().copied().collect();
        smooth_through(&reversed, &mut path);
        path.push(PathSegment::LineTo(left_first));
        path.push(PathSegment::Close);
        path
    }

    /// Fill gradient along the left side, from the oldest to the newest offset point.
    #[must_use]
    pub fn gradient(&self, style: &RibbonStyle) -> Option<LinearGradient> {
        Some(LinearGradient {
            from: *self.left.first()?,
            to: *self.left.last()?,
            rgb: style.rgb,
            stops: style.gradient.stops(),
        })
    }
}

/// Append curves from `pts[0]` (the current pen position) through `pts[1..]`.
///
/// Interior points are used as control points with the midpoint to the next
/// point as the curve end; the final curve lands exactly on the last point.
fn smooth_through(pts: &[Point], path: &mut Vec<PathSegment>) {
    match pts {
        [] | [_] => {}
        [_, only] => path.push(PathSegment::LineTo(*only)),
        [_, interior @ .., last] => {
            for pair in interior.windows(2) {
                path.push(PathSegment::QuadTo { ctrl: pair[0], to: midpoint(&pair[0], &pair[1]) });
            }
            if let Some(&ctrl) = interior.last() {
                path.push(PathSegment::QuadTo { ctrl, to: *last });
            }
        }
    }
}

/// A ready-to-fill ribbon shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonPath {
    pub segments: Vec<PathSegment>,
    pub gradient: LinearGradient,
}

/// Build the filled ribbon for `points`, or `None` when there are fewer than two.
#[must_use]
pub fn build_ribbon_path<P: Located>(points: &[P], style: &RibbonStyle) -> Option<RibbonPath> {
    let ribbon = Ribbon::from_points(points, style)?;
    let gradient = ribbon.gradient(style)?;
    Some(RibbonPath { segments: ribbon.outline(), gradient })
}
