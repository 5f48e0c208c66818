//! Plane geometry helpers shared by the viewport, track and ribbon code.
//!
//! Every helper is generic over [`Located`] so that translating a track point
//! keeps its timestamp and synthetic flag intact.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either device or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Anything with a planar position that can be moved without losing its other fields.
pub trait Located: Copy {
    /// The planar position.
    fn location(&self) -> Point;

    /// A copy of `self` placed at `location`.
    #[must_use]
    fn with_location(self, location: Point) -> Self;
}

impl Located for Point {
    fn location(&self) -> Point {
        *self
    }

    fn with_location(self, location: Point) -> Self {
        location
    }
}

/// Angle in radians of the direction from `from` to `to`.
///
/// Coincident points yield `0.0`; callers that care should de-duplicate first.
#[must_use]
pub fn angle_between(from: &impl Located, to: &impl Located) -> f64 {
    let a = from.location();
    let b = to.location();
    (b.y - a.y).atan2(b.x - a.x)
}

/// Move `point` by `distance` along `angle`.
#[must_use]
pub fn translate_along_angle<P: Located>(point: P, angle: f64, distance: f64) -> P {
    let p = point.location();
    point.with_location(Point::new(
        angle.cos().mul_add(distance, p.x),
        angle.sin().mul_add(distance, p.y),
    ))
}

/// Move `point` by `distance` against `angle`, i.e. backwards along it.
#[must_use]
pub fn translate_against_angle<P: Located>(point: P, angle: f64, distance: f64) -> P {
    translate_along_angle(point, angle, -distance)
}

/// Linear interpolation between two positions. `frac` is not clamped.
#[must_use]
pub fn lerp(from: &impl Located, to: &impl Located, frac: f64) -> Point {
    let a = from.location();
    let b = to.location();
    Point::new((b.x - a.x).mul_add(frac, a.x), (b.y - a.y).mul_add(frac, a.y))
}

/// Midpoint of two positions.
#[must_use]
pub fn midpoint(a: &impl Located, b: &impl Located) -> Point {
    lerp(a, b, 0.5)
}
