//! Point track: the time-indexed positions the user has marked.
//!
//! Points arrive in click order and are only sorted when playback is being
//! prepared. Preparing also prepends a synthetic lead-in point at time zero
//! so the ribbon has somewhere to grow from before the first real mark.

#[cfg(test)]
#[path = "track_test.rs"]
mod track_test;

use serde::{Deserialize, Serialize};

use crate::consts::INITIAL_POINT_BUFFER;
use crate::geometry::{Located, Point, angle_between, lerp, translate_against_angle};

/// Error returned by [`PointTrack::prepare_for_playback`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    /// Playback needs at least two real points to orient the lead-in.
    #[error("need at least 2 marked points to play back, found {found}")]
    InsufficientPoints { found: usize },
}

/// A marked position at a video timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Logical x coordinate.
    pub x: f64,
    /// Logical y coordinate.
    pub y: f64,
    /// Playback time in seconds.
    pub time: f64,
    /// Generated by the track rather than entered by the user.
    #[serde(default)]
    pub synthetic: bool,
}

impl TrackPoint {
    /// A user-entered point.
    #[must_use]
    pub fn new(x: f64, y: f64, time: f64) -> Self {
        Self { x, y, time, synthetic: false }
    }
}

impl Located for TrackPoint {
    fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn with_location(self, location: Point) -> Self {
        Self { x: location.x, y: location.y, ..self }
    }
}

/// Ordered collection of [`TrackPoint`]s owned by the engine.
#[derive(Debug, Clone)]
pub struct PointTrack {
    points: Vec<TrackPoint>,
    lead_in_distance: f64,
}

impl Default for PointTrack {
    fn default() -> Self {
        Self { points: Vec::new(), lead_in_distance: INITIAL_POINT_BUFFER }
    }
}

impl PointTrack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pre-seeded track. Points are kept in the given order.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = TrackPoint>) -> Self {
        Self { points: points.into_iter().collect(), ..Self::default() }
    }

    /// Override the logical distance of the lead-in point behind the first mark.
    #[must_use]
    pub fn with_lead_in_distance(mut self, distance: f64) -> Self {
        self.lead_in_distance = distance;
        self
    }

    /// Append a user point at `time`. Sorting is deferred to [`prepare_for_playback`](Self::prepare_for_playback).
    pub fn add_at_time(&mut self, logical: Point, time: f64) {
        self.points.push(TrackPoint::new(logical.x, logical.y, time));
        tracing::debug!(x = logical.x, y = logical.y, time, count = self.points.len(), "point added");
    }

    /// Replace the lead-in point and order the track for playback.
    ///
    /// Drops any previous synthetic point, stable-sorts the remaining points
    /// by time (equal timestamps keep insertion order), then prepends a
    /// synthetic point at time zero placed `lead_in_distance` behind the
    /// first point, against the direction of the first segment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InsufficientPoints`] when fewer than two real
    /// points exist. The track is still cleaned and sorted in that case.
    pub fn prepare_for_playback(&mut self) -> Result<(), TrackError> {
        self.points.retain(|p| !p.synthetic);
        // `sort_by` is a stable merge sort; ties keep click order.
        self.points.sort_by(|a, b| a.time.total_cmp(&b.time));

        let [first, second, ..] = self.points.as_slice() else {
            return Err(TrackError::InsufficientPoints { found: self.points.len() });
        };

        let angle = angle_between(first, second);
        let lead_in = TrackPoint {
            time: 0.0,
            synthetic: true,
            ..translate_against_angle(*first, angle, self.lead_in_distance)
        };
        self.points.insert(0, lead_in);
        tracing::debug!(count = self.points.len(), "track prepared for playback");
        Ok(())
    }

    /// The leading run of points whose time is at or before `time`.
    ///
    /// Stops at the first point later than `time`, so on a prepared (sorted)
    /// track this is every point with `point.time <= time`.
    #[must_use]
    pub fn points_up_to(&self, time: f64) -> &[TrackPoint] {
        &self.points[..self.next_index(time)]
    }

    /// Position between the last point at or before `time` and the next one.
    ///
    /// `None` when `time` is past the last point, before the first, or lands
    /// exactly on a stored point (that point already ends the run).
    #[must_use]
    pub fn interpolated_boundary(&self, time: f64) -> Option<Point> {
        let idx = self.next_index(time);
        let next = self.points.get(idx)?;
        let prev = self.points.get(idx.checked_sub(1)?)?;
        if time <= prev.time {
            return None;
        }
        Some(lerp(prev, next, (time - prev.time) / (next.time - prev.time)))
    }

    /// The ordered positions to draw for playback time `time`.
    ///
    /// Fewer than two points means there is nothing to draw this frame.
    #[must_use]
    pub fn snapshot_for_display(&self, time: f64) -> Vec<Point> {
        let mut out: Vec<Point> = self.points_up_to(time).iter().map(Located::location).collect();
        if let Some(tail) = self.interpolated_boundary(time) {
            out.push(tail);
        }
        out
    }

    /// All points in track order.
    #[must_use]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of user-entered points.
    #[must_use]
    pub fn real_len(&self) -> usize {
        self.points.iter().filter(|p| !p.synthetic).count()
    }

    fn next_index(&self, time: f64) -> usize {
        self.points
            .iter()
            .position(|p| p.time > time)
            .unwrap_or(self.points.len())
    }
}
