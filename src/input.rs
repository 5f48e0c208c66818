//! Input model: pointer buttons, keys, wheel deltas, and the click/drag state.
//!
//! A press followed by a release is either a click (add a point) or a drag
//! (pan the view). [`InteractionState`] tracks the gesture between
//! pointer-down and pointer-up and decides which one it was, so the click
//! event that browsers fire after a drag can be swallowed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"ArrowRight"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Scrub direction for this key: `1` forward, `-1` backward, `0` for anything else.
    #[must_use]
    pub fn scrub_direction(&self) -> i8 {
        match self.0.as_str() {
            "ArrowRight" => 1,
            "ArrowLeft" => -1,
            _ => 0,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Scrolling up zooms in.
    #[must_use]
    pub fn zooms_in(self) -> bool {
        self.dy < 0.0
    }
}

/// A press that may turn into a pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    /// Logical position under the pointer at press time; stays under the pointer while panning.
    pub start_logical: Point,
    /// Device position at press time, used for the click/drag threshold.
    pub start_device: Point,
}

/// Gesture state owned by the engine, never by the surface.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// The press in progress, if any.
    pub drag: Option<DragGesture>,
    /// The last release ended a drag; the click that follows must not add a point.
    pub just_dragged: bool,
}

impl InteractionState {
    /// Start tracking a press. Clears any stale drag verdict.
    pub fn begin(&mut self, device: Point, logical: Point) {
        self.drag = Some(DragGesture { start_logical: logical, start_device: device });
        self.just_dragged = false;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// End the press at `device` and record whether it moved beyond `threshold` on either axis.
    ///
    /// Always clears the press. Returns the drag verdict.
    pub fn finish(&mut self, device: Point, threshold: f64) -> bool {
        let moved = self.drag.take().is_some_and(|g| {
            (device.x - g.start_device.x).abs() > threshold || (device.y - g.start_device.y).abs() > threshold
        });
        self.just_dragged = moved;
        moved
    }

    /// Consume a click. Returns `false` (and clears the flag) when the click closes a drag.
    pub fn accept_click(&mut self) -> bool {
        !std::mem::take(&mut self.just_dragged)
    }
}
