//! Shared numeric constants for the trail crate.

// ── Ribbon ──────────────────────────────────────────────────────

/// Full ribbon width at the oldest point, in logical pixels.
pub const INITIAL_LINE_WIDTH: f64 = 15.0;

/// Floor for the tapered ribbon width, in logical pixels.
pub const MIN_LINE_WIDTH: f64 = 3.7;

/// Divisor applied to the width after each segment.
pub const LINE_WIDTH_REDUCTION_FACTOR: f64 = 1.15;

/// Base colour of the ribbon fill as `[r, g, b]`.
pub const RIBBON_RGB: [u8; 3] = [255, 0, 0];

/// Body alpha of the ribbon gradient.
pub const RIBBON_BODY_ALPHA: f64 = 0.5;

/// Gradient progress at which the ribbon reaches full body alpha.
pub const RIBBON_FADE_IN_STOP: f64 = 0.3;

/// Gradient progress after which the head fades out again.
pub const RIBBON_FADE_OUT_STOP: f64 = 0.99;

// ── Track ───────────────────────────────────────────────────────

/// Logical distance of the synthetic lead-in point behind the first real point.
pub const INITIAL_POINT_BUFFER: f64 = 20.0;

// ── Interaction ─────────────────────────────────────────────────

/// Device pixels the pointer must travel before a press counts as a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Zoom ratio applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Largest view scale `zoom_at` will reach.
pub const MAX_ZOOM: f64 = 32.0;

/// Seconds added or removed per arrow-key scrub.
pub const SEEK_STEP_SECS: f64 = 0.1;

// ── Markers ─────────────────────────────────────────────────────

/// On-screen radius of a stored point marker in CSS pixels.
pub const MARKER_RADIUS_PX: f64 = 5.0;

/// Fill colour of stored point markers.
pub const MARKER_COLOR: &str = "rgba(150, 0, 0, 0.8)";
