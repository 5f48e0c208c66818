use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

use crate::config::{ConfigError, RedrawMode, TrailConfig};
use crate::geometry::Point;
use crate::input::{Button, InteractionState, Key, WheelDelta};
use crate::render;
use crate::ribbon::{RibbonPath, RibbonStyle, build_ribbon_path};
use crate::track::{PointTrack, TrackError, TrackPoint};
use crate::viewport::{AffineTransform, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A user point was stored.
    PointAdded(TrackPoint),
    /// Move the video's playback position by `delta_secs`.
    Seek { delta_secs: f64 },
    /// Redraw once, synchronously.
    RenderNeeded,
}

/// Whether the ribbon animation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    /// Frame plus point markers; redraws only on demand.
    #[default]
    Idle,
    /// Ribbon animation. `run` identifies this playback so ticks from an
    /// earlier run can tell they are stale.
    Playing { run: u64 },
}

/// What to draw on top of the video frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Nothing but the frame (too few points for a ribbon).
    FrameOnly,
    /// Stored points as filled circles. `radius` is in logical units.
    Markers { centers: Vec<Point>, radius: f64, color: String },
    /// The trajectory ribbon.
    Ribbon(RibbonPath),
}

/// A complete description of one frame, independent of the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Transform to install before drawing logical content (includes the DPR).
    pub transform: AffineTransform,
    pub bitmap_width: f64,
    pub bitmap_height: f64,
    pub display_width: f64,
    pub display_height: f64,
    pub layer: Layer,
}

/// Error returned by [`Engine`] operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A browser API call failed.
    #[error("browser call failed: {0}")]
    Js(String),
    /// The canvas has no 2D context.
    #[error("canvas 2d context unavailable")]
    NoContext,
    /// No global `window` (not running in a browser).
    #[error("window unavailable")]
    NoWindow,
    /// The video has no intrinsic size yet.
    #[error("video metadata not loaded")]
    NoMetadata,
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

/// Engine state and logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub viewport: Viewport,
    pub track: PointTrack,
    pub input: InteractionState,
    pub playback: Playback,
    config: TrailConfig,
    style: RibbonStyle,
    last_run: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::build(TrailConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a core from a host-supplied config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the config fails [`TrailConfig::validate`].
    pub fn with_config(config: TrailConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TrailConfig) -> Self {
        Self {
            viewport: Viewport::new(),
            track: PointTrack::new().with_lead_in_distance(config.initial_point_buffer),
            input: InteractionState::default(),
            playback: Playback::Idle,
            style: config.ribbon_style(),
            config,
            last_run: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    // --- Viewport ---

    /// Size the surface once the media's dimensions are known.
    pub fn fit_to_content(&mut self, display_width: f64, aspect_ratio: f64, dpr: f64) -> Vec<Action> {
        self.viewport.fit_to_content(display_width, aspect_ratio, dpr);
        vec![Action::RenderNeeded]
    }

    /// Drop zoom and pan, e.g. before a full-resolution export.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        self.redraw_if_idle()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, device_pt: Point, button: Button) -> Vec<Action> {
        if button == Button::Primary {
            let logical = self.viewport.to_logical(device_pt);
            self.input.begin(device_pt, logical);
        }
        Vec::new()
    }

    /// Pan while a press is held so the pressed logical point follows the pointer.
    pub fn on_pointer_move(&mut self, device_pt: Point) -> Vec<Action> {
        let Some(gesture) = self.input.drag else {
            return Vec::new();
        };
        let current = self.viewport.to_logical(device_pt);
        self.viewport
            .pan_by(current.x - gesture.start_logical.x, current.y - gesture.start_logical.y);
        self.redraw_if_idle()
    }

    pub fn on_pointer_up(&mut self, device_pt: Point, button: Button) -> Vec<Action> {
        if button == Button::Primary {
            self.input.finish(device_pt, self.config.drag_threshold_px);
        }
        Vec::new()
    }

    /// Add a point at `time` unless the click closes a drag or playback is running.
    pub fn on_click(&mut self, device_pt: Point, time: f64) -> Vec<Action> {
        if !self.input.accept_click() || self.is_playing() {
            return Vec::new();
        }
        let logical = self.viewport.to_logical(device_pt);
        self.track.add_at_time(logical, time);
        vec![Action::PointAdded(TrackPoint::new(logical.x, logical.y, time)), Action::RenderNeeded]
    }

    /// Zoom about the pointer: in when scrolling up, out otherwise.
    pub fn on_wheel(&mut self, device_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let factor = if delta.zooms_in() { self.config.zoom_step } else { 1.0 / self.config.zoom_step };
        self.viewport.zoom_at(device_pt, factor);
        self.redraw_if_idle()
    }

    /// Arrow keys scrub the video by `seek_step_secs`.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let direction = key.scrub_direction();
        if direction == 0 {
            return Vec::new();
        }
        let mut actions = vec![Action::Seek { delta_secs: f64::from(direction) * self.config.seek_step_secs }];
        actions.extend(self.redraw_if_idle());
        actions
    }

    // --- Playback ---

    /// Prepare the track and enter Playing. Returns the new run id.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InsufficientPoints`] and stays Idle when fewer
    /// than two points are marked.
    pub fn start_playback(&mut self) -> Result<u64, TrackError> {
        if let Err(err) = self.track.prepare_for_playback() {
            tracing::warn!(error = %err, "playback refused");
            return Err(err);
        }
        self.last_run += 1;
        self.playback = Playback::Playing { run: self.last_run };
        tracing::info!(run = self.last_run, points = self.track.len(), "playback started");
        Ok(self.last_run)
    }

    /// Leave Playing on request. Any pending tick of the old run becomes stale.
    pub fn stop_playback(&mut self) -> Vec<Action> {
        if let Playback::Playing { run } = self.playback {
            tracing::info!(run, "playback stopped");
        }
        self.playback = Playback::Idle;
        vec![Action::RenderNeeded]
    }

    /// The surface refused to start playing. Back to Idle with the markers redrawn.
    pub fn on_play_rejected(&mut self) -> Vec<Action> {
        if let Playback::Playing { run } = self.playback {
            tracing::warn!(run, "playback rejected by media element");
        }
        self.playback = Playback::Idle;
        vec![Action::RenderNeeded]
    }

    /// The video reported that it ended.
    pub fn on_ended(&mut self) -> Vec<Action> {
        if let Playback::Playing { run } = self.playback {
            tracing::info!(run, "playback ended");
        }
        self.playback = Playback::Idle;
        vec![Action::RenderNeeded]
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    /// Whether `run` is the playback currently in progress.
    #[must_use]
    pub fn is_live(&self, run: u64) -> bool {
        self.playback == Playback::Playing { run }
    }

    /// The scene for one animation tick, or `None` if `run` is no longer live.
    #[must_use]
    pub fn tick(&self, run: u64, time: f64) -> Option<Scene> {
        if !self.is_live(run) {
            tracing::debug!(run, "dropping stale playback tick");
            return None;
        }
        Some(self.scene(time))
    }

    /// Whether a tick of `run` should schedule another one.
    #[must_use]
    pub fn should_reschedule(&self, run: u64) -> bool {
        self.is_live(run) && self.config.redraw == RedrawMode::Continuous
    }

    // --- Rendering ---

    /// Describe the frame at playback time `time` for the current mode.
    #[must_use]
    pub fn scene(&self, time: f64) -> Scene {
        let layer = match self.playback {
            Playback::Idle => Layer::Markers {
                centers: self.track.points().iter().map(|p| Point::new(p.x, p.y)).collect(),
                radius: self.config.marker_radius_px / self.viewport.zoom(),
                color: self.config.marker_color.clone(),
            },
            Playback::Playing { .. } => {
                let snapshot = self.track.snapshot_for_display(time);
                build_ribbon_path(&snapshot, &self.style).map_or(Layer::FrameOnly, Layer::Ribbon)
            }
        };
        Scene {
            transform: self.viewport.device_transform(),
            bitmap_width: self.viewport.bitmap_width,
            bitmap_height: self.viewport.bitmap_height,
            display_width: self.viewport.display_width,
            display_height: self.viewport.display_height,
            layer,
        }
    }

    fn redraw_if_idle(&self) -> Vec<Action> {
        if self.is_playing() { Vec::new() } else { vec![Action::RenderNeeded] }
    }
}

/// The full engine. Wraps `EngineCore` and owns the browser canvas and video elements.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    video: HtmlVideoElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas and (hidden) video element.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `config` fails validation, or
    /// [`EngineError::NoContext`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, video: HtmlVideoElement, config: TrailConfig) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EngineError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::NoContext)?;
        let core = EngineCore::with_config(config)?;
        Ok(Self { canvas, ctx, video, core })
    }

    /// Size the canvas to the video's aspect ratio at the device pixel ratio.
    ///
    /// Call on the video's `loadedmetadata` signal.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoMetadata`] before the video size is known, or
    /// [`EngineError::Js`] if styling or drawing the canvas fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit_to_video(&mut self) -> Result<(), EngineError> {
        let window = web_sys::window().ok_or(EngineError::NoWindow)?;
        let (video_w, video_h) = (self.video.video_width(), self.video.video_height());
        if video_w == 0 || video_h == 0 {
            return Err(EngineError::NoMetadata);
        }
        let display_width = self.canvas.get_bounding_client_rect().width();
        let aspect = f64::from(video_h) / f64::from(video_w);
        self.core.fit_to_content(display_width, aspect, window.device_pixel_ratio());

        let vp = self.core.viewport;
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", vp.display_width))?;
        style.set_property("height", &format!("{}px", vp.display_height))?;
        self.canvas.set_width(vp.bitmap_width as u32);
        self.canvas.set_height(vp.bitmap_height as u32);
        self.render()
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_pointer_down(&mut self, device_pt: Point, button: Button) -> Result<(), EngineError> {
        let actions = self.core.on_pointer_down(device_pt, button);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_pointer_move(&mut self, device_pt: Point) -> Result<(), EngineError> {
        let actions = self.core.on_pointer_move(device_pt);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_pointer_up(&mut self, device_pt: Point, button: Button) -> Result<(), EngineError> {
        let actions = self.core.on_pointer_up(device_pt, button);
        self.apply(&actions)
    }

    /// Add a point at the video's current time. Returns the stored point, if any.
    ///
    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_click(&mut self, device_pt: Point) -> Result<Option<TrackPoint>, EngineError> {
        let actions = self.core.on_click(device_pt, self.video.current_time());
        self.apply(&actions)?;
        Ok(actions.iter().find_map(|a| match a {
            Action::PointAdded(p) => Some(*p),
            _ => None,
        }))
    }

    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_wheel(&mut self, device_pt: Point, delta: WheelDelta) -> Result<(), EngineError> {
        let actions = self.core.on_wheel(device_pt, delta);
        self.apply(&actions)
    }

    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_key_down(&mut self, key: &Key) -> Result<(), EngineError> {
        let actions = self.core.on_key_down(key);
        self.apply(&actions)
    }

    /// Handle the video's `ended` signal.
    ///
    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn on_ended(&mut self) -> Result<(), EngineError> {
        let actions = self.core.on_ended();
        self.apply(&actions)
    }

    /// Pause the video and return to Idle.
    ///
    /// # Errors
    ///
    /// Propagates browser failures from pausing or redrawing.
    pub fn stop_playback(&mut self) -> Result<(), EngineError> {
        self.video.pause()?;
        let actions = self.core.stop_playback();
        self.apply(&actions)
    }

    /// Drop zoom and pan.
    ///
    /// # Errors
    ///
    /// Propagates browser failures from the resulting redraw.
    pub fn reset_view(&mut self) -> Result<(), EngineError> {
        let actions = self.core.reset_view();
        self.apply(&actions)
    }

    // --- Render ---

    /// Draw the current mode's scene at the video's current time.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Js`] if a canvas call fails.
    pub fn render(&self) -> Result<(), EngineError> {
        let scene = self.core.scene(self.video.current_time());
        render::draw(&self.ctx, &self.video, &scene)?;
        Ok(())
    }

    fn apply(&mut self, actions: &[Action]) -> Result<(), EngineError> {
        for action in actions {
            match action {
                Action::Seek { delta_secs } => {
                    let target = (self.video.current_time() + delta_secs).max(0.0);
                    self.video.set_current_time(target);
                }
                Action::RenderNeeded => self.render()?,
                Action::PointAdded(_) => {}
            }
        }
        Ok(())
    }
}

/// Rewind, start the video and begin the ribbon animation.
///
/// Returns the promise from the video's `play()` call.
///
/// # Errors
///
/// Returns [`EngineError::Track`] when too few points are marked (nothing is
/// started), or [`EngineError::Js`] / [`EngineError::NoWindow`] if the
/// browser refuses to play or schedule a frame. In the latter cases the
/// engine is back in Idle and the markers are redrawn.
pub fn start_playback(engine: &Rc<RefCell<Engine>>) -> Result<js_sys::Promise, EngineError> {
    let (run, promise) = {
        let mut guard = engine.borrow_mut();
        let run = guard.core.start_playback()?;
        guard.video.set_current_time(0.0);
        match guard.video.play() {
            Ok(promise) => (run, promise),
            Err(err) => return Err(abandon_start(&mut guard, err.into())),
        }
    };
    if let Err(err) = schedule_tick(engine, run) {
        let mut guard = engine.borrow_mut();
        if let Err(pause_err) = guard.video.pause() {
            tracing::warn!(error = ?pause_err, "failed to pause after scheduling error");
        }
        return Err(abandon_start(&mut guard, err));
    }
    Ok(promise)
}

/// Return to Idle after a failed start and redraw. Hands back `cause`.
fn abandon_start(engine: &mut Engine, cause: EngineError) -> EngineError {
    let actions = engine.core.on_play_rejected();
    if let Err(redraw_err) = engine.apply(&actions) {
        tracing::warn!(error = %redraw_err, "redraw after failed playback start failed");
    }
    cause
}

/// Draw one playback frame without scheduling another (for [`RedrawMode::Single`] hosts).
///
/// # Errors
///
/// Returns [`EngineError::Js`] if a canvas call fails.
pub fn request_playback_frame(engine: &Rc<RefCell<Engine>>) -> Result<(), EngineError> {
    let guard = engine.borrow();
    if let Playback::Playing { run } = guard.core.playback {
        if let Some(scene) = guard.core.tick(run, guard.video.current_time()) {
            render::draw(&guard.ctx, &guard.video, &scene)?;
        }
    }
    Ok(())
}

fn schedule_tick(engine: &Rc<RefCell<Engine>>, run: u64) -> Result<(), EngineError> {
    let window = web_sys::window().ok_or(EngineError::NoWindow)?;

    let engine_for_cb = Rc::clone(engine);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        run_tick(&engine_for_cb, run);
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    *holder.borrow_mut() = Some(cb);
    Ok(())
}

fn run_tick(engine: &Rc<RefCell<Engine>>, run: u64) {
    let reschedule = {
        let guard = engine.borrow();
        let Some(scene) = guard.core.tick(run, guard.video.current_time()) else {
            return;
        };
        if let Err(err) = render::draw(&guard.ctx, &guard.video, &scene) {
            tracing::warn!(error = ?err, run, "playback frame draw failed");
        }
        guard.core.should_reschedule(run)
    };
    if reschedule {
        if let Err(err) = schedule_tick(engine, run) {
            tracing::warn!(error = %err, run, "failed to schedule playback tick");
        }
    }
}
