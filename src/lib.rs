//! Trajectory annotation engine for video frames.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A user marks
//! a moving object's position at discrete video timestamps by clicking on the
//! rendered frame; on playback the engine draws a tapering, smoothly curved
//! ribbon that follows the object, interpolating between marked points. The
//! host JavaScript layer forwards DOM events and the video lifecycle signals
//! to [`engine::Engine`] and nothing else.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] render loop |
//! | [`viewport`] | Zoom/pan affine transform, bounds clamping, device-to-logical mapping |
//! | [`track`] | Time-indexed point store and playback interpolation |
//! | [`ribbon`] | Parallel-offset tapering ribbon construction |
//! | [`geometry`] | Angle, translation and interpolation helpers |
//! | [`input`] | Input event types and the click/drag interaction state |
//! | [`render`] | Replays a [`engine::Scene`] onto a 2D context |
//! | [`config`] | Tunable styling and interaction settings |
//! | [`consts`] | Shared numeric constants (widths, thresholds, steps) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod render;
pub mod ribbon;
pub mod track;
pub mod viewport;
