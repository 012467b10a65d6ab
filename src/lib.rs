//! Map viewport engine for tournament drop planning.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive map surface: translating raw DOM input into pan/zoom changes and
//! classified taps, mapping taps to normalized map coordinates, hit-testing
//! spots, and running the two-tap flight path drawing machine. The host page
//! supplies the spot and path collections for the active map and persists the
//! resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`viewport`] | Zoom/offset transform and coordinate conversions |
//! | [`gesture`] | Mouse, wheel, and touch gesture controller |
//! | [`input`] | Input value types and mode flags |
//! | [`interaction`] | Tap dispatch and the flight path state machine |
//! | [`annotation`] | Spots, flight paths, persisted records, map catalog |
//! | [`hit`] | Nearest-spot hit testing |
//! | [`scene`] | Screen-space draw list and category palette |
//! | [`render`] | Canvas 2D painting of a scene |
//! | [`dom`] | Browser event conversion |
//! | [`config`] | Tunable viewport parameters |
//! | [`consts`] | Shared numeric and color constants |

pub mod annotation;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod viewport;
