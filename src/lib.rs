//! Gamepad state tracking on top of raw device events
//!
//! Raw `(kind, code, state)` events from an [`source::EventSource`] are fanned out
//! by a [`controller::Controller`] to stateful components (buttons, triggers,
//! joysticks). Profiles such as [`profile::ps3()`] wire a fixed, named component set
//! for a known gamepad.

pub mod config;
pub mod controller;
pub mod profile;
pub mod source;
