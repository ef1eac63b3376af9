//! Controller subsystem for gamepad state tracking
//!
//! Turns decoded device events into queryable control state:
//!
//! 1. [`event`] - Decoded input events as delivered by a source
//! 2. [`component`] - Buttons, triggers and joysticks interpreting those events
//! 3. [`controller`] - Dispatcher fanning each event out to all components
//! 4. [`controller_handle`] - Background polling with snapshot broadcasting
//!
//! # Architecture
//!
//! ```text
//! EventSource ──► Controller::update ──► Component::load (every component)
//!                 (skips Sync/Misc)       (acts on matching codes only)
//! ```

pub mod component;
#[allow(clippy::module_inception)]
pub mod controller;
pub mod controller_handle;
pub mod event;

pub use crate::controller::component::{
    AnyComponent, Button, Component, ComponentSet, Joystick, Trigger,
};
pub use crate::controller::controller::{Controller, ControllerError};
pub use crate::controller::controller_handle::{ControllerHandle, ControllerSettings};
pub use crate::controller::event::{EventKind, InputEvent};
