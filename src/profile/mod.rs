//! Fixed component wirings for known gamepads

pub mod ps3;

pub use ps3::{ps3, ButtonsSnapshot, Ps3, Ps3Layout, Ps3Snapshot, StickSnapshot, TriggerSnapshot};
