//! gilrs-backed event source
//!
//! Drains the gilrs event queue without blocking and renders each event as an
//! evdev-style `(kind, code, state)` triple, so profiles written against Linux
//! event codes work on every platform gilrs supports.
//!
//! Analog values are rescaled from gilrs' float ranges back to the unsigned
//! byte range (0..=255). Stick Y axes are inverted, since gilrs reports "up" as
//! positive while the evdev convention is "down" positive.

use crate::controller::event::{EventKind, InputEvent};
use crate::source::{EventSource, SourceError};
use chrono::{DateTime, Local};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

// Source settings
#[derive(Clone, Debug, Default)]
pub struct GilrsSettings {
    /// Index into the list of connected gamepads; the first one if unset
    pub gamepad_index: Option<usize>,
}

#[state]
#[derive(Debug, Clone)]
pub enum SourceState {
    Initializing,
    Reading,
}

#[machine]
#[derive(Debug)]
pub struct GilrsSource<S: SourceState> {
    // Gilrs context
    gilrs: Gilrs,

    // Gamepad whose events are forwarded
    active_gamepad: Option<GamepadId>,

    settings: GilrsSettings,
}

impl<S: SourceState> GilrsSource<S> {
    pub fn settings(&self) -> &GilrsSettings {
        &self.settings
    }

    pub fn active_gamepad(&self) -> Option<GamepadId> {
        self.active_gamepad
    }
}

impl GilrsSource<Initializing> {
    pub fn create(settings: Option<GilrsSettings>) -> Result<Self, SourceError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating gilrs source with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(SourceError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, settings))
    }

    /// Select the gamepad to read from and start reading.
    ///
    /// Without any connected gamepad the source stays idle and adopts the
    /// first one that connects later. A configured index that does not exist
    /// is an error.
    pub fn initialize(mut self) -> Result<GilrsSource<Reading>, SourceError> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, waiting for one to connect");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
            }

            let index = self.settings.gamepad_index.unwrap_or(0);
            let Some((id, gamepad)) = gamepads.get(index) else {
                return Err(SourceError::NoGamepadError(format!(
                    "gamepad index {} requested, {} connected",
                    index,
                    gamepads.len()
                )));
            };
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
            self.active_gamepad = Some(*id);
        }

        Ok(self.transition())
    }
}

impl GilrsSource<Reading> {
    // Decide whether an event from `id` belongs to the selected gamepad
    fn accept(&mut self, id: GamepadId, event: &EventType) -> bool {
        match self.active_gamepad {
            Some(active) => active == id,
            None if matches!(event, EventType::Connected) => {
                info!("Gamepad {} connected, selecting it", id);
                self.active_gamepad = Some(id);
                true
            }
            None => false,
        }
    }
}

impl EventSource for GilrsSource<Reading> {
    fn read(&mut self) -> Result<Vec<InputEvent>, SourceError> {
        let mut batch = Vec::new();

        while let Some(Event { id, event, time, .. }) = self.gilrs.next_event() {
            if !self.accept(id, &event) {
                debug!("Skipping event from non-active gamepad: {:?}", id);
                continue;
            }

            if let EventType::Disconnected = event {
                warn!("Active gamepad {} disconnected", id);
                return Err(SourceError::Disconnected(format!("gamepad {}", id)));
            }

            match convert_event(event, DateTime::<Local>::from(time)) {
                Some(input) => {
                    debug!("Captured event: {}", input);
                    batch.push(input);
                }
                None => debug!("Event ignored: {:?}", event),
            }
        }

        Ok(batch)
    }
}

type Converted = (EventKind, &'static str, i32);

// Convert a gilrs event into an evdev-style input event
fn convert_event(event: EventType, timestamp: DateTime<Local>) -> Option<InputEvent> {
    let (kind, code, state) = match event {
        EventType::ButtonPressed(button, _) => convert_button(button, 1)?,
        EventType::ButtonRepeated(button, _) => convert_button(button, 2)?,
        EventType::ButtonReleased(button, _) => convert_button(button, 0)?,
        EventType::ButtonChanged(button, value, _) => convert_analog_button(button, value)?,
        EventType::AxisChanged(axis, value, _) => convert_axis(axis, value)?,
        EventType::Connected => (EventKind::Misc, "MSC_CONNECTED", 1),
        EventType::Dropped => (EventKind::Sync, "SYN_DROPPED", 0),
        _ => return None,
    };

    Some(InputEvent::new(kind, code, state).with_timestamp(timestamp))
}

fn convert_button(button: Button, state: i32) -> Option<Converted> {
    Some((EventKind::Key, button_code(button)?, state))
}

fn convert_analog_button(button: Button, value: f32) -> Option<Converted> {
    match button {
        Button::LeftTrigger2 => Some((EventKind::Absolute, "ABS_Z", trigger_to_raw(value))),
        Button::RightTrigger2 => Some((EventKind::Absolute, "ABS_RZ", trigger_to_raw(value))),
        // Digital buttons are already covered by pressed/released
        _ => None,
    }
}

fn convert_axis(axis: Axis, value: f32) -> Option<Converted> {
    let state = match axis {
        // gilrs reports up as positive, evdev as 0
        Axis::LeftStickY | Axis::RightStickY => stick_to_raw(-value),
        Axis::LeftZ | Axis::RightZ => trigger_to_raw(value),
        Axis::DPadX | Axis::DPadY => value.round() as i32,
        _ => stick_to_raw(value),
    };
    Some((EventKind::Absolute, axis_code(axis)?, state))
}

// Linux event code names for gilrs buttons
fn button_code(button: Button) -> Option<&'static str> {
    let code = match button {
        Button::South => "BTN_SOUTH",
        Button::East => "BTN_EAST",
        Button::North => "BTN_NORTH",
        Button::West => "BTN_WEST",
        Button::C => "BTN_C",
        Button::Z => "BTN_Z",
        Button::LeftTrigger => "BTN_TL",
        Button::LeftTrigger2 => "BTN_TL2",
        Button::RightTrigger => "BTN_TR",
        Button::RightTrigger2 => "BTN_TR2",
        Button::Select => "BTN_SELECT",
        Button::Start => "BTN_START",
        Button::Mode => "BTN_MODE",
        Button::LeftThumb => "BTN_THUMBL",
        Button::RightThumb => "BTN_THUMBR",
        Button::DPadUp => "BTN_DPAD_UP",
        Button::DPadDown => "BTN_DPAD_DOWN",
        Button::DPadLeft => "BTN_DPAD_LEFT",
        Button::DPadRight => "BTN_DPAD_RIGHT",
        _ => return None,
    };
    Some(code)
}

// Linux event code names for gilrs axes
fn axis_code(axis: Axis) -> Option<&'static str> {
    let code = match axis {
        Axis::LeftStickX => "ABS_X",
        Axis::LeftStickY => "ABS_Y",
        Axis::LeftZ => "ABS_Z",
        Axis::RightStickX => "ABS_RX",
        Axis::RightStickY => "ABS_RY",
        Axis::RightZ => "ABS_RZ",
        Axis::DPadX => "ABS_HAT0X",
        Axis::DPadY => "ABS_HAT0Y",
        _ => return None,
    };
    Some(code)
}

// -1.0..=1.0 to 0..=255
fn stick_to_raw(value: f32) -> i32 {
    ((value.clamp(-1.0, 1.0) + 1.0) * 127.5).round() as i32
}

// 0.0..=1.0 to 0..=255
fn trigger_to_raw(value: f32) -> i32 {
    (value.clamp(0.0, 1.0) * 255.0).round() as i32
}
