//! Stateful interpreters for single logical controls
//!
//! Every component is bound to one registered event code (or a code prefix for
//! joysticks) and only reacts to events carrying that code. All other events are
//! ignored without error, so a controller can hand every event to every component.
//!
//! Raw values are stored exactly as received. Nothing is clamped at ingestion:
//! a source reporting values outside 0..=255 yields normalized values outside
//! their nominal ranges, and it is up to the caller to clamp if it needs to.

use crate::controller::event::InputEvent;
use std::f32::consts::FRAC_PI_2;
use tracing::debug;

/// Upper end of the raw analog range (unsigned byte)
pub const RAW_MAX: f32 = 255.0;

/// Center of the raw joystick range
pub const RAW_CENTER: f32 = 127.5;

/// Capability shared by all component variants
pub trait Component {
    /// Registered code (or prefix) this component listens to
    fn code(&self) -> &str;

    /// Feed one event. Mutates state only if the event's code matches.
    fn load(&mut self, event: &InputEvent);
}

// Digital button, pressed iff the last matching event carried a non-zero value
#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    code: String,
    pressed: bool,
}

impl Button {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            pressed: false,
        }
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }
}

impl Component for Button {
    fn code(&self) -> &str {
        &self.code
    }

    fn load(&mut self, event: &InputEvent) {
        if event.code == self.code {
            // Auto-repeat (2) and any other non-zero value count as pressed
            self.pressed = event.state != 0;
            debug!("Button {} pressed={}", self.code, self.pressed);
        }
    }
}

impl From<&Button> for bool {
    fn from(button: &Button) -> bool {
        button.pressed
    }
}

// Analog trigger with a single raw magnitude
#[derive(Clone, Debug, PartialEq)]
pub struct Trigger {
    code: String,
    raw: i32,
}

impl Trigger {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            raw: 0,
        }
    }

    pub fn raw(&self) -> i32 {
        self.raw
    }

    /// Raw value rescaled to 0.0..=1.0
    pub fn normalized(&self) -> f32 {
        self.raw as f32 / RAW_MAX
    }
}

impl Component for Trigger {
    fn code(&self) -> &str {
        &self.code
    }

    fn load(&mut self, event: &InputEvent) {
        if event.code == self.code {
            self.raw = event.state;
            debug!("Trigger {} raw={}", self.code, self.raw);
        }
    }
}

/// Two-axis stick registered under a code prefix.
///
/// Events named `<prefix>X` update the horizontal axis and `<prefix>Y` the
/// vertical one. Both axes are independent: an X event never touches Y.
/// Codes that merely share the prefix (`ABS_RX` for a stick registered as
/// `ABS_`) are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Joystick {
    prefix: String,
    raw_x: i32,
    raw_y: i32,
}

impl Joystick {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            raw_x: 0,
            raw_y: 0,
        }
    }

    pub fn raw_x(&self) -> i32 {
        self.raw_x
    }

    pub fn raw_y(&self) -> i32 {
        self.raw_y
    }

    /// Horizontal axis rescaled to -1.0..=1.0
    pub fn x(&self) -> f32 {
        normalize_axis(self.raw_x)
    }

    /// Vertical axis rescaled to -1.0..=1.0
    pub fn y(&self) -> f32 {
        normalize_axis(self.raw_y)
    }

    /// `atan(y / x)` in radians, within -π/2..=π/2.
    ///
    /// With `x == 0` the quotient is undefined; the stick then points straight
    /// along the vertical axis and the angle is π/2 signed by `y`. A fully
    /// centered stick (`x == 0` and `y == 0`) yields 0.
    pub fn angle(&self) -> f32 {
        stick_angle(self.x(), self.y())
    }
}

impl Component for Joystick {
    fn code(&self) -> &str {
        &self.prefix
    }

    fn load(&mut self, event: &InputEvent) {
        let Some(axis) = event.code.strip_prefix(self.prefix.as_str()) else {
            return;
        };

        match axis {
            "X" => {
                self.raw_x = event.state;
                debug!("Joystick {}X raw={}", self.prefix, self.raw_x);
            }
            "Y" => {
                self.raw_y = event.state;
                debug!("Joystick {}Y raw={}", self.prefix, self.raw_y);
            }
            _ => {}
        }
    }
}

fn normalize_axis(raw: i32) -> f32 {
    (raw as f32 - RAW_CENTER) / RAW_CENTER
}

fn stick_angle(x: f32, y: f32) -> f32 {
    if x == 0.0 {
        if y == 0.0 {
            0.0
        } else {
            FRAC_PI_2.copysign(y)
        }
    } else {
        (y / x).atan()
    }
}

/// Closed set of component variants, for controllers built from a plain list
#[derive(Clone, Debug, PartialEq)]
pub enum AnyComponent {
    Button(Button),
    Trigger(Trigger),
    Joystick(Joystick),
}

impl Component for AnyComponent {
    fn code(&self) -> &str {
        match self {
            AnyComponent::Button(button) => button.code(),
            AnyComponent::Trigger(trigger) => trigger.code(),
            AnyComponent::Joystick(joystick) => joystick.code(),
        }
    }

    fn load(&mut self, event: &InputEvent) {
        match self {
            AnyComponent::Button(button) => button.load(event),
            AnyComponent::Trigger(trigger) => trigger.load(event),
            AnyComponent::Joystick(joystick) => joystick.load(event),
        }
    }
}

impl From<Button> for AnyComponent {
    fn from(button: Button) -> Self {
        AnyComponent::Button(button)
    }
}

impl From<Trigger> for AnyComponent {
    fn from(trigger: Trigger) -> Self {
        AnyComponent::Trigger(trigger)
    }
}

impl From<Joystick> for AnyComponent {
    fn from(joystick: Joystick) -> Self {
        AnyComponent::Joystick(joystick)
    }
}

/// Ordered collection of components a controller fans events out to.
///
/// Implementors must visit their components in a fixed declaration order.
pub trait ComponentSet {
    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut dyn Component));

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand the event to every component, without short-circuiting.
    fn dispatch(&mut self, event: &InputEvent) {
        self.for_each_mut(&mut |component| component.load(event));
    }
}

impl ComponentSet for Vec<AnyComponent> {
    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        for component in self.iter_mut() {
            f(component);
        }
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::event::EventKind;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn button_follows_last_matching_state() {
        let mut button = Button::new("BTN_SOUTH");
        assert!(!button.pressed());

        for (state, expected) in [(1, true), (0, false), (2, true), (-1, true), (0, false)] {
            button.load(&InputEvent::key("BTN_SOUTH", state));
            assert_eq!(button.pressed(), expected, "state {}", state);
        }
    }

    #[test]
    fn button_ignores_other_codes() {
        let mut button = Button::new("BTN_SOUTH");
        button.load(&InputEvent::key("BTN_SOUTH", 1));
        let before = button.clone();

        button.load(&InputEvent::key("BTN_NORTH", 0));
        button.load(&InputEvent::key("BTN_SOUTHX", 0));
        button.load(&InputEvent::absolute("ABS_X", 0));
        assert_eq!(button, before);
        assert!(bool::from(&button));
    }

    #[test]
    fn trigger_normalized_tracks_raw() {
        let mut trigger = Trigger::new("ABS_Z");
        assert_eq!(trigger.raw(), 0);
        assert_eq!(trigger.normalized(), 0.0);

        for raw in [0, 1, 128, 200, 255] {
            trigger.load(&InputEvent::absolute("ABS_Z", raw));
            assert_eq!(trigger.raw(), raw);
            assert_eq!(trigger.normalized(), raw as f32 / 255.0);
        }
        assert_eq!(trigger.normalized(), 1.0);
    }

    #[test]
    fn trigger_keeps_out_of_range_values() {
        let mut trigger = Trigger::new("ABS_Z");
        trigger.load(&InputEvent::absolute("ABS_Z", 510));
        assert_eq!(trigger.raw(), 510);
        assert!(approx(trigger.normalized(), 2.0));
    }

    #[test]
    fn trigger_requires_exact_code() {
        let mut trigger = Trigger::new("ABS_Z");
        trigger.load(&InputEvent::absolute("ABS_RZ", 100));
        trigger.load(&InputEvent::absolute("ABS_Z2", 100));
        assert_eq!(trigger.raw(), 0);
    }

    #[test]
    fn joystick_axes_update_independently() {
        let mut stick = Joystick::new("ABS_");
        stick.load(&InputEvent::absolute("ABS_Y", 42));

        for raw in [0, 100, 255] {
            stick.load(&InputEvent::absolute("ABS_X", raw));
            assert_eq!(stick.raw_x(), raw);
            assert_eq!(stick.raw_y(), 42);
        }

        stick.load(&InputEvent::absolute("ABS_Y", 7));
        assert_eq!(stick.raw_x(), 255);
        assert_eq!(stick.raw_y(), 7);
    }

    #[test]
    fn joystick_prefix_does_not_capture_other_sticks() {
        let mut left = Joystick::new("ABS_");
        let mut right = Joystick::new("ABS_R");

        for event in [
            InputEvent::absolute("ABS_RX", 10),
            InputEvent::absolute("ABS_RY", 20),
            InputEvent::absolute("ABS_Z", 30),
            InputEvent::absolute("ABS_RZ", 40),
        ] {
            left.load(&event);
            right.load(&event);
        }

        assert_eq!((left.raw_x(), left.raw_y()), (0, 0));
        assert_eq!((right.raw_x(), right.raw_y()), (10, 20));
    }

    #[test]
    fn joystick_normalized_range() {
        let mut stick = Joystick::new("ABS_");
        stick.load(&InputEvent::absolute("ABS_X", 0));
        stick.load(&InputEvent::absolute("ABS_Y", 255));
        assert!(approx(stick.x(), -1.0));
        assert!(approx(stick.y(), 1.0));

        stick.load(&InputEvent::absolute("ABS_X", 127));
        stick.load(&InputEvent::absolute("ABS_Y", 128));
        assert!(approx(stick.x(), -0.0039));
        assert!(approx(stick.y(), 0.0039));
        assert!(stick.x().abs() < 0.01);
        assert!(stick.y().abs() < 0.01);
    }

    #[test]
    fn joystick_angle_is_atan_of_quotient() {
        let mut stick = Joystick::new("ABS_");
        stick.load(&InputEvent::absolute("ABS_X", 255));
        stick.load(&InputEvent::absolute("ABS_Y", 255));
        assert!(approx(stick.angle(), std::f32::consts::FRAC_PI_4));

        stick.load(&InputEvent::absolute("ABS_X", 0));
        assert!(approx(stick.angle(), -std::f32::consts::FRAC_PI_4));
    }

    #[test]
    fn stick_angle_with_zero_x_is_defined() {
        assert_eq!(stick_angle(0.0, 0.0), 0.0);
        assert_eq!(stick_angle(0.0, 0.5), FRAC_PI_2);
        assert_eq!(stick_angle(0.0, -0.5), -FRAC_PI_2);
        assert!(!stick_angle(0.0, -0.0).is_nan());
    }

    #[test]
    fn any_component_delegates() {
        let mut components: Vec<AnyComponent> = vec![
            Button::new("BTN_EAST").into(),
            Trigger::new("ABS_RZ").into(),
            Joystick::new("ABS_R").into(),
        ];
        let codes: Vec<&str> = components.iter().map(|c| c.code()).collect();
        assert_eq!(codes, ["BTN_EAST", "ABS_RZ", "ABS_R"]);

        components.dispatch(&InputEvent::key("BTN_EAST", 1));
        components.dispatch(&InputEvent::absolute("ABS_RZ", 90));
        components.dispatch(&InputEvent::new(EventKind::Absolute, "ABS_RX", 33));

        assert_eq!(
            components,
            vec![
                AnyComponent::Button(Button {
                    code: "BTN_EAST".into(),
                    pressed: true
                }),
                AnyComponent::Trigger(Trigger {
                    code: "ABS_RZ".into(),
                    raw: 90
                }),
                AnyComponent::Joystick(Joystick {
                    prefix: "ABS_R".into(),
                    raw_x: 33,
                    raw_y: 0
                }),
            ]
        );
    }
}
