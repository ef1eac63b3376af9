//! PS3-style gamepad wiring
//!
//! Binds the fixed component set of a DualShock 3 (as exposed by the Linux
//! `hid-sony` driver) to named fields. Face buttons are named after their
//! compass position (`y` = north, `b` = east, `a` = south, `x` = west) with
//! PlayStation aliases (`triangle`, `circle`, `x_button`, `square`) returning
//! the very same component.

use crate::controller::component::{Button, Component, ComponentSet, Joystick, Trigger};
use crate::controller::controller::Controller;
use crate::source::EventSource;
use std::fmt;

/// A controller driving the PS3 component set
pub type Ps3<S> = Controller<S, Ps3Layout>;

/// Build a PS3 controller reading from `source`.
pub fn ps3<S: EventSource>(source: S) -> Ps3<S> {
    Controller::new(source, Ps3Layout::new())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ps3Layout {
    joystick_l: Joystick,
    joystick_r: Joystick,
    trigger_l: Trigger,
    trigger_r: Trigger,
    y: Button,
    b: Button,
    a: Button,
    x: Button,
    up: Button,
    right: Button,
    down: Button,
    left: Button,
    thumb_l: Button,
    thumb_r: Button,
    bumper_l: Button,
    bumper_r: Button,
    start: Button,
    select: Button,
    mode: Button,
}

impl Default for Ps3Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Ps3Layout {
    pub const COMPONENT_COUNT: usize = 19;

    pub fn new() -> Self {
        Self {
            joystick_l: Joystick::new("ABS_"),
            joystick_r: Joystick::new("ABS_R"),
            trigger_l: Trigger::new("ABS_Z"),
            trigger_r: Trigger::new("ABS_RZ"),
            y: Button::new("BTN_NORTH"),
            b: Button::new("BTN_EAST"),
            a: Button::new("BTN_SOUTH"),
            x: Button::new("BTN_WEST"),
            up: Button::new("BTN_DPAD_UP"),
            right: Button::new("BTN_DPAD_RIGHT"),
            down: Button::new("BTN_DPAD_DOWN"),
            left: Button::new("BTN_DPAD_LEFT"),
            thumb_l: Button::new("BTN_THUMBL"),
            thumb_r: Button::new("BTN_THUMBR"),
            bumper_l: Button::new("BTN_TL"),
            bumper_r: Button::new("BTN_TR"),
            start: Button::new("BTN_START"),
            select: Button::new("BTN_SELECT"),
            mode: Button::new("BTN_MODE"),
        }
    }

    pub fn joystick_l(&self) -> &Joystick {
        &self.joystick_l
    }

    pub fn joystick_r(&self) -> &Joystick {
        &self.joystick_r
    }

    pub fn trigger_l(&self) -> &Trigger {
        &self.trigger_l
    }

    pub fn trigger_r(&self) -> &Trigger {
        &self.trigger_r
    }

    pub fn y(&self) -> &Button {
        &self.y
    }

    pub fn b(&self) -> &Button {
        &self.b
    }

    pub fn a(&self) -> &Button {
        &self.a
    }

    pub fn x(&self) -> &Button {
        &self.x
    }

    pub fn up(&self) -> &Button {
        &self.up
    }

    pub fn right(&self) -> &Button {
        &self.right
    }

    pub fn down(&self) -> &Button {
        &self.down
    }

    pub fn left(&self) -> &Button {
        &self.left
    }

    pub fn thumb_l(&self) -> &Button {
        &self.thumb_l
    }

    pub fn thumb_r(&self) -> &Button {
        &self.thumb_r
    }

    pub fn bumper_l(&self) -> &Button {
        &self.bumper_l
    }

    pub fn bumper_r(&self) -> &Button {
        &self.bumper_r
    }

    pub fn start(&self) -> &Button {
        &self.start
    }

    pub fn select(&self) -> &Button {
        &self.select
    }

    pub fn mode(&self) -> &Button {
        &self.mode
    }

    // PlayStation names

    pub fn triangle(&self) -> &Button {
        &self.y
    }

    pub fn circle(&self) -> &Button {
        &self.b
    }

    pub fn x_button(&self) -> &Button {
        &self.a
    }

    pub fn square(&self) -> &Button {
        &self.x
    }

    pub fn snapshot(&self) -> Ps3Snapshot {
        Ps3Snapshot {
            joystick_l: StickSnapshot::of(&self.joystick_l),
            joystick_r: StickSnapshot::of(&self.joystick_r),
            trigger_l: TriggerSnapshot::of(&self.trigger_l),
            trigger_r: TriggerSnapshot::of(&self.trigger_r),
            buttons: ButtonsSnapshot {
                triangle: self.y.pressed(),
                circle: self.b.pressed(),
                x_button: self.a.pressed(),
                square: self.x.pressed(),
                up: self.up.pressed(),
                right: self.right.pressed(),
                down: self.down.pressed(),
                left: self.left.pressed(),
                thumb_l: self.thumb_l.pressed(),
                thumb_r: self.thumb_r.pressed(),
                bumper_l: self.bumper_l.pressed(),
                bumper_r: self.bumper_r.pressed(),
                start: self.start.pressed(),
                select: self.select.pressed(),
                mode: self.mode.pressed(),
            },
        }
    }
}

impl ComponentSet for Ps3Layout {
    fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut dyn Component)) {
        let components: [&mut dyn Component; Ps3Layout::COMPONENT_COUNT] = [
            &mut self.joystick_l,
            &mut self.joystick_r,
            &mut self.trigger_l,
            &mut self.trigger_r,
            &mut self.y,
            &mut self.b,
            &mut self.a,
            &mut self.x,
            &mut self.up,
            &mut self.right,
            &mut self.down,
            &mut self.left,
            &mut self.thumb_l,
            &mut self.thumb_r,
            &mut self.bumper_l,
            &mut self.bumper_r,
            &mut self.start,
            &mut self.select,
            &mut self.mode,
        ];
        for component in components {
            f(component);
        }
    }

    fn len(&self) -> usize {
        Self::COMPONENT_COUNT
    }
}

impl fmt::Display for Ps3Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

macro_rules! delegate_to_layout {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self) -> &$ty {
                self.components().$name()
            }
        )*
    };
}

impl<S: EventSource> Controller<S, Ps3Layout> {
    delegate_to_layout! {
        joystick_l: Joystick,
        joystick_r: Joystick,
        trigger_l: Trigger,
        trigger_r: Trigger,
        y: Button,
        b: Button,
        a: Button,
        x: Button,
        up: Button,
        right: Button,
        down: Button,
        left: Button,
        thumb_l: Button,
        thumb_r: Button,
        bumper_l: Button,
        bumper_r: Button,
        start: Button,
        select: Button,
        mode: Button,
        triangle: Button,
        circle: Button,
        x_button: Button,
        square: Button,
    }

    pub fn snapshot(&self) -> Ps3Snapshot {
        self.components().snapshot()
    }
}

impl<S: EventSource> fmt::Display for Controller<S, Ps3Layout> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.components(), f)
    }
}

/// Owned copy of every derived value of a PS3 layout
#[derive(Clone, Debug, PartialEq)]
pub struct Ps3Snapshot {
    pub joystick_l: StickSnapshot,
    pub joystick_r: StickSnapshot,
    pub trigger_l: TriggerSnapshot,
    pub trigger_r: TriggerSnapshot,
    pub buttons: ButtonsSnapshot,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickSnapshot {
    pub raw_x: i32,
    pub raw_y: i32,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl StickSnapshot {
    fn of(stick: &Joystick) -> Self {
        Self {
            raw_x: stick.raw_x(),
            raw_y: stick.raw_y(),
            x: stick.x(),
            y: stick.y(),
            angle: stick.angle(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSnapshot {
    pub raw: i32,
    pub value: f32,
}

impl TriggerSnapshot {
    fn of(trigger: &Trigger) -> Self {
        Self {
            raw: trigger.raw(),
            value: trigger.normalized(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonsSnapshot {
    pub triangle: bool,
    pub circle: bool,
    pub x_button: bool,
    pub square: bool,
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
    pub thumb_l: bool,
    pub thumb_r: bool,
    pub bumper_l: bool,
    pub bumper_r: bool,
    pub start: bool,
    pub select: bool,
    pub mode: bool,
}

impl fmt::Display for Ps3Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.buttons;
        writeln!(f, "LJ: {:.4}, {:.4}", self.joystick_l.x, self.joystick_l.y)?;
        writeln!(f, "RJ: {:.4}, {:.4}", self.joystick_r.x, self.joystick_r.y)?;
        writeln!(f, "LT: {:.4}", self.trigger_l.value)?;
        writeln!(f, "RT: {:.4}", self.trigger_r.value)?;
        writeln!(f, "TRIANGLE: {}", b.triangle)?;
        writeln!(f, "CIRCLE:   {}", b.circle)?;
        writeln!(f, "X_BUTTON: {}", b.x_button)?;
        writeln!(f, "SQUARE:   {}", b.square)?;
        writeln!(f, "UP:       {}", b.up)?;
        writeln!(f, "RIGHT:    {}", b.right)?;
        writeln!(f, "DOWN:     {}", b.down)?;
        writeln!(f, "LEFT:     {}", b.left)?;
        writeln!(f, "THUMB_L:  {}", b.thumb_l)?;
        writeln!(f, "THUMB_R:  {}", b.thumb_r)?;
        writeln!(f, "BUMPER_L: {}", b.bumper_l)?;
        writeln!(f, "BUMPER_R: {}", b.bumper_r)?;
        writeln!(f, "START:    {}", b.start)?;
        writeln!(f, "SELECT:   {}", b.select)?;
        write!(f, "MODE:     {}", b.mode)
    }
}
