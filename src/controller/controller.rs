use crate::controller::component::ComponentSet;
use crate::source::{EventSource, SourceError};
use chrono::{DateTime, Local};
use tracing::{debug, error, trace};

// Controller errors
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Task error: {0}")]
    TaskError(String),
}

/// Dispatcher owning one event source and an ordered set of components.
///
/// Each [`Controller::update`] drains one batch from the source and hands every
/// non-structural event to every component in declaration order. Components
/// decide for themselves whether an event concerns them.
#[derive(Debug)]
pub struct Controller<S, C> {
    source: S,
    components: C,
    last_update: Option<DateTime<Local>>,
}

impl<S: EventSource, C: ComponentSet> Controller<S, C> {
    pub fn new(source: S, components: C) -> Self {
        debug!("Creating controller with {} components", components.len());
        Self {
            source,
            components,
            last_update: None,
        }
    }

    /// Pull all pending events and fan them out.
    ///
    /// Returns the number of events dispatched to components. A source error
    /// is returned as is; components keep the state they had before the call.
    pub fn update(&mut self) -> Result<usize, ControllerError> {
        let batch = self.source.read().map_err(|e| {
            error!("Failed to read from event source: {}", e);
            ControllerError::Source(e)
        })?;

        if batch.is_empty() {
            trace!("No events in this cycle");
            return Ok(0);
        }

        let total = batch.len();
        let mut dispatched = 0;
        for event in &batch {
            if event.kind.is_structural() {
                trace!("Skipping structural event: {}", event);
                continue;
            }
            self.components.dispatch(event);
            dispatched += 1;
        }

        self.last_update = Some(Local::now());
        debug!(
            "Dispatched {} of {} events to {} components",
            dispatched,
            total,
            self.components.len()
        );
        Ok(dispatched)
    }

    pub fn components(&self) -> &C {
        &self.components
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Time of the last update that received a non-empty batch
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn into_parts(self) -> (S, C) {
        (self.source, self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::component::{AnyComponent, Button, Component, Joystick, Trigger};
    use crate::controller::event::{EventKind, InputEvent};
    use crate::source::ScriptedSource;

    fn generic_pad(source: ScriptedSource) -> Controller<ScriptedSource, Vec<AnyComponent>> {
        Controller::new(
            source,
            vec![
                Joystick::new("ABS_").into(),
                Trigger::new("ABS_Z").into(),
                Button::new("BTN_SOUTH").into(),
            ],
        )
    }

    #[test]
    fn structural_events_reach_no_component() {
        // Codes chosen so that a delivered event would change state
        let source = ScriptedSource::from_batches([vec![
            InputEvent::new(EventKind::Sync, "BTN_SOUTH", 1),
            InputEvent::new(EventKind::Misc, "ABS_Z", 99),
            InputEvent::new(EventKind::Sync, "ABS_X", 12),
        ]]);
        let mut pad = generic_pad(source);
        let before = pad.components().clone();

        assert_eq!(pad.update().unwrap(), 0);
        assert_eq!(pad.components(), &before);
        assert!(pad.last_update().is_some());
    }

    #[test]
    fn other_events_reach_every_component() {
        let source = ScriptedSource::from_batches([vec![
            InputEvent::key("BTN_SOUTH", 1),
            InputEvent::sync(),
            InputEvent::absolute("ABS_Z", 17),
            InputEvent::new(EventKind::Relative, "ABS_Y", 3),
        ]]);
        let mut pad = generic_pad(source);

        assert_eq!(pad.update().unwrap(), 3);
        let components = pad.components();
        assert!(matches!(&components[0], AnyComponent::Joystick(j) if j.raw_y() == 3));
        assert!(matches!(&components[1], AnyComponent::Trigger(t) if t.raw() == 17));
        assert!(matches!(&components[2], AnyComponent::Button(b) if b.pressed()));
    }

    #[test]
    fn other_category_events_are_dispatched() {
        let source = ScriptedSource::from_batches([vec![
            InputEvent::new(EventKind::Other, "BTN_SOUTH", 1),
            InputEvent::new(EventKind::Other, "ABS_X", 64),
        ]]);
        let mut pad = generic_pad(source);

        assert_eq!(pad.update().unwrap(), 2);
        let components = pad.components();
        assert!(matches!(&components[0], AnyComponent::Joystick(j) if j.raw_x() == 64));
        assert!(matches!(&components[2], AnyComponent::Button(b) if b.pressed()));
    }

    #[test]
    fn empty_batch_leaves_state_untouched() {
        let mut pad = generic_pad(ScriptedSource::new());
        assert_eq!(pad.update().unwrap(), 0);
        assert!(pad.last_update().is_none());
    }

    #[test]
    fn later_events_in_batch_win() {
        let source = ScriptedSource::from_batches([vec![
            InputEvent::key("BTN_SOUTH", 1),
            InputEvent::key("BTN_SOUTH", 0),
            InputEvent::absolute("ABS_Z", 40),
            InputEvent::absolute("ABS_Z", 41),
        ]]);
        let mut pad = generic_pad(source);
        pad.update().unwrap();

        let components = pad.components();
        assert!(matches!(&components[1], AnyComponent::Trigger(t) if t.raw() == 41));
        assert!(matches!(&components[2], AnyComponent::Button(b) if !b.pressed()));
    }

    #[test]
    fn source_failure_propagates_and_keeps_state() {
        let mut source = ScriptedSource::from_batches([vec![InputEvent::absolute("ABS_Z", 80)]]);
        source.fail_with(SourceError::ReadError("io".into()));
        let mut pad = generic_pad(source);

        pad.update().unwrap();
        let err = pad.update().unwrap_err();
        assert!(matches!(err, ControllerError::Source(SourceError::ReadError(_))));

        let (_, components) = pad.into_parts();
        assert_eq!(components[1].code(), "ABS_Z");
        assert!(matches!(&components[1], AnyComponent::Trigger(t) if t.raw() == 80));
    }
}
