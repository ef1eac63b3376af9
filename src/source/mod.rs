//! Device event sources
//!
//! A source hands out decoded [`InputEvent`]s in finite batches. Device discovery,
//! polling and decoding happen behind this boundary:
//!
//! - [`gilrs_source`] - live gamepads through gilrs
//! - [`ScriptedSource`] - pre-recorded batches for tests and demos

pub mod gilrs_source;

use crate::controller::event::InputEvent;
use std::collections::VecDeque;
use tracing::debug;

pub use gilrs_source::{GilrsSettings, GilrsSource, Initializing, Reading};

// Source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to initialize event source: {0}")]
    InitializationError(String),

    #[error("No gamepad connected: {0}")]
    NoGamepadError(String),

    #[error("Device disconnected: {0}")]
    Disconnected(String),

    #[error("Failed to read events: {0}")]
    ReadError(String),
}

/// Supplier of raw device events.
pub trait EventSource {
    /// Returns every event currently available. An empty batch means nothing
    /// happened since the last call. Errors are fatal for the device.
    fn read(&mut self) -> Result<Vec<InputEvent>, SourceError>;
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn read(&mut self) -> Result<Vec<InputEvent>, SourceError> {
        (**self).read()
    }
}

/// Replays queued batches, one per `read`.
///
/// Once the queue is drained it yields empty batches, or the terminal error
/// if one was set with [`ScriptedSource::fail_with`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    batches: VecDeque<Vec<InputEvent>>,
    failure: Option<SourceError>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_batches(batches: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
            failure: None,
        }
    }

    pub fn push_batch(&mut self, batch: Vec<InputEvent>) {
        self.batches.push_back(batch);
    }

    pub fn fail_with(&mut self, error: SourceError) {
        self.failure = Some(error);
    }

    pub fn pending(&self) -> usize {
        self.batches.len()
    }
}

impl EventSource for ScriptedSource {
    fn read(&mut self) -> Result<Vec<InputEvent>, SourceError> {
        if let Some(batch) = self.batches.pop_front() {
            debug!("Replaying scripted batch of {} events", batch.len());
            return Ok(batch);
        }

        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(Vec::new()),
        }
    }
}
