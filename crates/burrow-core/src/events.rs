//! Colony events for outside listeners (audio, UI flashes, telemetry).
//!
//! The engine emits a [`ColonyEvent`] from the same call sites that
//! mutate state. Emission is fire-and-forget: sinks return nothing and the
//! simulation never waits on them.

use serde::{Deserialize, Serialize};

/// Discrete things that happened in the colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColonyEvent {
    /// A mining task finished.
    Mine,
    /// A chopping task finished.
    Chop,
    /// A construction finished.
    Build,
    /// A colonist ate.
    Eat,
    /// A colonist lay down to sleep.
    Sleep,
    /// Something bad happened, such as a death.
    Alert,
    /// The player designated tiles or queued work.
    Select,
    /// Any task finished.
    TaskComplete,
}

impl ColonyEvent {
    pub fn name(self) -> &'static str {
        match self {
            ColonyEvent::Mine => "mine",
            ColonyEvent::Chop => "chop",
            ColonyEvent::Build => "build",
            ColonyEvent::Eat => "eat",
            ColonyEvent::Sleep => "sleep",
            ColonyEvent::Alert => "alert",
            ColonyEvent::Select => "select",
            ColonyEvent::TaskComplete => "taskComplete",
        }
    }
}

/// Receiver of colony events.
pub trait EventSink {
    fn emit(&mut self, event: ColonyEvent);
}

impl<F: FnMut(ColonyEvent)> EventSink for F {
    fn emit(&mut self, event: ColonyEvent) {
        self(event)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: ColonyEvent) {}
}
