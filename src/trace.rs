//! Step-level tracing.
//!
//! An optional debug sink for watching a driver work: each recorded
//! event names the slot, the resume token, and the task that produced
//! it, stamped with the clock. The buffer is a bounded ring so a
//! long-running host cannot grow it; once full, the oldest events are
//! dropped and counted.
//!
//! Recording is off unless the `trace` cargo feature is enabled *and* a
//! buffer is attached to the driver; without the feature the recording
//! paths compile to nothing.

use std::collections::VecDeque;

use crate::tree::SlotId;

/// What happened at a traced step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// A fresh invocation entered a task body.
    Enter,
    /// A task parked on a deadline.
    Park,
    /// A task yielded the turn to its coroutine peer.
    Yield,
    /// A task reached its epilogue.
    Complete,
    /// A parent rewound a child slot for a fresh invocation.
    Rewind,
}

/// One recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TraceEvent {
    /// Clock reading when the event was recorded, in milliseconds.
    pub at: u32,
    /// The slot the event belongs to.
    pub slot: SlotId,
    /// The resume token in effect at the event.
    pub token: u16,
    /// The task name, or `""` for unnamed tasks.
    pub task: &'static str,
    /// What happened.
    pub kind: TraceKind,
}

/// A bounded ring of [`TraceEvent`]s.
#[derive(Debug)]
pub struct TraceBuffer {
    events: VecDeque<TraceEvent>,
    capacity: usize,
    dropped: u64,
}

impl TraceBuffer {
    /// Creates a buffer holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Records an event, dropping the oldest one when full.
    pub fn push(&mut self, event: TraceEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// The number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// How many events were discarded to respect the capacity.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Iterates retained events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    /// Serializes the retained events as NDJSON, one event per line.
    ///
    /// Handy as a test artifact: a failed scenario can dump its trace
    /// next to the assertion message.
    #[cfg(feature = "trace")]
    #[must_use]
    pub fn to_ndjson(&self) -> String {
        use std::fmt::Write as _;
        let mut out = String::new();
        for event in &self.events {
            let line = serde_json::to_string(event).expect("trace event serializes");
            let _ = writeln!(out, "{line}");
        }
        out
    }
}
