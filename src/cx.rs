//! The per-pass evaluation context.
//!
//! `Cx` bundles everything one pass over a driver's tree needs: the
//! tree itself, the host clock, and the cursor naming the slot whose
//! task is currently being evaluated. The cursor replaces the global
//! "current task" register of a classic protothread runtime with an
//! explicit parameter — every composite operation points it at a child
//! before evaluating it and restores it afterwards, so on entry to any
//! task the cursor equals that task's own slot.

use crate::clock::Clock;
use crate::status::Status;
#[cfg(feature = "trace")]
use crate::trace::TraceBuffer;
#[cfg(feature = "trace")]
use crate::trace::{TraceEvent, TraceKind};
#[cfg(not(feature = "trace"))]
use crate::trace::TraceKind;
use crate::tree::{SlotId, Tree};

/// Evaluation context handed to every task for one pass.
pub struct Cx<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) cursor: SlotId,
    #[cfg(feature = "trace")]
    pub(crate) trace: Option<&'a mut TraceBuffer>,
}

impl Cx<'_> {
    /// The current time in milliseconds, straight from the host clock.
    #[must_use]
    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    /// The slot of the task currently being evaluated.
    #[must_use]
    pub fn cursor(&self) -> SlotId {
        self.cursor
    }

    /// Read-only view of the tree, for introspection and assertions.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Evaluates a task expression with the cursor pointed at `slot`.
    ///
    /// The cursor is restored afterwards; nested operations will have
    /// moved it, so the caller must not rely on it across this call.
    pub(crate) fn eval<F>(&mut self, slot: SlotId, f: &mut F) -> Status
    where
        F: FnMut(&mut Cx<'_>) -> Status,
    {
        let saved = self.cursor;
        self.cursor = slot;
        let status = f(self);
        self.cursor = saved;
        status
    }

    #[cfg(feature = "trace")]
    pub(crate) fn record(&mut self, slot: SlotId, token: u16, task: &'static str, kind: TraceKind) {
        if let Some(buf) = self.trace.as_deref_mut() {
            let at = self.clock.now();
            buf.push(TraceEvent {
                at,
                slot,
                token,
                task,
                kind,
            });
        }
    }

    #[cfg(not(feature = "trace"))]
    #[inline(always)]
    pub(crate) fn record(&mut self, _slot: SlotId, _token: u16, _task: &'static str, _kind: TraceKind) {
    }
}

impl std::fmt::Debug for Cx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cx")
            .field("cursor", &self.cursor)
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}
