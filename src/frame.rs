//! Activation records.
//!
//! Each live task owns one [`Frame`]: the resume token, the deadline it
//! may be parked on, a one-slot scalar mailbox, a decision latch, and
//! the task's own persistent locals. The frame survives every
//! suspension of the task and is only re-initialized when a parent
//! operation starts a fresh invocation of the slot.

use std::any::Any;

use crate::error::Error;

/// Per-invocation persistent state for one task slot.
pub struct Frame {
    /// Resume token. `0` means a fresh invocation; [`Frame::FINALLY`]
    /// marks a completed one. Between the two it names the suspension
    /// point where execution picks up.
    pub(crate) pc: u16,
    /// Absolute deadline in milliseconds. Meaningful only while a
    /// deadline operation has the task parked; indeterminate otherwise.
    pub(crate) wait: u32,
    /// Scalar mailbox: written by a child's yield, read by the peer.
    pub(crate) val: i32,
    /// Decision latch for operations that must remember a choice made
    /// on an earlier pass (race winner, whose turn in an alternation).
    pub(crate) cond: bool,
    /// Routing latches for the replay dispatcher: one bit per resolved
    /// branching operation on the live path, indexed by arrival order.
    pub(crate) routes: u16,
    /// The task's persistent locals, typed by the task itself.
    pub(crate) locals: Box<dyn Any>,
}

impl Frame {
    /// Resume-token sentinel for a completed task.
    ///
    /// Re-entering a frame whose token is `FINALLY` falls straight
    /// through to the epilogue and reports completion again.
    pub const FINALLY: u16 = u16::MAX;

    /// How many branching operations may resolve along one live path
    /// through a task body (one routing bit each).
    pub(crate) const ROUTE_LIMIT: u16 = 16;

    pub(crate) fn new(locals: Box<dyn Any>) -> Self {
        Self {
            pc: 0,
            wait: 0,
            val: 0,
            cond: false,
            routes: 0,
            locals,
        }
    }

    /// The current resume token.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns true if this invocation has completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.pc == Self::FINALLY
    }

    /// Rewinds the frame for a fresh invocation.
    ///
    /// Only the resume token is touched: deadlines, the mailbox, and
    /// the latches are written by whichever operation needs them before
    /// they are read, and locals are re-initialized by the task's own
    /// prologue on its next entry (where their type is known).
    pub(crate) fn rewind(&mut self) {
        self.pc = 0;
    }

    /// Typed access to the locals, panicking deterministically if the
    /// frame holds a different type mid-invocation.
    pub(crate) fn locals_mut<L: 'static>(&mut self, slot: u16) -> &mut L {
        self.locals
            .downcast_mut::<L>()
            .unwrap_or_else(|| panic!("{}", Error::locals_mismatch(slot)))
    }

    pub(crate) fn locals_ref<L: 'static>(&self, slot: u16) -> &L {
        self.locals
            .downcast_ref::<L>()
            .unwrap_or_else(|| panic!("{}", Error::locals_mismatch(slot)))
    }

    /// Reads the routing latch for branch site `ordinal`.
    pub(crate) fn route(&self, ordinal: u16) -> bool {
        self.routes & (1u16 << ordinal) != 0
    }

    /// Records the routing latch for branch site `ordinal`.
    pub(crate) fn set_route(&mut self, ordinal: u16, taken_first: bool) {
        if taken_first {
            self.routes |= 1u16 << ordinal;
        } else {
            self.routes &= !(1u16 << ordinal);
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("pc", &self.pc)
            .field("wait", &self.wait)
            .field("val", &self.val)
            .field("cond", &self.cond)
            .finish_non_exhaustive()
    }
}
