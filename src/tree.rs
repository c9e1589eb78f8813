//! The task tree.
//!
//! Concurrency here is fork-join shaped, so the "call stack" is not a
//! linear stack but a tree of in-flight invocations — and because every
//! composite operation has at most two operands, the tree is binary and
//! can live in heap layout: slot 0 is the root, slot `i`'s children are
//! `2i + 1` and `2i + 2`. Child addressing is O(1) index arithmetic and
//! every slot is owned by exactly one call site of the program, which is
//! what makes lazy one-time frame allocation sound.
//!
//! Frames are created the first time a pass touches their slot and are
//! retained — including after completion, so "done?" stays answerable —
//! until the whole driver is torn down.

use crate::error::Error;
use crate::frame::Frame;

/// Default tree depth: `2^5 − 1` = 31 slots per driver.
pub const MAX_DEPTH: u16 = 5;

/// A position in the task tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct SlotId(pub(crate) u16);

impl SlotId {
    /// The root slot.
    pub const ROOT: Self = Self(0);

    /// The `n`-th child slot (`n` is 1 or 2).
    #[must_use]
    pub const fn child(self, n: u16) -> Self {
        Self(self.0 * 2 + n)
    }

    /// The parent slot; the root is its own parent.
    #[must_use]
    pub const fn parent(self) -> Self {
        if self.0 == 0 {
            Self(0)
        } else {
            Self((self.0 - 1) / 2)
        }
    }

    /// The raw slot index.
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Slot-addressed frame store for one driver.
///
/// Single-writer by construction: the scheduler is single-threaded and
/// each driver owns its tree exclusively.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Option<Box<Frame>>>,
    depth: u16,
}

impl Tree {
    /// Creates an empty tree of the given depth (`2^depth − 1` slots).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero or large enough that the slot count
    /// would not fit the `u16` slot index space.
    #[must_use]
    pub fn new(depth: u16) -> Self {
        assert!(
            depth >= 1 && depth <= 15,
            "tree depth must be between 1 and 15, got {depth}"
        );
        let capacity = (1usize << depth) - 1;
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, depth }
    }

    /// The number of slots in this tree.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The configured depth.
    #[must_use]
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    fn index(&self, slot: SlotId) -> usize {
        let i = slot.0 as usize;
        if i >= self.slots.len() {
            panic!("{}", Error::depth_overflow(slot.0, self.depth));
        }
        i
    }

    /// Obtain-or-create the frame at `slot`, sizing fresh frames by `L`.
    ///
    /// An existing frame is reused as-is; the caller's prologue decides
    /// whether its locals need re-initializing or replacing.
    pub(crate) fn ensure<L: Default + 'static>(&mut self, slot: SlotId) -> &mut Frame {
        let i = self.index(slot);
        self.slots[i].get_or_insert_with(|| Box::new(Frame::new(Box::<L>::default())))
    }

    /// Rewinds the frame at `slot` for a fresh invocation, if one exists.
    ///
    /// The frame itself is retained; a slot never touched yet needs no
    /// rewinding (its first frame starts fresh anyway).
    pub(crate) fn rewind(&mut self, slot: SlotId) {
        let i = self.index(slot);
        if let Some(frame) = self.slots[i].as_deref_mut() {
            frame.rewind();
        }
    }

    /// The frame at `slot`, if the slot has ever been touched.
    #[must_use]
    pub fn get(&self, slot: SlotId) -> Option<&Frame> {
        self.slots.get(slot.0 as usize)?.as_deref()
    }

    pub(crate) fn get_mut(&mut self, slot: SlotId) -> Option<&mut Frame> {
        self.slots.get_mut(slot.0 as usize)?.as_deref_mut()
    }

    /// The frame at `slot`; the slot must be live.
    pub(crate) fn frame_mut(&mut self, slot: SlotId) -> &mut Frame {
        self.get_mut(slot)
            .expect("frame accessed before its task was entered")
    }

    /// How many slots currently hold a frame.
    #[must_use]
    pub fn live_frames(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
