//! Task bodies: prologue, epilogue, and the replay dispatcher.
//!
//! A task is an ordinary function over [`Cx`] whose body runs inside a
//! [`Scope`]. The scope turns the body into a resumable state machine
//! without rewriting it: every suspension-capable step claims a resume
//! token from a counter that advances in textual order, and the frame's
//! `pc` remembers which token the task is parked on.
//!
//! On re-entry the body is executed in *replay* mode: steps whose token
//! is below `pc` answer "already done" in O(1) and run no user code;
//! the step whose token equals `pc` takes over ("live"), and everything
//! after it executes normally. Branching steps latch which side they
//! took so a replay descends the same arm it ran. The effect is the
//! classic protothread dispatch — jump to the label, skip everything
//! before it — expressed with plain closures instead of a `switch`.
//!
//! Two rules follow for task authors:
//!
//! - Side effects between suspension points go through [`Scope::run`],
//!   which executes them exactly once. Code written directly in the
//!   body re-runs on every pass and must stay pure.
//! - Within one task body, steps must be reached in a stable order: the
//!   dispatcher identifies steps positionally, so `if`-ing a suspension
//!   point on data that changes between passes is a bug. Branch with
//!   the provided operations (`race`, `timeout`) instead.

use std::marker::PhantomData;

use crate::cx::Cx;
use crate::frame::Frame;
use crate::status::{Status, Step, Suspend};
use crate::trace::TraceKind;
use crate::tree::SlotId;

/// Evaluates a task body at the cursor slot.
///
/// `L` is the task's persistent-locals type; it is default-initialized
/// at the start of each fresh invocation and lives in the task's frame
/// across suspensions. Use `()` for tasks with no locals.
pub fn task<L, F>(cx: &mut Cx<'_>, body: F) -> Status
where
    L: Default + 'static,
    F: FnOnce(&mut Scope<'_, '_, L>) -> Step,
{
    task_named(cx, "", body)
}

/// Same as [`task`], with a name that shows up in trace events.
pub fn task_named<L, F>(cx: &mut Cx<'_>, name: &'static str, body: F) -> Status
where
    L: Default + 'static,
    F: FnOnce(&mut Scope<'_, '_, L>) -> Step,
{
    let slot = cx.cursor;
    let frame = cx.tree.ensure::<L>(slot);
    if frame.is_done() {
        // Idempotent completion: a finished invocation reports `Done`
        // on every subsequent pass and does nothing else.
        return Status::Done;
    }

    let fresh = frame.pc == 0;
    if fresh {
        // A rewound slot may now be occupied by a different call site,
        // so the locals are re-initialized in place when the type still
        // matches and replaced when it does not.
        match frame.locals.downcast_mut::<L>() {
            Some(locals) => *locals = L::default(),
            None => frame.locals = Box::<L>::default(),
        }
        cx.record(slot, 0, name, TraceKind::Enter);
    }

    let mut scope = Scope {
        cx,
        slot,
        name,
        counter: 1,
        route_counter: 0,
        live: fresh,
        _locals: PhantomData,
    };
    match body(&mut scope) {
        Ok(()) => {
            debug_assert!(
                scope.live,
                "task '{name}' fell through without reaching its resume token"
            );
            scope.cx.tree.frame_mut(slot).pc = Frame::FINALLY;
            scope.cx.record(slot, Frame::FINALLY, name, TraceKind::Complete);
            Status::Done
        }
        Err(suspend) => Status::from(suspend),
    }
}

/// How a step site relates to the frame's resume token on this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Execution arrived here for the first time this invocation.
    Enter,
    /// This is the parked site the dispatcher is resuming.
    Resume,
    /// The site already completed on an earlier pass.
    Skip,
}

/// The body of one task invocation.
///
/// A `Scope` is handed to the task body and carries the dispatcher
/// state for this pass plus access to the frame, the tree, and the
/// clock. All suspension-capable operations are methods on it and
/// return [`Step`], so `?` propagates a suspension to the epilogue.
pub struct Scope<'c, 'x, L> {
    pub(crate) cx: &'c mut Cx<'x>,
    pub(crate) slot: SlotId,
    pub(crate) name: &'static str,
    counter: u16,
    route_counter: u16,
    pub(crate) live: bool,
    _locals: PhantomData<fn() -> L>,
}

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// The current time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u32 {
        self.cx.clock.now()
    }

    /// The slot this task occupies.
    #[must_use]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// The task name given to [`task_named`], `""` otherwise.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn frame(&mut self) -> &mut Frame {
        self.cx.tree.frame_mut(self.slot)
    }

    /// Claims `width` consecutive resume tokens for a step site and
    /// reports how the dispatcher got here.
    pub(crate) fn gate(&mut self, width: u16) -> (u16, Gate) {
        let token = self.counter;
        self.counter += width;
        if self.live {
            self.frame().pc = token;
            (token, Gate::Enter)
        } else if self.frame().pc == token {
            self.live = true;
            (token, Gate::Resume)
        } else {
            (token, Gate::Skip)
        }
    }

    /// Claims a routing latch for a branching step site.
    pub(crate) fn route_slot(&mut self) -> u16 {
        let ordinal = self.route_counter;
        assert!(
            ordinal < Frame::ROUTE_LIMIT,
            "too many branching steps on one path through task '{}'; \
             move the inner branches into their own task",
            self.name
        );
        self.route_counter += 1;
        ordinal
    }

    pub(crate) fn eval_child<F>(&mut self, n: u16, f: &mut F) -> Status
    where
        F: FnMut(&mut Cx<'_>) -> Status,
    {
        let child = self.slot.child(n);
        self.cx.eval(child, f)
    }

    pub(crate) fn rewind_child(&mut self, n: u16) {
        let child = self.slot.child(n);
        self.cx.tree.rewind(child);
        let name = self.name;
        self.cx.record(child, 0, name, TraceKind::Rewind);
    }

    pub(crate) fn record(&mut self, token: u16, kind: TraceKind) {
        let (slot, name) = (self.slot, self.name);
        self.cx.record(slot, token, name, kind);
    }

    /// Reads the locals without touching dispatcher state.
    ///
    /// Safe to use in straight-line body code: it is a pure read, so
    /// re-running it on replay passes is harmless. Effectful work
    /// belongs in [`Scope::run`].
    pub fn peek<R>(&self, read: impl FnOnce(&L) -> R) -> R {
        let frame = self
            .cx
            .tree
            .get(self.slot)
            .expect("frame accessed before its task was entered");
        read(frame.locals_ref::<L>(self.slot.index()))
    }

    /// Executes a side-effecting transition exactly once.
    ///
    /// The effect runs on the pass in which execution first reaches
    /// this site and is skipped on every replay afterwards. It receives
    /// the task's persistent locals.
    pub fn run(&mut self, effect: impl FnOnce(&mut L)) -> Step {
        let (_token, gate) = self.gate(1);
        if gate == Gate::Enter {
            let slot = self.slot.index();
            let frame = self.frame();
            effect(frame.locals_mut::<L>(slot));
        }
        Ok(())
    }

    /// Terminates the task early.
    ///
    /// The frame is marked complete immediately, but the caller still
    /// observes a suspension on this pass; completion is reported on
    /// the next entry, which falls straight through to the epilogue.
    pub fn finish(&mut self) -> Step {
        if !self.live {
            return Ok(());
        }
        self.frame().pc = Frame::FINALLY;
        Err(Suspend::Cont)
    }

    /// Loops the body forever, restarting it within the same pass each
    /// time it completes an iteration.
    ///
    /// The body must contain at least one suspension point, otherwise
    /// the pass never returns to the host. The loop only ends when a
    /// suspension unwinds out of it or the task is terminated with
    /// [`Scope::finish`] (or abandoned by a parent).
    pub fn forever(&mut self, mut body: impl FnMut(&mut Self) -> Step) -> Step {
        let tokens = self.counter;
        let routes = self.route_counter;
        loop {
            body(self)?;
            self.counter = tokens;
            self.route_counter = routes;
        }
    }
}

impl<L> std::fmt::Debug for Scope<'_, '_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("slot", &self.slot)
            .field("name", &self.name)
            .field("counter", &self.counter)
            .field("live", &self.live)
            .finish()
    }
}
