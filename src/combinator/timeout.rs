//! Bound a subtask with a deadline.

use crate::clock::deadline_reached;
use crate::cx::Cx;
use crate::scope::{Gate, Scope};
use crate::status::{Status, Step, Suspend};
use crate::trace::TraceKind;

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Runs a subtask with a deadline; the branch runs if the deadline
    /// fires first.
    ///
    /// The deadline is computed once, on first arrival, and never
    /// adjusted. Each pass evaluates the subtask and then consults the
    /// clock, so a subtask that finishes on the very pass the deadline
    /// expires counts as finished in time. On expiry the subtask is
    /// abandoned in place (frame and resume token retained, no cleanup)
    /// and `expired` runs — a natural place for the call site to handle
    /// the timeout. Nothing runs on the success path.
    pub fn timeout<F, E>(&mut self, ms: u32, mut f: F, expired: E) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
        E: FnOnce(&mut Self) -> Step,
    {
        let (token, gate) = self.gate(2);
        let ordinal = self.route_slot();
        if gate == Gate::Enter {
            let deadline = self.now().wrapping_add(ms);
            self.frame().wait = deadline;
            self.rewind_child(1);
            self.record(token, TraceKind::Park);
        }
        if gate != Gate::Skip {
            let status = self.eval_child(1, &mut f);
            let deadline = self.frame().wait;
            if status.not_done() && !deadline_reached(self.now(), deadline) {
                return Err(Suspend::Cont);
            }
            let in_time = status.is_done();
            let frame = self.frame();
            frame.cond = in_time;
            frame.set_route(ordinal, in_time);
            frame.pc = token + 1;
        }
        if self.frame().route(ordinal) {
            Ok(())
        } else {
            expired(self)
        }
    }
}
