//! Race a pair of subtasks and branch on the winner.

use crate::cx::Cx;
use crate::scope::{Gate, Scope};
use crate::status::{Status, Step, Suspend};

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Runs two subtasks concurrently until *either* finishes, then
    /// runs the branch for the winner.
    ///
    /// Both operands are evaluated each pass, first operand first. The
    /// pass in which one finishes decides the outcome and latches it:
    /// if both finish on the same pass the first operand wins. The
    /// loser stops being evaluated, keeping its frame and resume token
    /// as they were (no cleanup runs).
    ///
    /// The branch closures are full task-body code and may suspend.
    /// They run inside this task's own frame, which holds a single
    /// decision latch per branching site on the live path — deeply
    /// branch-heavy bodies should push inner decisions into their own
    /// task via [`call`](Scope::call).
    pub fn race<F, G, W1, W2>(&mut self, mut f: F, mut g: G, first_won: W1, second_won: W2) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
        G: FnMut(&mut Cx<'_>) -> Status,
        W1: FnOnce(&mut Self) -> Step,
        W2: FnOnce(&mut Self) -> Step,
    {
        let (token, gate) = self.gate(2);
        let ordinal = self.route_slot();
        if gate == Gate::Enter {
            self.rewind_child(1);
            self.rewind_child(2);
        }
        if gate != Gate::Skip {
            let first = self.eval_child(1, &mut f);
            let second = self.eval_child(2, &mut g);
            if first.not_done() && second.not_done() {
                return Err(Suspend::Cont);
            }
            let first_finished = first.is_done();
            let frame = self.frame();
            frame.cond = first_finished;
            frame.set_route(ordinal, first_finished);
            frame.pc = token + 1;
        }
        if self.frame().route(ordinal) {
            first_won(self)
        } else {
            second_won(self)
        }
    }
}
