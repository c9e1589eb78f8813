//! Coroutine pairs and the scalar channel between them.

use crate::cx::Cx;
use crate::scope::{Gate, Scope};
use crate::status::{Status, Step, Suspend};
use crate::trace::TraceKind;

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Runs two subtasks as a coroutine pair, starting with the first.
    ///
    /// Exactly one side runs per pass. While the running side merely
    /// suspends, its turn continues on the next pass; when it yields
    /// with [`yield_to_peer`](Scope::yield_to_peer), the turn flips and
    /// the peer runs next. The alternation ends as soon as either side
    /// completes, leaving the other wherever it stands.
    pub fn alternate<F, G>(&mut self, mut f: F, mut g: G) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
        G: FnMut(&mut Cx<'_>) -> Status,
    {
        let (_token, gate) = self.gate(1);
        match gate {
            Gate::Enter => {
                self.rewind_child(1);
                self.rewind_child(2);
                self.frame().cond = true;
            }
            Gate::Resume => {}
            Gate::Skip => return Ok(()),
        }
        let first_turn = self.frame().cond;
        let status = if first_turn {
            self.eval_child(1, &mut f)
        } else {
            self.eval_child(2, &mut g)
        };
        match status {
            Status::Done => Ok(()),
            Status::Yield => {
                self.frame().cond = !first_turn;
                Err(Suspend::Cont)
            }
            Status::Cont | Status::None => Err(Suspend::Cont),
        }
    }

    /// Hands the turn to the coroutine peer, leaving `value` in the
    /// shared mailbox for it to pick up.
    ///
    /// Meaningful only inside a task run by [`alternate`](Scope::alternate);
    /// anywhere else the yield is coerced into an ordinary suspension
    /// by the enclosing operation and the mailbox write is inert.
    /// Execution falls through here when the turn comes back.
    pub fn yield_to_peer(&mut self, value: i32) -> Step {
        let (token, gate) = self.gate(1);
        match gate {
            Gate::Enter => {
                let parent = self.slot.parent();
                if let Some(frame) = self.cx.tree.get_mut(parent) {
                    frame.val = value;
                }
                self.record(token, TraceKind::Yield);
                Err(Suspend::Yield)
            }
            Gate::Resume | Gate::Skip => Ok(()),
        }
    }

    /// Reads the scalar most recently yielded by the coroutine peer.
    ///
    /// The mailbox lives in the parent frame shared by the two peers;
    /// the value deposited by one side's yield is observable here once
    /// the other side resumes, and a fresh yield overwrites it.
    #[must_use]
    pub fn peer_value(&self) -> i32 {
        self.cx
            .tree
            .get(self.slot.parent())
            .map_or(0, |frame| frame.val)
    }
}
