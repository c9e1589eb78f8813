//! Sequential subtask invocation.

use crate::cx::Cx;
use crate::scope::{Gate, Scope};
use crate::status::{Status, Step, Suspend};

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Runs a subtask to completion before continuing.
    ///
    /// The child slot is rewound when execution first reaches this
    /// site, then the subtask is evaluated once per pass until it
    /// reports done. A yield escaping the subtask is treated as an
    /// ordinary suspension here; only a live [`alternate`] gives yields
    /// meaning.
    ///
    /// [`alternate`]: Scope::alternate
    pub fn call<F>(&mut self, mut f: F) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
    {
        let (_token, gate) = self.gate(1);
        match gate {
            Gate::Enter => self.rewind_child(1),
            Gate::Resume => {}
            Gate::Skip => return Ok(()),
        }
        if self.eval_child(1, &mut f).is_done() {
            Ok(())
        } else {
            Err(Suspend::Cont)
        }
    }
}
