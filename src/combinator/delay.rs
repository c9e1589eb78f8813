//! Time and predicate suspensions.

use crate::clock::deadline_reached;
use crate::scope::{Gate, Scope};
use crate::status::{Step, Suspend};
use crate::trace::TraceKind;

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Parks the task for `ms` milliseconds.
    ///
    /// The deadline is computed once, when execution first reaches this
    /// site; later passes only compare the clock against it. A zero
    /// delay still suspends for one pass, so the host always gets at
    /// least one yield out of a delay.
    pub fn delay(&mut self, ms: u32) -> Step {
        let (token, gate) = self.gate(1);
        match gate {
            Gate::Enter => {
                let deadline = self.now().wrapping_add(ms);
                self.frame().wait = deadline;
                self.record(token, TraceKind::Park);
                Err(Suspend::Cont)
            }
            Gate::Resume => {
                let deadline = self.frame().wait;
                if deadline_reached(self.now(), deadline) {
                    Ok(())
                } else {
                    Err(Suspend::Cont)
                }
            }
            Gate::Skip => Ok(()),
        }
    }

    /// Suspends until `pred` holds.
    ///
    /// The predicate is re-evaluated on every pass while the task is
    /// parked here, so it must be pure: it reads the task's locals (and
    /// whatever it captures) and decides, nothing more. If it already
    /// holds on arrival, execution falls through without suspending.
    pub fn wait_until(&mut self, pred: impl Fn(&L) -> bool) -> Step {
        let (_token, gate) = self.gate(1);
        match gate {
            Gate::Enter | Gate::Resume => {
                if self.peek(|locals| pred(locals)) {
                    Ok(())
                } else {
                    Err(Suspend::Cont)
                }
            }
            Gate::Skip => Ok(()),
        }
    }
}
