//! Task status and suspension plumbing.
//!
//! Every task evaluation reports one of four states back to its caller.
//! `Done` and the two suspension states (`Cont`, `Yield`) are the normal
//! return values of the scheduler; they are not errors and nothing
//! propagates across a suspension point except the status itself.

use core::fmt;

/// The result of evaluating a task for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Status {
    /// Uninitialized/default. Never reported by a well-formed task.
    #[default]
    None,
    /// The task completed normally and should not be re-entered.
    Done,
    /// The task suspended and wants to be resumed on a later pass.
    Cont,
    /// The task handed control to its coroutine peer; it resumes where
    /// it left off once the turn comes back.
    Yield,
}

impl Status {
    /// Returns true if the task has completed.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the task suspended without yielding to a peer.
    #[must_use]
    pub const fn is_cont(self) -> bool {
        matches!(self, Self::Cont)
    }

    /// Returns true if the task yielded to its coroutine peer.
    #[must_use]
    pub const fn is_yield(self) -> bool {
        matches!(self, Self::Yield)
    }

    /// Returns true for anything except `Done`.
    ///
    /// Composite operations treat a yield that bubbles out of a task
    /// with no live coroutine pair as an ordinary suspension, so "not
    /// done" is the predicate they branch on.
    #[must_use]
    pub const fn not_done(self) -> bool {
        !self.is_done()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Done => write!(f, "done"),
            Self::Cont => write!(f, "cont"),
            Self::Yield => write!(f, "yield"),
        }
    }
}

/// Why a task body stopped short of its epilogue on this pass.
///
/// Suspension points inside a task body produce `Err(Suspend::…)`, and
/// the `?` operator carries it to the task epilogue, which maps it onto
/// the corresponding [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspend {
    /// Suspend; resume on a later pass.
    Cont,
    /// Yield the turn to the coroutine peer.
    Yield,
}

/// The per-step result type used inside task bodies.
///
/// `Ok(())` means the step has completed (or was already complete) and
/// execution falls through to the next step.
pub type Step = Result<(), Suspend>;

impl From<Suspend> for Status {
    fn from(s: Suspend) -> Self {
        match s {
            Suspend::Cont => Self::Cont,
            Suspend::Yield => Self::Yield,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_none() {
        assert_eq!(Status::default(), Status::None);
    }

    #[test]
    fn predicates() {
        assert!(Status::Done.is_done());
        assert!(!Status::Done.not_done());
        assert!(Status::Cont.is_cont());
        assert!(Status::Cont.not_done());
        assert!(Status::Yield.is_yield());
        assert!(Status::Yield.not_done());
        assert!(Status::None.not_done());
    }

    #[test]
    fn suspend_maps_to_status() {
        assert_eq!(Status::from(Suspend::Cont), Status::Cont);
        assert_eq!(Status::from(Suspend::Yield), Status::Yield);
    }

    #[test]
    fn display() {
        assert_eq!(Status::Done.to_string(), "done");
        assert_eq!(Status::Yield.to_string(), "yield");
    }
}
