//! The composition algebra.
//!
//! Tasks compose through a fixed set of operations, all methods on
//! [`Scope`](crate::scope::Scope):
//!
//! - [`delay`](crate::scope::Scope::delay): park until a deadline
//! - [`wait_until`](crate::scope::Scope::wait_until): poll a pure predicate
//! - [`call`](crate::scope::Scope::call): run a subtask to completion
//! - [`join`](crate::scope::Scope::join): run two subtasks until *both* finish
//! - [`until`](crate::scope::Scope::until): run the second while the first runs
//! - [`race`](crate::scope::Scope::race): run two, branch on who finished first
//! - [`timeout`](crate::scope::Scope::timeout): bound a subtask, branch on expiry
//! - [`alternate`](crate::scope::Scope::alternate): a coroutine pair, plus
//!   [`yield_to_peer`](crate::scope::Scope::yield_to_peer) and
//!   [`peer_value`](crate::scope::Scope::peer_value)
//!
//! # Laws every operation honors
//!
//! - **Left-first order.** Within a pass, two-operand operations always
//!   evaluate their first operand before their second. The order is
//!   observable through side effects and is part of the contract.
//! - **First-operand tie-break.** If both operands of `race` finish on
//!   the same pass, the first wins; `timeout` likewise favors the
//!   operation over the deadline on a tie.
//! - **Silent abandonment.** When `race`, `until`, or `timeout` decides
//!   an outcome, the losing subtask simply stops being evaluated. It
//!   keeps its frame and resume token; there is no cancellation
//!   notification. Subtasks needing cleanup must own a completion path.
//! - **Yield transparency.** A yield escaping a task with no live
//!   alternation is treated as an ordinary suspension by every
//!   operation except `alternate` itself.
//!
//! Children live in the tree slots below their parent: sequential
//! operations use child 1, pairs use children 1 and 2. Successive
//! operations in one body reuse the same child slots; each fresh use
//! rewinds the slot first.

mod alternate;
mod call;
mod delay;
mod join;
mod race;
mod timeout;
