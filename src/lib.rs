//! Weft: cooperative multitasking for idle-loop hosts.
//!
//! # Overview
//!
//! Weft lets straight-line procedural code — blink an LED, debounce a
//! button, play a tone sequence — run concurrently on a single thread
//! with no preemption, no operating system, and no per-step heap
//! churn. Procedures are written as *tasks* that delay and wait as if
//! blocking; the runtime multiplexes a whole tree of them over the
//! host's idle loop, doing bounded work per pass.
//!
//! The host owes the runtime exactly one thing: a monotonic millisecond
//! clock ([`Clock`]), polled from a loop that calls one or more driver
//! sites ([`once`], [`repeat`], [`every`]) as often as its latency
//! budget requires — and never from an interrupt context.
//!
//! # Core Guarantees
//!
//! - **Bounded passes**: a pass returns to the host once every live
//!   task has suspended or completed; nothing ever blocks.
//! - **One-time transitions**: code between suspension points runs
//!   exactly once, even though the task function itself is re-entered
//!   on every pass.
//! - **Stable frames**: a task's persistent locals live in a frame
//!   allocated once per tree slot, lazily, and retained until the
//!   driver is torn down.
//! - **Observable order**: paired operations evaluate their first
//!   operand before their second within every pass, and ties go to the
//!   first operand.
//! - **Deterministic testing**: the [`lab`] harness drives sites over
//!   virtual time, so timing scenarios replay exactly.
//!
//! # Module Structure
//!
//! - [`status`]: the four-valued task status and suspension plumbing
//! - [`frame`]: activation records (resume token, deadline, mailbox, locals)
//! - [`tree`]: the heap-layout task tree and its lazy frame store
//! - [`cx`]: the per-pass evaluation context and cursor
//! - [`scope`]: task bodies, the replay dispatcher, `run`/`finish`/`forever`
//! - [`combinator`]: delay, wait_until, call, join, until, race, timeout,
//!   alternate, and the peer channel
//! - [`driver`]: the once/repeat/every driver sites
//! - [`clock`]: the host clock trait and wrap-safe deadline compare
//! - [`lab`]: deterministic virtual-time harness for tests
//! - [`trace`]: optional step-level debug sink (cargo feature `trace`)
//! - [`error`]: typed errors for misuse panics and lab budgets
//!
//! # Example
//!
//! ```
//! use weft::{once, task, Cx, Lab, Status};
//!
//! fn greeter(cx: &mut Cx<'_>) -> Status {
//!     task::<u8, _>(cx, |sc| {
//!         sc.run(|count| *count = 3)?;
//!         sc.delay(100)?;
//!         sc.run(|count| assert_eq!(*count, 3))?;
//!         Ok(())
//!     })
//! }
//!
//! let mut lab = Lab::new();
//! let mut site = once(greeter);
//! assert!(lab.run_until_done(&mut site).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod clock;
pub mod combinator;
pub mod cx;
pub mod driver;
pub mod error;
pub mod frame;
pub mod lab;
pub mod scope;
pub mod status;
pub mod test_utils;
pub mod trace;
pub mod tree;

pub use clock::{deadline_reached, Clock, ManualClock, StdClock};
pub use cx::Cx;
pub use driver::{every, once, repeat, Driver, Every, Once, Repeat};
pub use error::{Error, ErrorKind};
pub use frame::Frame;
pub use lab::{Lab, LabConfig};
pub use scope::{task, task_named, Scope};
pub use status::{Status, Step, Suspend};
pub use tree::{SlotId, Tree, MAX_DEPTH};
