//! Shared helpers for tests.
//!
//! The suites in this crate watch virtual-time programs, so everything
//! here leans single-threaded and clockless: fixtures are cheap
//! `Rc`/`Cell` handles that task closures capture directly, and the
//! log setup drops wall-clock timestamps. The instants that matter
//! come from the lab clock, and the fixtures record those themselves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Routes `tracing` output into the test harness at trace verbosity.
///
/// Installs the subscriber for the whole test binary on the first
/// call; later calls find it already in place and do nothing. Output
/// is compact and carries no wall-clock timestamps, since the suites
/// run on virtual time.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .without_time()
            .with_ansi(false)
            .compact()
            .try_init();
    });
}

/// Announces a named check in the test log, so interleaved runtime
/// events can be attributed to the check that produced them.
#[macro_export]
macro_rules! begin_check {
    ($name:expr) => {
        tracing::info!(check = %$name, "begin: {}", $name);
    };
}

/// Records a passing check, optionally with the values it observed.
#[macro_export]
macro_rules! check_passed {
    ($name:expr) => {
        tracing::info!(check = %$name, "passed: {}", $name);
    };
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(check = %$name, $($key = %$value,)* "passed: {}", $name);
    };
}

/// A shared, append-only record of test observations.
///
/// Clones share the same storage, so one handle can live inside a task
/// closure while the test keeps another for assertions.
#[derive(Debug, Default)]
pub struct Journal<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Journal<T> {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Appends an entry.
    pub fn push(&self, entry: T) {
        self.entries.borrow_mut().push(entry);
    }

    /// The number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T: Clone> Journal<T> {
    /// A snapshot of all entries in recording order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.borrow().clone()
    }
}

impl<T> Clone for Journal<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

/// A simulated output pin that records its level transitions.
///
/// Each `set` call with a changed level is recorded with the caller's
/// timestamp; writing the current level again is a no-op, matching how
/// blink-style tests observe edges rather than writes.
#[derive(Debug, Clone, Default)]
pub struct PinRecorder {
    transitions: Journal<(u32, bool)>,
    level: Rc<Cell<Option<bool>>>,
}

impl PinRecorder {
    /// Creates a pin with no recorded transitions and no known level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives the pin at the given time.
    pub fn set(&self, at: u32, level: bool) {
        if self.level.get() == Some(level) {
            return;
        }
        self.level.set(Some(level));
        tracing::trace!(target: "weft::test", at, level, "pin transition");
        self.transitions.push((at, level));
    }

    /// All recorded transitions in order.
    #[must_use]
    pub fn transitions(&self) -> Vec<(u32, bool)> {
        self.transitions.snapshot()
    }

    /// The timestamps at which the pin switched to `level`.
    #[must_use]
    pub fn edges_to(&self, level: bool) -> Vec<u32> {
        self.transitions
            .snapshot()
            .into_iter()
            .filter(|(_, l)| *l == level)
            .map(|(at, _)| at)
            .collect()
    }
}

/// A settable boolean for predicates and simulated buttons.
#[derive(Debug, Clone, Default)]
pub struct Flag {
    state: Rc<Cell<bool>>,
}

impl Flag {
    /// Creates a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn set(&self) {
        self.state.set(true);
    }

    /// Clears the flag.
    pub fn clear(&self) {
        self.state.set(false);
    }

    /// Reads the flag.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.state.get()
    }
}
