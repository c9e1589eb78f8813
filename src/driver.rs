//! Top-level drivers.
//!
//! A driver is what the host idle loop actually calls. Each driver site
//! owns one task tree and evaluates its root task once per poll; what
//! happens after the root completes is the only thing the three
//! flavors disagree on:
//!
//! - [`Once`]: nothing — further polls are no-ops.
//! - [`Repeat`]: the root is rewound so it starts over next poll.
//! - [`Every`]: the root is rewound once a full period has elapsed
//!   since the cycle reference, which then advances.
//!
//! Several driver sites in one idle loop compose as independent
//! top-level tasks: they share the host's time axis and nothing else.
//! The host must poll often enough for its latency needs, never from an
//! interrupt context.

use crate::clock::{deadline_reached, Clock};
use crate::cx::Cx;
use crate::status::Status;
#[cfg(feature = "trace")]
use crate::trace::TraceBuffer;
use crate::tree::{SlotId, Tree, MAX_DEPTH};

/// A pollable driver site.
pub trait Driver {
    /// Runs one pass over the site's task tree.
    ///
    /// Returns the root task's status for observability; hosts that
    /// only care about side effects may ignore it.
    fn poll(&mut self, clock: &dyn Clock) -> Status;
}

/// Tree ownership shared by the driver flavors.
struct Core {
    tree: Tree,
    #[cfg(feature = "trace")]
    trace: Option<TraceBuffer>,
}

impl Core {
    fn new(depth: u16) -> Self {
        Self {
            tree: Tree::new(depth),
            #[cfg(feature = "trace")]
            trace: None,
        }
    }

    fn pass<F>(&mut self, clock: &dyn Clock, root: &mut F) -> Status
    where
        F: FnMut(&mut Cx<'_>) -> Status,
    {
        let mut cx = Cx {
            tree: &mut self.tree,
            clock,
            cursor: SlotId::ROOT,
            #[cfg(feature = "trace")]
            trace: self.trace.as_mut(),
        };
        root(&mut cx)
    }
}

/// Runs its root task to completion, then goes quiet.
///
/// After the root reports done, every further poll returns `Done`
/// immediately: the root frame stays at its completion sentinel and no
/// user code runs.
pub struct Once<F> {
    core: Core,
    root: F,
}

/// Restarts its root task every time it completes.
pub struct Repeat<F> {
    core: Core,
    root: F,
}

/// Restarts its root task at most once per period.
///
/// The reference time is captured on the first poll; once the root has
/// completed *and* a full period has elapsed since the reference, the
/// root is rewound and the reference advances to the current time.
pub struct Every<F> {
    core: Core,
    root: F,
    period: u32,
    basis: Option<u32>,
}

/// Builds a [`Once`] driver with the default tree depth.
pub fn once<F>(root: F) -> Once<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    Once::new(root)
}

/// Builds a [`Repeat`] driver with the default tree depth.
pub fn repeat<F>(root: F) -> Repeat<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    Repeat::new(root)
}

/// Builds an [`Every`] driver with the default tree depth.
pub fn every<F>(period_ms: u32, root: F) -> Every<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    Every::new(period_ms, root)
}

macro_rules! common_driver_methods {
    () => {
        /// The site's task tree, for introspection and assertions.
        #[must_use]
        pub fn tree(&self) -> &Tree {
            &self.core.tree
        }

        /// Attaches a bounded trace buffer to this site.
        #[cfg(feature = "trace")]
        #[must_use]
        pub fn with_trace(mut self, capacity: usize) -> Self {
            self.core.trace = Some(TraceBuffer::new(capacity));
            self
        }

        /// The attached trace buffer, if any.
        #[cfg(feature = "trace")]
        #[must_use]
        pub fn trace(&self) -> Option<&TraceBuffer> {
            self.core.trace.as_ref()
        }
    };
}

impl<F> Once<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    /// Creates the driver with the default tree depth.
    pub fn new(root: F) -> Self {
        Self::with_depth(MAX_DEPTH, root)
    }

    /// Creates the driver with an explicit tree depth.
    pub fn with_depth(depth: u16, root: F) -> Self {
        Self {
            core: Core::new(depth),
            root,
        }
    }

    common_driver_methods!();
}

impl<F> Driver for Once<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    fn poll(&mut self, clock: &dyn Clock) -> Status {
        self.core.pass(clock, &mut self.root)
    }
}

impl<F> Repeat<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    /// Creates the driver with the default tree depth.
    pub fn new(root: F) -> Self {
        Self::with_depth(MAX_DEPTH, root)
    }

    /// Creates the driver with an explicit tree depth.
    pub fn with_depth(depth: u16, root: F) -> Self {
        Self {
            core: Core::new(depth),
            root,
        }
    }

    common_driver_methods!();
}

impl<F> Driver for Repeat<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    fn poll(&mut self, clock: &dyn Clock) -> Status {
        let status = self.core.pass(clock, &mut self.root);
        if status.is_done() {
            tracing::trace!(target: "weft::driver", "root complete, rewinding for restart");
            self.core.tree.rewind(SlotId::ROOT);
        }
        status
    }
}

impl<F> Every<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    /// Creates the driver with the default tree depth.
    pub fn new(period_ms: u32, root: F) -> Self {
        Self::with_depth(MAX_DEPTH, period_ms, root)
    }

    /// Creates the driver with an explicit tree depth.
    pub fn with_depth(depth: u16, period_ms: u32, root: F) -> Self {
        Self {
            core: Core::new(depth),
            root,
            period: period_ms,
            basis: None,
        }
    }

    common_driver_methods!();
}

impl<F> Driver for Every<F>
where
    F: FnMut(&mut Cx<'_>) -> Status,
{
    fn poll(&mut self, clock: &dyn Clock) -> Status {
        let now = clock.now();
        let basis = *self.basis.get_or_insert(now);
        let status = self.core.pass(clock, &mut self.root);
        if status.is_done() && deadline_reached(now, basis.wrapping_add(self.period)) {
            tracing::trace!(
                target: "weft::driver",
                period_ms = self.period,
                "cycle complete, rewinding"
            );
            self.core.tree.rewind(SlotId::ROOT);
            self.basis = Some(now);
        }
        status
    }
}
