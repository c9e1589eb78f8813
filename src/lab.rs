//! Deterministic lab harness.
//!
//! The lab drives driver sites with virtual time: a pass evaluates the
//! site once, the clock moves only when the harness says so, and every
//! run is bounded by a pass budget so a stuck task fails the test
//! instead of hanging it. All timing-sensitive tests in this crate run
//! through the lab with a fixed tick, which makes them exactly
//! reproducible.

use crate::clock::ManualClock;
use crate::driver::Driver;
use crate::error::Error;
use crate::status::Status;

/// Lab configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LabConfig {
    /// Virtual milliseconds between passes in the run helpers.
    pub tick_ms: u32,
    /// Pass budget for [`Lab::run_until_done`].
    pub max_passes: u64,
}

impl LabConfig {
    /// Creates the default configuration (10 ms ticks, generous budget).
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_ms: 10,
            max_passes: 100_000,
        }
    }

    /// Sets the tick length.
    #[must_use]
    pub fn tick_ms(mut self, ms: u32) -> Self {
        self.tick_ms = ms;
        self
    }

    /// Sets the pass budget.
    #[must_use]
    pub fn max_passes(mut self, passes: u64) -> Self {
        self.max_passes = passes;
        self
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A deterministic pass driver over virtual time.
#[derive(Debug)]
pub struct Lab {
    clock: ManualClock,
    config: LabConfig,
    passes: u64,
}

impl Lab {
    /// Creates a lab with the default configuration, at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LabConfig::new())
    }

    /// Creates a lab with an explicit configuration.
    #[must_use]
    pub fn with_config(config: LabConfig) -> Self {
        Self {
            clock: ManualClock::new(),
            config,
            passes: 0,
        }
    }

    /// The lab's virtual clock.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// The current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u32 {
        use crate::clock::Clock as _;
        self.clock.now()
    }

    /// Total passes executed so far.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    /// Moves virtual time forward without running anything.
    pub fn advance(&mut self, ms: u32) {
        self.clock.advance(ms);
    }

    /// Runs a single pass over a site at the current instant.
    pub fn pass(&mut self, site: &mut impl Driver) -> Status {
        self.passes += 1;
        site.poll(&self.clock)
    }

    /// Polls a site once per tick for `ms` virtual milliseconds.
    ///
    /// The first pass runs at the current instant and the clock ends up
    /// `ms` later. Returns the status of the last pass.
    pub fn run_for(&mut self, ms: u32, site: &mut impl Driver) -> Status {
        let tick = self.config.tick_ms.max(1);
        let mut status = Status::None;
        let mut elapsed = 0;
        while elapsed < ms {
            status = self.pass(site);
            self.clock.advance(tick);
            elapsed += tick;
        }
        tracing::debug!(
            target: "weft::lab",
            elapsed_ms = elapsed,
            status = %status,
            "run_for finished"
        );
        status
    }

    /// Polls a site once per tick until its root completes.
    ///
    /// Returns how many passes it took, or [`Error::stalled`] once the
    /// pass budget is exhausted.
    pub fn run_until_done(&mut self, site: &mut impl Driver) -> Result<u64, Error> {
        let start = self.passes;
        loop {
            if self.pass(site).is_done() {
                let took = self.passes - start;
                tracing::debug!(target: "weft::lab", passes = took, "root completed");
                return Ok(took);
            }
            if self.passes - start >= self.config.max_passes {
                return Err(Error::stalled(self.passes - start));
            }
            self.clock.advance(self.config.tick_ms.max(1));
        }
    }
}

impl Default for Lab {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cx::Cx;
    use crate::driver::once;
    use crate::error::ErrorKind;
    use crate::scope::task;

    #[test]
    fn run_until_done_counts_passes() {
        let mut lab = Lab::new();
        let mut site = once(|cx: &mut Cx<'_>| task::<(), _>(cx, |sc| sc.delay(50)));
        let passes = lab.run_until_done(&mut site).unwrap();
        // Park at 0, then one pass per 10 ms tick through 50.
        assert_eq!(passes, 6);
        assert_eq!(lab.now(), 50);
    }

    #[test]
    fn run_for_reports_the_last_status() {
        let mut lab = Lab::new();
        let mut site = once(|cx: &mut Cx<'_>| task::<(), _>(cx, |sc| sc.delay(500)));
        assert_eq!(lab.run_for(200, &mut site), Status::Cont);
        assert_eq!(lab.now(), 200);
    }

    #[test]
    fn stuck_site_exhausts_the_budget() {
        let mut lab = Lab::with_config(LabConfig::new().max_passes(25));
        let mut site = once(|cx: &mut Cx<'_>| {
            task::<(), _>(cx, |sc| sc.wait_until(|_| false))
        });
        let err = lab.run_until_done(&mut site).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Stalled);
    }
}
