//! Fork-join pairs: wait for both, or run one under the other.

use crate::cx::Cx;
use crate::scope::{Gate, Scope};
use crate::status::{Status, Step, Suspend};

impl<L: Default + 'static> Scope<'_, '_, L> {
    /// Runs two subtasks concurrently until *both* have finished.
    ///
    /// Both operands are evaluated on every pass, first operand first
    /// (a finished operand answers done immediately and runs no code).
    /// Execution falls through once neither has work left.
    pub fn join<F, G>(&mut self, mut f: F, mut g: G) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
        G: FnMut(&mut Cx<'_>) -> Status,
    {
        let (_token, gate) = self.gate(1);
        match gate {
            Gate::Enter => {
                self.rewind_child(1);
                self.rewind_child(2);
            }
            Gate::Resume => {}
            Gate::Skip => return Ok(()),
        }
        let first = self.eval_child(1, &mut f);
        let second = self.eval_child(2, &mut g);
        if first.is_done() && second.is_done() {
            Ok(())
        } else {
            Err(Suspend::Cont)
        }
    }

    /// Runs `g` for as long as `f` is still running.
    ///
    /// Both are evaluated each pass, `f` first. The pass in which `f`
    /// finishes still evaluates `g` once; after that `g` is abandoned
    /// wherever it stands — it keeps its frame and resume token but is
    /// never evaluated again, with no cleanup notification.
    pub fn until<F, G>(&mut self, mut f: F, mut g: G) -> Step
    where
        F: FnMut(&mut Cx<'_>) -> Status,
        G: FnMut(&mut Cx<'_>) -> Status,
    {
        let (_token, gate) = self.gate(1);
        match gate {
            Gate::Enter => {
                self.rewind_child(1);
                self.rewind_child(2);
            }
            Gate::Resume => {}
            Gate::Skip => return Ok(()),
        }
        let first = self.eval_child(1, &mut f);
        let _ = self.eval_child(2, &mut g);
        if first.is_done() {
            Ok(())
        } else {
            Err(Suspend::Cont)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::cx::Cx;
    use crate::scope::task;
    use crate::status::Status;
    use crate::test_utils::Journal;
    use crate::tree::{SlotId, Tree};

    fn pass<F>(tree: &mut Tree, clock: &ManualClock, f: &mut F) -> Status
    where
        F: FnMut(&mut Cx<'_>) -> Status,
    {
        let mut cx = Cx {
            tree,
            clock,
            cursor: SlotId::ROOT,
            #[cfg(feature = "trace")]
            trace: None,
        };
        f(&mut cx)
    }

    fn sleeper(cx: &mut Cx<'_>, log: &Journal<&'static str>, tag: &'static str, ms: u32) -> Status {
        let log = log.clone();
        task::<(), _>(cx, move |sc| {
            sc.delay(ms)?;
            sc.run(move |_| log.push(tag))?;
            Ok(())
        })
    }

    #[test]
    fn join_waits_for_the_slower_operand() {
        let mut tree = Tree::new(3);
        let clock = ManualClock::new();
        let log = Journal::new();
        let l = log.clone();
        let mut root = move |cx: &mut Cx<'_>| {
            let l = l.clone();
            task::<(), _>(cx, move |sc| {
                sc.join(
                    |cx| sleeper(cx, &l, "fast", 10),
                    |cx| sleeper(cx, &l, "slow", 50),
                )
            })
        };
        let mut elapsed = 0;
        loop {
            if pass(&mut tree, &clock, &mut root).is_done() {
                break;
            }
            clock.advance(10);
            elapsed += 10;
            assert!(elapsed <= 60, "join failed to complete");
        }
        assert_eq!(log.snapshot(), vec!["fast", "slow"]);
        assert_eq!(elapsed, 50);
    }

    #[test]
    fn join_evaluates_first_operand_first() {
        let mut tree = Tree::new(3);
        let clock = ManualClock::new();
        let log = Journal::new();
        let l = log.clone();
        let mut root = move |cx: &mut Cx<'_>| {
            let l = l.clone();
            task::<(), _>(cx, move |sc| {
                sc.join(
                    |cx| sleeper(cx, &l, "f", 10),
                    |cx| sleeper(cx, &l, "g", 10),
                )
            })
        };
        let _ = pass(&mut tree, &clock, &mut root);
        clock.advance(10);
        let _ = pass(&mut tree, &clock, &mut root);
        assert_eq!(log.snapshot(), vec!["f", "g"]);
    }

    #[test]
    fn until_abandons_the_follower_in_place() {
        let mut tree = Tree::new(3);
        let clock = ManualClock::new();
        let beats = Journal::new();
        let b = beats.clone();
        let mut root = move |cx: &mut Cx<'_>| {
            let b = b.clone();
            task::<(), _>(cx, move |sc| {
                let b = b.clone();
                sc.until(
                    |cx| task::<(), _>(cx, |sc| sc.delay(35)),
                    move |cx| {
                        let b = b.clone();
                        task::<(), _>(cx, move |sc| {
                            let b = b.clone();
                            sc.forever(move |sc| {
                                let b = b.clone();
                                sc.run(move |_| b.push("beat"))?;
                                sc.delay(10)
                            })
                        })
                    },
                )
            })
        };
        let mut elapsed = 0;
        loop {
            if pass(&mut tree, &clock, &mut root).is_done() {
                break;
            }
            clock.advance(10);
            elapsed += 10;
            assert!(elapsed <= 50, "until failed to complete");
        }
        // Beats at 0, 10, 20, 30, and the final pass at 40 still ran
        // the follower once before the leader's completion was seen.
        assert_eq!(elapsed, 40);
        assert_eq!(beats.len(), 5);
        // The follower's frame survives, parked where it was left.
        let follower = tree.get(SlotId::ROOT.child(2)).unwrap();
        assert!(!follower.is_done());
    }
}
