//! End-to-end scenario suite.
//!
//! Each test builds a small program out of the combinator algebra,
//! drives it through the deterministic lab at a 10 ms tick, and checks
//! the observable timeline: pin edges, branch choices, and channel
//! contents. Timings are exact because time is virtual.

use weft::test_utils::{init_test_logging, Journal, PinRecorder};
use weft::{begin_check, check_passed, every, once, repeat, task, Cx, Lab, Status};

/// Toggle a pin forever: high, wait, low, wait.
fn blink(cx: &mut Cx<'_>, pin: &PinRecorder, half_period: u32) -> Status {
    let now = cx.now();
    let pin = pin.clone();
    task::<(), _>(cx, move |sc| {
        let pin = pin.clone();
        sc.forever(move |sc| {
            let high = pin.clone();
            let low = pin.clone();
            sc.run(move |_| high.set(now, true))?;
            sc.delay(half_period)?;
            sc.run(move |_| low.set(now, false))?;
            sc.delay(half_period)
        })
    })
}

fn nap(cx: &mut Cx<'_>, ms: u32) -> Status {
    task::<(), _>(cx, |sc| sc.delay(ms))
}

#[test]
fn single_blink_timeline() {
    init_test_logging();
    begin_check!("single_blink_timeline");

    let pin = PinRecorder::new();
    let p = pin.clone();
    let mut site = repeat(move |cx: &mut Cx<'_>| blink(cx, &p, 500));

    let mut lab = Lab::new();
    lab.run_for(3000, &mut site);

    assert_eq!(
        pin.transitions(),
        vec![
            (0, true),
            (500, false),
            (1000, true),
            (1500, false),
            (2000, true),
            (2500, false),
        ]
    );
    check_passed!("single_blink_timeline", transitions = pin.transitions().len());
}

#[test]
fn concurrent_blinks_share_the_time_axis() {
    init_test_logging();
    begin_check!("concurrent_blinks_share_the_time_axis");

    let pin_a = PinRecorder::new();
    let pin_b = PinRecorder::new();
    let (a, b) = (pin_a.clone(), pin_b.clone());
    let mut site = once(move |cx: &mut Cx<'_>| {
        let (a, b) = (a.clone(), b.clone());
        task::<(), _>(cx, move |sc| {
            sc.join(
                move |cx| blink(cx, &a, 500),
                move |cx| blink(cx, &b, 300),
            )
        })
    });

    let mut lab = Lab::new();
    // Both blinkers are infinite, so the join never completes; the
    // root is still suspended when we stop looking.
    assert_eq!(lab.run_for(910, &mut site), Status::Cont);

    let a_times: Vec<u32> = pin_a.transitions().iter().map(|(at, _)| *at).collect();
    let b_times: Vec<u32> = pin_b.transitions().iter().map(|(at, _)| *at).collect();
    assert_eq!(a_times, vec![0, 500]);
    assert_eq!(b_times, vec![0, 300, 600, 900]);
    check_passed!("concurrent_blinks_share_the_time_axis");
}

#[test]
fn timeout_fires_and_the_slow_task_stays_silent() {
    init_test_logging();
    begin_check!("timeout_fires_and_the_slow_task_stays_silent");

    let hits = Journal::new();
    let h = hits.clone();
    let mut site = once(move |cx: &mut Cx<'_>| {
        let h = h.clone();
        task::<(), _>(cx, move |sc| {
            let h = h.clone();
            sc.timeout(
                100,
                |cx| nap(cx, 500),
                move |sc| {
                    let at = sc.now();
                    sc.run(move |_| h.push(at))
                },
            )
        })
    });

    let mut lab = Lab::new();
    // Watch well past the abandoned task's own deadline: nothing
    // further may happen at 500 ms.
    lab.run_for(600, &mut site);

    assert_eq!(hits.snapshot(), vec![100]);
    check_passed!("timeout_fires_and_the_slow_task_stays_silent");
}

#[test]
fn timeout_is_silent_when_the_task_is_quick() {
    init_test_logging();
    begin_check!("timeout_is_silent_when_the_task_is_quick");

    let hits = Journal::new();
    let h = hits.clone();
    let mut site = once(move |cx: &mut Cx<'_>| {
        let h = h.clone();
        task::<(), _>(cx, move |sc| {
            let h = h.clone();
            sc.timeout(
                500,
                |cx| nap(cx, 100),
                move |sc| {
                    let at = sc.now();
                    sc.run(move |_| h.push(at))
                },
            )
        })
    });

    let mut lab = Lab::new();
    let passes = lab.run_until_done(&mut site).expect("site completes");

    assert_eq!(lab.now(), 100);
    assert!(hits.is_empty(), "expiry branch must not run");
    check_passed!("timeout_is_silent_when_the_task_is_quick", passes = passes);
}

#[test]
fn race_takes_the_button_branch() {
    init_test_logging();
    begin_check!("race_takes_the_button_branch");

    let outcome = Journal::new();
    let pin = PinRecorder::new();
    let (o, p) = (outcome.clone(), pin.clone());
    let mut site = once(move |cx: &mut Cx<'_>| {
        let (o, p) = (o.clone(), p.clone());
        task::<(), _>(cx, move |sc| {
            let pressed = o.clone();
            let gave_up = o.clone();
            sc.race(
                |cx| nap(cx, 250), // simulated button press at 250 ms
                move |cx| blink(cx, &p, 100),
                move |sc| {
                    let at = sc.now();
                    sc.run(move |_| pressed.push(("pressed", at)))
                },
                move |sc| sc.run(move |_| gave_up.push(("blink_done", 0))),
            )
        })
    });

    let mut lab = Lab::new();
    lab.run_until_done(&mut site).expect("site completes");

    assert_eq!(outcome.snapshot(), vec![("pressed", 250)]);
    // The blinker ran right up to the decision and was then abandoned.
    assert!(!pin.transitions().is_empty());
    check_passed!("race_takes_the_button_branch");
}

#[test]
fn alternation_delivers_the_whole_sequence() {
    init_test_logging();
    begin_check!("alternation_delivers_the_whole_sequence");

    fn producer(cx: &mut Cx<'_>, upto: i32) -> Status {
        task::<i32, _>(cx, move |sc| {
            sc.forever(move |sc| {
                sc.run(|next| *next += 1)?;
                if sc.peek(move |next| *next > upto) {
                    return sc.finish();
                }
                let value = sc.peek(|next| *next);
                sc.yield_to_peer(value)
            })
        })
    }

    fn consumer(cx: &mut Cx<'_>, seen: &Journal<i32>) -> Status {
        let seen = seen.clone();
        task::<(), _>(cx, move |sc| {
            let seen = seen.clone();
            sc.forever(move |sc| {
                let value = sc.peer_value();
                let seen = seen.clone();
                sc.run(move |_| seen.push(value))?;
                sc.yield_to_peer(0)
            })
        })
    }

    let seen = Journal::new();
    let s = seen.clone();
    let mut site = once(move |cx: &mut Cx<'_>| {
        let s = s.clone();
        task::<(), _>(cx, move |sc| {
            let s = s.clone();
            sc.alternate(|cx| producer(cx, 3), move |cx| consumer(cx, &s))
        })
    });

    let mut lab = Lab::new();
    lab.run_until_done(&mut site).expect("alternation terminates");

    assert_eq!(seen.snapshot(), vec![1, 2, 3]);
    check_passed!("alternation_delivers_the_whole_sequence");
}

#[test]
fn every_driver_paces_a_chirp() {
    init_test_logging();
    begin_check!("every_driver_paces_a_chirp");

    let chirps = Journal::new();
    let c = chirps.clone();
    let mut site = every(200, move |cx: &mut Cx<'_>| {
        let c = c.clone();
        let at = cx.now();
        task::<(), _>(cx, move |sc| {
            sc.run(move |_| c.push(at))?;
            sc.delay(30)?;
            Ok(())
        })
    });

    let mut lab = Lab::new();
    lab.run_for(700, &mut site);

    // One chirp per period: at start, then each time a full period has
    // elapsed since the last cycle's reference.
    assert_eq!(chirps.snapshot(), vec![0, 210, 410, 610]);
    check_passed!("every_driver_paces_a_chirp");
}
