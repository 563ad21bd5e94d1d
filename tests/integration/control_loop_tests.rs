//! Control-loop tests: polling, status rendering, and the self-test
//! override, driven one `step` at a time against mock adapters.

use crate::mock_hw::{MockClock, MockIndicators, MockSource, RecordingSink, Reply, fresh_trigger};
use yesno::app::events::AppEvent;
use yesno::app::ports::{FetchError, IndicatorPort};
use yesno::app::service::{ControlLoop, StepOutcome};
use yesno::app::status::{IndicatorFrame, StatusValue};
use yesno::config::DeviceConfig;
use yesno::drivers::self_test::SelfTestTrigger;

const POLL_MS: u64 = 60_000;
const DWELL_MS: u32 = 3_000;

struct Rig {
    ctl: ControlLoop,
    io: MockIndicators,
    src: MockSource,
    clock: MockClock,
    sink: RecordingSink,
    trigger: &'static SelfTestTrigger,
}

impl Rig {
    fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        let mut io = MockIndicators::new();
        // Post-startup state: unknown pattern on the status LEDs.
        io.show(IndicatorFrame::BOTH);
        io.clear();
        Self {
            ctl: ControlLoop::new(DeviceConfig::default()),
            io,
            src: MockSource::new(replies),
            clock: MockClock::new(),
            sink: RecordingSink::new(),
            trigger: fresh_trigger(),
        }
    }

    fn step(&mut self) -> StepOutcome {
        self.ctl.step(
            self.trigger,
            &mut self.io,
            &mut self.src,
            &mut self.clock,
            &mut self.sink,
        )
    }

    /// Advance to the next poll boundary and step.
    fn next_poll(&mut self) -> StepOutcome {
        self.clock.advance(POLL_MS);
        self.step()
    }
}

// ── Status mapping to LEDs ────────────────────────────────────

#[test]
fn no_lights_only_the_no_indicator() {
    let mut rig = Rig::new([Reply::status("no")]);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::NoEvent)));
    assert_eq!(rig.io.frame(), IndicatorFrame::NO);
    assert_eq!(rig.ctl.last_status(), Some(StatusValue::NoEvent));
}

#[test]
fn yes_lights_only_the_yes_indicator() {
    let mut rig = Rig::new([Reply::status("yes")]);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::EventActive)));
    assert_eq!(rig.io.frame(), IndicatorFrame::YES);
}

#[test]
fn any_other_value_counts_as_event() {
    let mut rig = Rig::new([
        Reply::status("maybe"),
        Reply::Http(200, r#"{"other":"no"}"#.into()),
    ]);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::EventActive)));
    assert_eq!(rig.next_poll(), StepOutcome::Polled(Ok(StatusValue::EventActive)));
    assert_eq!(rig.io.frame(), IndicatorFrame::YES);
}

#[test]
fn status_flip_updates_both_leds() {
    let mut rig = Rig::new([Reply::status("no"), Reply::status("yes"), Reply::status("no")]);
    rig.step();
    assert_eq!(rig.io.frame(), IndicatorFrame::NO);
    rig.next_poll();
    assert_eq!(rig.io.frame(), IndicatorFrame::YES);
    rig.next_poll();
    assert_eq!(rig.io.frame(), IndicatorFrame::NO);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::StatusUpdated { changed: true, .. })),
        3
    );
}

#[test]
fn repeated_status_rewrites_same_levels() {
    let mut rig = Rig::new([Reply::status("yes"), Reply::status("yes")]);
    rig.step();
    rig.next_poll();
    assert_eq!(rig.io.frames(), vec![IndicatorFrame::YES, IndicatorFrame::YES]);
    assert!(rig.sink.events.contains(&AppEvent::StatusUpdated {
        status: StatusValue::EventActive,
        changed: false,
    }));
}

// ── Failed polls keep the last status ─────────────────────────

#[test]
fn server_error_leaves_indicators_unchanged() {
    let mut rig = Rig::new([Reply::status("no"), Reply::Http(500, String::new())]);
    rig.step();
    rig.io.clear();

    assert_eq!(
        rig.next_poll(),
        StepOutcome::Polled(Err(FetchError::HttpStatus(500)))
    );
    assert!(rig.io.calls.is_empty(), "failed fetch must not touch the LEDs");
    assert_eq!(rig.io.frame(), IndicatorFrame::NO);
    assert_eq!(rig.ctl.last_status(), Some(StatusValue::NoEvent));
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::FetchFailed(FetchError::HttpStatus(500))));
}

#[test]
fn garbage_body_while_unknown_keeps_both_on() {
    let mut rig = Rig::new([Reply::Http(200, "<html>rate limited</html>".into())]);
    assert_eq!(rig.step(), StepOutcome::Polled(Err(FetchError::Parse)));
    assert_eq!(rig.io.frame(), IndicatorFrame::BOTH);
    assert_eq!(rig.ctl.last_status(), None);
}

#[test]
fn transport_error_keeps_last_status() {
    let mut rig = Rig::new([Reply::status("yes"), Reply::Transport]);
    rig.step();
    assert_eq!(rig.next_poll(), StepOutcome::Polled(Err(FetchError::Transport)));
    assert_eq!(rig.io.frame(), IndicatorFrame::YES);
    let stats = rig.ctl.stats();
    assert_eq!((stats.fetch_ok, stats.fetch_failed), (1, 1));
}

// ── Poll timing ───────────────────────────────────────────────

#[test]
fn first_iteration_polls_immediately() {
    let mut rig = Rig::new([Reply::status("no")]);
    rig.step();
    assert_eq!(rig.src.fetches, 1);
}

#[test]
fn no_poll_before_interval_elapses() {
    let mut rig = Rig::new([Reply::status("no"), Reply::status("yes")]);
    rig.step();
    rig.clock.advance(POLL_MS - 1);
    assert_eq!(rig.step(), StepOutcome::Idle);
    assert_eq!(rig.src.fetches, 1);
    rig.clock.advance(1);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::EventActive)));
    assert_eq!(rig.src.fetches, 2);
}

#[test]
fn failed_fetch_also_restarts_the_interval() {
    let mut rig = Rig::new([Reply::Transport, Reply::status("no")]);
    rig.step();
    rig.clock.advance(POLL_MS - 1);
    assert_eq!(rig.step(), StepOutcome::Idle, "failure must not cause a retry on the next tick");
    rig.clock.advance(1);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::NoEvent)));
}

#[test]
fn idle_iterations_do_not_touch_leds() {
    let mut rig = Rig::new([Reply::status("no")]);
    rig.step();
    rig.io.clear();
    for _ in 0..50 {
        rig.clock.advance(100);
        assert_eq!(rig.step(), StepOutcome::Idle);
    }
    assert!(rig.io.calls.is_empty());
}

// ── Self-test override ────────────────────────────────────────

#[test]
fn self_test_runs_on_the_next_iteration() {
    let mut rig = Rig::new([Reply::status("no")]);
    rig.step();
    rig.clock.advance(100);

    rig.trigger.trigger();
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert!(!rig.trigger.is_pending());
}

#[test]
fn self_test_shows_both_then_restores_known_status() {
    let mut rig = Rig::new([Reply::status("yes")]);
    rig.step();
    rig.io.clear();

    rig.trigger.trigger();
    rig.step();
    assert_eq!(rig.io.frames(), vec![IndicatorFrame::BOTH, IndicatorFrame::YES]);
    assert_eq!(rig.clock.sleeps.last(), Some(&DWELL_MS));
    assert!(rig.sink.events.contains(&AppEvent::SelfTestFinished {
        restored: Some(StatusValue::EventActive),
    }));
}

#[test]
fn self_test_while_unknown_restores_unknown_pattern() {
    let mut rig = Rig::new(Vec::new());
    rig.trigger.trigger();
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert_eq!(rig.io.frames(), vec![IndicatorFrame::BOTH, IndicatorFrame::BOTH]);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::SelfTestFinished { restored: None }));
}

#[test]
fn self_test_preempts_a_due_poll() {
    let mut rig = Rig::new([Reply::status("no")]);
    rig.trigger.trigger();
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert_eq!(rig.src.fetches, 0);
    // The poll still happens on the following iteration.
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::NoEvent)));
}

#[test]
fn repeated_edges_give_one_cycle() {
    let mut rig = Rig::new([Reply::status("no")]);
    rig.step();
    rig.trigger.trigger();
    rig.trigger.trigger();
    rig.trigger.trigger();
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert_eq!(rig.step(), StepOutcome::Idle);
    assert_eq!(rig.ctl.stats().self_tests, 1);
}

#[test]
fn edge_during_fetch_runs_after_the_poll() {
    let mut rig = Rig::new([Reply::status("no")]);
    let trigger = rig.trigger;
    rig.src.edge_during_next_fetch(trigger);
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::NoEvent)));
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert_eq!(rig.io.frame(), IndicatorFrame::NO);
}

#[test]
fn edge_during_dwell_gives_exactly_one_more_cycle() {
    let mut rig = Rig::new([Reply::status("yes")]);
    rig.step();
    let trigger = rig.trigger;
    rig.clock.edge_during_sleep(DWELL_MS, trigger);

    rig.trigger.trigger();
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert!(rig.trigger.is_pending());
    assert_eq!(rig.step(), StepOutcome::SelfTest);
    assert_eq!(rig.step(), StepOutcome::Idle);
    assert_eq!(rig.ctl.stats().self_tests, 2);
    assert_eq!(rig.io.frame(), IndicatorFrame::YES);
}

#[test]
fn self_test_does_not_reset_poll_timer() {
    let mut rig = Rig::new([Reply::status("no"), Reply::status("yes")]);
    rig.step();
    rig.clock.advance(POLL_MS - u64::from(DWELL_MS));
    rig.trigger.trigger();
    rig.step();
    // Dwell pushed uptime to the poll boundary.
    assert_eq!(rig.step(), StepOutcome::Polled(Ok(StatusValue::EventActive)));
}
