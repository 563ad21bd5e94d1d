//! Startup sequence: indicator power, connect blink, timeout handling,
//! and the hand-off into the control loop.

use crate::mock_hw::{
    IndicatorCall, MockClock, MockIndicators, MockNet, MockSource, RecordingSink, Reply,
    credentials, fresh_trigger,
};
use yesno::app::events::AppEvent;
use yesno::app::ports::ConnectivityError;
use yesno::app::service::{ControlLoop, StepOutcome};
use yesno::app::status::{IndicatorFrame, StatusValue};
use yesno::config::DeviceConfig;
use yesno::error::Error;

fn start(
    net: &mut MockNet,
) -> (ControlLoop, MockIndicators, MockClock, RecordingSink, Result<(), Error>) {
    let mut ctl = ControlLoop::new(DeviceConfig::default());
    let mut io = MockIndicators::new();
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    let result = ctl.startup(&mut io, net, &mut clock, &credentials(), &mut sink);
    (ctl, io, clock, sink, result)
}

#[test]
fn boot_powers_indicators_and_shows_unknown_first() {
    let mut net = MockNet::up_after(0);
    let (_, io, _, _, result) = start(&mut net);
    assert!(result.is_ok());
    assert_eq!(
        &io.calls[..3],
        &[
            IndicatorCall::Power(true),
            IndicatorCall::No(true),
            IndicatorCall::Yes(true),
        ]
    );
}

#[test]
fn immediate_link_skips_the_blink() {
    let mut net = MockNet::up_after(0);
    let (_, io, clock, sink, result) = start(&mut net);
    assert!(result.is_ok());
    assert!(clock.sleeps.is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WaitingForLink { .. })), 0);
    assert!(io.wifi, "WiFi LED must be on once connected");
    assert!(io.power);
    assert_eq!(io.frame(), IndicatorFrame::BOTH, "status still unknown after connect");
    assert_eq!(sink.events.last(), Some(&AppEvent::Connected));
}

#[test]
fn blinks_all_leds_while_waiting() {
    let mut net = MockNet::up_after(2);
    let (_, io, clock, sink, result) = start(&mut net);
    assert!(result.is_ok());

    assert_eq!(clock.sleeps, vec![500, 500, 500, 500]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WaitingForLink { .. })), 2);

    let frames = io.frames();
    assert_eq!(
        frames,
        vec![
            IndicatorFrame::BOTH,
            IndicatorFrame::BOTH,
            IndicatorFrame::OFF,
            IndicatorFrame::BOTH,
            IndicatorFrame::OFF,
            IndicatorFrame::BOTH,
        ]
    );
    let wifi_writes: Vec<_> = io
        .calls
        .iter()
        .filter_map(|c| match c {
            IndicatorCall::Wifi(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(wifi_writes, vec![true, false, true, false, true]);
}

#[test]
fn timeout_turns_everything_off_and_fails() {
    let mut net = MockNet::never();
    let (_, io, clock, sink, result) = start(&mut net);

    assert_eq!(result, Err(Error::Connection(ConnectivityError::Timeout)));
    // 10 s timeout at a 1 s blink period.
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WaitingForLink { .. })), 10);
    assert_eq!(clock.now_ms, 10_000);
    assert_eq!(io.frame(), IndicatorFrame::OFF);
    assert!(!io.wifi);
    assert_eq!(io.power_on_writes(), 1, "power is enabled once at boot and never again");
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::ConnectionFailed(ConnectivityError::Timeout))
    );
}

#[test]
fn driver_rejection_fails_without_waiting() {
    let mut net = MockNet::failing(ConnectivityError::Driver(-1));
    let (_, io, clock, _, result) = start(&mut net);
    assert_eq!(result, Err(Error::Connection(ConnectivityError::Driver(-1))));
    assert!(clock.sleeps.is_empty());
    assert_eq!(io.frame(), IndicatorFrame::OFF);
}

#[test]
fn shorter_timeout_gives_fewer_blinks() {
    let config = DeviceConfig {
        connect_timeout_secs: 3,
        connect_blink_period_ms: 500,
        ..DeviceConfig::default()
    };
    let mut ctl = ControlLoop::new(config);
    let mut io = MockIndicators::new();
    let mut clock = MockClock::new();
    let mut sink = RecordingSink::new();
    let result = ctl.startup(&mut io, &mut MockNet::never(), &mut clock, &credentials(), &mut sink);
    assert!(result.is_err());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::WaitingForLink { .. })), 6);
    assert_eq!(clock.now_ms, 3_000);
}

#[test]
fn first_poll_follows_startup_immediately() {
    let mut net = MockNet::up_after(1);
    let (mut ctl, mut io, mut clock, mut sink, result) = start(&mut net);
    assert!(result.is_ok());

    let mut src = MockSource::new([Reply::status("no")]);
    let trigger = fresh_trigger();
    let outcome = ctl.step(trigger, &mut io, &mut src, &mut clock, &mut sink);
    assert_eq!(outcome, StepOutcome::Polled(Ok(StatusValue::NoEvent)));
    assert_eq!(io.frame(), IndicatorFrame::NO);
    assert!(io.wifi && io.power);
}
