// Host-side tests for the frame scheduler state machine.

mod support;

use backdrop_core::constants::MAX_FRAME_DT_SEC;
use backdrop_core::*;
use instant::Instant;
use std::time::Duration;
use support::{Event, FakeHost};

#[test]
fn idle_scheduler_ignores_frames() {
    let mut s = FrameScheduler::new();
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.begin_frame(Instant::now()), None);
    assert_eq!(s.frames(), 0);
}

#[test]
fn start_requests_exactly_one_frame() {
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    s.start(&mut host, Instant::now()).unwrap();
    assert!(s.is_running());
    assert_eq!(s.pending(), Some(FrameRequest(1)));

    // Second start is a no-op.
    s.start(&mut host, Instant::now()).unwrap();
    assert_eq!(host.next_frame, 2);
}

#[test]
fn frames_accumulate_time_and_resubmit() {
    let t0 = Instant::now();
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    s.start(&mut host, t0).unwrap();

    let dt = s.begin_frame(t0 + Duration::from_millis(16)).unwrap();
    assert!((dt - 0.016).abs() < 1e-4);
    assert_eq!(s.pending(), None);
    s.resubmit(&mut host).unwrap();
    assert_eq!(s.pending(), Some(FrameRequest(2)));
    // Resubmitting with a frame already pending does nothing.
    s.resubmit(&mut host).unwrap();
    assert_eq!(host.next_frame, 3);

    s.begin_frame(t0 + Duration::from_millis(32)).unwrap();
    assert!((s.time() - 0.032).abs() < 1e-4);
    assert_eq!(s.frames(), 2);
}

#[test]
fn long_gaps_are_clamped() {
    let t0 = Instant::now();
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    s.start(&mut host, t0).unwrap();
    let dt = s.begin_frame(t0 + Duration::from_secs(5)).unwrap();
    assert_eq!(dt, MAX_FRAME_DT_SEC);
    assert_eq!(s.time(), MAX_FRAME_DT_SEC);
}

#[test]
fn stop_cancels_pending_and_is_idempotent() {
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    s.start(&mut host, Instant::now()).unwrap();
    assert!(s.stop(&mut host));
    assert_eq!(s.state(), SchedulerState::Stopped);
    assert_eq!(s.pending(), None);
    assert_eq!(host.pending_frame, None);
    assert!(host.events.contains(&Event::FrameCancelled(FrameRequest(1))));

    let events = host.events.len();
    assert!(!s.stop(&mut host));
    assert_eq!(host.events.len(), events);
}

#[test]
fn stopped_scheduler_never_ticks_or_resubmits() {
    let t0 = Instant::now();
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    s.start(&mut host, t0).unwrap();
    s.stop(&mut host);

    assert_eq!(s.begin_frame(t0 + Duration::from_millis(16)), None);
    s.resubmit(&mut host).unwrap();
    assert_eq!(host.next_frame, 2);
    s.start(&mut host, t0).unwrap();
    assert_eq!(s.state(), SchedulerState::Stopped);
}

#[test]
fn stop_from_idle_is_terminal() {
    let mut host = FakeHost::default();
    let mut s = FrameScheduler::new();
    assert!(s.stop(&mut host));
    s.start(&mut host, Instant::now()).unwrap();
    assert!(!s.is_running());
    assert!(host.events.is_empty());
}
