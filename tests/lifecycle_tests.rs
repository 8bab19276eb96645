// Host-side tests for activation, the frame loop and teardown of the engine.

mod support;

use backdrop_core::*;
use glam::Vec3;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use support::{Event, FakeHost};

fn high() -> DeviceHints {
    DeviceHints::new(8, 8.0, 2.0)
}

fn low() -> DeviceHints {
    DeviceHints::new(4, 8.0, 2.0)
}

fn activated(host: FakeHost, hints: DeviceHints, t0: Instant) -> (Engine<FakeHost>, Activation) {
    let mut engine = Engine::new(host, &hints);
    let outcome = engine.activate(&mut StdRng::seed_from_u64(1), t0);
    (engine, outcome)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn high_tier_activation_allocates_everything() {
    let (engine, outcome) = activated(FakeHost::default(), high(), Instant::now());
    assert_eq!(outcome, Activation::Running);
    assert!(engine.is_running());
    assert!(engine.is_mounted());

    let reg = engine.registry();
    assert_eq!(reg.count_of(ResourceKind::Surface), 1);
    assert_eq!(reg.count_of(ResourceKind::RenderContext), 1);
    assert_eq!(reg.count_of(ResourceKind::Geometry), 27);
    assert_eq!(reg.count_of(ResourceKind::Material), 30);
    assert_eq!(reg.count_of(ResourceKind::ParticleBuffer), 3);
    assert_eq!(reg.count_of(ResourceKind::Listener), 2);
    assert_eq!(reg.len(), 64);

    let host = engine.host();
    assert_eq!(host.container_children, 1);
    assert_eq!(host.live.len(), 64);
    let kinds: Vec<ListenerKind> = host.listeners.iter().map(|(_, k)| *k).collect();
    assert_eq!(kinds, ListenerKind::ALL.to_vec());
    assert_eq!(host.pending_frame, Some(FrameRequest(1)));
    assert!(host.events.contains(&Event::Resized(Viewport::new(1280, 720), 2.0)));
}

#[test]
fn immediate_deactivate_leaves_nothing_behind() {
    let (mut engine, _) = activated(FakeHost::default(), high(), Instant::now());
    assert_eq!(engine.deactivate(), 64);

    assert!(engine.registry().is_empty());
    assert!(engine.scene().is_none());
    assert!(!engine.is_running());
    assert!(!engine.is_mounted());
    assert_eq!(engine.scheduler().state(), SchedulerState::Stopped);

    let host = engine.host();
    assert_eq!(host.container_children, 0);
    assert!(host.live.is_empty());
    assert!(host.listeners.is_empty());
    assert!(!host.context_live);
    assert_eq!(host.pending_frame, None);
}

#[test]
fn teardown_runs_in_reverse_allocation_order() {
    let (mut engine, _) = activated(FakeHost::default(), high(), Instant::now());
    engine.deactivate();
    let host = engine.host();

    let mut expected = host.allocated();
    expected.reverse();
    assert_eq!(host.disposed(), expected);

    let cancelled = host
        .position_of(|e| matches!(e, Event::FrameCancelled(_)))
        .expect("pending frame cancelled");
    let first_dispose = host
        .position_of(|e| matches!(e, Event::Disposed(_)))
        .expect("resources disposed");
    assert!(cancelled < first_dispose);

    let disposed = host.disposed();
    assert_eq!(disposed[0].kind, ResourceKind::Listener);
    assert_eq!(disposed[1].kind, ResourceKind::Listener);
    assert_eq!(disposed[disposed.len() - 2].kind, ResourceKind::RenderContext);
    assert_eq!(disposed[disposed.len() - 1].kind, ResourceKind::Surface);
}

#[test]
fn low_tier_activation_uses_reduced_budgets() {
    let (engine, outcome) = activated(FakeHost::default(), low(), Instant::now());
    assert_eq!(outcome, Activation::Running);
    assert_eq!(engine.profile().tier, Tier::Low);
    assert!(!engine.profile().shadows_enabled);

    let scene = engine.scene().expect("scene built");
    assert_eq!(scene.particles[0].system.count(), 600);
    assert_eq!(scene.particle_count(), 1300);
    assert_eq!(engine.registry().len(), 64);
    assert!(engine
        .host()
        .events
        .contains(&Event::Resized(Viewport::new(1280, 720), 1.0)));
}

#[test]
fn weak_device_activation_runs_low_tier() {
    let (mut engine, outcome) = activated(FakeHost::default(), DeviceHints::new(2, 2.0, 1.0), Instant::now());
    assert_eq!(outcome, Activation::Running);
    assert_eq!(engine.profile().tier, Tier::Low);
    assert!(!engine.profile().shadows_enabled);
    assert_eq!(engine.profile().particle_count(ParticleSystemKind::Primary), 600);
    let scene = engine.scene().expect("scene built");
    assert_eq!(scene.particles[0].system.count(), 600);

    assert_eq!(engine.deactivate(), 64);
    assert!(engine.registry().is_empty());
    assert_eq!(engine.host().container_children, 0);
}

#[test]
fn missing_container_disables_quietly() {
    let (mut engine, outcome) = activated(FakeHost::without_container(), high(), Instant::now());
    assert_eq!(outcome, Activation::NoContainer);
    assert!(!engine.is_running());
    assert!(engine.registry().is_empty());
    assert!(engine.host().events.is_empty());
    assert_eq!(engine.deactivate(), 0);
}

#[test]
fn context_failure_leaves_blank_surface() {
    let host = FakeHost {
        context_fails: true,
        ..FakeHost::default()
    };
    let (mut engine, outcome) = activated(host, high(), Instant::now());
    assert_eq!(outcome, Activation::Blank);
    assert!(!engine.is_running());
    assert!(engine.scene().is_none());
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.host().container_children, 1);
    assert_eq!(engine.host().pending_frame, None);

    assert_eq!(engine.deactivate(), 1);
    assert_eq!(engine.host().container_children, 0);
    assert!(engine.host().live.is_empty());
}

#[test]
fn partial_build_failure_releases_what_was_allocated() {
    let host = FakeHost {
        fail_geometry_at: Some(5),
        ..FakeHost::default()
    };
    let (mut engine, outcome) = activated(host, high(), Instant::now());
    assert_eq!(outcome, Activation::Blank);
    assert!(engine.scene().is_none());
    assert!(engine.host().listeners.is_empty());
    assert_eq!(engine.host().pending_frame, None);

    let reg = engine.registry();
    assert_eq!(reg.count_of(ResourceKind::Geometry), 5);
    assert_eq!(reg.count_of(ResourceKind::Material), 5);
    assert_eq!(reg.len(), 12);
    assert_eq!(engine.host().live.len(), 12);

    assert_eq!(engine.deactivate(), 12);
    assert!(engine.host().live.is_empty());
    assert_eq!(engine.host().container_children, 0);
}

#[test]
fn second_deactivate_is_a_no_op() {
    let (mut engine, _) = activated(FakeHost::default(), high(), Instant::now());
    engine.deactivate();
    let events = engine.host().events.len();
    assert_eq!(engine.deactivate(), 0);
    assert_eq!(engine.host().events.len(), events);
    assert!(engine.registry().is_empty());
}

#[test]
fn stopped_engine_cannot_be_restarted() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    engine.deactivate();
    engine.mount().unwrap();
    assert!(!engine.is_mounted());
    assert!(matches!(
        engine.start(&mut StdRng::seed_from_u64(2), t0),
        Err(EngineError::MissingContainer)
    ));
    assert_eq!(engine.host().container_children, 0);
    assert!(engine.registry().is_empty());
}

#[test]
fn start_twice_does_not_duplicate_resources() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    engine.start(&mut StdRng::seed_from_u64(3), t0).unwrap();
    assert_eq!(engine.registry().len(), 64);
    assert_eq!(engine.host().next_frame, 2);
}

#[test]
fn start_without_mount_reports_missing_container() {
    let mut engine = Engine::new(FakeHost::default(), &high());
    let result = engine.start(&mut StdRng::seed_from_u64(4), Instant::now());
    assert!(matches!(result, Err(EngineError::MissingContainer)));
    assert!(engine.registry().is_empty());
}

#[test]
fn frames_render_and_resubmit() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    for i in 1..=3 {
        assert!(engine.frame(t0 + ms(16 * i)));
    }
    let host = engine.host();
    assert_eq!(host.renders, 3);
    assert_eq!(host.pending_frame, Some(FrameRequest(4)));
    let time = host.last_render_time.expect("rendered");
    assert!((time - 0.048).abs() < 1e-4);
    assert_eq!(engine.scheduler().frames(), 3);
}

#[test]
fn frame_after_stop_does_nothing() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    engine.deactivate();
    let events = engine.host().events.len();
    assert!(!engine.frame(t0 + ms(16)));
    assert_eq!(engine.host().renders, 0);
    assert_eq!(engine.host().events.len(), events);
}

#[test]
fn render_errors_do_not_stop_the_loop() {
    let t0 = Instant::now();
    let host = FakeHost {
        render_fails: true,
        ..FakeHost::default()
    };
    let (mut engine, _) = activated(host, high(), t0);
    for i in 1..=5 {
        assert!(engine.frame(t0 + ms(16 * i)));
    }
    assert!(engine.is_running());
    assert_eq!(engine.host().renders, 5);
    assert_eq!(engine.host().pending_frame, Some(FrameRequest(6)));
}

#[test]
fn camera_eases_toward_pointer() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    engine.host_mut().queued_pointer = Some((0.0, 0.0));
    engine.frame(t0 + ms(16));

    let target = Vec3::new(-50.0, 50.0, 300.0);
    assert_eq!(engine.input().target(), target);
    let eye = engine.camera().current_position;
    assert!((eye - Vec3::new(-1.0, 1.0, 300.0)).length() < 1e-4);
    assert_eq!(engine.host().last_eye, Some(eye));

    for i in 2..600 {
        engine.frame(t0 + ms(16 * i));
    }
    assert!((engine.camera().current_position - target).length() < 0.1);
}

#[test]
fn pointer_moved_directly_updates_target() {
    let (mut engine, _) = activated(FakeHost::default(), high(), Instant::now());
    engine.pointer_moved(1280.0, 720.0);
    assert_eq!(engine.input().target(), Vec3::new(50.0, -50.0, 300.0));
}

#[test]
fn resizes_reach_the_backend_throttled() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);

    engine.host_mut().queued_resize = Some((640, 480));
    engine.frame(t0 + ms(16));
    assert!(engine
        .host()
        .events
        .contains(&Event::Resized(Viewport::new(640, 480), 2.0)));

    engine.resized(800, 600);
    engine.frame(t0 + ms(32));
    assert!(!engine
        .host()
        .events
        .contains(&Event::Resized(Viewport::new(800, 600), 2.0)));
    assert!(engine.input().has_pending_resize());

    engine.frame(t0 + ms(120));
    assert!(engine
        .host()
        .events
        .contains(&Event::Resized(Viewport::new(800, 600), 2.0)));
    assert_eq!(engine.input().viewport(), Viewport::new(800, 600));
}

#[test]
fn scene_advances_with_frames() {
    let t0 = Instant::now();
    let (mut engine, _) = activated(FakeHost::default(), high(), t0);
    let before = engine.scene().expect("scene").grid.rotation_y;
    engine.frame(t0 + ms(16));
    engine.frame(t0 + ms(32));
    let after = engine.scene().expect("scene").grid.rotation_y;
    assert!(after > before);
}
