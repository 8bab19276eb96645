// Host-side tests for device profiling.

use backdrop_core::*;

#[test]
fn weak_hardware_gets_low_tier_budgets() {
    let p = profile_device(&DeviceHints::new(4, 8.0, 3.0));
    assert_eq!(p.tier, Tier::Low);
    assert_eq!(p.particle_count(ParticleSystemKind::Primary), 600);
    assert_eq!(p.particle_count(ParticleSystemKind::Spiral), 400);
    assert_eq!(p.particle_count(ParticleSystemKind::Sphere), 300);
    assert_eq!(p.geometry_detail, 8);
    assert_eq!(p.pixel_ratio_cap, 1.0);
    assert!(!p.shadows_enabled);
    assert_eq!(p.tone_mapping, ToneMapping::Linear);
}

#[test]
fn low_memory_alone_is_enough_for_low_tier() {
    let p = profile_device(&DeviceHints::new(16, 4.0, 1.0));
    assert_eq!(p.tier, Tier::Low);
    let p = profile_device(&DeviceHints::new(16, 2.0, 1.0));
    assert_eq!(p.tier, Tier::Low);
}

#[test]
fn strong_hardware_gets_high_tier_budgets() {
    let p = profile_device(&DeviceHints::new(8, 16.0, 3.0));
    assert_eq!(p.tier, Tier::High);
    assert_eq!(p.particle_count(ParticleSystemKind::Primary), 1200);
    assert_eq!(p.particle_count(ParticleSystemKind::Spiral), 800);
    assert_eq!(p.particle_count(ParticleSystemKind::Sphere), 600);
    assert_eq!(p.geometry_detail, 16);
    assert_eq!(p.pixel_ratio_cap, 2.0);
    assert!(p.shadows_enabled);
    assert_eq!(p.tone_mapping, ToneMapping::AcesFilmic);
}

#[test]
fn high_tier_cap_follows_device_ratio_below_two() {
    let p = profile_device(&DeviceHints::new(8, 8.0, 1.5));
    assert_eq!(p.pixel_ratio_cap, 1.5);
}

#[test]
fn missing_hints_assume_adequate_hardware() {
    let p = profile_device(&DeviceHints::default());
    assert_eq!(p.tier, Tier::High);
    assert_eq!(p.pixel_ratio_cap, 1.0);
}

#[test]
fn unusable_hints_count_as_missing() {
    let hints = DeviceHints {
        cpu_cores: Some(0),
        device_memory_gb: Some(f32::NAN),
        device_pixel_ratio: Some(-2.0),
    };
    assert_eq!(profile_device(&hints), profile_device(&DeviceHints::default()));
}

#[test]
fn profiling_is_pure() {
    let hints = DeviceHints::new(2, 1.0, 2.0);
    assert_eq!(profile_device(&hints), profile_device(&hints));
}

#[test]
fn particle_counts_are_addressable_by_name() {
    let p = profile_device(&DeviceHints::new(2, 2.0, 1.0));
    assert_eq!(p.particle_count_by_name("primary"), Some(600));
    assert_eq!(p.particle_count_by_name("spiral"), Some(400));
    assert_eq!(p.particle_count_by_name("sphere"), Some(300));
    assert_eq!(p.particle_count_by_name("comet"), None);
    assert_eq!(Tier::Low.as_str(), "low");
    assert_eq!(Tier::High.as_str(), "high");
}
