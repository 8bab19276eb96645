//! Device capability profiling.
//!
//! Maps the optional hardware hints a browser exposes to a coarse quality tier
//! and the budgets derived from it. The profile is computed once per
//! activation and never changes afterwards.

use crate::constants::*;
use smallvec::SmallVec;

/// Hardware hints as reported by the platform. Any of them may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceHints {
    pub cpu_cores: Option<u32>,
    pub device_memory_gb: Option<f32>,
    pub device_pixel_ratio: Option<f32>,
}

impl DeviceHints {
    pub fn new(cpu_cores: u32, device_memory_gb: f32, device_pixel_ratio: f32) -> Self {
        Self {
            cpu_cores: Some(cpu_cores),
            device_memory_gb: Some(device_memory_gb),
            device_pixel_ratio: Some(device_pixel_ratio),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Low,
    High,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneMapping {
    /// Plain clamp; cheapest.
    Linear,
    /// ACES filmic curve.
    AcesFilmic,
}

/// The particle systems every scene carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleSystemKind {
    Primary,
    Spiral,
    Sphere,
}

impl ParticleSystemKind {
    pub const ALL: [ParticleSystemKind; 3] = [
        ParticleSystemKind::Primary,
        ParticleSystemKind::Spiral,
        ParticleSystemKind::Sphere,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParticleSystemKind::Primary => "primary",
            ParticleSystemKind::Spiral => "spiral",
            ParticleSystemKind::Sphere => "sphere",
        }
    }

    fn high_tier_budget(self) -> usize {
        match self {
            ParticleSystemKind::Primary => PRIMARY_PARTICLES,
            ParticleSystemKind::Spiral => SPIRAL_PARTICLES,
            ParticleSystemKind::Sphere => SPHERE_PARTICLES,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub tier: Tier,
    pub pixel_ratio_cap: f32,
    pub geometry_detail: u32,
    pub particle_counts: SmallVec<[(ParticleSystemKind, usize); 3]>,
    pub shadows_enabled: bool,
    pub tone_mapping: ToneMapping,
}

impl DeviceProfile {
    /// Particle budget for a system; zero if the system is not in the profile.
    pub fn particle_count(&self, kind: ParticleSystemKind) -> usize {
        self.particle_counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn particle_count_by_name(&self, name: &str) -> Option<usize> {
        self.particle_counts
            .iter()
            .find(|(k, _)| k.name() == name)
            .map(|(_, n)| *n)
    }
}

fn usable_f32(v: Option<f32>) -> Option<f32> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

/// Classify the device and derive its budgets. Pure; missing hints are
/// treated as adequate hardware.
pub fn profile_device(hints: &DeviceHints) -> DeviceProfile {
    let cores = hints.cpu_cores.filter(|c| *c > 0).unwrap_or(ASSUMED_CORES);
    let memory = usable_f32(hints.device_memory_gb).unwrap_or(ASSUMED_MEMORY_GB);
    let ratio = usable_f32(hints.device_pixel_ratio).unwrap_or(ASSUMED_PIXEL_RATIO);

    let tier = if cores <= LOW_TIER_MAX_CORES || memory <= LOW_TIER_MAX_MEMORY_GB {
        Tier::Low
    } else {
        Tier::High
    };

    let particle_counts = ParticleSystemKind::ALL
        .iter()
        .map(|&kind| {
            let n = kind.high_tier_budget();
            (kind, if tier == Tier::Low { n / 2 } else { n })
        })
        .collect();

    match tier {
        Tier::Low => DeviceProfile {
            tier,
            pixel_ratio_cap: LOW_PIXEL_RATIO_CAP,
            geometry_detail: LOW_GEOMETRY_DETAIL,
            particle_counts,
            shadows_enabled: false,
            tone_mapping: ToneMapping::Linear,
        },
        Tier::High => DeviceProfile {
            tier,
            pixel_ratio_cap: ratio.min(HIGH_PIXEL_RATIO_CAP),
            geometry_detail: HIGH_GEOMETRY_DETAIL,
            particle_counts,
            shadows_enabled: true,
            tone_mapping: ToneMapping::AcesFilmic,
        },
    }
}
