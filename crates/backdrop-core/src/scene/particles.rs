//! Particle systems: fixed-size clouds that drift, bounce off an invisible box
//! and shimmer.

use super::{hsl, Renderable};
use crate::constants::*;
use crate::profile::ParticleSystemKind;
use crate::registry::ResourceHandle;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticlePattern {
    Random,
    Spiral,
    Sphere,
}

impl ParticlePattern {
    pub fn for_kind(kind: ParticleSystemKind) -> Self {
        match kind {
            ParticleSystemKind::Primary => ParticlePattern::Random,
            ParticleSystemKind::Spiral => ParticlePattern::Spiral,
            ParticleSystemKind::Sphere => ParticlePattern::Sphere,
        }
    }
}

/// Inelastic reflection of one axis. Fires whenever the updated position is
/// outside `bound`; returns whether it fired.
#[inline]
pub fn reflect_axis(position: f32, velocity: &mut f32, bound: f32) -> bool {
    if position.abs() > bound {
        *velocity = -*velocity * REFLECTION_DAMPING;
        true
    } else {
        false
    }
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    pattern: ParticlePattern,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    base_colors: Vec<[f32; 3]>,
    color_speed: f32,
}

impl ParticleSystem {
    /// Assemble a system from explicit parallel arrays. Returns `None` if the
    /// lengths differ.
    pub fn from_parts(
        pattern: ParticlePattern,
        positions: Vec<Vec3>,
        velocities: Vec<Vec3>,
        colors: Vec<[f32; 3]>,
    ) -> Option<Self> {
        if positions.len() != velocities.len() || positions.len() != colors.len() {
            return None;
        }
        Some(Self {
            pattern,
            positions,
            velocities,
            base_colors: colors.clone(),
            colors,
            color_speed: 1.0,
        })
    }

    pub fn generate<R: Rng + ?Sized>(pattern: ParticlePattern, count: usize, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let jitter = |rng: &mut R, s: f32| {
            Vec3::new(
                rng.gen_range(-s..=s),
                rng.gen_range(-s..=s),
                rng.gen_range(-s..=s),
            )
        };
        for i in 0..count {
            let t = i as f32 / count.max(1) as f32;
            match pattern {
                ParticlePattern::Random => {
                    positions.push(Vec3::new(
                        rng.gen_range(-PARTICLE_BOUND_XZ..=PARTICLE_BOUND_XZ),
                        rng.gen_range(-PARTICLE_BOUND_Y..=PARTICLE_BOUND_Y),
                        rng.gen_range(-PARTICLE_BOUND_XZ..=PARTICLE_BOUND_XZ),
                    ));
                    velocities.push(jitter(&mut *rng, PARTICLE_MAX_SPEED));
                    colors.push(hsl(rng.gen_range(0.5..0.75), 0.8, 0.6));
                }
                ParticlePattern::Spiral => {
                    let radius = t * SPIRAL_MAX_RADIUS;
                    let angle = t * SPIRAL_TURNS_RADIANS;
                    positions.push(Vec3::new(
                        angle.cos() * radius,
                        rng.gen_range(-SPIRAL_THICKNESS..=SPIRAL_THICKNESS),
                        angle.sin() * radius,
                    ));
                    velocities.push(jitter(&mut *rng, PARTICLE_MAX_SPEED * 0.3));
                    colors.push(hsl(0.5 + t * 0.3, 0.9, 0.55));
                }
                ParticlePattern::Sphere => {
                    let radius = rng.gen_range(SPHERE_MIN_RADIUS..=SPHERE_MAX_RADIUS);
                    let theta = rng.gen_range(0.0..TAU);
                    let phi = rng.gen_range(0.0..=PI);
                    positions.push(Vec3::new(
                        radius * phi.sin() * theta.cos(),
                        radius * phi.cos(),
                        radius * phi.sin() * theta.sin(),
                    ));
                    velocities.push(jitter(&mut *rng, PARTICLE_MAX_SPEED * 0.5));
                    colors.push(hsl(rng.gen_range(0.6..0.7), 0.5, 0.75));
                }
            }
        }
        let color_speed = match pattern {
            ParticlePattern::Random => 0.5,
            ParticlePattern::Spiral => 0.8,
            ParticlePattern::Sphere => 0.3,
        };
        Self {
            pattern,
            positions,
            velocities,
            base_colors: colors.clone(),
            colors,
            color_speed,
        }
    }

    /// One frame of motion and shimmer at absolute time `time`.
    pub fn update(&mut self, time: f32) {
        let intensity = COLOR_INTENSITY_MID + (time * self.color_speed).sin() * COLOR_INTENSITY_SPAN;
        for (i, ((p, v), (c, base))) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(self.colors.iter_mut().zip(self.base_colors.iter()))
            .enumerate()
        {
            let wobble = 1.0 + (time + i as f32 * 0.01).sin() * PARTICLE_WOBBLE;
            *p += *v * wobble;
            reflect_axis(p.x, &mut v.x, PARTICLE_BOUND_XZ);
            reflect_axis(p.y, &mut v.y, PARTICLE_BOUND_Y);
            reflect_axis(p.z, &mut v.z, PARTICLE_BOUND_XZ);
            *c = [base[0] * intensity, base[1] * intensity, base[2] * intensity];
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn pattern(&self) -> ParticlePattern {
        self.pattern
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn base_colors(&self) -> &[[f32; 3]] {
        &self.base_colors
    }
}

/// A particle system plus the GPU handles it draws through.
#[derive(Clone, Debug)]
pub struct ParticleLayer {
    pub kind: ParticleSystemKind,
    pub system: ParticleSystem,
    pub buffer: ResourceHandle,
    pub material: ResourceHandle,
    pub opacity: f32,
}

impl ParticleLayer {
    pub fn renderable(&self) -> Renderable {
        Renderable {
            geometry: self.buffer,
            material: self.material,
        }
    }
}
