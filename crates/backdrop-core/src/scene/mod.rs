//! The fixed decorative scene: shapes, particle systems, the energy grid,
//! orbs, rings and lights. Everything here is built once per activation and
//! mutated in place by [`Scene::advance`].

use crate::registry::ResourceHandle;
use glam::{EulerRot, Mat4, Quat, Vec3};

mod builder;
mod grid;
mod lights;
mod orbs;
mod particles;
mod rings;
mod shapes;

pub use builder::SceneAssetBuilder;
pub use grid::{EnergyGrid, GridLattice};
pub use lights::{AmbientLight, DirectionalLight, Lights, PointLight};
pub use orbs::Orb;
pub use particles::{reflect_axis, ParticleLayer, ParticlePattern, ParticleSystem};
pub use rings::Ring;
pub use shapes::Shape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Additive,
}

/// Static surface description uploaded once per object.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: f32,
    pub blend: BlendMode,
    pub lit: bool,
    /// Billboard size in pixels for point geometry.
    pub point_size: f32,
}

impl Material {
    pub fn lit(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            emissive: 0.15,
            blend: BlendMode::Alpha,
            lit: true,
            point_size: 0.0,
        }
    }

    pub fn glow(color: [f32; 3], opacity: f32, emissive: f32) -> Self {
        Self {
            color,
            opacity,
            emissive,
            blend: BlendMode::Additive,
            lit: false,
            point_size: 0.0,
        }
    }

    pub fn points(color: [f32; 3], opacity: f32, point_size: f32) -> Self {
        Self {
            color,
            opacity,
            emissive: 1.0,
            blend: BlendMode::Additive,
            lit: false,
            point_size,
        }
    }
}

/// Geometry and material handles of one drawable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    pub geometry: ResourceHandle,
    pub material: ResourceHandle,
}

/// Per-frame draw record handed to the backend.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub renderable: Renderable,
    pub model: Mat4,
    pub color: [f32; 3],
    pub opacity: f32,
}

#[inline]
pub fn model_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        scale,
        Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
        position,
    )
}

/// HSL (all components in \[0, 1\]) to linear-ish RGB.
pub fn hsl(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

#[derive(Debug)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub particles: Vec<ParticleLayer>,
    pub grid: EnergyGrid,
    pub orbs: Vec<Orb>,
    pub rings: Vec<Ring>,
    pub lights: Lights,
}

impl Scene {
    /// Advance every subsystem to `time` (seconds since start). Order matters
    /// only for readability; subsystems do not read each other's state.
    pub fn advance(&mut self, time: f32) {
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            shape.update(i, time);
        }
        for layer in &mut self.particles {
            layer.system.update(time);
        }
        self.grid.update(time);
        for (i, ring) in self.rings.iter_mut().enumerate() {
            ring.update(i, time);
        }
        for (i, orb) in self.orbs.iter_mut().enumerate() {
            orb.update(i, time);
        }
        self.lights.update(time);
    }

    /// Triangle and line draws: shapes, rings, orbs, then the grid.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem> + '_ {
        self.shapes
            .iter()
            .map(Shape::draw_item)
            .chain(self.rings.iter().map(Ring::draw_item))
            .chain(self.orbs.iter().map(Orb::draw_item))
            .chain(self.grid.draw_items())
    }

    pub fn particle_count(&self) -> usize {
        self.particles.iter().map(|l| l.system.count()).sum()
    }
}
