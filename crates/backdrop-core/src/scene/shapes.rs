use super::{model_matrix, DrawItem, Renderable};
use crate::constants::{SHAPE_OPACITY_SPAN, SHAPE_ORBIT_SCALE, SHAPE_PULSE_SPAN};
use crate::geometry::GeometryKind;
use glam::Vec3;

/// A floating, spinning, pulsing translucent solid.
#[derive(Clone, Debug)]
pub struct Shape {
    pub geometry_kind: GeometryKind,
    pub base_position: Vec3,
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
    pub float_speed: f32,
    pub float_range: f32,
    pub initial_y: f32,
    pub pulse_factor: f32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub color: [f32; 3],
    pub opacity_base: f32,

    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
    pub render: Renderable,
}

impl Shape {
    pub fn update(&mut self, index: usize, time: f32) {
        let i = index as f32;
        self.rotation += self.rotation_speed;

        // Orbital displacement is taken from the base position, so it never drifts.
        let orbit_phase = time * self.orbit_speed + i;
        let orbit = self.orbit_radius * SHAPE_ORBIT_SCALE;
        self.position.x = self.base_position.x + orbit_phase.cos() * orbit;
        self.position.z = self.base_position.z + orbit_phase.sin() * orbit;
        self.position.y = self.initial_y + (time * self.float_speed + i).sin() * self.float_range;

        self.scale = 1.0 + (time * 2.0 + i).sin() * SHAPE_PULSE_SPAN * self.pulse_factor;
        self.opacity = self.opacity_base + (time * 1.5 + i).sin() * SHAPE_OPACITY_SPAN;
    }

    pub fn draw_item(&self) -> DrawItem {
        DrawItem {
            renderable: self.render,
            model: model_matrix(self.position, self.rotation, Vec3::splat(self.scale)),
            color: self.color,
            opacity: self.opacity,
        }
    }
}
