use super::{model_matrix, DrawItem, Renderable};
use crate::constants::{RING_FLATTEN, RING_OPACITY_SPAN, RING_WOBBLE};
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Flattened torus spinning about its own axis while its plane precesses.
#[derive(Clone, Debug)]
pub struct Ring {
    pub base_radius: f32,
    pub speed: f32,
    pub direction: f32,
    pub base_opacity: f32,
    pub wobble_speed: f32,
    pub color: [f32; 3],

    pub rotation: Vec3,
    pub opacity: f32,
    pub render: Renderable,
}

impl Ring {
    pub fn update(&mut self, index: usize, time: f32) {
        let i = index as f32;
        self.rotation.z += self.speed * self.direction;
        self.rotation.x = FRAC_PI_2 + (time * self.wobble_speed + i).sin() * RING_WOBBLE;
        self.rotation.y = (time * self.wobble_speed * 0.7 + i).cos() * RING_WOBBLE;
        self.opacity = self.base_opacity + (time * 3.0 + i).sin() * RING_OPACITY_SPAN;
    }

    pub fn draw_item(&self) -> DrawItem {
        DrawItem {
            renderable: self.render,
            model: model_matrix(Vec3::ZERO, self.rotation, Vec3::new(1.0, 1.0, RING_FLATTEN)),
            color: self.color,
            opacity: self.opacity,
        }
    }
}
