use super::{model_matrix, DrawItem, Renderable};
use glam::Vec3;

/// Glowing sphere circling the origin on a wobbling horizontal orbit.
#[derive(Clone, Debug)]
pub struct Orb {
    pub angle: f32,
    pub radius: f32,
    pub speed: f32,
    pub height: f32,
    pub pulse_factor: f32,
    pub color: [f32; 3],

    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub render: Renderable,
}

impl Orb {
    pub fn update(&mut self, index: usize, time: f32) {
        let i = index as f32;
        self.angle += self.speed;
        self.position = Vec3::new(
            self.angle.cos() * self.radius + (time * 0.7 + i).sin() * 10.0,
            self.height + (time * 1.2 + i).sin() * 20.0,
            self.angle.sin() * self.radius + (time * 0.5 + i).cos() * 10.0,
        );
        self.rotation.x += 0.01;
        self.rotation.y += 0.02;
        self.scale = 1.0 + (time * 3.0 + i).sin() * 0.2 * self.pulse_factor;
    }

    pub fn draw_item(&self) -> DrawItem {
        DrawItem {
            renderable: self.render,
            model: model_matrix(self.position, self.rotation, Vec3::splat(self.scale)),
            color: self.color,
            opacity: 0.8,
        }
    }
}
