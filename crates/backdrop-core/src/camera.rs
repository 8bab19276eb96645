//! Camera types shared with the web renderer.
//!
//! `CameraState` is the smoothed eye position chasing the pointer-driven
//! target; `Camera` is the matrix-producing snapshot handed to the backend
//! each frame.

use crate::constants::{CAMERA_FAR, CAMERA_FOV_Y_DEGREES, CAMERA_LERP, CAMERA_NEAR, CAMERA_Z};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub current_position: Vec3,
    pub target_position: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        let home = Vec3::new(0.0, 0.0, CAMERA_Z);
        Self {
            current_position: home,
            target_position: home,
        }
    }
}

impl CameraState {
    /// One interpolation step toward the target. The camera is always aimed at
    /// the origin afterwards, see [`CameraState::camera`].
    pub fn update(&mut self, target: Vec3) {
        self.target_position = target;
        self.current_position += (self.target_position - self.current_position) * CAMERA_LERP;
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.current_position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            fovy_radians: CAMERA_FOV_Y_DEGREES.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}
