use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in, normalized.
    pub direction: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    pub base_intensity: f32,
    pub range: f32,
    phase: f32,
    speed: f32,
}

impl PointLight {
    fn new(color: [f32; 3], base_intensity: f32, phase: f32, speed: f32) -> Self {
        let mut light = Self {
            position: Vec3::ZERO,
            color,
            intensity: base_intensity,
            base_intensity,
            range: 600.0,
            phase,
            speed,
        };
        light.update(0.0);
        light
    }

    fn update(&mut self, time: f32) {
        let t = time * self.speed + self.phase;
        self.position = Vec3::new(t.sin() * 200.0, (t * 0.6).cos() * 100.0, t.cos() * 200.0);
        self.intensity = self.base_intensity + (time * 2.0 + self.phase).sin() * 0.3;
    }
}

#[derive(Clone, Debug)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub points: [PointLight; 3],
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: [0.25, 0.28, 0.4],
                intensity: 0.6,
            },
            directional: DirectionalLight {
                direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
                color: [1.0, 1.0, 1.0],
                intensity: 0.8,
            },
            points: [
                PointLight::new([0.0, 1.0, 1.0], 1.2, 0.0, 0.5),
                PointLight::new([1.0, 0.0, 1.0], 1.0, 2.1, 0.3),
                PointLight::new([0.4, 0.5, 1.0], 0.9, 4.2, 0.7),
            ],
        }
    }
}

impl Lights {
    pub fn update(&mut self, time: f32) {
        for light in &mut self.points {
            light.update(time);
        }
    }
}
