// Tuned visual constants shared by the scene builder and the per-frame update.
// These are visual constants chosen by eye, not derived from a physical model.

// Device tiers
pub const LOW_TIER_MAX_CORES: u32 = 4;
pub const LOW_TIER_MAX_MEMORY_GB: f32 = 4.0;
pub const ASSUMED_CORES: u32 = 8;
pub const ASSUMED_MEMORY_GB: f32 = 8.0;
pub const ASSUMED_PIXEL_RATIO: f32 = 1.0;
pub const HIGH_PIXEL_RATIO_CAP: f32 = 2.0;
pub const LOW_PIXEL_RATIO_CAP: f32 = 1.0;
pub const HIGH_GEOMETRY_DETAIL: u32 = 16;
pub const LOW_GEOMETRY_DETAIL: u32 = 8;

// High-tier particle budgets; the low tier halves each of them
pub const PRIMARY_PARTICLES: usize = 1200;
pub const SPIRAL_PARTICLES: usize = 800;
pub const SPHERE_PARTICLES: usize = 600;

// Particle motion
pub const PARTICLE_BOUND_XZ: f32 = 400.0;
pub const PARTICLE_BOUND_Y: f32 = 300.0;
pub const REFLECTION_DAMPING: f32 = 0.8;
pub const PARTICLE_WOBBLE: f32 = 0.1; // velocity modulation amplitude
pub const PARTICLE_MAX_SPEED: f32 = 0.6; // initial per-axis speed
pub const COLOR_INTENSITY_MID: f32 = 0.5;
pub const COLOR_INTENSITY_SPAN: f32 = 0.3; // intensity stays in [0.2, 0.8]
pub const SPIRAL_MAX_RADIUS: f32 = 350.0;
pub const SPIRAL_TURNS_RADIANS: f32 = 12.0 * std::f32::consts::PI;
pub const SPIRAL_THICKNESS: f32 = 20.0;
pub const SPHERE_MIN_RADIUS: f32 = 300.0;
pub const SPHERE_MAX_RADIUS: f32 = 500.0;

// Shapes
pub const SHAPE_COUNT: usize = 15;
pub const SHAPE_SPREAD_XZ: f32 = 300.0;
pub const SHAPE_SPREAD_Y: f32 = 150.0;
pub const SHAPE_OPACITY_BASE: f32 = 0.3;
pub const SHAPE_OPACITY_SPAN: f32 = 0.15;
pub const SHAPE_PULSE_SPAN: f32 = 0.15;
pub const SHAPE_ORBIT_SCALE: f32 = 0.01;

// Energy grid
pub const GRID_SIZE: usize = 20;
pub const GRID_SPACING: f32 = 40.0;
pub const GRID_BASE_Y: f32 = -200.0;
pub const GRID_WAVE_HEIGHT: f32 = 15.0;
pub const GRID_SPIN_PER_FRAME: f32 = 0.001;
pub const GRID_BOB_HEIGHT: f32 = 10.0;

// Orbs
pub const ORB_COUNT: usize = 6;
pub const ORB_MIN_RADIUS: f32 = 150.0;
pub const ORB_MAX_RADIUS: f32 = 250.0;
pub const ORB_SIZE: f32 = 8.0;

// Rings
pub const RING_COUNT: usize = 4;
pub const RING_BASE_RADIUS: f32 = 60.0;
pub const RING_RADIUS_STEP: f32 = 25.0;
pub const RING_TUBE_RADIUS: f32 = 0.8;
pub const RING_FLATTEN: f32 = 0.15;
pub const RING_OPACITY_SPAN: f32 = 0.1;
pub const RING_WOBBLE: f32 = 0.2;

// Camera
pub const CAMERA_Z: f32 = 300.0;
pub const CAMERA_LERP: f32 = 0.02;
pub const POINTER_RANGE: f32 = 50.0;
pub const CAMERA_FOV_Y_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;

// Frame pacing
pub const RESIZE_THROTTLE_MS: u64 = 100;
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
