// Canvas and renderer tuning for the WebGPU front-end. Scene behaviour
// constants live in `backdrop_core::constants`.

// Canvas element placed inside the mount container
pub const CANVAS_CLASS: &str = "backdrop-canvas";
pub const CANVAS_Z_INDEX: &str = "0";

// Background the HDR target is cleared to (linear RGB)
pub const CLEAR_COLOR: [f64; 3] = [0.004, 0.006, 0.018];

// Tone mapping
pub const EXPOSURE_LINEAR: f32 = 1.0;
pub const EXPOSURE_ACES: f32 = 1.2;

// Directional shadow map (high tier only)
pub const SHADOW_MAP_SIZE: u32 = 2048;
pub const SHADOW_EXTENT: f32 = 550.0; // half-width of the orthographic light frustum
pub const SHADOW_DISTANCE: f32 = 700.0; // light eye distance from the origin
pub const SHADOW_FAR: f32 = 1500.0;

// Per-particle instance: position + color, three f32 each
pub const PARTICLE_INSTANCE_BYTES: u64 = 24;

// Uniform sizes checked against the WGSL structs
pub const GLOBALS_UNIFORM_BYTES: u64 = 304;
pub const OBJECT_UNIFORM_BYTES: u64 = 96;
pub const POST_UNIFORM_BYTES: u64 = 16;

// Point lights carried by the globals uniform
pub const MAX_POINT_LIGHTS: usize = 3;
