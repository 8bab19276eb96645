pub mod backend;
pub mod camera;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod profile;
pub mod registry;
pub mod scene;
pub mod scheduler;

pub use backend::*;
pub use camera::*;
pub use engine::*;
pub use error::*;
pub use input::*;
pub use profile::*;
pub use registry::*;
pub use scheduler::*;
