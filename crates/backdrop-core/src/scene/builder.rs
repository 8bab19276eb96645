use super::*;
use crate::backend::RenderBackend;
use crate::constants::*;
use crate::error::EngineError;
use crate::geometry::{self, GeometryKind, MeshData};
use crate::profile::{DeviceProfile, ParticleSystemKind};
use crate::registry::{ResourceKind, ResourceRegistry};
use rand::Rng;
use std::f32::consts::TAU;

/// Allocates the whole scene population for one activation. Each GPU object
/// is registered at the moment the backend creates it, so a build that fails
/// halfway leaves a registry that still covers everything allocated.
pub struct SceneAssetBuilder<'a> {
    profile: &'a DeviceProfile,
    registry: &'a mut ResourceRegistry,
    backend: &'a mut dyn RenderBackend,
}

impl<'a> SceneAssetBuilder<'a> {
    pub fn new(
        profile: &'a DeviceProfile,
        registry: &'a mut ResourceRegistry,
        backend: &'a mut dyn RenderBackend,
    ) -> Self {
        Self {
            profile,
            registry,
            backend,
        }
    }

    pub fn build<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Scene, EngineError> {
        let shapes = self.build_shapes(rng)?;
        let particles = self.build_particles(rng)?;
        let grid = self.build_grid()?;
        let orbs = self.build_orbs(rng)?;
        let rings = self.build_rings(rng)?;
        let scene = Scene {
            shapes,
            particles,
            grid,
            orbs,
            rings,
            lights: Lights::default(),
        };
        log::info!(
            "[scene] built shapes={} particles={} orbs={} rings={} grid={}x{} resources={}",
            scene.shapes.len(),
            scene.particle_count(),
            scene.orbs.len(),
            scene.rings.len(),
            scene.grid.lattice.size,
            scene.grid.lattice.size,
            self.registry.len()
        );
        Ok(scene)
    }

    fn renderable(&mut self, mesh: &MeshData, material: &Material) -> Result<Renderable, EngineError> {
        let backend = &mut *self.backend;
        let geometry = self
            .registry
            .allocate(ResourceKind::Geometry, |h| backend.create_geometry(h, mesh))?;
        let material = self
            .registry
            .allocate(ResourceKind::Material, |h| backend.create_material(h, material))?;
        Ok(Renderable { geometry, material })
    }

    fn build_shapes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Shape>, EngineError> {
        let detail = self.profile.geometry_detail;
        let mut shapes = Vec::with_capacity(SHAPE_COUNT);
        for i in 0..SHAPE_COUNT {
            let kind = GeometryKind::ALL[i % GeometryKind::ALL.len()];
            let size = rng.gen_range(10.0..25.0);
            let color = hsl(rng.gen_range(0.5..0.85), 0.8, 0.6);
            let render = self.renderable(&kind.build(size, detail), &Material::lit(color, SHAPE_OPACITY_BASE))?;
            let base_position = Vec3::new(
                rng.gen_range(-SHAPE_SPREAD_XZ..=SHAPE_SPREAD_XZ),
                rng.gen_range(-SHAPE_SPREAD_Y..=SHAPE_SPREAD_Y),
                rng.gen_range(-SHAPE_SPREAD_XZ..=SHAPE_SPREAD_XZ),
            );
            shapes.push(Shape {
                geometry_kind: kind,
                base_position,
                rotation: Vec3::new(
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                ),
                rotation_speed: Vec3::new(
                    rng.gen_range(-0.01..0.01),
                    rng.gen_range(-0.01..0.01),
                    rng.gen_range(-0.01..0.01),
                ),
                float_speed: rng.gen_range(0.5..1.5),
                float_range: rng.gen_range(10.0..30.0),
                initial_y: base_position.y,
                pulse_factor: rng.gen_range(0.5..1.5),
                orbit_radius: rng.gen_range(50.0..150.0),
                orbit_speed: rng.gen_range(0.1..0.5),
                color,
                opacity_base: SHAPE_OPACITY_BASE,
                position: base_position,
                scale: 1.0,
                opacity: SHAPE_OPACITY_BASE,
                render,
            });
        }
        Ok(shapes)
    }

    fn build_particles<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<ParticleLayer>, EngineError> {
        let mut layers = Vec::with_capacity(ParticleSystemKind::ALL.len());
        for kind in ParticleSystemKind::ALL {
            let count = self.profile.particle_count(kind);
            let system = ParticleSystem::generate(ParticlePattern::for_kind(kind), count, rng);
            let backend = &mut *self.backend;
            let buffer = self
                .registry
                .allocate(ResourceKind::ParticleBuffer, |h| {
                    backend.create_particle_buffer(h, count)
                })?;
            let point_size = match kind {
                ParticleSystemKind::Primary => 2.5,
                ParticleSystemKind::Spiral => 2.0,
                ParticleSystemKind::Sphere => 1.5,
            };
            let material = self.registry.allocate(ResourceKind::Material, |h| {
                backend.create_material(h, &Material::points([0.0; 3], 0.8, point_size))
            })?;
            layers.push(ParticleLayer {
                kind,
                system,
                buffer,
                material,
                opacity: 0.8,
            });
        }
        Ok(layers)
    }

    fn build_grid(&mut self) -> Result<EnergyGrid, EngineError> {
        let lattice = GridLattice::new(GRID_SIZE, GRID_SPACING);
        let color = [0.0, 0.8, 1.0];
        let edges = self.renderable(
            &geometry::lines(&lattice.nodes, &lattice.edges),
            &Material::glow(color, 0.15, 0.6),
        )?;
        let nodes = self.renderable(&geometry::points(&lattice.nodes), &Material::points(color, 0.6, 3.0))?;
        Ok(EnergyGrid {
            lattice,
            base_y: GRID_BASE_Y,
            rotation_y: 0.0,
            offset_y: GRID_BASE_Y,
            color,
            node_opacity: 0.6,
            edge_opacity: 0.15,
            nodes,
            edges,
        })
    }

    fn build_orbs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Orb>, EngineError> {
        let detail = self.profile.geometry_detail;
        let mut orbs = Vec::with_capacity(ORB_COUNT);
        for i in 0..ORB_COUNT {
            let color = hsl(i as f32 / ORB_COUNT as f32, 0.9, 0.6);
            let render = self.renderable(
                &geometry::uv_sphere(ORB_SIZE, detail, detail),
                &Material::glow(color, 0.8, 1.5),
            )?;
            orbs.push(Orb {
                angle: i as f32 / ORB_COUNT as f32 * TAU,
                radius: rng.gen_range(ORB_MIN_RADIUS..ORB_MAX_RADIUS),
                speed: rng.gen_range(0.002..0.005),
                height: rng.gen_range(-50.0..50.0),
                pulse_factor: rng.gen_range(0.5..1.5),
                color,
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                scale: 1.0,
                render,
            });
        }
        Ok(orbs)
    }

    fn build_rings<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Ring>, EngineError> {
        let detail = self.profile.geometry_detail;
        let mut rings = Vec::with_capacity(RING_COUNT);
        for i in 0..RING_COUNT {
            let base_radius = RING_BASE_RADIUS + RING_RADIUS_STEP * i as f32;
            let base_opacity = 0.35 - 0.05 * i as f32;
            let color = hsl(0.5 + 0.08 * i as f32, 0.9, 0.55);
            let render = self.renderable(
                &geometry::torus(base_radius, RING_TUBE_RADIUS, (detail / 4).max(3), detail * 4),
                &Material::glow(color, base_opacity, 1.0),
            )?;
            rings.push(Ring {
                base_radius,
                speed: rng.gen_range(0.002..0.006),
                direction: if i % 2 == 0 { 1.0 } else { -1.0 },
                base_opacity,
                wobble_speed: rng.gen_range(0.3..0.8),
                color,
                rotation: Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
                opacity: base_opacity,
                render,
            });
        }
        Ok(rings)
    }
}
