use super::{model_matrix, DrawItem, Renderable};
use crate::constants::{GRID_BOB_HEIGHT, GRID_SPIN_PER_FRAME, GRID_WAVE_HEIGHT};
use glam::Vec3;

/// Node positions and edges of a G×G lattice. Edges join neighbours along the
/// x axis only, so there are exactly `G * (G - 1)` of them.
#[derive(Clone, Debug)]
pub struct GridLattice {
    pub size: usize,
    pub nodes: Vec<Vec3>,
    pub edges: Vec<(u32, u32)>,
}

impl GridLattice {
    pub fn new(size: usize, spacing: f32) -> Self {
        let half = size.saturating_sub(1) as f32 * 0.5;
        let mut nodes = Vec::with_capacity(size * size);
        for iz in 0..size {
            for ix in 0..size {
                let (fx, fz) = (ix as f32, iz as f32);
                nodes.push(Vec3::new(
                    (fx - half) * spacing,
                    (fx * 0.5).sin() * (fz * 0.5).cos() * GRID_WAVE_HEIGHT,
                    (fz - half) * spacing,
                ));
            }
        }
        let mut edges = Vec::with_capacity(size * size.saturating_sub(1));
        for iz in 0..size {
            for ix in 0..size.saturating_sub(1) {
                let a = (iz * size + ix) as u32;
                edges.push((a, a + 1));
            }
        }
        Self { size, nodes, edges }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// The slowly turning lattice below the scene.
#[derive(Clone, Debug)]
pub struct EnergyGrid {
    pub lattice: GridLattice,
    pub base_y: f32,
    pub rotation_y: f32,
    pub offset_y: f32,
    pub color: [f32; 3],
    pub node_opacity: f32,
    pub edge_opacity: f32,
    pub nodes: Renderable,
    pub edges: Renderable,
}

impl EnergyGrid {
    pub fn update(&mut self, time: f32) {
        self.rotation_y += GRID_SPIN_PER_FRAME;
        self.offset_y = self.base_y + (time * 0.5).sin() * GRID_BOB_HEIGHT;
    }

    pub fn draw_items(&self) -> [DrawItem; 2] {
        let model = model_matrix(
            Vec3::new(0.0, self.offset_y, 0.0),
            Vec3::new(0.0, self.rotation_y, 0.0),
            Vec3::ONE,
        );
        [
            DrawItem {
                renderable: self.edges,
                model,
                color: self.color,
                opacity: self.edge_opacity,
            },
            DrawItem {
                renderable: self.nodes,
                model,
                color: self.color,
                opacity: self.node_opacity,
            },
        ]
    }
}
