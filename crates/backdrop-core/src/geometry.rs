//! Procedural mesh generation.
//!
//! Every generator returns CPU-side [`MeshData`] which the render backend
//! uploads once at build time. Curved primitives take segment counts so the
//! device profile can trade detail for frame time.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
    Points,
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            _ => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Sphere,
    Torus,
    TorusKnot,
    Octahedron,
    Icosahedron,
    Cube,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 6] = [
        GeometryKind::Sphere,
        GeometryKind::Torus,
        GeometryKind::TorusKnot,
        GeometryKind::Octahedron,
        GeometryKind::Icosahedron,
        GeometryKind::Cube,
    ];

    /// Build the mesh for this kind at the given detail level.
    pub fn build(self, size: f32, detail: u32) -> MeshData {
        let detail = detail.max(3);
        match self {
            GeometryKind::Sphere => uv_sphere(size, detail, detail),
            GeometryKind::Torus => torus(size, size * 0.35, (detail / 2).max(3), detail * 2),
            GeometryKind::TorusKnot => {
                torus_knot(size * 0.8, size * 0.25, detail * 4, (detail / 2).max(3), 2, 3)
            }
            GeometryKind::Octahedron => octahedron(size),
            GeometryKind::Icosahedron => icosahedron(size),
            GeometryKind::Cube => cube(size * 1.4),
        }
    }
}

pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let n = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            vertices.push(MeshVertex::new(n * radius, n));
        }
    }
    let row = w + 1;
    let mut indices = Vec::new();
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    MeshData {
        vertices,
        indices,
        topology: Topology::Triangles,
    }
}

/// Torus lying in the XY plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(MeshVertex::new(p, (p - center).normalize_or_zero()));
        }
    }
    MeshData {
        vertices,
        indices: grid_indices(radial, tubular),
        topology: Topology::Triangles,
    }
}

pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);
    let curve = |u: f32| {
        let qu = q / p * u;
        let cs = qu.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu.sin() * 0.5,
        )
    };
    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);
        let t = p2 - p1;
        let b = t.cross(p2 + p1).normalize_or_zero();
        let n = b.cross(t).normalize_or_zero();
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let pos = p1 + n * (-tube * v.cos()) + b * (tube * v.sin());
            vertices.push(MeshVertex::new(pos, (pos - p1).normalize_or_zero()));
        }
    }
    MeshData {
        vertices,
        indices: grid_indices(tubular, radial),
        topology: Topology::Triangles,
    }
}

// Two triangles per cell of a (rows+1) x (cols+1) vertex grid.
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

// Non-indexed-style flat shading: three unique vertices per face.
fn flat_polyhedron(corners: &[Vec3], faces: &[[usize; 3]]) -> MeshData {
    let mut vertices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        let (a, b, c) = (corners[face[0]], corners[face[1]], corners[face[2]]);
        let mut n = (b - a).cross(c - a).normalize_or_zero();
        if n.dot(a + b + c) < 0.0 {
            n = -n;
        }
        vertices.extend([a, b, c].iter().map(|&p| MeshVertex::new(p, n)));
    }
    let indices = (0..vertices.len() as u32).collect();
    MeshData {
        vertices,
        indices,
        topology: Topology::Triangles,
    }
}

pub fn octahedron(radius: f32) -> MeshData {
    let corners = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ]
    .map(|v| v * radius);
    let faces = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    flat_polyhedron(&corners, &faces)
}

pub fn icosahedron(radius: f32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|v| v.normalize() * radius);
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    flat_polyhedron(&corners, &faces)
}

pub fn cube(size: f32) -> MeshData {
    let h = size * 0.5;
    let mut corners = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);
    for (n, u, v) in [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ] {
        let base = corners.len();
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            corners.push((n + u * su + v * sv) * h);
        }
        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }
    flat_polyhedron(&corners, &faces)
}

/// Point cloud geometry; normals are unused and left at zero.
pub fn points(positions: &[Vec3]) -> MeshData {
    MeshData {
        vertices: positions
            .iter()
            .map(|&p| MeshVertex::new(p, Vec3::ZERO))
            .collect(),
        indices: (0..positions.len() as u32).collect(),
        topology: Topology::Points,
    }
}

/// Line list geometry from explicit vertex index pairs.
pub fn lines(positions: &[Vec3], edges: &[(u32, u32)]) -> MeshData {
    MeshData {
        vertices: positions
            .iter()
            .map(|&p| MeshVertex::new(p, Vec3::ZERO))
            .collect(),
        indices: edges.iter().flat_map(|&(a, b)| [a, b]).collect(),
        topology: Topology::Lines,
    }
}
