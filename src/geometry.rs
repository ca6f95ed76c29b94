//! Triangle meshes for the primitive shapes.
//!
//! Meshes are generated at unit size and scaled by the object transform, so a
//! renderer can share one vertex buffer between every object of the same
//! [`Geometry`]. Output is an unindexed triangle list with per-vertex normals:
//! smooth for the sphere and torus, flat for the cube and the polyhedra.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::shape::{ObjectOptions, ShapeKind};

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// Tube radius of the torus relative to its ring radius.
const TORUS_TUBE_RATIO: f32 = 0.4;

/// Everything that determines the vertex data of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub kind: ShapeKind,
    pub segments: u32,
    pub detail: u32,
}

impl Geometry {
    #[must_use]
    pub fn new(kind: ShapeKind, options: &ObjectOptions) -> Self {
        // Only the parameters a kind actually uses take part in its identity.
        let (segments, detail) = match kind {
            ShapeKind::Sphere | ShapeKind::Torus => (options.segments.max(3), 0),
            ShapeKind::Cube => (0, 0),
            ShapeKind::Octahedron | ShapeKind::Icosahedron | ShapeKind::Tetrahedron => {
                (0, options.detail)
            }
        };
        Self {
            kind,
            segments,
            detail,
        }
    }

    #[must_use]
    pub fn build(&self) -> Mesh {
        match self.kind {
            ShapeKind::Sphere => sphere(self.segments),
            ShapeKind::Cube => cube(),
            ShapeKind::Torus => torus(self.segments),
            ShapeKind::Octahedron => {
                polyhedron(&OCTAHEDRON_VERTICES, &OCTAHEDRON_FACES, self.detail)
            }
            ShapeKind::Icosahedron => {
                polyhedron(&icosahedron_vertices(), &ICOSAHEDRON_FACES, self.detail)
            }
            ShapeKind::Tetrahedron => {
                polyhedron(&TETRAHEDRON_VERTICES, &TETRAHEDRON_FACES, self.detail)
            }
        }
    }
}

/// Unindexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

impl Mesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Interleaved `[px, py, pz, nx, ny, nz]` per vertex, ready for upload.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f32> {
        self.positions
            .iter()
            .zip(&self.normals)
            .flat_map(|(p, n)| [p[0], p[1], p[2], n[0], n[1], n[2]])
            .collect()
    }

    fn push_smooth(&mut self, p: Vec3, n: Vec3) {
        self.positions.push(p.to_array());
        self.normals.push(n.normalize_or_zero().to_array());
    }

    /// Push a triangle with a face normal pointing away from the origin.
    fn push_flat(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut n = (b - a).cross(c - a).normalize_or_zero();
        if n.dot(a + b + c) < 0.0 {
            n = -n;
        }
        for p in [a, b, c] {
            self.positions.push(p.to_array());
            self.normals.push(n.to_array());
        }
    }
}

fn sphere(segments: u32) -> Mesh {
    let width = segments;
    let height = (segments / 2).max(2);
    let point = |ix: u32, iy: u32| {
        let u = ix as f32 / width as f32;
        let v = iy as f32 / height as f32;
        let theta = v * PI;
        let phi = u * TAU;
        Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin())
    };
    let mut mesh = Mesh::default();
    for iy in 0..height {
        for ix in 0..width {
            let a = point(ix, iy);
            let b = point(ix, iy + 1);
            let c = point(ix + 1, iy + 1);
            let d = point(ix + 1, iy);
            for p in [a, b, d, b, c, d] {
                mesh.push_smooth(p, p);
            }
        }
    }
    mesh
}

fn cube() -> Mesh {
    let h = 0.5;
    let corners = [
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];
    const QUADS: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [3, 2, 6, 7],
        [0, 3, 7, 4],
        [1, 2, 6, 5],
    ];
    let mut mesh = Mesh::default();
    for [a, b, c, d] in QUADS {
        mesh.push_flat(corners[a], corners[b], corners[c]);
        mesh.push_flat(corners[a], corners[c], corners[d]);
    }
    mesh
}

fn torus(segments: u32) -> Mesh {
    let radial = (segments / 2).max(3);
    let tubular = segments;
    let ring = 1.0;
    let tube = TORUS_TUBE_RATIO;
    let vertex = |j: u32, i: u32| {
        let u = i as f32 / tubular as f32 * TAU;
        let v = j as f32 / radial as f32 * TAU;
        let p = Vec3::new(
            (ring + tube * v.cos()) * u.cos(),
            (ring + tube * v.cos()) * u.sin(),
            tube * v.sin(),
        );
        let center = Vec3::new(ring * u.cos(), ring * u.sin(), 0.0);
        (p, p - center)
    };
    let mut mesh = Mesh::default();
    for j in 0..radial {
        for i in 0..tubular {
            let a = vertex(j, i);
            let b = vertex(j + 1, i);
            let c = vertex(j + 1, i + 1);
            let d = vertex(j, i + 1);
            for (p, n) in [a, b, d, b, c, d] {
                mesh.push_smooth(p, n);
            }
        }
    }
    mesh
}

const OCTAHEDRON_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

const TETRAHEDRON_VERTICES: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
];

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

fn icosahedron_vertices() -> [[f32; 3]; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
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

/// Subdivide every face into `(detail + 1)^2` triangles and project onto the unit sphere.
fn polyhedron(vertices: &[[f32; 3]], faces: &[[usize; 3]], detail: u32) -> Mesh {
    let n = detail + 1;
    let mut mesh = Mesh::default();
    for face in faces {
        let [a, b, c] = face.map(|i| Vec3::from_array(vertices[i]));
        let grid = |i: u32, j: u32| {
            let p = a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
            p.normalize()
        };
        for i in 0..n {
            for j in 0..(n - i) {
                mesh.push_flat(grid(i, j), grid(i + 1, j), grid(i, j + 1));
                if j + 1 < n - i {
                    mesh.push_flat(grid(i + 1, j), grid(i + 1, j + 1), grid(i, j + 1));
                }
            }
        }
    }
    mesh
}
