//! Geometry primitives attached to model links.
//!
//! Each shape converts to an indexed triangle mesh; footprints are derived
//! from those meshes by projecting every triangle onto the XY plane and
//! taking the union (see [`crate::footprint`]).

use crate::float_types::{PI, Real, TAU};
use nalgebra::Point3;

/// Number of slices used when tessellating round shapes.
const SEGMENTS: usize = 16;

/// Thickness of the slab standing in for an (infinite) SDF plane, so it can
/// participate in mesh collision tests and footprint projection.
const PLANE_THICKNESS: Real = 1e-3;

/// An indexed triangle mesh in link-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMeshData {
    pub vertices: Vec<Point3<Real>>,
    pub indices: Vec<[u32; 3]>,
}

/// Collision/visual geometry of a link.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box; `size` is the full extent on each axis.
    Box3 { size: [Real; 3] },
    /// Cylinder along +Z; `length` is the full height.
    Cylinder { radius: Real, length: Real },
    Sphere { radius: Real },
    /// Ground plane normal to +Z; `size` is the XY extent. Modeled as a
    /// thin slab so spatial queries have a volume to work with.
    Plane { size: [Real; 2] },
    /// Arbitrary mesh given directly as vertices and index triples.
    Mesh { vertices: Vec<Point3<Real>>, indices: Vec<[u32; 3]> },
}

impl Shape {
    /// Tessellate this shape into an indexed triangle mesh centered on the
    /// link frame origin.
    pub fn trimesh(&self) -> TriMeshData {
        match self {
            Shape::Box3 { size } => box_mesh(size[0], size[1], size[2]),
            Shape::Cylinder { radius, length } => cylinder_mesh(*radius, *length, SEGMENTS),
            Shape::Sphere { radius } => sphere_mesh(*radius, SEGMENTS, SEGMENTS / 2),
            Shape::Plane { size } => box_mesh(size[0], size[1], PLANE_THICKNESS),
            Shape::Mesh { vertices, indices } => TriMeshData {
                vertices: vertices.clone(),
                indices: indices.clone(),
            },
        }
    }
}

/// Axis-aligned box centered on the origin, 8 vertices and 12 triangles.
fn box_mesh(sx: Real, sy: Real, sz: Real) -> TriMeshData {
    let (hx, hy, hz) = (sx / 2.0, sy / 2.0, sz / 2.0);

    // The bits of `i` pick +/- for x, y, z.
    let mut vertices = Vec::with_capacity(8);
    for i in 0..8u32 {
        let x = if i & 1 == 0 { -hx } else { hx };
        let y = if i & 2 == 0 { -hy } else { hy };
        let z = if i & 4 == 0 { -hz } else { hz };
        vertices.push(Point3::new(x, y, z));
    }

    let indices = vec![
        // -x / +x
        [0, 4, 6], [0, 6, 2],
        [1, 3, 7], [1, 7, 5],
        // -y / +y
        [0, 1, 5], [0, 5, 4],
        [2, 6, 7], [2, 7, 3],
        // -z / +z
        [0, 2, 3], [0, 3, 1],
        [4, 5, 7], [4, 7, 6],
    ];

    TriMeshData { vertices, indices }
}

/// Cylinder along +Z centered on the origin: two rings, two cap centers.
fn cylinder_mesh(radius: Real, length: Real, slices: usize) -> TriMeshData {
    let hz = length / 2.0;
    let mut vertices = Vec::with_capacity(2 * slices + 2);
    for i in 0..slices {
        let theta = TAU * (i as Real) / (slices as Real);
        let (x, y) = (radius * theta.cos(), radius * theta.sin());
        vertices.push(Point3::new(x, y, -hz));
        vertices.push(Point3::new(x, y, hz));
    }
    let bottom_center = vertices.len() as u32;
    vertices.push(Point3::new(0.0, 0.0, -hz));
    let top_center = vertices.len() as u32;
    vertices.push(Point3::new(0.0, 0.0, hz));

    let mut indices = Vec::with_capacity(4 * slices);
    for i in 0..slices {
        let j = (i + 1) % slices;
        let (b0, t0) = ((2 * i) as u32, (2 * i + 1) as u32);
        let (b1, t1) = ((2 * j) as u32, (2 * j + 1) as u32);
        // tube
        indices.push([b0, b1, t0]);
        indices.push([t0, b1, t1]);
        // caps
        indices.push([bottom_center, b1, b0]);
        indices.push([top_center, t0, t1]);
    }

    TriMeshData { vertices, indices }
}

/// UV sphere centered on the origin. Pole rings collapse to a point, so the
/// cap cells emit one triangle instead of two.
fn sphere_mesh(radius: Real, slices: usize, stacks: usize) -> TriMeshData {
    let mut vertices = Vec::with_capacity((stacks + 1) * slices);
    for j in 0..=stacks {
        let phi = PI * (j as Real) / (stacks as Real);
        for i in 0..slices {
            let theta = TAU * (i as Real) / (slices as Real);
            vertices.push(Point3::new(
                radius * theta.cos() * phi.sin(),
                radius * theta.sin() * phi.sin(),
                radius * phi.cos(),
            ));
        }
    }

    let idx = |j: usize, i: usize| (j * slices + (i % slices)) as u32;
    let mut indices = Vec::with_capacity(2 * slices * stacks);
    for j in 0..stacks {
        for i in 0..slices {
            let a = idx(j, i);
            let b = idx(j + 1, i);
            let c = idx(j + 1, i + 1);
            let d = idx(j, i + 1);
            if j == 0 {
                // top cap: `a` sits on the pole
                indices.push([a, b, c]);
            } else if j + 1 == stacks {
                // bottom cap: `b` sits on the pole
                indices.push([a, b, d]);
            } else {
                indices.push([a, b, c]);
                indices.push([a, c, d]);
            }
        }
    }

    TriMeshData { vertices, indices }
}
