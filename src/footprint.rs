//! Footprint accumulation: 2D polygon projections and their union.
//!
//! A [`Footprint`] collects polygons and produces their union as one
//! `MultiPolygon`. Meshes become footprints by projecting every triangle
//! onto the XY plane after the world transform and unioning the results;
//! side-on triangles project to slivers and are dropped.

use crate::float_types::Real;
use crate::shapes::TriMeshData;
use geo::{BooleanOps, LineString, MultiPolygon, Polygon as GeoPolygon};
use nalgebra::Isometry3;

/// Accumulator over 2D polygons; transient, built per query.
#[derive(Debug, Clone)]
pub struct Footprint {
    merged: MultiPolygon<Real>,
}

impl Default for Footprint {
    fn default() -> Self {
        Footprint::new()
    }
}

impl Footprint {
    pub fn new() -> Self {
        Footprint {
            merged: MultiPolygon(Vec::new()),
        }
    }

    /// Union a single polygon into the accumulator.
    pub fn add_polygon(&mut self, polygon: GeoPolygon<Real>) {
        self.add_multi_polygon(&MultiPolygon(vec![polygon]));
    }

    /// Union a multipolygon into the accumulator.
    pub fn add_multi_polygon(&mut self, other: &MultiPolygon<Real>) {
        if other.0.is_empty() {
            return;
        }
        if self.merged.0.is_empty() {
            self.merged = other.clone();
        } else {
            self.merged = self.merged.union(other);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.merged.0.is_empty()
    }

    /// The union of everything added so far.
    pub fn polygon(&self) -> MultiPolygon<Real> {
        self.merged.clone()
    }
}

/// Project a posed triangle mesh onto the XY plane and union the triangles
/// into one footprint.
pub fn project_mesh(mesh: &TriMeshData, iso: &Isometry3<Real>) -> MultiPolygon<Real> {
    // Skip triangles whose projection collapses to (nearly) a line.
    const MIN_TRIANGLE_AREA: Real = 1e-12;

    let mut footprint = Footprint::new();
    for tri in &mesh.indices {
        let p0 = iso * mesh.vertices[tri[0] as usize];
        let p1 = iso * mesh.vertices[tri[1] as usize];
        let p2 = iso * mesh.vertices[tri[2] as usize];

        // Shoelace area of the XY projection.
        let area =
            0.5 * ((p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y));
        if area.abs() < MIN_TRIANGLE_AREA {
            continue;
        }

        // Exterior rings must wind counter-clockwise.
        let ring = if area > 0.0 {
            vec![(p0.x, p0.y), (p1.x, p1.y), (p2.x, p2.y), (p0.x, p0.y)]
        } else {
            vec![(p0.x, p0.y), (p2.x, p2.y), (p1.x, p1.y), (p0.x, p0.y)]
        };
        footprint.add_polygon(GeoPolygon::new(LineString::from(ring), vec![]));
    }
    footprint.polygon()
}
