//! Occupancy classification of a model set.
//!
//! Models partition into ground plane, static obstacles and non-static
//! obstacles; each partition's footprints union into one polygon. Per-model
//! footprint projection is independent, so with the `parallel` feature it
//! fans out over rayon and merges by union at the end.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::float_types::Real;
use crate::footprint::Footprint;
use crate::model::{MeshType, Model};
use crate::pattern::matches_any;
use geo::MultiPolygon;

/// Per-partition footprint unions of a classified scene.
#[derive(Debug, Clone)]
pub struct OccupancyPartition {
    pub ground_plane: MultiPolygon<Real>,
    pub static_obstacles: MultiPolygon<Real>,
    pub non_static_obstacles: MultiPolygon<Real>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    GroundPlane,
    Static,
    NonStatic,
}

fn classify_model(model: &Model, ground_plane_tags: &[String]) -> Group {
    if model.is_ground_plane || matches_any(model.name(), ground_plane_tags) {
        Group::GroundPlane
    } else if model.is_static {
        Group::Static
    } else {
        Group::NonStatic
    }
}

/// Partition `models` and union each partition's footprints of the
/// requested mesh type.
pub fn classify(
    models: &[Model],
    ground_plane_tags: &[String],
    mesh_type: MeshType,
) -> OccupancyPartition {
    #[cfg(feature = "parallel")]
    let footprints: Vec<(Group, MultiPolygon<Real>)> = models
        .par_iter()
        .map(|m| (classify_model(m, ground_plane_tags), m.footprint(mesh_type)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let footprints: Vec<(Group, MultiPolygon<Real>)> = models
        .iter()
        .map(|m| (classify_model(m, ground_plane_tags), m.footprint(mesh_type)))
        .collect();

    let mut ground_plane = Footprint::new();
    let mut static_obstacles = Footprint::new();
    let mut non_static_obstacles = Footprint::new();
    for (group, footprint) in &footprints {
        match group {
            Group::GroundPlane => ground_plane.add_multi_polygon(footprint),
            Group::Static => static_obstacles.add_multi_polygon(footprint),
            Group::NonStatic => non_static_obstacles.add_multi_polygon(footprint),
        }
    }

    OccupancyPartition {
        ground_plane: ground_plane.polygon(),
        static_obstacles: static_obstacles.polygon(),
        non_static_obstacles: non_static_obstacles.polygon(),
    }
}
