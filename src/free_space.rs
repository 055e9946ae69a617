//! Free-space solver: the 2D region where new models may be placed.
//!
//! The free space is the bounding rectangle of the scene (or explicit
//! limits), intersected with the ground-plane footprint when one exists,
//! minus the static and non-static obstacle footprints, stabilized by a
//! shrink / prune / simplify / grow pass so that near-zero-width slivers
//! cannot trap the placement sampler in an endless loop.

use crate::errors::{Error, Result};
use crate::float_types::{
    DEFAULT_MIN_FREE_SPACE_AREA, FREE_SPACE_GROW, FREE_SPACE_SHRINK, FREE_SPACE_SIMPLIFY,
    GROUND_PLANE_COVERAGE_SKIP, Real,
};
use crate::model::{MeshType, Model};
use crate::occupancy;
use crate::pattern::matches_any;
use geo::orient::{Direction, Orient};
use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon as GeoPolygon, Simplify};
use geo_buf::buffer_multi_polygon;
use log::debug;

/// Options for a free-space query.
#[derive(Debug, Clone)]
pub struct FreeSpaceOptions {
    /// Name patterns marking ground-plane models (besides the explicit
    /// per-model flag).
    pub ground_plane_tags: Vec<String>,
    /// Name patterns for models excluded from the computation entirely.
    pub ignore_tags: Vec<String>,
    /// Explicit X limits; derived from the scene bounds when `None`.
    pub x_limits: Option<[Real; 2]>,
    /// Explicit Y limits; derived from the scene bounds when `None`.
    pub y_limits: Option<[Real; 2]>,
    /// Disconnected pieces with at most this area are dropped.
    pub min_area: Real,
}

impl Default for FreeSpaceOptions {
    fn default() -> Self {
        FreeSpaceOptions {
            ground_plane_tags: Vec::new(),
            ignore_tags: Vec::new(),
            x_limits: None,
            y_limits: None,
            min_area: DEFAULT_MIN_FREE_SPACE_AREA,
        }
    }
}

/// Closed rectangle polygon from per-axis limits, wound
/// counter-clockwise.
fn limits_rectangle(x: [Real; 2], y: [Real; 2]) -> GeoPolygon<Real> {
    let ring = vec![
        (x[0], y[0]),
        (x[1], y[0]),
        (x[1], y[1]),
        (x[0], y[1]),
        (x[0], y[0]), // close explicitly
    ];
    GeoPolygon::new(LineString::from(ring), vec![])
}

fn resolve_limits(
    axis: &'static str,
    explicit: Option<[Real; 2]>,
    derived: Option<[Real; 2]>,
) -> Result<[Real; 2]> {
    let limits = match explicit {
        Some(l) => l,
        None => derived.ok_or(Error::LimitsRequired { axis })?,
    };
    if !(limits[0] < limits[1]) || !limits[0].is_finite() || !limits[1].is_finite() {
        return Err(Error::InvalidLimits {
            axis,
            min: limits[0],
            max: limits[1],
        });
    }
    Ok(limits)
}

/// All coordinates must stay finite through the boolean/buffer pipeline.
fn ensure_resolved(region: &MultiPolygon<Real>, stage: &str) -> Result<()> {
    for polygon in &region.0 {
        for coord in polygon.exterior().0.iter() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                return Err(Error::UnresolvedGeometry(format!(
                    "non-finite coordinate after {stage}"
                )));
            }
        }
    }
    Ok(())
}

/// Compute the free-space polygon for a flattened model set.
///
/// With an empty scene, explicit limits are required and the bounding
/// rectangle is returned unmodified.
pub fn compute(models: &[Model], opts: &FreeSpaceOptions) -> Result<MultiPolygon<Real>> {
    let considered: Vec<Model> = models
        .iter()
        .filter(|m| !matches_any(m.name(), &opts.ignore_tags))
        .cloned()
        .collect();

    // Scene AABB over collision meshes, used when limits are not explicit.
    let mut scene_x: Option<[Real; 2]> = None;
    let mut scene_y: Option<[Real; 2]> = None;
    for model in &considered {
        if let Some((lo, hi)) = model.bounds(MeshType::Collision) {
            scene_x = Some(match scene_x {
                None => [lo.x, hi.x],
                Some([a, b]) => [a.min(lo.x), b.max(hi.x)],
            });
            scene_y = Some(match scene_y {
                None => [lo.y, hi.y],
                Some([a, b]) => [a.min(lo.y), b.max(hi.y)],
            });
        }
    }

    let x_limits = resolve_limits("x", opts.x_limits, scene_x)?;
    let y_limits = resolve_limits("y", opts.y_limits, scene_y)?;
    let rectangle = MultiPolygon(vec![limits_rectangle(x_limits, y_limits)]);

    if considered.is_empty() {
        // Nothing to subtract; the rectangle is the free space.
        return Ok(rectangle);
    }

    let partition = occupancy::classify(&considered, &opts.ground_plane_tags, MeshType::Collision);

    let mut free = rectangle;
    if !partition.ground_plane.0.is_empty() {
        // A ground plane fully covered by static obstacles must not clip
        // the region; skip the intersection above the coverage threshold.
        let ground_area = partition.ground_plane.unsigned_area();
        let covered = partition
            .ground_plane
            .intersection(&partition.static_obstacles)
            .unsigned_area();
        if ground_area > 0.0 && covered / ground_area < GROUND_PLANE_COVERAGE_SKIP {
            free = free.intersection(&partition.ground_plane);
        } else {
            debug!(
                "ground plane covered by static obstacles ({:.1}%), skipping intersection",
                if ground_area > 0.0 { 100.0 * covered / ground_area } else { 100.0 }
            );
        }
    }
    if !partition.static_obstacles.0.is_empty() {
        free = free.difference(&partition.static_obstacles);
    }
    if !partition.non_static_obstacles.0.is_empty() {
        free = free.difference(&partition.non_static_obstacles);
    }
    ensure_resolved(&free, "boolean operations")?;

    // Stabilization: shrink away touching edges, drop sliver pieces,
    // simplify, then grow back to near-original area. Buffering is
    // winding-sensitive, so rings are re-oriented (exteriors
    // counter-clockwise) before each pass.
    free = free.orient(Direction::Default);
    free = buffer_multi_polygon(&free, -FREE_SPACE_SHRINK);
    free = MultiPolygon(
        free.0
            .into_iter()
            .filter(|piece| piece.unsigned_area() > opts.min_area)
            .collect(),
    );
    free = free.simplify(&FREE_SPACE_SIMPLIFY);
    free = free.orient(Direction::Default);
    free = buffer_multi_polygon(&free, FREE_SPACE_GROW);
    ensure_resolved(&free, "buffer/simplify stabilization")?;

    debug!(
        "free space: {} piece(s), area {:.4}",
        free.0.len(),
        free.unsigned_area()
    );
    Ok(free)
}
