//! Random collision-free placement.
//!
//! Candidate (x, y) points are rejection-sampled from the free-space
//! polygon, remaining degrees of freedom are drawn uniformly from their
//! limits, and each full pose is accepted only when the model does not
//! intersect any scene mesh. Accepted placements join the collision
//! scene so later spots cannot overlap earlier ones.

use crate::collision::CollisionChecker;
use crate::errors::{Error, Result};
use crate::float_types::{DEFAULT_MAX_Z, PI, Real};
use crate::free_space::{self, FreeSpaceOptions};
use crate::model::{MeshType, Model};
use crate::pattern::matches_any;
use crate::pose::Pose;
use geo::{Area, BoundingRect, Contains, MultiPolygon, Point};
use log::{debug, info};
use rand::Rng;

/// A pose degree of freedom the sampler may vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dof {
    X,
    Y,
    Z,
    Roll,
    Pitch,
    Yaw,
}

impl Dof {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Dof::X),
            "y" => Ok(Dof::Y),
            "z" => Ok(Dof::Z),
            "roll" => Ok(Dof::Roll),
            "pitch" => Ok(Dof::Pitch),
            "yaw" => Ok(Dof::Yaw),
            other => Err(Error::InvalidDof(other.to_string())),
        }
    }
}

/// Configuration for [`sample_free_spots`].
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Degrees of freedom to vary. `X` and `Y` are always active even
    /// when absent from this list; inactive DOFs stay at zero.
    pub dofs: Vec<Dof>,
    /// Z range; defaults to the scene's vertical extent, or
    /// `[0, 1000]` for an unbounded scene.
    pub z_limits: Option<[Real; 2]>,
    /// Euler angle ranges; each defaults to `[-pi, pi]`.
    pub roll_limits: Option<[Real; 2]>,
    pub pitch_limits: Option<[Real; 2]>,
    pub yaw_limits: Option<[Real; 2]>,
    /// Per-spot attempt cap. `None` retries forever, matching callers
    /// that prefer to block rather than fail on a crowded scene.
    pub max_attempts: Option<u64>,
    /// Free-space options forwarded to the solver.
    pub free_space: FreeSpaceOptions,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            dofs: vec![Dof::X, Dof::Y],
            z_limits: None,
            roll_limits: None,
            pitch_limits: None,
            yaw_limits: None,
            max_attempts: None,
            free_space: FreeSpaceOptions::default(),
        }
    }
}

/// Caller-supplied limits must be finite with min strictly below max.
/// Derived scene bounds are allowed to be degenerate; `draw` collapses
/// them to a constant.
fn checked_limits(axis: &'static str, limits: [Real; 2]) -> Result<[Real; 2]> {
    if !(limits[0] < limits[1]) || !limits[0].is_finite() || !limits[1].is_finite() {
        return Err(Error::InvalidLimits {
            axis,
            min: limits[0],
            max: limits[1],
        });
    }
    Ok(limits)
}

fn draw(rng: &mut impl Rng, limits: [Real; 2]) -> Real {
    if limits[0] == limits[1] {
        limits[0]
    } else {
        rng.gen_range(limits[0]..limits[1])
    }
}

/// Draw `count` collision-free poses for `model` within the free space
/// derived from `scene`.
///
/// Returns the accepted poses together with the free-space polygon they
/// were drawn from.
pub fn sample_free_spots(
    scene: &[Model],
    model: &Model,
    count: usize,
    config: &SamplerConfig,
    rng: &mut impl Rng,
) -> Result<(Vec<Pose>, MultiPolygon<Real>)> {
    if count == 0 {
        return Err(Error::InvalidCount);
    }

    let free = free_space::compute(scene, &config.free_space)?;
    if free.0.is_empty() {
        return Err(Error::NoFreeSpace);
    }
    let free_rect = free
        .bounding_rect()
        .ok_or(Error::NoFreeSpace)?;

    let candidate_footprint = model.footprint(MeshType::Collision);
    if candidate_footprint.0.is_empty() {
        return Err(Error::NoValidFootprint(model.name().to_string()));
    }
    // A model covering the whole region can never land inside it.
    if candidate_footprint.unsigned_area() >= free.unsigned_area() {
        return Err(Error::ModelTooLarge(model.name().to_string()));
    }

    let zeroed = {
        let mut m = model.clone();
        m.pose = Pose::default();
        m
    };
    let prepared = CollisionChecker::prepare(&zeroed)?;

    let mut checker = CollisionChecker::new();
    let mut scene_z: Option<[Real; 2]> = None;
    for existing in scene {
        if matches_any(existing.name(), &config.free_space.ignore_tags) {
            continue;
        }
        // Ground planes constrain placement through the free-space
        // polygon; as collision obstacles they would reject every pose
        // resting on them.
        if existing.is_ground_plane
            || matches_any(existing.name(), &config.free_space.ground_plane_tags)
        {
            continue;
        }
        checker.add_model(existing)?;
        if let Some((lo, hi)) = existing.bounds(MeshType::Collision) {
            scene_z = Some(match scene_z {
                None => [lo.z, hi.z],
                Some([a, b]) => [a.min(lo.z), b.max(hi.z)],
            });
        }
    }

    let z_limits = match config.z_limits {
        Some(limits) => checked_limits("z", limits)?,
        None => scene_z.unwrap_or([0.0, DEFAULT_MAX_Z]),
    };
    let roll_limits = match config.roll_limits {
        Some(limits) => checked_limits("roll", limits)?,
        None => [-PI, PI],
    };
    let pitch_limits = match config.pitch_limits {
        Some(limits) => checked_limits("pitch", limits)?,
        None => [-PI, PI],
    };
    let yaw_limits = match config.yaw_limits {
        Some(limits) => checked_limits("yaw", limits)?,
        None => [-PI, PI],
    };

    let active = |dof: Dof| config.dofs.contains(&dof);

    let mut poses = Vec::with_capacity(count);
    for spot in 0..count {
        let mut attempts = 0u64;
        let pose = loop {
            attempts += 1;
            if let Some(cap) = config.max_attempts {
                if attempts > cap {
                    return Err(Error::CouldNotPlace {
                        model: model.name().to_string(),
                        attempts: cap,
                    });
                }
            }

            // (x, y) DOFs are always sampled; rejection against the
            // free-space polygon keeps them inside it.
            let x = draw(rng, [free_rect.min().x, free_rect.max().x]);
            let y = draw(rng, [free_rect.min().y, free_rect.max().y]);
            if !free.contains(&Point::new(x, y)) {
                continue;
            }

            let candidate = Pose {
                x,
                y,
                z: if active(Dof::Z) { draw(rng, z_limits) } else { 0.0 },
                roll: if active(Dof::Roll) { draw(rng, roll_limits) } else { 0.0 },
                pitch: if active(Dof::Pitch) { draw(rng, pitch_limits) } else { 0.0 },
                yaw: if active(Dof::Yaw) { draw(rng, yaw_limits) } else { 0.0 },
            };
            if !checker.collides_prepared(&prepared, &candidate)? {
                break candidate;
            }
        };

        debug!(
            "spot {}/{} for '{}' after {} attempt(s): {}",
            spot + 1,
            count,
            model.name(),
            attempts,
            pose
        );
        let mut placed = zeroed.clone();
        placed.pose = pose;
        checker.add_model(&placed)?;
        poses.push(pose);
    }

    info!("placed {} instance(s) of '{}'", poses.len(), model.name());
    Ok((poses, free))
}
