//! Pairwise collision checking against a cached scene.
//!
//! Candidate poses are tested by narrow-phase intersection against every
//! scene mesh. Scene meshes are built once and reused across attempts,
//! which is what makes the rejection sampler affordable.

use crate::errors::{Error, Result};
use crate::float_types::parry3d::query;
use crate::float_types::parry3d::shape::TriMesh;
use crate::float_types::Real;
use crate::model::{MeshType, Model};
use crate::pose::Pose;
use log::trace;
use nalgebra::Isometry3;

/// A collision scene: named meshes in world frame, built once.
pub struct CollisionChecker {
    scene: Vec<(String, Isometry3<Real>, TriMesh)>,
}

impl CollisionChecker {
    pub const fn new() -> Self {
        CollisionChecker { scene: Vec::new() }
    }

    /// Number of meshes currently cached.
    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Add every collision mesh of `model` to the scene.
    pub fn add_model(&mut self, model: &Model) -> Result<()> {
        for (iso, mesh) in model.meshes(MeshType::Collision) {
            let trimesh = TriMesh::new(mesh.vertices.clone(), mesh.indices.clone())
                .map_err(|e| Error::MeshConstruction(format!("{}: {e:?}", model.name())))?;
            self.scene.push((model.name().to_string(), iso, trimesh));
        }
        Ok(())
    }

    /// True when `model` at `pose` intersects any cached scene mesh.
    ///
    /// The candidate's own meshes are rebuilt per call; callers placing
    /// the same model repeatedly should prefer [`collides_prepared`]
    /// with meshes from [`prepare`].
    ///
    /// [`collides_prepared`]: CollisionChecker::collides_prepared
    /// [`prepare`]: CollisionChecker::prepare
    pub fn collides_with_scene(&self, model: &Model, pose: &Pose) -> Result<bool> {
        let prepared = Self::prepare(model)?;
        self.collides_prepared(&prepared, pose)
    }

    /// Build the candidate meshes once, in the model's local frame.
    pub fn prepare(model: &Model) -> Result<Vec<(Isometry3<Real>, TriMesh)>> {
        let mut out = Vec::new();
        let base_inv = model.pose.to_isometry().inverse();
        for (iso, mesh) in model.meshes(MeshType::Collision) {
            let trimesh = TriMesh::new(mesh.vertices.clone(), mesh.indices.clone())
                .map_err(|e| Error::MeshConstruction(format!("{}: {e:?}", model.name())))?;
            // meshes() bakes the model pose in; strip it so the caller's
            // candidate pose applies cleanly.
            out.push((base_inv * iso, trimesh));
        }
        Ok(out)
    }

    /// Test prepared candidate meshes at a world pose against the scene.
    pub fn collides_prepared(
        &self,
        prepared: &[(Isometry3<Real>, TriMesh)],
        pose: &Pose,
    ) -> Result<bool> {
        let world = pose.to_isometry();
        for (local, candidate) in prepared {
            let candidate_iso = world * local;
            for (name, scene_iso, scene_mesh) in &self.scene {
                let hit = query::intersection_test(&candidate_iso, candidate, scene_iso, scene_mesh)
                    .map_err(|e| Error::CollisionQuery(format!("{name}: {e}")))?;
                if hit {
                    trace!("collision with {name}");
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Default for CollisionChecker {
    fn default() -> Self {
        Self::new()
    }
}
