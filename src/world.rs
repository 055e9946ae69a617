//! The `World` aggregate: model groups, lights, plugins, physics, and
//! the spatial queries built on top of them.

use std::collections::BTreeMap;

use geo::{Contains, MultiPolygon, Point};
use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::errors::{Error, Result};
use crate::float_types::Real;
use crate::free_space::{self, FreeSpaceOptions};
use crate::light::Light;
use crate::model::{MeshType, Model, ModelGroup};
use crate::physics::{Engine, Physics};
use crate::plugin::Plugin;
use crate::pose::Pose;
use crate::sampler::{self, SamplerConfig};

pub const DEFAULT_GROUP: &str = "default";

/// A candidate model for placement, either stored in the world or
/// supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub enum ModelRef<'a> {
    ByName(&'a str),
    ByValue(&'a Model),
}

/// An `<include>` element carried through the round trip without being
/// fetched (resource resolution is out of scope).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Include {
    pub uri: String,
    pub name: Option<String>,
    pub pose: Option<Pose>,
    pub is_static: Option<bool>,
}

/// Aggregate scene description.
#[derive(Debug, Clone)]
pub struct World {
    pub name: String,
    pub gravity: Vector3<Real>,
    pub physics: Physics,
    groups: BTreeMap<String, ModelGroup>,
    plugins: BTreeMap<String, Plugin>,
    pub includes: Vec<Include>,
}

impl World {
    pub fn new(name: &str) -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(
            DEFAULT_GROUP.to_string(),
            ModelGroup::new(DEFAULT_GROUP, Pose::default()),
        );
        World {
            name: name.to_string(),
            gravity: Vector3::new(0.0, 0.0, -9.8),
            physics: Physics::default(),
            groups,
            plugins: BTreeMap::new(),
            includes: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Groups

    /// Create an empty group, returning false when it already exists.
    pub fn create_group(&mut self, name: &str) -> bool {
        if self.groups.contains_key(name) {
            return false;
        }
        self.groups
            .insert(name.to_string(), ModelGroup::new(name, Pose::default()));
        true
    }

    pub fn group(&self, name: &str) -> Option<&ModelGroup> {
        self.groups.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ModelGroup> {
        self.groups.get_mut(name)
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    // ------------------------------------------------------------------
    // Models and lights

    /// Add a model to `group`, creating the group on demand. Returns
    /// the tag the model was stored under (suffixed on a name clash).
    pub fn add_model_to(&mut self, model: Model, group: &str) -> String {
        let tag = model.name().to_string();
        self.groups
            .entry(group.to_string())
            .or_insert_with(|| ModelGroup::new(group, Pose::default()))
            .add_model(&tag, model)
    }

    pub fn add_model(&mut self, model: Model) -> String {
        self.add_model_to(model, DEFAULT_GROUP)
    }

    pub fn add_light_to(&mut self, light: Light, group: &str) -> String {
        let tag = light.name.clone();
        self.groups
            .entry(group.to_string())
            .or_insert_with(|| ModelGroup::new(group, Pose::default()))
            .add_light(&tag, light)
    }

    pub fn add_light(&mut self, light: Light) -> String {
        self.add_light_to(light, DEFAULT_GROUP)
    }

    /// Remove a model by its flattened (possibly `group/`-prefixed) name.
    pub fn rm_model(&mut self, name: &str) -> bool {
        let (group, local) = split_prefixed(name);
        match self.groups.get_mut(group) {
            Some(g) => g.rm_model(local),
            None => false,
        }
    }

    pub fn model_exists(&self, name: &str) -> bool {
        let (group, local) = split_prefixed(name);
        self.groups
            .get(group)
            .is_some_and(|g| g.model_exists(local))
    }

    /// Look up a stored model by flattened name, group pose applied.
    pub fn get_model(&self, name: &str) -> Option<Model> {
        let (group, local) = split_prefixed(name);
        let g = self.groups.get(group)?;
        let mut flattened = g.get_models(group != DEFAULT_GROUP);
        flattened.remove(name).or_else(|| flattened.remove(local))
    }

    /// Mark a stored model as the ground plane. Searches every group.
    pub fn set_as_ground_plane(&mut self, name: &str) -> Result<()> {
        let (group, local) = split_prefixed(name);
        for (tag, g) in self.groups.iter_mut() {
            if tag == group && g.set_as_ground_plane(local) {
                return Ok(());
            }
        }
        // Fall back to an unprefixed search across all groups.
        for g in self.groups.values_mut() {
            if g.set_as_ground_plane(name) {
                return Ok(());
            }
        }
        Err(Error::ModelNotFound(name.to_string()))
    }

    /// All models flattened across groups, group poses applied and
    /// non-default group names folded into `group/name` tags.
    pub fn models(&self) -> Vec<Model> {
        let mut out = Vec::new();
        for (tag, group) in &self.groups {
            out.extend(group.get_models(tag != DEFAULT_GROUP).into_values());
        }
        out
    }

    pub fn lights(&self) -> Vec<Light> {
        let mut out = Vec::new();
        for (tag, group) in &self.groups {
            out.extend(group.get_lights(tag != DEFAULT_GROUP).into_values());
        }
        out
    }

    pub fn n_models(&self) -> usize {
        self.groups.values().map(|g| g.n_models()).sum()
    }

    // ------------------------------------------------------------------
    // Plugins and physics

    pub fn add_plugin(&mut self, plugin: Plugin) {
        self.plugins.insert(plugin.name.clone(), plugin);
    }

    pub fn rm_plugin(&mut self, name: &str) -> bool {
        self.plugins.remove(name).is_some()
    }

    pub fn plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.values()
    }

    /// Replace the physics settings with the defaults of `engine`.
    pub fn reset_physics(&mut self, engine: Engine) {
        self.physics = Physics::new(engine);
    }

    // ------------------------------------------------------------------
    // Spatial queries

    /// Axis-aligned bounds over every model's meshes of `mesh_type`.
    pub fn bounds(&self, mesh_type: MeshType) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut acc: Option<(Point3<Real>, Point3<Real>)> = None;
        for model in self.models() {
            if let Some((lo, hi)) = model.bounds(mesh_type) {
                acc = Some(match acc {
                    None => (lo, hi),
                    Some((alo, ahi)) => (
                        Point3::new(alo.x.min(lo.x), alo.y.min(lo.y), alo.z.min(lo.z)),
                        Point3::new(ahi.x.max(hi.x), ahi.y.max(hi.y), ahi.z.max(hi.z)),
                    ),
                });
            }
        }
        acc
    }

    pub fn free_space_polygon(&self, opts: &FreeSpaceOptions) -> Result<MultiPolygon<Real>> {
        free_space::compute(&self.models(), opts)
    }

    /// True when `(x, y)` lies inside the free-space polygon.
    pub fn is_free_space(&self, x: Real, y: Real, opts: &FreeSpaceOptions) -> Result<bool> {
        let free = self.free_space_polygon(opts)?;
        Ok(free.contains(&Point::new(x, y)))
    }

    /// Draw `count` collision-free poses for the referenced model.
    pub fn random_free_spots(
        &self,
        model: ModelRef<'_>,
        count: usize,
        config: &SamplerConfig,
        rng: &mut impl Rng,
    ) -> Result<Vec<Pose>> {
        self.random_free_spots_with_polygon(model, count, config, rng)
            .map(|(poses, _)| poses)
    }

    /// As [`random_free_spots`], also returning the free-space polygon
    /// the poses were drawn from.
    ///
    /// [`random_free_spots`]: World::random_free_spots
    pub fn random_free_spots_with_polygon(
        &self,
        model: ModelRef<'_>,
        count: usize,
        config: &SamplerConfig,
        rng: &mut impl Rng,
    ) -> Result<(Vec<Pose>, MultiPolygon<Real>)> {
        let candidate = match model {
            ModelRef::ByValue(m) => m.clone(),
            ModelRef::ByName(name) => self
                .get_model(name)
                .ok_or_else(|| Error::ModelNotFound(name.to_string()))?,
        };
        debug!("sampling {count} spot(s) for '{}'", candidate.name());
        sampler::sample_free_spots(&self.models(), &candidate, count, config, rng)
    }

    /// Place copies of the referenced model at sampled poses, storing
    /// them in the default group. Returns the stored tags.
    pub fn place_random(
        &mut self,
        model: ModelRef<'_>,
        count: usize,
        config: &SamplerConfig,
        rng: &mut impl Rng,
    ) -> Result<Vec<String>> {
        let candidate = match model {
            ModelRef::ByValue(m) => m.clone(),
            ModelRef::ByName(name) => self
                .get_model(name)
                .ok_or_else(|| Error::ModelNotFound(name.to_string()))?,
        };
        let poses = self.random_free_spots(ModelRef::ByValue(&candidate), count, config, rng)?;
        let mut tags = Vec::with_capacity(poses.len());
        for pose in poses {
            let mut placed = candidate.clone();
            placed.pose = pose;
            tags.push(self.add_model(placed));
        }
        Ok(tags)
    }

    /// Log a warning for includes whose URIs cannot be resolved here.
    pub fn warn_unresolved_includes(&self) {
        for include in &self.includes {
            warn!("include '{}' not resolved", include.uri);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::new("default")
    }
}

/// Split a flattened `group/name` tag; unprefixed names belong to the
/// default group.
fn split_prefixed(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((group, local)) if !group.is_empty() && !local.is_empty() => (group, local),
        _ => (DEFAULT_GROUP, name),
    }
}
