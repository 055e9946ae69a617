//! Simulation models and model groups.
//!
//! A [`Model`] is a named entity with a pose, a ground-plane flag, a static
//! flag and one or more named links carrying collision and/or visual
//! geometry. Models deep-copy on `Clone`, so samplers can test placements
//! on a copy without mutating the stored instance.
//!
//! A [`ModelGroup`] is a named collection of models and lights with its own
//! pose; a world aggregates groups and flattens them (with `group/` name
//! prefixes) for spatial queries and export.

use std::collections::BTreeMap;

use crate::float_types::Real;
use crate::footprint::{self, Footprint};
use crate::light::Light;
use crate::pose::Pose;
use crate::shapes::{Shape, TriMeshData};
use geo::MultiPolygon;
use nalgebra::{Isometry3, Point3};

/// Which geometry of a link a spatial query should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshType {
    Collision,
    Visual,
}

/// A named part of a model: a relative pose plus optional collision and
/// visual geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub pose: Pose,
    pub collision: Option<Shape>,
    pub visual: Option<Shape>,
}

impl Link {
    /// Link with the same shape used for collision and visual geometry,
    /// the common case for primitive models.
    pub fn from_shape(shape: Shape) -> Self {
        Link {
            pose: Pose::identity(),
            collision: Some(shape.clone()),
            visual: Some(shape),
        }
    }

    pub fn shape(&self, mesh_type: MeshType) -> Option<&Shape> {
        match mesh_type {
            MeshType::Collision => self.collision.as_ref(),
            MeshType::Visual => self.visual.as_ref(),
        }
    }
}

/// A named, reusable geometric/physical entity with an associated pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    pub pose: Pose,
    pub is_static: bool,
    pub is_ground_plane: bool,
    links: BTreeMap<String, Link>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "model name must not be empty");
        Model {
            name,
            pose: Pose::identity(),
            is_static: false,
            is_ground_plane: false,
            links: BTreeMap::new(),
        }
    }

    /// Single-link box model, static by default.
    pub fn from_box(name: impl Into<String>, size: [Real; 3]) -> Self {
        let mut model = Model::new(name);
        model.is_static = true;
        model.add_link("link", Link::from_shape(Shape::Box3 { size }));
        model
    }

    /// Single-link cylinder model, static by default.
    pub fn from_cylinder(name: impl Into<String>, radius: Real, length: Real) -> Self {
        let mut model = Model::new(name);
        model.is_static = true;
        model.add_link("link", Link::from_shape(Shape::Cylinder { radius, length }));
        model
    }

    /// Single-link sphere model.
    pub fn from_sphere(name: impl Into<String>, radius: Real) -> Self {
        let mut model = Model::new(name);
        model.add_link("link", Link::from_shape(Shape::Sphere { radius }));
        model
    }

    /// Flat ground-plane model of the given XY extent.
    pub fn ground_plane(name: impl Into<String>, size: [Real; 2]) -> Self {
        let mut model = Model::new(name);
        model.is_static = true;
        model.is_ground_plane = true;
        model.add_link("link", Link::from_shape(Shape::Plane { size }));
        model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        assert!(!name.is_empty(), "model name must not be empty");
        self.name = name;
    }

    pub fn add_link(&mut self, tag: impl Into<String>, link: Link) {
        self.links.insert(tag.into(), link);
    }

    pub fn links(&self) -> &BTreeMap<String, Link> {
        &self.links
    }

    /// World-posed triangle meshes of the requested type, one per link that
    /// carries a shape of that type.
    pub fn meshes(&self, mesh_type: MeshType) -> Vec<(Isometry3<Real>, TriMeshData)> {
        self.links
            .values()
            .filter_map(|link| {
                let shape = link.shape(mesh_type)?;
                let iso = self.pose.compose(&link.pose).to_isometry();
                Some((iso, shape.trimesh()))
            })
            .collect()
    }

    /// Union of all link footprints of the requested mesh type, projected
    /// onto the XY plane at the model's current pose. Empty only when no
    /// link carries a shape of that type.
    pub fn footprint(&self, mesh_type: MeshType) -> MultiPolygon<Real> {
        let mut combined = Footprint::new();
        for (iso, mesh) in self.meshes(mesh_type) {
            combined.add_multi_polygon(&footprint::project_mesh(&mesh, &iso));
        }
        combined.polygon()
    }

    /// Axis-aligned bounds over all posed mesh vertices of the requested
    /// type, `None` when the model has no such geometry.
    pub fn bounds(&self, mesh_type: MeshType) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut bounds: Option<(Point3<Real>, Point3<Real>)> = None;
        for (iso, mesh) in self.meshes(mesh_type) {
            for vertex in &mesh.vertices {
                let p = iso * vertex;
                bounds = Some(match bounds {
                    None => (p, p),
                    Some((lo, hi)) => (
                        Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                        Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
                    ),
                });
            }
        }
        bounds
    }
}

/// A named collection of models and lights sharing a group pose.
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    name: String,
    pub pose: Pose,
    models: BTreeMap<String, Model>,
    lights: BTreeMap<String, Light>,
}

impl ModelGroup {
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        ModelGroup {
            name: name.into(),
            pose,
            models: BTreeMap::new(),
            lights: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn n_lights(&self) -> usize {
        self.lights.len()
    }

    /// Add a model under `tag`; a clash appends a `_i` counter suffix.
    /// Returns the tag actually used.
    pub fn add_model(&mut self, tag: &str, mut model: Model) -> String {
        let mut name = tag.to_string();
        let mut i = 0;
        while self.models.contains_key(&name) {
            i += 1;
            name = format!("{tag}_{i}");
        }
        model.set_name(name.clone());
        self.models.insert(name.clone(), model);
        name
    }

    pub fn rm_model(&mut self, tag: &str) -> bool {
        self.models.remove(tag).is_some()
    }

    pub fn model_exists(&self, tag: &str) -> bool {
        self.models.contains_key(tag)
    }

    pub fn get_model(&self, tag: &str) -> Option<&Model> {
        self.models.get(tag)
    }

    pub fn get_model_mut(&mut self, tag: &str) -> Option<&mut Model> {
        self.models.get_mut(tag)
    }

    /// Flag a stored model as the ground plane.
    pub fn set_as_ground_plane(&mut self, tag: &str) -> bool {
        match self.models.get_mut(tag) {
            Some(model) => {
                model.is_ground_plane = true;
                true
            }
            None => false,
        }
    }

    pub fn add_light(&mut self, tag: &str, mut light: Light) -> String {
        let mut name = tag.to_string();
        let mut i = 0;
        while self.lights.contains_key(&name) {
            i += 1;
            name = format!("{tag}_{i}");
        }
        light.name = name.clone();
        self.lights.insert(name.clone(), light);
        name
    }

    pub fn rm_light(&mut self, tag: &str) -> bool {
        self.lights.remove(tag).is_some()
    }

    pub fn light_exists(&self, tag: &str) -> bool {
        self.lights.contains_key(tag)
    }

    /// Deep copies of the stored models with the group pose folded into
    /// each model pose. With `with_prefix`, names gain a `group/` prefix;
    /// the `default` group never prefixes.
    pub fn get_models(&self, with_prefix: bool) -> BTreeMap<String, Model> {
        let prefix = if !with_prefix || self.name == "default" {
            String::new()
        } else {
            format!("{}/", self.name)
        };
        self.models
            .iter()
            .map(|(tag, model)| {
                let mut m = model.clone();
                m.pose = self.pose.compose(&model.pose);
                let name = format!("{prefix}{tag}");
                m.set_name(name.clone());
                (name, m)
            })
            .collect()
    }

    /// Deep copies of the stored lights, name-prefixed like `get_models`.
    pub fn get_lights(&self, with_prefix: bool) -> BTreeMap<String, Light> {
        let prefix = if !with_prefix || self.name == "default" {
            String::new()
        } else {
            format!("{}/", self.name)
        };
        self.lights
            .iter()
            .map(|(tag, light)| {
                let mut l = light.clone();
                l.pose = self.pose.compose(&light.pose);
                let name = format!("{prefix}{tag}");
                l.name = name.clone();
                (name, l)
            })
            .collect()
    }
}
