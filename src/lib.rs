//! # pcg-world
//!
//! Procedural generation and scene description for SDF worlds, the XML
//! format used by the Gazebo simulator.
//!
//! The crate centers on [`World`](world::World): a typed aggregate of
//! model groups, lights, plugins and physics settings. On top of the
//! data model it offers spatial queries (axis-aligned bounds, XY
//! footprints, the free-space polygon) and random collision-free
//! placement of models, plus an SDF XML round trip.
//!
//! ```
//! use pcg_world::model::Model;
//! use pcg_world::sampler::SamplerConfig;
//! use pcg_world::world::{ModelRef, World};
//! use rand::SeedableRng;
//!
//! let mut world = World::new("demo");
//! world.add_model(Model::ground_plane("ground_plane", [20.0, 20.0]));
//! world.add_model(Model::from_box("crate", [1.0, 1.0, 1.0]));
//!
//! let candidate = Model::from_cylinder("barrel", 0.4, 1.2);
//! let config = SamplerConfig {
//!     max_attempts: Some(10_000),
//!     ..SamplerConfig::default()
//! };
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let poses = world
//!     .random_free_spots(ModelRef::ByValue(&candidate), 3, &config, &mut rng)
//!     .unwrap();
//! assert_eq!(poses.len(), 3);
//! ```

pub mod collision;
pub mod errors;
pub mod float_types;
pub mod footprint;
pub mod free_space;
pub mod light;
pub mod model;
pub mod occupancy;
pub mod pattern;
pub mod physics;
pub mod plugin;
pub mod pose;
pub mod sampler;
pub mod sdf;
pub mod shapes;
pub mod world;

#[cfg(test)]
mod tests;

pub use errors::{Error, Result};
pub use pose::Pose;
pub use world::{ModelRef, World};
