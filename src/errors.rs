//! Error types for world queries, placement sampling and SDF parsing.

use thiserror::Error;

/// Errors surfaced by world queries and the SDF round trip.
#[derive(Debug, Error)]
pub enum Error {
    /// An axis limit pair is malformed (min must be strictly below max).
    #[error("invalid {axis} limits: expected min < max, got [{min}, {max}]")]
    InvalidLimits {
        /// Which axis ("x", "y", "z", "roll", "pitch", "yaw").
        axis: &'static str,
        min: f64,
        max: f64,
    },

    /// The scene has no models, so limits cannot be derived and must be
    /// given explicitly.
    #[error("scene has no models: explicit {axis} limits are required")]
    LimitsRequired {
        /// Which axis is missing limits.
        axis: &'static str,
    },

    /// A degree-of-freedom tag could not be parsed.
    #[error("invalid degree of freedom: {0}")]
    InvalidDof(String),

    /// The requested number of poses must be at least one.
    #[error("number of poses must be at least 1")]
    InvalidCount,

    /// The candidate model has no geometry of the requested mesh type.
    #[error("model <{0}> has no valid footprint")]
    NoValidFootprint(String),

    /// No free space remains within the given limits.
    #[error("no free space found within the given limits")]
    NoFreeSpace,

    /// The candidate footprint covers at least the entire free space.
    #[error("model <{0}> is too big for the available free space")]
    ModelTooLarge(String),

    /// The attempt cap was exhausted before enough poses were accepted.
    #[error("could not place model <{model}> after {attempts} attempts")]
    CouldNotPlace {
        model: String,
        attempts: u64,
    },

    /// A boolean/buffer operation yielded geometry that cannot be resolved
    /// to a polygon or multipolygon.
    #[error("unresolved geometry: {0}")]
    UnresolvedGeometry(String),

    /// A model name was not found in the world.
    #[error("model <{0}> not found in world")]
    ModelNotFound(String),

    /// A collision mesh could not be constructed from a shape.
    #[error("collision mesh construction failed: {0}")]
    MeshConstruction(String),

    /// The collision backend rejected a query.
    #[error("collision query failed: {0}")]
    CollisionQuery(String),

    /// The SDF document is not well-formed XML.
    #[error("SDF parse error: {0}")]
    SdfParse(String),

    /// A required SDF element or attribute is missing.
    #[error("missing <{element}> in {context}")]
    MissingElement {
        element: String,
        context: String,
    },

    /// A physics engine name is not one of ode, bullet or simbody.
    #[error("unknown physics engine: {0}")]
    UnknownEngine(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
