// Scalar type, shared constants and geometric tolerances.

// Re-export parry under a short name so collision code is not tied to the
// float-suffixed crate name.
pub use parry3d_f64 as parry3d;

/// Our Real scalar type.
pub type Real = f64;

/// A small epsilon for geometric comparisons.
pub const EPSILON: Real = 1e-10;

// Pi
pub const PI: Real = core::f64::consts::PI;

// Tau
pub const TAU: Real = core::f64::consts::TAU;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Free-space stabilization constants
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Shrink applied to the free-space region to drop touching edges.
pub const FREE_SPACE_SHRINK: Real = 1e-3;

/// Douglas-Peucker tolerance applied after small pieces are removed.
pub const FREE_SPACE_SIMPLIFY: Real = 1e-4;

/// Final grow restoring near-original area after shrink and simplify.
pub const FREE_SPACE_GROW: Real = 1e-8;

/// Default minimum area for a disconnected free-space piece to survive.
pub const DEFAULT_MIN_FREE_SPACE_AREA: Real = 5e-3;

/// Ground-plane/static overlap ratio above which the ground-plane
/// intersection step is skipped, so a plane fully covered by static
/// obstacles does not clip the whole region away.
pub const GROUND_PLANE_COVERAGE_SKIP: Real = 0.99;

/// Fallback upper Z bound used when the scene has no meshes to measure.
pub const DEFAULT_MAX_Z: Real = 1000.0;
