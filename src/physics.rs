//! Physics engine settings: global stepping plus per-engine parameters.
//!
//! Only the settings block a world description carries is modeled here; the
//! full per-engine parameter schemas are out of scope.

use crate::errors::{Error, Result};
use crate::float_types::Real;

/// Physics engine selector, mirroring the SDF `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Ode,
    Bullet,
    Simbody,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Ode => "ode",
            Engine::Bullet => "bullet",
            Engine::Simbody => "simbody",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "ode" => Ok(Engine::Ode),
            "bullet" => Ok(Engine::Bullet),
            "simbody" => Ok(Engine::Simbody),
            other => Err(Error::UnknownEngine(other.to_string())),
        }
    }
}

/// ODE solver and constraint parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeParams {
    /// Solver type, `quick` or `world`.
    pub solver_type: String,
    pub iters: u32,
    pub sor: Real,
    pub cfm: Real,
    pub erp: Real,
    pub contact_max_correcting_vel: Real,
    pub contact_surface_layer: Real,
}

impl Default for OdeParams {
    fn default() -> Self {
        OdeParams {
            solver_type: "quick".to_string(),
            iters: 50,
            sor: 1.3,
            cfm: 0.0,
            erp: 0.2,
            contact_max_correcting_vel: 100.0,
            contact_surface_layer: 0.001,
        }
    }
}

/// Bullet solver and constraint parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletParams {
    pub iters: u32,
    pub sor: Real,
    pub cfm: Real,
    pub erp: Real,
    pub split_impulse: bool,
    pub split_impulse_penetration_threshold: Real,
}

impl Default for BulletParams {
    fn default() -> Self {
        BulletParams {
            iters: 50,
            sor: 1.3,
            cfm: 0.0,
            erp: 0.2,
            split_impulse: true,
            split_impulse_penetration_threshold: -0.01,
        }
    }
}

/// Simbody integration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimbodyParams {
    pub min_step_size: Real,
    pub accuracy: Real,
    pub max_transient_velocity: Real,
}

impl Default for SimbodyParams {
    fn default() -> Self {
        SimbodyParams {
            min_step_size: 0.0001,
            accuracy: 0.001,
            max_transient_velocity: 0.01,
        }
    }
}

/// Engine-specific parameter block.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineParams {
    Ode(OdeParams),
    Bullet(BulletParams),
    Simbody(SimbodyParams),
}

/// Global stepping settings plus the active engine's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    pub max_step_size: Real,
    pub real_time_factor: Real,
    pub real_time_update_rate: Real,
    pub max_contacts: u32,
    pub engine: EngineParams,
}

impl Physics {
    /// Default settings for the given engine.
    pub fn new(engine: Engine) -> Self {
        let engine = match engine {
            Engine::Ode => EngineParams::Ode(OdeParams::default()),
            Engine::Bullet => EngineParams::Bullet(BulletParams::default()),
            Engine::Simbody => EngineParams::Simbody(SimbodyParams::default()),
        };
        Physics {
            max_step_size: 0.001,
            real_time_factor: 1.0,
            real_time_update_rate: 1000.0,
            max_contacts: 20,
            engine,
        }
    }

    /// Which engine the parameter block belongs to.
    pub fn engine_kind(&self) -> Engine {
        match self.engine {
            EngineParams::Ode(_) => Engine::Ode,
            EngineParams::Bullet(_) => Engine::Bullet,
            EngineParams::Simbody(_) => Engine::Simbody,
        }
    }
}

impl Default for Physics {
    fn default() -> Self {
        Physics::new(Engine::Ode)
    }
}
