//! SDF XML round trip for [`World`](crate::world::World) descriptions.
//!
//! Writing builds the document by hand; reading walks quick-xml events.
//! Only the world-level subset of the schema is covered: physics, models
//! with primitive link geometry, lights, plugins, and includes.

pub mod read;
pub mod write;

/// Schema version stamped on written documents and accepted on read.
pub const SDF_VERSION: &str = "1.6";

use crate::errors::Result;
use crate::world::World;

impl World {
    /// Render this world as an SDF document. The flags append the stock
    /// `model://ground_plane` and `model://sun` includes.
    pub fn to_sdf(&self, with_default_ground_plane: bool, with_default_sun: bool) -> String {
        write::to_sdf(self, with_default_ground_plane, with_default_sun)
    }

    /// Parse an SDF document (either `<sdf>` root or bare `<world>`).
    pub fn from_sdf_str(xml: &str) -> Result<World> {
        read::from_sdf_str(xml)
    }
}
