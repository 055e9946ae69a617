//! Small demo: build a world, scatter a few models into the free space,
//! and print the resulting SDF document.

use pcg_world::errors::Result;
use pcg_world::model::Model;
use pcg_world::sampler::SamplerConfig;
use pcg_world::world::{ModelRef, World};
use rand::SeedableRng;

fn main() -> Result<()> {
    let mut world = World::new("demo");
    world.add_model(Model::ground_plane("ground_plane", [20.0, 20.0]));
    world.add_model(Model::from_box("warehouse_shelf", [4.0, 1.0, 2.5]));

    let barrel = Model::from_cylinder("barrel", 0.4, 1.2);
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut config = SamplerConfig::default();
    config.max_attempts = Some(10_000);
    world.place_random(ModelRef::ByValue(&barrel), 5, &config, &mut rng)?;

    print!("{}", world.to_sdf(false, true));
    Ok(())
}
