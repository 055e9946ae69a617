use geo::{Area, Contains, Point};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::CollisionChecker;
use crate::errors::Error;
use crate::float_types::Real;
use crate::free_space::{self, FreeSpaceOptions};
use crate::light::{Light, LightKind};
use crate::model::{Link, MeshType, Model, ModelGroup};
use crate::occupancy;
use crate::physics::{Engine, EngineParams};
use crate::plugin::Plugin;
use crate::pose::Pose;
use crate::sampler::{Dof, SamplerConfig};
use crate::shapes::Shape;
use crate::world::{Include, ModelRef, World};

fn assert_close(a: Real, b: Real, eps: Real) {
    assert!((a - b).abs() < eps, "{a} vs {b} (eps {eps})");
}

// --------------------------------------------------------------------
// Pose

#[test]
fn pose_isometry_round_trip() {
    let pose = Pose::new(1.0, -2.0, 3.0, 0.1, -0.2, 0.3);
    let back = Pose::from_isometry(&pose.to_isometry());
    assert_close(back.x, pose.x, 1e-12);
    assert_close(back.y, pose.y, 1e-12);
    assert_close(back.z, pose.z, 1e-12);
    assert_close(back.roll, pose.roll, 1e-9);
    assert_close(back.pitch, pose.pitch, 1e-9);
    assert_close(back.yaw, pose.yaw, 1e-9);
}

#[test]
fn pose_compose_translations_accumulate() {
    let a = Pose::from_position(1.0, 2.0, 3.0);
    let b = Pose::from_position(0.5, -0.5, 1.0);
    let c = a.compose(&b);
    assert_close(c.x, 1.5, 1e-12);
    assert_close(c.y, 1.5, 1e-12);
    assert_close(c.z, 4.0, 1e-12);
}

#[test]
fn pose_compose_yaw_rotates_offset() {
    let mut a = Pose::identity();
    a.set_rpy(0.0, 0.0, std::f64::consts::FRAC_PI_2);
    let b = Pose::from_position(1.0, 0.0, 0.0);
    let c = a.compose(&b);
    // A +x offset in a frame yawed by 90 degrees lands on +y.
    assert_close(c.x, 0.0, 1e-9);
    assert_close(c.y, 1.0, 1e-9);
}

#[test]
fn pose_sdf_text_round_trip() {
    let pose = Pose::new(0.25, -1.5, 2.0, 0.0, 0.0, 1.0);
    let parsed = Pose::from_sdf_text(&pose.to_string()).unwrap();
    assert_eq!(parsed, pose);
}

#[test]
fn pose_sdf_text_rejects_wrong_arity() {
    assert!(matches!(
        Pose::from_sdf_text("1 2 3"),
        Err(Error::SdfParse(_))
    ));
}

// --------------------------------------------------------------------
// Shapes and footprints

#[test]
fn box_mesh_has_eight_vertices_twelve_triangles() {
    let mesh = Shape::Box3 { size: [1.0, 2.0, 3.0] }.trimesh();
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.indices.len(), 12);
}

#[test]
fn unit_box_footprint_area() {
    let model = Model::from_box("b", [1.0, 1.0, 1.0]);
    let fp = model.footprint(MeshType::Collision);
    assert_close(fp.unsigned_area(), 1.0, 1e-6);
}

#[test]
fn yawed_box_footprint_keeps_area() {
    let mut model = Model::from_box("b", [2.0, 1.0, 1.0]);
    model.pose.set_rpy(0.0, 0.0, 0.7);
    let fp = model.footprint(MeshType::Collision);
    assert_close(fp.unsigned_area(), 2.0, 1e-6);
}

#[test]
fn cylinder_footprint_approximates_disc() {
    let model = Model::from_cylinder("c", 1.0, 2.0);
    let fp = model.footprint(MeshType::Collision);
    // A 16-gon inscribed in the unit circle.
    assert!(fp.unsigned_area() > 3.0 && fp.unsigned_area() < std::f64::consts::PI);
}

#[test]
fn model_bounds_follow_pose() {
    let mut model = Model::from_box("b", [2.0, 2.0, 2.0]);
    model.pose = Pose::from_position(10.0, 0.0, 5.0);
    let (lo, hi) = model.bounds(MeshType::Collision).unwrap();
    assert_close(lo.x, 9.0, 1e-9);
    assert_close(hi.x, 11.0, 1e-9);
    assert_close(lo.z, 4.0, 1e-9);
    assert_close(hi.z, 6.0, 1e-9);
}

#[test]
fn footprint_accumulator_starts_empty() {
    let acc = crate::footprint::Footprint::default();
    assert!(acc.is_empty());
    assert!(acc.polygon().0.is_empty());
}

#[test]
fn visual_only_link_has_no_collision_footprint() {
    let mut model = Model::new("ghost");
    model.add_link(
        "link",
        Link {
            pose: Pose::identity(),
            collision: None,
            visual: Some(Shape::Sphere { radius: 1.0 }),
        },
    );
    assert!(model.footprint(MeshType::Collision).0.is_empty());
    assert!(!model.footprint(MeshType::Visual).0.is_empty());
}

// --------------------------------------------------------------------
// Model groups

#[test]
fn group_suffixes_clashing_names() {
    let mut group = ModelGroup::new("g", Pose::identity());
    assert_eq!(group.add_model("box", Model::from_box("box", [1.0; 3])), "box");
    assert_eq!(group.add_model("box", Model::from_box("box", [1.0; 3])), "box_1");
    assert_eq!(group.add_model("box", Model::from_box("box", [1.0; 3])), "box_2");
    assert_eq!(group.n_models(), 3);
}

#[test]
fn group_prefixes_non_default_names() {
    let mut group = ModelGroup::new("props", Pose::identity());
    group.add_model("box", Model::from_box("box", [1.0; 3]));
    let flattened = group.get_models(true);
    assert!(flattened.contains_key("props/box"));
    let unprefixed = group.get_models(false);
    assert!(unprefixed.contains_key("box"));
}

#[test]
fn group_pose_folds_into_model_poses() {
    let mut group = ModelGroup::new("props", Pose::from_position(5.0, 0.0, 0.0));
    let mut model = Model::from_box("box", [1.0; 3]);
    model.pose = Pose::from_position(1.0, 0.0, 0.0);
    group.add_model("box", model);
    let flattened = group.get_models(true);
    let moved = &flattened["props/box"];
    assert_close(moved.pose.x, 6.0, 1e-9);
}

#[test]
fn group_copies_are_deep() {
    let mut group = ModelGroup::new("g", Pose::identity());
    group.add_model("box", Model::from_box("box", [1.0; 3]));
    let mut copy = group.get_models(false)["box"].clone();
    copy.pose = Pose::from_position(100.0, 0.0, 0.0);
    assert_close(group.get_model("box").unwrap().pose.x, 0.0, 1e-12);
}

// --------------------------------------------------------------------
// Occupancy

#[test]
fn occupancy_partitions_by_flag_tag_and_static() {
    let models = vec![
        Model::ground_plane("ground_plane", [10.0, 10.0]),
        Model::from_box("wall", [4.0, 0.2, 2.0]),
        {
            let mut m = Model::from_sphere("ball", 0.5);
            m.is_static = false;
            m
        },
        Model::from_box("floor_tile", [1.0, 1.0, 0.1]),
    ];
    let partition = occupancy::classify(
        &models,
        &["floor_*".to_string()],
        MeshType::Collision,
    );
    assert!(!partition.ground_plane.0.is_empty());
    assert!(!partition.static_obstacles.0.is_empty());
    assert!(!partition.non_static_obstacles.0.is_empty());
    // floor_tile went to the ground-plane union via the tag pattern.
    assert_close(partition.ground_plane.unsigned_area(), 100.0, 1e-6);
}

// --------------------------------------------------------------------
// Free space

#[test]
fn empty_scene_requires_limits() {
    let err = free_space::compute(&[], &FreeSpaceOptions::default()).unwrap_err();
    assert!(matches!(err, Error::LimitsRequired { axis: "x" }));
}

#[test]
fn empty_scene_with_limits_is_the_rectangle() {
    let opts = FreeSpaceOptions {
        x_limits: Some([-5.0, 5.0]),
        y_limits: Some([-5.0, 5.0]),
        ..FreeSpaceOptions::default()
    };
    let free = free_space::compute(&[], &opts).unwrap();
    assert_close(free.unsigned_area(), 100.0, 1e-9);
}

#[test]
fn inverted_limits_are_rejected() {
    let opts = FreeSpaceOptions {
        x_limits: Some([5.0, -5.0]),
        y_limits: Some([-5.0, 5.0]),
        ..FreeSpaceOptions::default()
    };
    assert!(matches!(
        free_space::compute(&[], &opts).unwrap_err(),
        Error::InvalidLimits { axis: "x", .. }
    ));
}

#[test]
fn obstacles_shrink_free_space_monotonically() {
    let ground = Model::ground_plane("ground_plane", [10.0, 10.0]);
    let opts = FreeSpaceOptions::default();

    let base = free_space::compute(&[ground.clone()], &opts).unwrap();
    let with_one = free_space::compute(
        &[ground.clone(), Model::from_box("a", [2.0, 2.0, 1.0])],
        &opts,
    )
    .unwrap();
    let with_two = free_space::compute(
        &[
            ground,
            Model::from_box("a", [2.0, 2.0, 1.0]),
            {
                let mut b = Model::from_box("b", [1.0, 1.0, 1.0]);
                b.pose = Pose::from_position(3.0, 3.0, 0.0);
                b
            },
        ],
        &opts,
    )
    .unwrap();

    assert!(base.unsigned_area() > with_one.unsigned_area());
    assert!(with_one.unsigned_area() > with_two.unsigned_area());
    // The 2x2 box removes about 4 units of area.
    assert_close(base.unsigned_area() - with_one.unsigned_area(), 4.0, 0.1);
}

#[test]
fn removing_an_obstacle_restores_free_space() {
    let ground = Model::ground_plane("ground_plane", [10.0, 10.0]);
    let opts = FreeSpaceOptions::default();
    let before = free_space::compute(&[ground.clone()], &opts).unwrap();
    let _with = free_space::compute(
        &[ground.clone(), Model::from_box("a", [2.0, 2.0, 1.0])],
        &opts,
    )
    .unwrap();
    let after = free_space::compute(&[ground], &opts).unwrap();
    assert_close(before.unsigned_area(), after.unsigned_area(), 1e-2);
}

#[test]
fn ignored_models_do_not_constrain() {
    let ground = Model::ground_plane("ground_plane", [10.0, 10.0]);
    let robot = {
        let mut m = Model::from_box("robot_base", [1.0, 1.0, 0.5]);
        m.is_static = false;
        m
    };
    let opts = FreeSpaceOptions {
        ignore_tags: vec!["robot_*".to_string()],
        ..FreeSpaceOptions::default()
    };
    let free = free_space::compute(&[ground.clone()], &opts).unwrap();
    let with_robot = free_space::compute(&[ground, robot], &opts).unwrap();
    assert_close(free.unsigned_area(), with_robot.unsigned_area(), 1e-9);
}

#[test]
fn fully_covered_ground_plane_does_not_clip() {
    // A static building covering the whole ground plane; without the
    // coverage gate the free space would collapse to nothing twice
    // over (intersection then subtraction).
    let ground = Model::ground_plane("ground_plane", [4.0, 4.0]);
    let building = Model::from_box("building", [4.0, 4.0, 10.0]);
    let opts = FreeSpaceOptions {
        x_limits: Some([-10.0, 10.0]),
        y_limits: Some([-10.0, 10.0]),
        ..FreeSpaceOptions::default()
    };
    let free = free_space::compute(&[ground, building], &opts).unwrap();
    // 20x20 rectangle minus the 4x4 building, minus stabilization slack.
    assert!(free.unsigned_area() > 380.0);
}

#[test]
fn stabilization_keeps_area_near_input() {
    let opts = FreeSpaceOptions::default();

    // Plain ground plane: the shrink/grow pass must return nearly the
    // whole 10x10 footprint, not an empty or inverted region.
    let ground = Model::ground_plane("ground_plane", [10.0, 10.0]);
    let free = free_space::compute(&[ground.clone()], &opts).unwrap();
    assert!(free.unsigned_area() > 99.5 && free.unsigned_area() <= 100.0);

    // Ground plane with a centered pillar: the result is the annulus
    // around the pillar, never the pillar's interior.
    let pillar = Model::from_box("pillar", [2.0, 2.0, 2.0]);
    let annulus = free_space::compute(&[ground, pillar], &opts).unwrap();
    assert_close(annulus.unsigned_area(), 96.0, 0.5);
    assert!(!annulus.contains(&Point::new(0.0, 0.0)));
    assert!(annulus.contains(&Point::new(3.0, 0.0)));
}

#[test]
fn sliver_pieces_are_dropped() {
    // Two walls leaving a 1 mm corridor between them; the corridor
    // disappears under the shrink pass, the open halves survive.
    let ground = Model::ground_plane("ground_plane", [10.0, 10.0]);
    let mut wall_a = Model::from_box("wall_a", [0.5, 10.0, 2.0]);
    wall_a.pose = Pose::from_position(-0.2505, 0.0, 0.0);
    let mut wall_b = Model::from_box("wall_b", [0.5, 10.0, 2.0]);
    wall_b.pose = Pose::from_position(0.2505, 0.0, 0.0);
    let free = free_space::compute(
        &[ground, wall_a, wall_b],
        &FreeSpaceOptions::default(),
    )
    .unwrap();
    assert_eq!(free.0.len(), 2);
    for piece in &free.0 {
        assert!(piece.unsigned_area() > 1.0);
    }
}

// --------------------------------------------------------------------
// Collision checker

#[test]
fn overlapping_boxes_collide() {
    let mut checker = CollisionChecker::new();
    checker
        .add_model(&Model::from_box("a", [2.0, 2.0, 2.0]))
        .unwrap();
    let candidate = Model::from_box("b", [2.0, 2.0, 2.0]);
    assert!(checker
        .collides_with_scene(&candidate, &Pose::from_position(1.0, 0.0, 0.0))
        .unwrap());
    assert!(!checker
        .collides_with_scene(&candidate, &Pose::from_position(5.0, 0.0, 0.0))
        .unwrap());
}

#[test]
fn empty_scene_never_collides() {
    let checker = CollisionChecker::new();
    assert!(checker.is_empty());
    let candidate = Model::from_sphere("s", 1.0);
    assert!(!checker
        .collides_with_scene(&candidate, &Pose::identity())
        .unwrap());
}

// --------------------------------------------------------------------
// Sampler

fn ten_by_ten_world() -> World {
    let mut world = World::new("test");
    world.add_model(Model::ground_plane("ground_plane", [10.0, 10.0]));
    world
}

// Capped so a placement regression fails the suite instead of spinning
// the unbounded default forever.
fn capped_config() -> SamplerConfig {
    SamplerConfig {
        max_attempts: Some(100_000),
        ..SamplerConfig::default()
    }
}

#[test]
fn samples_exact_count_inside_free_space() {
    let mut world = ten_by_ten_world();
    world.add_model(Model::from_box("pillar", [1.0, 1.0, 2.0]));

    let candidate = Model::from_box("crate", [1.0, 1.0, 1.0]);
    let mut rng = StdRng::seed_from_u64(1);
    let (poses, free) = world
        .random_free_spots_with_polygon(
            ModelRef::ByValue(&candidate),
            8,
            &capped_config(),
            &mut rng,
        )
        .unwrap();

    assert_eq!(poses.len(), 8);
    for pose in &poses {
        assert!(free.contains(&Point::new(pose.x, pose.y)));
        assert_eq!(pose.z, 0.0);
        assert_eq!(pose.roll, 0.0);
        assert_eq!(pose.yaw, 0.0);
    }
}

#[test]
fn sampled_spots_avoid_each_other() {
    let world = ten_by_ten_world();
    let candidate = Model::from_box("crate", [2.0, 2.0, 1.0]);
    let mut rng = StdRng::seed_from_u64(2);
    let poses = world
        .random_free_spots(ModelRef::ByValue(&candidate), 4, &capped_config(), &mut rng)
        .unwrap();
    for (i, a) in poses.iter().enumerate() {
        for b in &poses[i + 1..] {
            let dx = (a.x - b.x).abs();
            let dy = (a.y - b.y).abs();
            // Axis-aligned 2x2 boxes must be separated on some axis.
            assert!(dx >= 2.0 - 1e-9 || dy >= 2.0 - 1e-9);
        }
    }
}

#[test]
fn z_dof_samples_within_limits_and_keeps_angles_zero() {
    let world = ten_by_ten_world();
    let candidate = Model::from_sphere("ball", 0.3);
    let config = SamplerConfig {
        dofs: vec![Dof::Z],
        z_limits: Some([0.5, 2.0]),
        ..capped_config()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let poses = world
        .random_free_spots(ModelRef::ByValue(&candidate), 5, &config, &mut rng)
        .unwrap();
    for pose in &poses {
        assert!(pose.x.abs() <= 5.0 && pose.y.abs() <= 5.0);
        assert!((0.5..=2.0).contains(&pose.z));
        assert_eq!(pose.roll, 0.0);
        assert_eq!(pose.pitch, 0.0);
        assert_eq!(pose.yaw, 0.0);
    }
}

#[test]
fn yaw_dof_draws_within_custom_limits() {
    let world = ten_by_ten_world();
    let candidate = Model::from_box("crate", [1.0, 0.5, 0.5]);
    let config = SamplerConfig {
        dofs: vec![Dof::X, Dof::Y, Dof::Yaw],
        yaw_limits: Some([-0.5, 0.5]),
        ..capped_config()
    };
    let mut rng = StdRng::seed_from_u64(4);
    let poses = world
        .random_free_spots(ModelRef::ByValue(&candidate), 5, &config, &mut rng)
        .unwrap();
    for pose in &poses {
        assert!(pose.yaw.abs() <= 0.5);
        assert_eq!(pose.roll, 0.0);
    }
}

#[test]
fn dof_tags_parse() {
    assert_eq!(Dof::from_str("yaw").unwrap(), Dof::Yaw);
    assert_eq!(Dof::from_str("x").unwrap(), Dof::X);
    assert!(matches!(
        Dof::from_str("twist"),
        Err(Error::InvalidDof(_))
    ));
}

#[test]
fn zero_count_is_invalid() {
    let world = ten_by_ten_world();
    let candidate = Model::from_box("crate", [1.0; 3]);
    let mut rng = StdRng::seed_from_u64(5);
    assert!(matches!(
        world.random_free_spots(
            ModelRef::ByValue(&candidate),
            0,
            &SamplerConfig::default(),
            &mut rng
        ),
        Err(Error::InvalidCount)
    ));
}

#[test]
fn degenerate_explicit_limits_are_rejected() {
    let world = ten_by_ten_world();
    let candidate = Model::from_sphere("ball", 0.3);
    let config = SamplerConfig {
        dofs: vec![Dof::Z],
        z_limits: Some([1.0, 1.0]),
        ..capped_config()
    };
    let mut rng = StdRng::seed_from_u64(11);
    assert!(matches!(
        world.random_free_spots(ModelRef::ByValue(&candidate), 1, &config, &mut rng),
        Err(Error::InvalidLimits { axis: "z", .. })
    ));
}

#[test]
fn crowded_scene_exhausts_attempts() {
    let mut world = World::new("crowded");
    world.add_model(Model::from_box("block", [9.8, 9.8, 1.0]));
    let candidate = Model::from_box("crate", [1.0; 3]);
    let config = SamplerConfig {
        max_attempts: Some(50),
        free_space: FreeSpaceOptions {
            x_limits: Some([-5.0, 5.0]),
            y_limits: Some([-5.0, 5.0]),
            ..FreeSpaceOptions::default()
        },
        ..SamplerConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(6);
    assert!(matches!(
        world.random_free_spots(ModelRef::ByValue(&candidate), 1, &config, &mut rng),
        Err(Error::CouldNotPlace { attempts: 50, .. })
    ));
}

#[test]
fn oversized_candidate_is_rejected_up_front() {
    let world = ten_by_ten_world();
    let candidate = Model::from_box("hangar", [20.0, 20.0, 5.0]);
    let mut rng = StdRng::seed_from_u64(7);
    assert!(matches!(
        world.random_free_spots(
            ModelRef::ByValue(&candidate),
            1,
            &SamplerConfig::default(),
            &mut rng
        ),
        Err(Error::ModelTooLarge(_))
    ));
}

#[test]
fn candidate_without_collision_geometry_is_rejected() {
    let world = ten_by_ten_world();
    let mut candidate = Model::new("ghost");
    candidate.add_link(
        "link",
        Link {
            pose: Pose::identity(),
            collision: None,
            visual: Some(Shape::Box3 { size: [1.0; 3] }),
        },
    );
    let mut rng = StdRng::seed_from_u64(8);
    assert!(matches!(
        world.random_free_spots(
            ModelRef::ByValue(&candidate),
            1,
            &SamplerConfig::default(),
            &mut rng
        ),
        Err(Error::NoValidFootprint(_))
    ));
}

#[test]
fn by_name_reference_resolves_stored_models() {
    let mut world = ten_by_ten_world();
    world.add_model(Model::from_box("crate", [1.0; 3]));
    let mut rng = StdRng::seed_from_u64(9);
    let poses = world
        .random_free_spots(ModelRef::ByName("crate"), 2, &capped_config(), &mut rng)
        .unwrap();
    assert_eq!(poses.len(), 2);

    assert!(matches!(
        world.random_free_spots(ModelRef::ByName("missing"), 1, &capped_config(), &mut rng),
        Err(Error::ModelNotFound(_))
    ));
}

#[test]
fn place_random_stores_copies() {
    let mut world = ten_by_ten_world();
    let barrel = Model::from_cylinder("barrel", 0.4, 1.0);
    let mut rng = StdRng::seed_from_u64(10);
    let tags = world
        .place_random(ModelRef::ByValue(&barrel), 3, &capped_config(), &mut rng)
        .unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0], "barrel");
    assert_eq!(tags[1], "barrel_1");
    for tag in &tags {
        assert!(world.model_exists(tag));
    }
}

// --------------------------------------------------------------------
// World

#[test]
fn world_bounds_cover_all_groups() {
    let mut world = World::new("w");
    world.add_model(Model::from_box("a", [2.0; 3]));
    let mut far = Model::from_box("b", [2.0; 3]);
    far.pose = Pose::from_position(10.0, 0.0, 0.0);
    world.add_model_to(far, "props");
    let (lo, hi) = world.bounds(MeshType::Collision).unwrap();
    assert_close(lo.x, -1.0, 1e-9);
    assert_close(hi.x, 11.0, 1e-9);
}

#[test]
fn set_as_ground_plane_flags_stored_model() {
    let mut world = World::new("w");
    world.add_model(Model::from_box("floor", [10.0, 10.0, 0.1]));
    world.set_as_ground_plane("floor").unwrap();
    let models = world.models();
    assert!(models.iter().any(|m| m.name() == "floor" && m.is_ground_plane));
    assert!(matches!(
        world.set_as_ground_plane("missing"),
        Err(Error::ModelNotFound(_))
    ));
}

#[test]
fn is_free_space_distinguishes_occupied_points() {
    let mut world = ten_by_ten_world();
    world.add_model(Model::from_box("pillar", [2.0, 2.0, 2.0]));
    let opts = FreeSpaceOptions::default();
    assert!(!world.is_free_space(0.0, 0.0, &opts).unwrap());
    assert!(world.is_free_space(3.0, 3.0, &opts).unwrap());
}

#[test]
fn reset_physics_restores_engine_defaults() {
    let mut world = World::new("w");
    world.physics.max_step_size = 0.01;
    world.reset_physics(Engine::Bullet);
    assert_close(world.physics.max_step_size, 0.001, 1e-12);
    assert_eq!(world.physics.engine_kind(), Engine::Bullet);
    assert!(matches!(world.physics.engine, EngineParams::Bullet(_)));
}

#[test]
fn rm_model_by_prefixed_name() {
    let mut world = World::new("w");
    world.add_model_to(Model::from_box("box", [1.0; 3]), "props");
    assert!(world.model_exists("props/box"));
    assert!(world.rm_model("props/box"));
    assert!(!world.model_exists("props/box"));
}

// --------------------------------------------------------------------
// SDF round trip

fn sample_world() -> World {
    let mut world = World::new("round_trip");
    world.gravity = nalgebra::Vector3::new(0.0, 0.0, -9.81);
    world.reset_physics(Engine::Ode);

    let mut shelf = Model::from_box("shelf", [4.0, 1.0, 2.5]);
    shelf.pose = Pose::new(1.0, -2.0, 0.0, 0.0, 0.0, 0.25);
    world.add_model(shelf);
    world.add_model(Model::ground_plane("ground_plane", [20.0, 20.0]));
    world.add_model_to(Model::from_cylinder("barrel", 0.4, 1.2), "props");

    let mut sun = Light::new("sun", LightKind::Directional);
    sun.pose = Pose::from_position(0.0, 0.0, 10.0);
    world.add_light(sun);

    world.add_plugin(
        Plugin::new("wind", "libWindPlugin.so").with_param("force", "0.2"),
    );
    world.includes.push(Include {
        uri: "model://willowgarage".to_string(),
        name: Some("office".to_string()),
        pose: Some(Pose::from_position(5.0, 5.0, 0.0)),
        is_static: Some(true),
    });
    world
}

#[test]
fn sdf_round_trip_preserves_world() {
    let world = sample_world();
    let xml = world.to_sdf(false, false);
    let parsed = World::from_sdf_str(&xml).unwrap();

    assert_eq!(parsed.name, world.name);
    assert_close(parsed.gravity.z, -9.81, 1e-12);
    assert_eq!(parsed.physics.engine_kind(), Engine::Ode);
    assert_eq!(parsed.includes, world.includes);

    let original = world.models();
    let reparsed = parsed.models();
    assert_eq!(reparsed.len(), original.len());
    for (a, b) in original.iter().zip(reparsed.iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.is_static, b.is_static);
        assert_close(a.pose.x, b.pose.x, 1e-9);
        assert_close(a.pose.yaw, b.pose.yaw, 1e-9);
        assert_eq!(a.links().len(), b.links().len());
        for (la, lb) in a.links().values().zip(b.links().values()) {
            assert_eq!(la.collision, lb.collision);
        }
    }

    let lights = parsed.lights();
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].kind, LightKind::Directional);
    assert!(lights[0].cast_shadows);

    let plugins: Vec<_> = parsed.plugins().collect();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].filename, "libWindPlugin.so");
    assert_eq!(plugins[0].params["force"], "0.2");
}

#[test]
fn sdf_round_trip_restores_ground_plane_flag() {
    let world = sample_world();
    let parsed = World::from_sdf_str(&world.to_sdf(false, false)).unwrap();
    assert!(parsed
        .models()
        .iter()
        .any(|m| m.name() == "ground_plane" && m.is_ground_plane));
}

#[test]
fn sdf_parses_bare_world_root() {
    let xml = r#"
        <world name="bare">
          <gravity>0 0 -9.8</gravity>
          <model name="box">
            <static>1</static>
            <link name="link">
              <collision name="c"><geometry><box><size>1 1 1</size></box></geometry></collision>
            </link>
          </model>
        </world>"#;
    let world = World::from_sdf_str(xml).unwrap();
    assert_eq!(world.name, "bare");
    assert_eq!(world.n_models(), 1);
    let model = world.get_model("box").unwrap();
    assert!(model.is_static);
    assert_eq!(
        model.links()["link"].collision,
        Some(Shape::Box3 { size: [1.0, 1.0, 1.0] })
    );
}

#[test]
fn sdf_default_includes_are_emitted() {
    let world = World::new("w");
    let xml = world.to_sdf(true, true);
    assert!(xml.contains("model://ground_plane"));
    assert!(xml.contains("model://sun"));
    let parsed = World::from_sdf_str(&xml).unwrap();
    assert_eq!(parsed.includes.len(), 2);
}

#[test]
fn sdf_rejects_unknown_engine() {
    let xml = r#"<world name="w"><physics type="warp"></physics></world>"#;
    assert!(matches!(
        World::from_sdf_str(xml),
        Err(Error::UnknownEngine(_))
    ));
}

#[test]
fn sdf_rejects_model_without_name() {
    let xml = r#"<world name="w"><model><static>1</static></model></world>"#;
    match World::from_sdf_str(xml) {
        Err(Error::MissingElement { element, .. }) => assert_eq!(element, "name"),
        other => panic!("expected MissingElement, got {other:?}"),
    }
}

#[test]
fn sdf_round_trip_preserves_physics_parameters() {
    let mut world = World::new("w");
    world.reset_physics(Engine::Simbody);
    if let EngineParams::Simbody(simbody) = &mut world.physics.engine {
        simbody.accuracy = 0.05;
    }
    let parsed = World::from_sdf_str(&world.to_sdf(false, false)).unwrap();
    match parsed.physics.engine {
        EngineParams::Simbody(simbody) => assert_close(simbody.accuracy, 0.05, 1e-12),
        ref other => panic!("wrong engine params: {other:?}"),
    }
}
