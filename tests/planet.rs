use cgmath::Point3;
use voxel_planet::{
    ConfigError, DensityFieldBuilder, GeneratorConfig, MeshSimplifier, NoiseKernel, NoiseKind, NoiseLayerConfig,
    Planet, PlanetView, Surface,
};

fn small_config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.planet.seed = 31337;
    config.planet.radius = 9.0;
    config.planet.layers = vec![
        NoiseLayerConfig {
            kind: NoiseKind::Standard,
            ..Default::default()
        },
        NoiseLayerConfig {
            kind: NoiseKind::Ridged,
            amplitude: 0.05,
            use_mask_from_previous_layer: true,
            ..Default::default()
        },
    ];
    config.world.world_size_in_chunks = 3;
    config.world.chunk_size = 8;
    config.world.lods[0].view_distance = 30.0;
    config
}

#[test]
fn noise_sampling_is_pure() {
    for kind in [NoiseKind::Standard, NoiseKind::Ridged, NoiseKind::Billow] {
        let layer = NoiseLayerConfig {
            kind,
            octaves: 6,
            offset: [0.5, -3.0, 12.0],
            ..Default::default()
        };
        let kernel = NoiseKernel::new(-42, &layer).unwrap();

        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..100 {
            let point = Point3::new(rng.f32() * 64.0, rng.f32() * 64.0, rng.f32() * 64.0);
            let first = kernel.sample(point).to_bits();
            assert_eq!(first, kernel.sample(point).to_bits());
            assert_eq!(first, NoiseKernel::new(-42, &layer).unwrap().sample(point).to_bits());
        }
    }
}

#[test]
fn density_builds_are_reproducible() {
    let config = small_config();
    let builder = DensityFieldBuilder::new(&config.planet).unwrap();

    let first = builder.build(16, 6.0).unwrap();
    let second = DensityFieldBuilder::new(&config.planet).unwrap().build(16, 6.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn generate_sculpt_and_finish() {
    let mut planet = Planet::generate(small_config()).unwrap();
    assert_eq!(planet.seed(), 31337);
    assert_eq!(planet.store().len(), 27);
    assert_eq!(planet.store().lod_meshes().len(), 3);
    let full_detail = planet.lod_mesh(0).unwrap().triangle_count();
    assert!(full_detail > 0);

    match planet.tick(Point3::new(0.0, 0.0, 14.0)) {
        PlanetView::Chunks { visible } => assert!(visible > 0),
        view => panic!("expected chunks, got {view:?}"),
    }

    let surface_point = Point3::new(0.0, 0.0, 9.0);
    let center_chunk = planet.store().chunk_coord_of(surface_point);
    let before = planet.store().chunk_map(center_chunk).unwrap();

    for _ in 0..5 {
        let outcome = planet.terraform(surface_point, 3.0, 2.0, false, 1, 0.1).unwrap();
        assert!(outcome.touched > 0);
    }

    let after = planet.store().chunk_map(center_chunk).unwrap();
    assert!(after.values().iter().zip(before.values()).all(|(a, b)| a <= b));
    assert!(after.values().iter().zip(before.values()).any(|(a, b)| a < b));
    assert!(planet.store().chunk(center_chunk).unwrap().get().is_editing());

    assert!(planet.finish_terraform() > 0);
    assert!(!planet.store().chunk(center_chunk).unwrap().get().is_editing());
    assert_eq!(planet.finish_terraform(), 0);
}

#[test]
fn far_viewers_see_the_combined_mesh() {
    let planet = Planet::generate(small_config()).unwrap();

    assert_eq!(planet.tick(Point3::new(0.0, 0.0, 1000.0)), PlanetView::Combined { lod: 2 });
    assert_eq!(planet.tick(Point3::new(0.0, 150.0, 0.0)), PlanetView::Combined { lod: 1 });
    assert!(planet
        .store()
        .coords()
        .all(|coord| !planet.store().chunk(coord).unwrap().get().is_visible()));
}

#[test]
fn regeneration_replaces_every_chunk() {
    let mut config = small_config();
    config.planet.random_seed = true;
    let mut planet = Planet::generate(config).unwrap();
    let old_chunk = planet.store().chunk(Point3::new(1, 1, 1)).unwrap();

    planet.regenerate().unwrap();

    assert!((-999_999..=999_999).contains(&planet.seed()));
    assert_eq!(planet.store().len(), 27);
    let new_chunk = planet.store().chunk(Point3::new(1, 1, 1)).unwrap();
    assert!(!old_chunk.ptr_eq(&new_chunk));
    assert_eq!(old_chunk.get().state(), voxel_planet::ChunkState::Destroyed);
}

struct CountingSimplifier;

impl MeshSimplifier for CountingSimplifier {
    fn simplify(&self, surface: &Surface, quality: f32) -> Surface {
        if quality < 1.0 {
            Surface::default()
        } else {
            surface.clone()
        }
    }
}

#[test]
fn custom_simplifiers_receive_every_lod_quality() {
    let planet = Planet::with_simplifier(small_config(), Box::new(CountingSimplifier)).unwrap();
    let meshes = planet.store().lod_meshes();

    assert!(!meshes[0].is_empty());
    assert!(meshes[1].is_empty());
    assert!(meshes[2].is_empty());
}

#[test]
fn invalid_configs_are_rejected_before_generation() {
    let mut config = small_config();
    config.planet.layers[1].octaves = 12;
    assert!(matches!(
        Planet::generate(config),
        Err(ConfigError::InvalidOctaves { layer: 1, octaves: 12 })
    ));

    let mut config = small_config();
    config.planet.radius = -1.0;
    assert!(matches!(Planet::generate(config), Err(ConfigError::NonPositiveRadius(_))));

    let mut config = small_config();
    config.world.lods.clear();
    assert!(matches!(Planet::generate(config), Err(ConfigError::EmptyLodTable)));

    let planet_result = Planet::generate(small_config())
        .and_then(|mut planet| planet.terraform(Point3::new(0.0, 0.0, 0.0), 0.0, 1.0, true, 1, 0.1));
    assert!(matches!(planet_result, Err(ConfigError::InvalidBrush(_))));
}
