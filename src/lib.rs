#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Planet
//!
//! Procedural voxel planets: a layered noise density field, chunked marching
//! cubes surfaces with level of detail, and real-time sculpting with local
//! remeshing.
//!
//! ## Key Modules
//!
//! * `core` - Shared concurrency primitives and scalar helpers
//! * `planet` - The generation pipeline: configuration, noise, density field,
//!   meshing, chunk store and terraforming
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_planet::{GeneratorConfig, Planet};
//!
//! let mut config = GeneratorConfig::default();
//! config.world.world_size_in_chunks = 2;
//! config.world.chunk_size = 8;
//! config.planet.radius = 5.0;
//!
//! let mut planet = Planet::generate(config).unwrap();
//! planet.terraform(Point3::new(0.0, 5.0, 0.0), 2.0, 1.0, true, 1, 0.016).unwrap();
//! planet.finish_terraform();
//! ```
//!
//! ## Concurrency
//!
//! Every lattice-wide kernel runs on the rayon thread pool and returns only
//! after all of its samples are written. Chunks are shared through
//! [`core::MtResource`]; a terraform stroke holds write locks on every chunk
//! in its window until the edited chunks are remeshed.

use std::env;

use cgmath::Point3;
use log::info;

pub mod core;
pub mod planet;

pub use planet::{
    config::{GeneratorConfig, LodLevel, MeshSettings, NoiseKind, NoiseLayerConfig, PlanetConfig, WorldConfig},
    density::{DensityFieldBuilder, DensityLattice},
    error::ConfigError,
    meshing::{IsosurfaceMesher, MeshSimplifier, Surface, SurfaceVertex, VertexClusterSimplifier},
    noise::{HeightCurve, NoiseKernel},
    terraform::{Brush, TerraformOutcome, TerraformSculptor},
    voxels::{select_lod, Chunk, ChunkState, ChunkStore, ChunkWriteSet},
    Planet, PlanetView,
};

/// Stopwatch label for the demo run.
pub const PLANET_GENERATION_STOPWATCH: &str = "Planet Generation";

/// Runs the demo: generates a planet, sculpts it for a few frames and logs
/// what happened.
///
/// The first command-line argument, if any, is a JSON config file. Without one
/// the default configuration is used.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            GeneratorConfig::load(path)?
        }
        None => GeneratorConfig::default(),
    };

    let start = web_time::Instant::now();
    let mut planet = Planet::generate(config)?;
    info!("{}: {:?}", PLANET_GENERATION_STOPWATCH, start.elapsed());

    let radius = planet.config().planet.radius;
    let viewer = Point3::new(0.0, 0.0, radius * 2.0);
    info!("View near the surface: {:?}", planet.tick(viewer));

    let surface_point = Point3::new(0.0, 0.0, radius);
    for _ in 0..10 {
        let outcome = planet.terraform(surface_point, radius * 0.25, 4.0, false, 1, 1.0 / 60.0)?;
        info!("Brush edited {} chunk(s)", outcome.touched);
    }
    let touched = planet.finish_terraform();

    let triangles: usize = planet
        .store()
        .lod_meshes()
        .iter()
        .map(Surface::triangle_count)
        .sum();
    info!(
        "Stroke touched {} chunk(s); LOD meshes hold {} triangles in total",
        touched, triangles
    );

    let far_viewer = Point3::new(0.0, 0.0, 10_000.0);
    info!("View from afar: {:?}", planet.tick(far_viewer));

    Ok(())
}
