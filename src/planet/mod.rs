//! # Planet
//!
//! The generation pipeline and its editing protocol:
//!
//! ```text
//! PlanetConfig -> DensityFieldBuilder -> ChunkStore -> IsosurfaceMesher
//!                                            ^               |
//!                                            +-- Terraform --+
//! ```
//!
//! [`Planet`] ties the stages together. It generates the world from a
//! [`GeneratorConfig`], runs the per-frame view tick and forwards brush strokes
//! to the [`TerraformSculptor`].

use cgmath::{MetricSpace, Point3};
use log::info;
use web_time::Instant;

pub mod config;
pub mod density;
pub mod error;
pub mod meshing;
pub mod noise;
pub mod terraform;
pub mod voxels;

use config::GeneratorConfig;
use density::DensityFieldBuilder;
use error::ConfigError;
use meshing::{MeshSimplifier, Surface, VertexClusterSimplifier};
use terraform::{Brush, TerraformOutcome, TerraformSculptor};
use voxels::{select_lod, ChunkStore};

/// Bounds of a randomly drawn seed.
pub const RANDOM_SEED_RANGE: std::ops::RangeInclusive<i32> = -999_999..=999_999;

/// What should be drawn for the current viewer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetView {
    /// The viewer is close: individual chunks are shown.
    Chunks {
        /// Number of chunks shown.
        visible: usize,
    },
    /// The viewer is far away: the combined mesh of this LOD level is shown.
    Combined {
        /// Level whose combined mesh is shown.
        lod: usize,
    },
}

/// A generated planet with its chunks and combined LOD meshes.
pub struct Planet {
    config: GeneratorConfig,
    seed: i32,
    store: ChunkStore,
    simplifier: Box<dyn MeshSimplifier>,
}

impl Planet {
    /// Generates a planet, simplifying LOD meshes by vertex clustering.
    pub fn generate(config: GeneratorConfig) -> Result<Self, ConfigError> {
        Self::with_simplifier(config, Box::new(VertexClusterSimplifier::default()))
    }

    /// Generates a planet with a custom mesh simplifier.
    ///
    /// # Arguments
    /// * `config` - Planet and world settings, validated before any work starts
    /// * `simplifier` - Produces the lower-detail combined meshes
    ///
    /// # Returns
    /// The generated planet, or the configuration error that made generation impossible.
    pub fn with_simplifier(
        config: GeneratorConfig,
        simplifier: Box<dyn MeshSimplifier>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (seed, store) = Self::build(&config, simplifier.as_ref())?;

        Ok(Self {
            config,
            seed,
            store,
            simplifier,
        })
    }

    fn build(
        config: &GeneratorConfig,
        simplifier: &dyn MeshSimplifier,
    ) -> Result<(i32, ChunkStore), ConfigError> {
        let start = Instant::now();

        let mut planet = config.planet.clone();
        if planet.random_seed {
            planet.seed = fastrand::i32(RANDOM_SEED_RANGE);
        }
        info!("Generating planet with seed {}", planet.seed);

        let lattice = DensityFieldBuilder::new(&planet)?
            .build(config.world.lattice_size(), planet.radius)?;
        let mut store = ChunkStore::build(&lattice, &config.world)?;
        store.rebuild_lod_meshes(simplifier);

        info!("Planet generated in {:?}", start.elapsed());
        Ok((planet.seed, store))
    }

    /// Destroys every chunk and generates the planet again.
    ///
    /// A planet configured with a random seed draws a new one.
    pub fn regenerate(&mut self) -> Result<(), ConfigError> {
        self.store.tear_down();
        let (seed, store) = Self::build(&self.config, self.simplifier.as_ref())?;
        self.seed = seed;
        self.store = store;
        Ok(())
    }

    /// The config the planet was generated from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The seed the current world was generated with.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// The planet's chunks.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Mutable access to the planet's chunks, for custom sculpting.
    pub fn store_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    /// Combined planet mesh of a LOD level.
    pub fn lod_mesh(&self, lod: usize) -> Option<&Surface> {
        self.store.lod_meshes().get(lod)
    }

    /// Runs the view tick for a viewer at a world-space point.
    ///
    /// Within the first LOD level's view distance of the planet centre the
    /// chunks are shown and their LOD and collision state updated. Farther out
    /// the chunks are hidden and one combined mesh is selected instead.
    pub fn tick(&self, viewer: Point3<f32>) -> PlanetView {
        let lods = self.store.lods();
        let distance = viewer.distance(Point3::new(0.0, 0.0, 0.0));

        match lods.first() {
            Some(nearest) if distance > nearest.view_distance => {
                self.store.hide_all();
                PlanetView::Combined {
                    lod: select_lod(distance, lods),
                }
            }
            _ => PlanetView::Chunks {
                visible: self.store.update_visibility(viewer),
            },
        }
    }

    /// Applies one frame of a brush stroke at a world-space point.
    ///
    /// # Arguments
    /// * `point` - Brush centre in world space, as picked by the input collaborator
    /// * `brush_radius` - Brush radius in lattice units
    /// * `brush_speed` - Density change per second at full strength
    /// * `add` - `true` to add ground, `false` to remove it
    /// * `chunk_radius` - Window radius in chunks around the chunk under `point`
    /// * `delta_time` - Frame time in seconds
    pub fn terraform(
        &mut self,
        point: Point3<f32>,
        brush_radius: f32,
        brush_speed: f32,
        add: bool,
        chunk_radius: u32,
        delta_time: f32,
    ) -> Result<TerraformOutcome, ConfigError> {
        let brush = Brush::new(
            self.store.world_to_lattice(point),
            brush_radius,
            brush_speed,
            add,
            self.config.planet.ground_toughness,
        )?;
        let center_chunk = self.store.chunk_coord_of(point);

        Ok(TerraformSculptor::new(&mut self.store).apply(center_chunk, chunk_radius, &brush, delta_time))
    }

    /// Ends the current stroke and rebuilds the combined LOD meshes.
    ///
    /// # Returns
    /// The number of chunks the stroke touched.
    pub fn finish_terraform(&mut self) -> usize {
        self.store.finish_stroke(self.simplifier.as_ref())
    }
}
