//! Generation settings.
//!
//! These are plain data structures, loaded from JSON by the configuration
//! surface and validated once before a build. The generation kernels only ever
//! see validated values.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::{error::ConfigError, noise::HeightCurve};

/// Highest octave count a noise layer may request.
pub const MAX_OCTAVES: u32 = 8;

/// The fractal strategy used by a noise layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NoiseKind {
    /// Iterative octave summation of Perlin noise.
    #[default]
    Standard,
    /// Ridged multifractal noise, sharp crests.
    Ridged,
    /// Billow noise, rounded lumps.
    Billow,
}

/// Settings for one layer of the density field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Noise family sampled by this layer.
    pub kind: NoiseKind,
    /// Lattice units per unit of noise space.
    pub scale: f32,
    /// Number of summed octaves, `1..=8`.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Weight of the layer in the density sum.
    pub amplitude: f32,
    /// Base frequency of the first octave.
    pub frequency: f32,
    /// Amplitude decay per octave (standard noise only).
    pub persistence: f32,
    /// Amplitude decay per octave (ridged and billow noise only).
    pub gain: f32,
    /// Output multiplier (ridged and billow noise only).
    pub strength: f32,
    /// Translation applied in noise space before sampling.
    pub offset: [f32; 3],
    /// Subtract the previous layer's field from this one.
    pub use_mask_from_previous_layer: bool,
    /// Subtract this layer from the density instead of adding it.
    pub invert: bool,
    /// Optional reshaping of the layer's normalized range.
    pub height_curve: Option<HeightCurve>,
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Standard,
            scale: 16.0,
            octaves: 3,
            lacunarity: 2.0,
            amplitude: 0.08,
            frequency: 0.8,
            persistence: 0.5,
            gain: 0.5,
            strength: 1.0,
            offset: [0.0; 3],
            use_mask_from_previous_layer: false,
            invert: false,
            height_curve: None,
        }
    }
}

impl NoiseLayerConfig {
    /// Checks the layer's parameters; `layer` is its index, used in errors.
    pub fn validate(&self, layer: usize) -> Result<(), ConfigError> {
        if !(1..=MAX_OCTAVES).contains(&self.octaves) {
            return Err(ConfigError::InvalidOctaves {
                layer,
                octaves: self.octaves,
            });
        }

        let fields = [
            ("scale", self.scale),
            ("lacunarity", self.lacunarity),
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("persistence", self.persistence),
            ("gain", self.gain),
            ("strength", self.strength),
            ("offset.x", self.offset[0]),
            ("offset.y", self.offset[1]),
            ("offset.z", self.offset[2]),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFiniteLayerParameter { layer, field });
        }

        for (field, value) in [
            ("scale", self.scale),
            ("lacunarity", self.lacunarity),
            ("frequency", self.frequency),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveLayerParameter {
                    layer,
                    field,
                    value,
                });
            }
        }

        if let Some(curve) = &self.height_curve {
            curve
                .validate()
                .map_err(|reason| ConfigError::InvalidHeightCurve { layer, reason })?;
        }

        Ok(())
    }
}

/// Settings of the planet itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// Seed shared by every noise layer.
    pub seed: i32,
    /// Draw a fresh seed for every generation instead of using `seed`.
    pub random_seed: bool,
    /// Radius of the nominal surface, in lattice units.
    pub radius: f32,
    /// Add the noise layers on top of the plain sphere.
    pub use_layered_noise: bool,
    /// Noise layers, summed in order.
    pub layers: Vec<NoiseLayerConfig>,
    /// Divides terraform speed; tougher ground sculpts slower.
    pub ground_toughness: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            random_seed: false,
            radius: 24.0,
            use_layered_noise: true,
            layers: vec![NoiseLayerConfig::default()],
            ground_toughness: 1.0,
        }
    }
}

impl PlanetConfig {
    /// Checks the radius, toughness and, when layered noise is on, every layer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        if !(self.ground_toughness > 0.0) || !self.ground_toughness.is_finite() {
            return Err(ConfigError::NonPositiveToughness(self.ground_toughness));
        }
        if self.use_layered_noise {
            for (index, layer) in self.layers.iter().enumerate() {
                layer.validate(index)?;
            }
        }
        Ok(())
    }
}

/// Parameters handed to the isosurface mesher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Density threshold of the extracted surface.
    pub iso_value: f32,
    /// Cells whose own sample lies outside `[-create_gate, create_gate]` are skipped.
    pub create_gate: f32,
    /// Interpolate vertices along edges instead of using edge midpoints.
    pub smooth: bool,
    /// Emit unshared vertices for hard per-face normals.
    pub flat_shading: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            iso_value: 0.0,
            create_gate: 5.0,
            smooth: true,
            flat_shading: false,
        }
    }
}

impl MeshSettings {
    /// Checks that the iso value is finite and the gate is not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.iso_value.is_finite() {
            return Err(ConfigError::InvalidMeshSettings("iso value is not finite"));
        }
        if !(self.create_gate >= 0.0) {
            return Err(ConfigError::InvalidMeshSettings(
                "create gate must be zero or positive",
            ));
        }
        Ok(())
    }
}

/// One entry of the distance-indexed level-of-detail table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodLevel {
    /// Farthest viewer distance at which this level is used.
    pub view_distance: f32,
    /// Fraction of detail kept by the simplifier, in `(0, 1]`.
    pub quality: f32,
    /// Chunks shown at this level take part in collision.
    pub collidable: bool,
    /// Count of auxiliary render layers (clouds, atmosphere shells) at this level.
    pub auxiliary_layer_count: u32,
}

impl Default for LodLevel {
    fn default() -> Self {
        Self {
            view_distance: 100.0,
            quality: 1.0,
            collidable: true,
            auxiliary_layer_count: 1,
        }
    }
}

/// Checks the ordering invariants of a LOD table.
///
/// View distances must be non-decreasing and qualities non-increasing with
/// index. Only the first two levels may be collidable.
pub fn validate_lod_table(lods: &[LodLevel]) -> Result<(), ConfigError> {
    if lods.is_empty() {
        return Err(ConfigError::EmptyLodTable);
    }
    for (index, lod) in lods.iter().enumerate() {
        if !(lod.view_distance >= 0.0) {
            return Err(ConfigError::InvalidLod {
                index,
                reason: "view distance must be zero or positive",
            });
        }
        if !(lod.quality > 0.0 && lod.quality <= 1.0) {
            return Err(ConfigError::InvalidLod {
                index,
                reason: "quality must be within (0, 1]",
            });
        }
        if lod.collidable && index > 1 {
            return Err(ConfigError::InvalidLod {
                index,
                reason: "only the first two levels may be collidable",
            });
        }
        if index > 0 {
            let previous = &lods[index - 1];
            if lod.view_distance < previous.view_distance {
                return Err(ConfigError::InvalidLod {
                    index,
                    reason: "view distance decreases",
                });
            }
            if lod.quality > previous.quality {
                return Err(ConfigError::InvalidLod {
                    index,
                    reason: "quality increases",
                });
            }
        }
    }
    Ok(())
}

/// Layout of the chunked world around the planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks along each axis of the world.
    pub world_size_in_chunks: usize,
    /// Cells along each axis of one chunk.
    pub chunk_size: usize,
    /// Settings every chunk is meshed with.
    pub mesh: MeshSettings,
    /// Level-of-detail table, ordered by view distance.
    pub lods: Vec<LodLevel>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size_in_chunks: 4,
            chunk_size: 16,
            mesh: MeshSettings::default(),
            lods: vec![
                LodLevel {
                    view_distance: 100.0,
                    quality: 1.0,
                    collidable: true,
                    auxiliary_layer_count: 40,
                },
                LodLevel {
                    view_distance: 200.0,
                    quality: 0.6,
                    collidable: false,
                    auxiliary_layer_count: 20,
                },
                LodLevel {
                    view_distance: 400.0,
                    quality: 0.3,
                    collidable: false,
                    auxiliary_layer_count: 5,
                },
            ],
        }
    }
}

impl WorldConfig {
    /// Number of lattice cells along each axis of the whole world.
    pub fn lattice_size(&self) -> usize {
        self.world_size_in_chunks * self.chunk_size
    }

    /// Checks the chunk layout, the mesh settings and the LOD table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.world_size_in_chunks == 0 {
            return Err(ConfigError::ZeroWorldSize);
        }
        self.mesh.validate()?;
        validate_lod_table(&self.lods)
    }
}

/// Everything needed to generate a planet, as read from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratorConfig {
    /// The planet's shape and noise.
    pub planet: PlanetConfig,
    /// The chunked world it is meshed into.
    pub world: WorldConfig,
}

impl GeneratorConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validates both halves of the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planet.validate()?;
        self.world.validate()
    }
}
