//! Configuration-time errors.
//!
//! Only invalid configuration is reported to callers. Empty chunks, brush
//! strokes that touch nothing and edits at the edge of the world are valid
//! outcomes and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can make a generation or terraform request invalid before
/// any kernel runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A lattice was requested with no cells.
    #[error("lattice size must be at least one cell")]
    ZeroLatticeSize,

    /// `chunk_size` is zero.
    #[error("chunk size must be at least one cell")]
    ZeroChunkSize,

    /// `world_size_in_chunks` is zero.
    #[error("world must contain at least one chunk per axis")]
    ZeroWorldSize,

    #[error("lattice of size {lattice_size} cannot be split into chunks of size {chunk_size}")]
    /// The world lattice does not match the chunk layout.
    LatticeNotChunkAligned {
        /// Cells per axis of the lattice that was given.
        lattice_size: usize,
        /// Cells per axis of one chunk.
        chunk_size: usize,
    },

    /// The planet radius is zero, negative or not finite.
    #[error("planet radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    /// Ground toughness is zero, negative or not finite.
    #[error("ground toughness must be positive, got {0}")]
    NonPositiveToughness(f32),

    #[error("noise layer {layer}: octave count must be within 1..=8, got {octaves}")]
    /// A noise layer asks for no octaves or too many.
    InvalidOctaves {
        /// Index of the offending layer.
        layer: usize,
        /// The requested octave count.
        octaves: u32,
    },

    #[error("noise layer {layer}: {field} must be positive, got {value}")]
    /// A noise layer parameter that must be positive is not.
    NonPositiveLayerParameter {
        /// Index of the offending layer.
        layer: usize,
        /// Name of the parameter.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    #[error("noise layer {layer}: {field} is not a finite number")]
    /// A noise layer parameter is NaN or infinite.
    NonFiniteLayerParameter {
        /// Index of the offending layer.
        layer: usize,
        /// Name of the parameter.
        field: &'static str,
    },

    #[error("noise layer {layer}: height curve {reason}")]
    /// A layer's height curve cannot be evaluated.
    InvalidHeightCurve {
        /// Index of the offending layer.
        layer: usize,
        /// What is wrong with the curve.
        reason: &'static str,
    },

    /// The LOD table is empty.
    #[error("level-of-detail table must contain at least one level")]
    EmptyLodTable,

    #[error("level of detail {index}: {reason}")]
    /// One LOD level is out of range or out of order.
    InvalidLod {
        /// Position of the level in the table.
        index: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The mesh settings are out of range.
    #[error("mesh settings: {0}")]
    InvalidMeshSettings(&'static str),

    /// A brush parameter is out of range.
    #[error("brush: {0}")]
    InvalidBrush(&'static str),

    #[error("could not read config file {path}")]
    /// A config file could not be read.
    Read {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config document is not valid JSON for [`GeneratorConfig`](crate::GeneratorConfig).
    #[error("could not parse config")]
    Parse(#[from] serde_json::Error),
}
