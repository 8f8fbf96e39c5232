//! # Voxels
//!
//! The chunk grid: [`Chunk`]s with their lifecycle, the [`ChunkStore`] that
//! owns them and drives visibility, and LOD selection.

mod chunk;
mod lod;
mod store;

pub use chunk::{Chunk, ChunkState};
pub use lod::select_lod;
pub use store::{ChunkStore, ChunkWriteSet};
