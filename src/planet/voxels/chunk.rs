//! # Chunk
//!
//! One cubic piece of the planet: its slice of the density lattice, the
//! surface meshed from it and its current view state.
//!
//! ## Lifecycle
//!
//! ```text
//! Empty -> Building -> Ready -> (Editing -> Remeshing -> Ready)* -> Destroyed
//! ```
//!
//! The lattice may only be rewritten while the chunk is `Editing`, and the
//! mesher only runs on a chunk that is `Building` or `Remeshing`, so a lattice
//! is never changed underneath a running mesher.

use cgmath::Point3;
use log::warn;

use crate::planet::{
    density::DensityLattice,
    meshing::{IsosurfaceMesher, Surface},
};

/// Lifecycle state of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Created but not meshed yet.
    Empty,
    /// Being meshed for the first time.
    Building,
    /// Meshed and idle.
    Ready,
    /// Its lattice is being rewritten by a brush.
    Editing,
    /// Its lattice is frozen while a new surface is extracted.
    Remeshing,
    /// Released; accepts no further changes.
    Destroyed,
}

impl ChunkState {
    /// Returns `true` if a chunk may move from `self` to `next`.
    pub fn can_transition_to(self, next: ChunkState) -> bool {
        use ChunkState::*;

        matches!(
            (self, next),
            (Empty, Building)
                | (Building, Ready)
                | (Ready, Editing)
                | (Editing, Remeshing)
                | (Remeshing, Ready)
                | (Empty | Building | Ready | Editing | Remeshing, Destroyed)
        )
    }
}

/// A cubic region of the world lattice, meshed on its own.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position in the chunk grid (not in lattice units).
    pub coord: Point3<i32>,
    lattice: DensityLattice,
    surface: Surface,
    state: ChunkState,
    /// Set from the first edit of a stroke until the stroke ends.
    editing: bool,
    lod: usize,
    visible: bool,
    collidable: bool,
}

impl Chunk {
    /// Creates an unbuilt chunk owning `lattice`.
    pub fn new(coord: Point3<i32>, lattice: DensityLattice) -> Self {
        Self {
            coord,
            lattice,
            surface: Surface::default(),
            state: ChunkState::Empty,
            editing: false,
            lod: 0,
            visible: false,
            collidable: false,
        }
    }

    /// Creates a chunk and meshes it.
    ///
    /// # Arguments
    /// * `coord` - The chunk's position in the chunk grid
    /// * `lattice` - The chunk's `(chunk_size + 1)³` samples, already cut from the world lattice
    /// * `mesher` - Mesher used for the initial surface
    ///
    /// # Returns
    /// A `Ready` chunk holding its surface.
    pub fn build(coord: Point3<i32>, lattice: DensityLattice, mesher: &IsosurfaceMesher) -> Self {
        let mut chunk = Self::new(coord, lattice);
        chunk.transition(ChunkState::Building);
        let surface = chunk.extract(mesher).unwrap_or_default();
        chunk.install_surface(surface);
        chunk
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// The chunk's density samples, boundary planes included.
    pub fn lattice(&self) -> &DensityLattice {
        &self.lattice
    }

    /// Surface in chunk-local coordinates; empty if nothing crosses the iso value.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns `true` while a stroke that touched this chunk is in progress.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// LOD level picked by the last visibility tick.
    pub fn lod(&self) -> usize {
        self.lod
    }

    /// Whether the last visibility tick showed this chunk.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the chunk currently takes part in collision.
    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// Moves to `next` if the lifecycle allows it. Invalid moves are logged and ignored.
    fn transition(&mut self, next: ChunkState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(
                "Chunk {:?}: rejected state change {:?} -> {:?}",
                self.coord, self.state, next
            );
            return false;
        }
        self.state = next;
        true
    }

    /// Starts an edit. Only a `Ready` chunk can be edited.
    pub fn begin_edit(&mut self) -> bool {
        if self.transition(ChunkState::Editing) {
            self.editing = true;
            true
        } else {
            false
        }
    }

    /// Replaces the lattice of a chunk that is being edited.
    ///
    /// Returns `false` and keeps the old lattice if the chunk is not `Editing`
    /// or the new lattice has a different size.
    pub fn write_lattice(&mut self, lattice: DensityLattice) -> bool {
        if self.state != ChunkState::Editing {
            warn!("Chunk {:?}: lattice write while {:?}", self.coord, self.state);
            return false;
        }
        if lattice.size() != self.lattice.size() {
            warn!(
                "Chunk {:?}: lattice of size {} cannot replace size {}",
                self.coord,
                lattice.size(),
                self.lattice.size()
            );
            return false;
        }
        self.lattice = lattice;
        true
    }

    /// Freezes the lattice for meshing.
    pub fn begin_remesh(&mut self) -> bool {
        self.transition(ChunkState::Remeshing)
    }

    /// Meshes the current lattice without changing the chunk.
    ///
    /// Returns `None` unless the chunk is `Building` or `Remeshing`.
    pub fn extract(&self, mesher: &IsosurfaceMesher) -> Option<Surface> {
        match self.state {
            ChunkState::Building | ChunkState::Remeshing => Some(mesher.extract(&self.lattice)),
            state => {
                warn!("Chunk {:?}: mesh requested while {:?}", self.coord, state);
                None
            }
        }
    }

    /// Stores a freshly meshed surface and returns the chunk to `Ready`.
    pub fn install_surface(&mut self, surface: Surface) -> bool {
        if self.transition(ChunkState::Ready) {
            self.surface = surface;
            if self.surface.is_empty() {
                self.visible = false;
                self.collidable = false;
            }
            true
        } else {
            false
        }
    }

    /// Clears the editing flag at the end of a stroke.
    pub fn finish_edit(&mut self) {
        self.editing = false;
    }

    /// Applies the outcome of a visibility tick.
    ///
    /// A chunk without a surface is never visible or collidable.
    pub fn set_view(&mut self, lod: usize, visible: bool, collidable: bool) {
        let visible = visible && !self.surface.is_empty();
        self.lod = lod;
        self.visible = visible;
        self.collidable = visible && collidable;
    }

    /// Releases the chunk's data. A destroyed chunk accepts no further changes.
    pub fn destroy(&mut self) {
        if self.transition(ChunkState::Destroyed) {
            self.surface = Surface::default();
            self.lattice = DensityLattice::new(0);
            self.editing = false;
            self.visible = false;
            self.collidable = false;
        }
    }
}
