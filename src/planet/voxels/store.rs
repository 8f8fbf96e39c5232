//! # Chunk Store
//!
//! Owns every chunk of a planet. Chunks live in an arena of [`MtResource`]s
//! and are found through a coordinate index, so neighbours are plain map
//! lookups.
//!
//! ## World placement
//!
//! The world lattice is centred on the origin. Chunk `c` covers the world-space
//! cube starting at `c * chunk_size - lattice_size / 2`. Adjacent chunks share
//! the samples on their common face, which keeps the surface watertight.

use std::{collections::HashMap, sync::RwLockWriteGuard};

use bitvec::prelude::BitVec;
use cgmath::{EuclideanSpace, MetricSpace, Point3, Vector3};
use log::{debug, info, warn};
use rayon::prelude::*;
use web_time::Instant;

use crate::{
    core::MtResource,
    planet::{
        config::{LodLevel, WorldConfig},
        density::DensityLattice,
        error::ConfigError,
        meshing::{IsosurfaceMesher, MeshSimplifier, Surface},
    },
};

use super::{
    chunk::{Chunk, ChunkState},
    lod::select_lod,
};

/// The chunk grid of one planet.
pub struct ChunkStore {
    chunk_size: usize,
    chunks_per_axis: usize,
    mesher: IsosurfaceMesher,
    lods: Vec<LodLevel>,
    arena: Vec<MtResource<Chunk>>,
    index: HashMap<Point3<i32>, usize>,
    /// One bit per arena slot, set for chunks edited during the current stroke.
    edited: BitVec,
    /// Combined whole-planet surface, one per LOD level.
    lod_meshes: Vec<Surface>,
}

impl ChunkStore {
    /// Slices `lattice` into chunks and meshes every chunk in parallel.
    ///
    /// # Arguments
    /// * `lattice` - The world lattice; it must hold exactly `world_size_in_chunks * chunk_size` cells per axis
    /// * `world` - Chunk layout, mesh settings and LOD table
    ///
    /// # Returns
    /// The store with every chunk `Ready`, or the configuration error that prevented the build.
    pub fn build(lattice: &DensityLattice, world: &WorldConfig) -> Result<Self, ConfigError> {
        world.validate()?;
        if lattice.size() != world.lattice_size() {
            return Err(ConfigError::LatticeNotChunkAligned {
                lattice_size: lattice.size(),
                chunk_size: world.chunk_size,
            });
        }

        let start = Instant::now();
        let chunk_size = world.chunk_size;
        let chunks_per_axis = world.world_size_in_chunks;
        let mesher = IsosurfaceMesher::new(world.mesh);

        let coords: Vec<Point3<i32>> = (0..chunks_per_axis as i32)
            .flat_map(|z| {
                (0..chunks_per_axis as i32)
                    .flat_map(move |y| (0..chunks_per_axis as i32).map(move |x| Point3::new(x, y, z)))
            })
            .collect();

        let chunks: Vec<Chunk> = coords
            .par_iter()
            .map(|&coord| {
                let origin = Point3::new(
                    coord.x as usize * chunk_size,
                    coord.y as usize * chunk_size,
                    coord.z as usize * chunk_size,
                );
                Chunk::build(coord, lattice.slice(origin, chunk_size), &mesher)
            })
            .collect();

        let index = coords
            .iter()
            .enumerate()
            .map(|(slot, &coord)| (coord, slot))
            .collect();
        let arena: Vec<MtResource<Chunk>> = chunks.into_iter().map(MtResource::new).collect();

        info!(
            "Built {} chunks of size {} in {:?}",
            arena.len(),
            chunk_size,
            start.elapsed()
        );

        Ok(Self {
            chunk_size,
            chunks_per_axis,
            mesher,
            lods: world.lods.clone(),
            edited: BitVec::repeat(false, arena.len()),
            arena,
            index,
            lod_meshes: Vec::new(),
        })
    }

    /// Cells per axis of one chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunks per axis of the world grid.
    pub fn chunks_per_axis(&self) -> usize {
        self.chunks_per_axis
    }

    /// Cells per axis of the whole world lattice.
    pub fn lattice_size(&self) -> usize {
        self.chunk_size * self.chunks_per_axis
    }

    /// The mesher every chunk is built and remeshed with.
    pub fn mesher(&self) -> &IsosurfaceMesher {
        &self.mesher
    }

    /// The LOD table, nearest level first.
    pub fn lods(&self) -> &[LodLevel] {
        &self.lods
    }

    /// Number of chunks in the store.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` once the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if there is a chunk at `coord`.
    pub fn contains(&self, coord: Point3<i32>) -> bool {
        self.index.contains_key(&coord)
    }

    /// Coordinates of every chunk, in arena order.
    pub fn coords(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.arena.iter().map(|chunk| chunk.get().coord)
    }

    /// Returns a handle to the chunk at `coord`, if there is one.
    pub fn chunk(&self, coord: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.index.get(&coord).map(|&slot| self.arena[slot].clone())
    }

    /// Returns a copy of the density samples of the chunk at `coord`.
    pub fn chunk_map(&self, coord: Point3<i32>) -> Option<DensityLattice> {
        self.chunk(coord).map(|chunk| chunk.get().lattice().clone())
    }

    /// Replaces the density samples of the chunk at `coord` and remeshes it.
    ///
    /// The samples on its boundary are copied into every neighbour sharing
    /// them, and those neighbours are remeshed too, so seams stay closed. A
    /// chunk that belongs to the current stroke keeps its editing flag.
    ///
    /// Returns `false` if there is no such chunk, the lattice has the wrong
    /// size, or the chunk is not `Ready`.
    pub fn replace_chunk_map(&self, coord: Point3<i32>, lattice: DensityLattice) -> bool {
        if !self.contains(coord) {
            return false;
        }
        if lattice.size() != self.chunk_size {
            warn!(
                "Chunk {:?}: lattice of size {} cannot replace size {}",
                coord,
                lattice.size(),
                self.chunk_size
            );
            return false;
        }

        let mut chunks = self.acquire(neighbourhood(coord));
        if chunks.iter().any(|chunk| chunk.coord == coord && chunk.state() != ChunkState::Ready) {
            warn!("Chunk {:?}: cannot replace its lattice while busy", coord);
            return false;
        }

        for chunk in chunks.iter_mut() {
            if !chunk.begin_edit() {
                continue;
            }
            let offset = chunk.coord - coord;
            let updated = if offset == Vector3::new(0, 0, 0) {
                lattice.clone()
            } else {
                let mut updated = chunk.lattice().clone();
                copy_shared_samples(&lattice, &mut updated, offset);
                updated
            };
            chunk.write_lattice(updated);
        }
        chunks.remesh(&self.mesher);

        for chunk in chunks.iter_mut() {
            let in_stroke = self
                .index
                .get(&chunk.coord)
                .is_some_and(|&slot| self.edited.get(slot).is_some_and(|bit| *bit));
            if !in_stroke {
                chunk.finish_edit();
            }
        }

        debug!("Replaced lattice of chunk {:?} and {} neighbour(s)", coord, chunks.len() - 1);
        true
    }

    /// World-space position of the lowest corner of chunk `coord`.
    pub fn chunk_origin(&self, coord: Point3<i32>) -> Point3<f32> {
        let half = self.lattice_size() as f32 / 2.0;
        let size = self.chunk_size as f32;
        Point3::new(
            coord.x as f32 * size - half,
            coord.y as f32 * size - half,
            coord.z as f32 * size - half,
        )
    }

    /// World-space centre of chunk `coord`.
    pub fn chunk_center(&self, coord: Point3<i32>) -> Point3<f32> {
        let half_chunk = self.chunk_size as f32 / 2.0;
        self.chunk_origin(coord) + Vector3::new(half_chunk, half_chunk, half_chunk)
    }

    /// Converts a world-space point into world-lattice coordinates.
    pub fn world_to_lattice(&self, point: Point3<f32>) -> Point3<f32> {
        let half = self.lattice_size() as f32 / 2.0;
        point + Vector3::new(half, half, half)
    }

    /// Converts world-lattice coordinates into a world-space point.
    pub fn lattice_to_world(&self, point: Point3<f32>) -> Point3<f32> {
        let half = self.lattice_size() as f32 / 2.0;
        point - Vector3::new(half, half, half)
    }

    /// Coordinate of the chunk whose cells contain a world-space point.
    ///
    /// The result may lie outside the store for points beyond the world.
    pub fn chunk_coord_of(&self, point: Point3<f32>) -> Point3<i32> {
        let lattice = self.world_to_lattice(point);
        let size = self.chunk_size as f32;
        Point3::new(
            (lattice.x / size).floor() as i32,
            (lattice.y / size).floor() as i32,
            (lattice.z / size).floor() as i32,
        )
    }

    /// Takes exclusive write access to every present chunk among `coords`.
    ///
    /// Coordinates without a chunk are ignored. Locks are taken in arena order.
    pub fn acquire<I>(&self, coords: I) -> ChunkWriteSet<'_>
    where
        I: IntoIterator<Item = Point3<i32>>,
    {
        let mut slots: Vec<usize> = coords
            .into_iter()
            .filter_map(|coord| self.index.get(&coord).copied())
            .collect();
        slots.sort_unstable();
        slots.dedup();

        ChunkWriteSet {
            guards: slots.into_iter().map(|slot| self.arena[slot].get_mut()).collect(),
        }
    }

    /// Records that the chunks at `coords` take part in the current stroke.
    pub fn mark_edited<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = Point3<i32>>,
    {
        for coord in coords {
            if let Some(&slot) = self.index.get(&coord) {
                self.edited.set(slot, true);
            }
        }
    }

    /// Runs one visibility and LOD tick for a viewer at a world-space point.
    ///
    /// Every chunk picks its level from its distance to the viewer. It is
    /// visible when it has a surface and lies within that level's view
    /// distance, and collidable when visible at a collidable level.
    ///
    /// # Returns
    /// The number of visible chunks.
    pub fn update_visibility(&self, viewer: Point3<f32>) -> usize {
        let mut visible = 0;

        for chunk in &self.arena {
            let mut chunk = chunk.get_mut();
            let distance = viewer.distance(self.chunk_center(chunk.coord));
            let lod = select_lod(distance, &self.lods);
            let (in_range, collidable) = self
                .lods
                .get(lod)
                .map_or((false, false), |level| (distance <= level.view_distance, level.collidable));

            chunk.set_view(lod, in_range, collidable);
            if chunk.is_visible() {
                visible += 1;
            }
        }

        visible
    }

    /// Hides every chunk, for when the combined planet mesh is shown instead.
    pub fn hide_all(&self) {
        for chunk in &self.arena {
            let mut chunk = chunk.get_mut();
            let lod = chunk.lod();
            chunk.set_view(lod, false, false);
        }
    }

    /// Rebuilds the combined whole-planet surface for every LOD level.
    ///
    /// All chunk surfaces are merged in world space once, then simplified per
    /// level with that level's quality.
    pub fn rebuild_lod_meshes(&mut self, simplifier: &dyn MeshSimplifier) {
        let start = Instant::now();

        let combined = {
            let chunks: Vec<_> = self.arena.iter().map(|chunk| chunk.get()).collect();
            Surface::combine(
                chunks
                    .iter()
                    .filter(|chunk| !chunk.surface().is_empty())
                    .map(|chunk| (chunk.surface(), self.chunk_origin(chunk.coord).to_vec())),
            )
        };

        let lod_meshes: Vec<Surface> = self
            .lods
            .par_iter()
            .map(|lod| simplifier.simplify(&combined, lod.quality))
            .collect();
        self.lod_meshes = lod_meshes;

        info!(
            "Rebuilt {} LOD mesh(es) from {} triangles in {:?}",
            self.lod_meshes.len(),
            combined.triangle_count(),
            start.elapsed()
        );
    }

    /// Combined planet surfaces, indexed like the LOD table.
    pub fn lod_meshes(&self) -> &[Surface] {
        &self.lod_meshes
    }

    /// Ends a terraform stroke.
    ///
    /// Clears the editing flag of every chunk touched since the last stroke
    /// ended and rebuilds the LOD meshes once. Does nothing if no chunk was touched.
    ///
    /// # Returns
    /// The number of chunks the stroke touched.
    pub fn finish_stroke(&mut self, simplifier: &dyn MeshSimplifier) -> usize {
        let touched: Vec<usize> = self.edited.iter_ones().collect();
        if touched.is_empty() {
            debug!("Stroke ended without touching any chunk");
            return 0;
        }

        for &slot in &touched {
            self.arena[slot].get_mut().finish_edit();
        }
        self.edited.fill(false);
        self.rebuild_lod_meshes(simplifier);

        debug!("Stroke ended after touching {} chunk(s)", touched.len());
        touched.len()
    }

    /// Destroys every chunk and empties the store.
    pub fn tear_down(&mut self) {
        for chunk in self.arena.drain(..) {
            chunk.get_mut().destroy();
        }
        self.index.clear();
        self.edited.clear();
        self.lod_meshes.clear();

        info!("Chunk store torn down");
    }
}

/// The chunk at `coord` and the 26 chunk coordinates around it.
fn neighbourhood(coord: Point3<i32>) -> impl Iterator<Item = Point3<i32>> {
    (-1..=1).flat_map(move |z| {
        (-1..=1).flat_map(move |y| (-1..=1).map(move |x| coord + Vector3::new(x, y, z)))
    })
}

/// Copies the samples `source` shares with the chunk at grid `offset` from it.
///
/// Along an axis with offset `-1` the shared plane is the source's low face
/// and the target's high face; `+1` is the reverse and `0` shares the whole axis.
fn copy_shared_samples(
    source: &DensityLattice,
    target: &mut DensityLattice,
    offset: Vector3<i32>,
) {
    let size = source.size();
    let span = |delta: i32| match delta {
        -1 => (0, 0, size),
        1 => (size, size, 0),
        _ => (0, size, 0),
    };
    let (x_low, x_high, x_shift) = span(offset.x);
    let (y_low, y_high, y_shift) = span(offset.y);
    let (z_low, z_high, z_shift) = span(offset.z);

    for z in z_low..=z_high {
        for y in y_low..=y_high {
            for x in x_low..=x_high {
                let shifted = Point3::new(x + x_shift - x_low, y + y_shift - y_low, z + z_shift - z_low);
                target.set(shifted, source.at(x, y, z));
            }
        }
    }
}

/// Exclusive write access to a set of chunks.
///
/// Held by the terraform sculptor for one whole brush application; dropping it
/// releases every lock.
pub struct ChunkWriteSet<'a> {
    guards: Vec<RwLockWriteGuard<'a, Chunk>>,
}

impl<'a> ChunkWriteSet<'a> {
    /// Number of chunks held.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns `true` if no requested coordinate had a chunk.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Iterates the held chunks in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.guards.iter().map(|guard| &**guard)
    }

    /// Iterates the held chunks mutably, in arena order.
    ///
    /// Items are the write guards themselves and deref to [`Chunk`].
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RwLockWriteGuard<'a, Chunk>> {
        self.guards.iter_mut()
    }

    /// Remeshes every chunk that is being edited.
    ///
    /// Meshing runs in parallel over shared borrows; the surfaces are
    /// installed once every chunk has been meshed.
    pub fn remesh(&mut self, mesher: &IsosurfaceMesher) {
        let remeshing: Vec<bool> = self
            .guards
            .iter_mut()
            .map(|chunk| chunk.state() == ChunkState::Editing && chunk.begin_remesh())
            .collect();

        let surfaces: Vec<Option<Surface>> = self
            .guards
            .par_iter()
            .zip(remeshing.par_iter())
            .map(|(chunk, &remesh)| if remesh { chunk.extract(mesher) } else { None })
            .collect();

        for (chunk, surface) in self.guards.iter_mut().zip(surfaces) {
            if let Some(surface) = surface {
                chunk.install_surface(surface);
                debug!(
                    "Remeshed chunk {:?}: {} triangles",
                    chunk.coord,
                    chunk.surface().triangle_count()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::meshing::VertexClusterSimplifier;

    fn world(chunks: usize, chunk_size: usize) -> WorldConfig {
        WorldConfig {
            world_size_in_chunks: chunks,
            chunk_size,
            lods: vec![
                LodLevel {
                    view_distance: 6.0,
                    quality: 1.0,
                    collidable: true,
                    auxiliary_layer_count: 1,
                },
                LodLevel {
                    view_distance: 12.0,
                    quality: 0.5,
                    collidable: false,
                    auxiliary_layer_count: 0,
                },
            ],
            ..Default::default()
        }
    }

    /// A ball of radius 3 centred in an 8³ lattice.
    fn ball() -> DensityLattice {
        DensityLattice::from_fn(8, |p| {
            let p = Point3::new(p.x as f32, p.y as f32, p.z as f32);
            1.0 - p.distance(Point3::new(4.0, 4.0, 4.0)) / 3.0
        })
    }

    #[test]
    fn build_creates_one_chunk_per_grid_cell() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();

        assert_eq!(store.len(), 8);
        assert!(store.contains(Point3::new(1, 1, 1)));
        assert!(!store.contains(Point3::new(2, 0, 0)));
        assert_eq!(store.chunk_map(Point3::new(1, 0, 0)).unwrap().size(), 4);
    }

    #[test]
    fn build_rejects_mismatched_lattices() {
        let result = ChunkStore::build(&DensityLattice::new(7), &world(2, 4));
        assert!(matches!(
            result,
            Err(ConfigError::LatticeNotChunkAligned { lattice_size: 7, .. })
        ));
    }

    #[test]
    fn world_placement_is_centred_on_the_origin() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();

        assert_eq!(store.chunk_origin(Point3::new(0, 0, 0)), Point3::new(-4.0, -4.0, -4.0));
        assert_eq!(store.chunk_center(Point3::new(1, 1, 1)), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(store.chunk_coord_of(Point3::new(-0.5, 0.5, 3.9)), Point3::new(0, 1, 1));
        assert_eq!(store.chunk_coord_of(Point3::new(9.0, 0.0, 0.0)), Point3::new(3, 1, 1));
        let point = Point3::new(1.0, -2.0, 0.5);
        assert_eq!(store.lattice_to_world(store.world_to_lattice(point)), point);
    }

    #[test]
    fn acquire_skips_missing_chunks_and_duplicates() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let set = store.acquire([
            Point3::new(0, 0, 0),
            Point3::new(0, 0, 0),
            Point3::new(-1, 0, 0),
            Point3::new(1, 1, 1),
        ]);

        assert_eq!(set.len(), 2);
        let coords: Vec<_> = set.iter().map(|chunk| chunk.coord).collect();
        assert_eq!(coords, vec![Point3::new(0, 0, 0), Point3::new(1, 1, 1)]);
    }

    #[test]
    fn visibility_follows_the_lod_table() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();

        // Every chunk centre is sqrt(12) from the origin.
        assert_eq!(store.update_visibility(Point3::new(0.0, 0.0, 0.0)), 8);
        let chunk = store.chunk(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(chunk.get().lod(), 0);
        assert!(chunk.get().is_collidable());

        let far = Point3::new(0.0, 0.0, 11.0);
        store.update_visibility(far);
        let near_chunk = store.chunk(Point3::new(0, 0, 1)).unwrap();
        assert_eq!(near_chunk.get().lod(), 1);
        assert!(near_chunk.get().is_visible());
        assert!(!near_chunk.get().is_collidable());

        assert_eq!(store.update_visibility(Point3::new(0.0, 0.0, 500.0)), 0);
    }

    #[test]
    fn replacing_a_chunk_map_remeshes_it() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let coord = Point3::new(0, 0, 0);
        assert!(!store.chunk(coord).unwrap().get().surface().is_empty());

        assert!(store.replace_chunk_map(coord, DensityLattice::filled(4, 1.0)));
        let chunk = store.chunk(coord).unwrap();
        assert!(chunk.get().surface().is_empty());
        assert_eq!(chunk.get().state(), ChunkState::Ready);
        assert!(!store.replace_chunk_map(Point3::new(5, 5, 5), DensityLattice::new(4)));
    }

    #[test]
    fn write_sets_hand_out_mutable_chunks() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        {
            let mut set = store.acquire([Point3::new(0, 1, 0), Point3::new(1, 0, 1)]);
            for chunk in set.iter_mut() {
                assert!(chunk.begin_edit());
                assert!(chunk.write_lattice(DensityLattice::filled(4, -1.0)));
            }
            set.remesh(store.mesher());
        }

        for coord in [Point3::new(0, 1, 0), Point3::new(1, 0, 1)] {
            let chunk = store.chunk(coord).unwrap();
            assert_eq!(chunk.get().state(), ChunkState::Ready);
            assert!(chunk.get().is_editing());
            assert!(chunk.get().surface().is_empty());
        }
        assert!(!store.chunk(Point3::new(0, 0, 0)).unwrap().get().is_editing());
    }

    #[test]
    fn replacing_a_chunk_map_updates_the_shared_samples_of_its_neighbours() {
        let store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let replaced = DensityLattice::from_fn(4, |p| (p.x + 2 * p.y + 3 * p.z) as f32 - 7.5);
        assert!(store.replace_chunk_map(Point3::new(0, 0, 0), replaced.clone()));

        let right = store.chunk_map(Point3::new(1, 0, 0)).unwrap();
        let top = store.chunk_map(Point3::new(0, 1, 0)).unwrap();
        let corner = store.chunk_map(Point3::new(1, 1, 1)).unwrap();
        for a in 0..=4 {
            for b in 0..=4 {
                assert_eq!(right.at(0, a, b), replaced.at(4, a, b));
                assert_eq!(top.at(a, 0, b), replaced.at(a, 4, b));
            }
        }
        assert_eq!(corner.at(0, 0, 0), replaced.at(4, 4, 4));
        // Samples away from the shared face keep the ball.
        assert_eq!(right.at(2, 2, 2), ball().at(6, 2, 2));

        for coord in store.coords().collect::<Vec<_>>() {
            let chunk = store.chunk(coord).unwrap();
            assert_eq!(chunk.get().state(), ChunkState::Ready);
            assert!(!chunk.get().is_editing());
        }
    }

    #[test]
    fn replacing_during_a_stroke_keeps_the_editing_flag() {
        let mut store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let coord = Point3::new(1, 1, 0);
        store.mark_edited([coord]);

        assert!(store.replace_chunk_map(coord, DensityLattice::filled(4, 1.0)));
        assert!(store.chunk(coord).unwrap().get().is_editing());
        assert!(!store.chunk(Point3::new(0, 1, 0)).unwrap().get().is_editing());

        assert!(!store.replace_chunk_map(coord, DensityLattice::filled(5, 1.0)));

        let simplifier = VertexClusterSimplifier { resolution: 4 };
        assert_eq!(store.finish_stroke(&simplifier), 1);
        assert!(!store.chunk(coord).unwrap().get().is_editing());
    }

    #[test]
    fn lod_meshes_cover_every_level() {
        let mut store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let simplifier = VertexClusterSimplifier { resolution: 4 };
        store.rebuild_lod_meshes(&simplifier);

        let meshes = store.lod_meshes();
        assert_eq!(meshes.len(), 2);
        assert!(!meshes[0].is_empty());
        assert!(meshes[1].vertices.len() <= meshes[0].vertices.len());

        assert_eq!(store.finish_stroke(&simplifier), 0);
    }

    #[test]
    fn tear_down_destroys_every_chunk() {
        let mut store = ChunkStore::build(&ball(), &world(2, 4)).unwrap();
        let handle = store.chunk(Point3::new(1, 0, 1)).unwrap();
        store.tear_down();

        assert!(store.is_empty());
        assert!(store.chunk(Point3::new(1, 0, 1)).is_none());
        assert_eq!(handle.get().state(), ChunkState::Destroyed);
    }
}
