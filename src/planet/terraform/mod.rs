//! # Terraforming
//!
//! Sculpts the density field with a [`Brush`] across chunk boundaries.
//!
//! One application works on a cubic window of chunks around a centre chunk:
//!
//! 1. The window is clipped to the chunk grid. Every present chunk in it is
//!    locked and marked as editing.
//! 2. Their lattices are copied into one window lattice. Chunks missing from
//!    the store read as zero.
//! 3. The brush kernel runs over every window sample in parallel.
//! 4. The window is cut back into each chunk, which is then remeshed. Samples
//!    that belong to missing chunks are dropped.
//!
//! The window is grown when the brush would otherwise reach past it, so every
//! sample a brush changes is written to every chunk that shares it.

use cgmath::{EuclideanSpace, MetricSpace, Point3, Vector3};
use log::{debug, warn};
use web_time::Instant;

use super::{density::DensityLattice, voxels::ChunkStore};

mod brush;

pub use brush::{Brush, BRUSH_CORE};

/// What one brush application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerraformOutcome {
    /// Chunk radius of the window actually used.
    pub chunk_radius: u32,
    /// Chunks that were edited and remeshed.
    pub touched: usize,
    /// Window positions without a chunk.
    pub skipped: usize,
}

/// Applies brushes to the chunks of a store.
pub struct TerraformSculptor<'a> {
    store: &'a mut ChunkStore,
}

impl<'a> TerraformSculptor<'a> {
    /// Creates a sculptor editing `store`.
    pub fn new(store: &'a mut ChunkStore) -> Self {
        Self { store }
    }

    /// Applies `brush` for one frame.
    ///
    /// # Arguments
    /// * `center_chunk` - Chunk the window is centred on, normally the one containing the brush centre
    /// * `chunk_radius` - Chebyshev radius of the window in chunks, grown if the brush needs more
    /// * `brush` - The brush, in world-lattice coordinates
    /// * `delta_time` - Frame time in seconds
    ///
    /// # Returns
    /// How many chunks were edited. A window with no chunks is a valid, empty outcome.
    pub fn apply(
        &mut self,
        center_chunk: Point3<i32>,
        chunk_radius: u32,
        brush: &Brush,
        delta_time: f32,
    ) -> TerraformOutcome {
        let start = Instant::now();
        let chunk_size = self.store.chunk_size();

        let required = required_radius(center_chunk, brush, chunk_size);
        let radius = if required > chunk_radius {
            warn!(
                "Brush radius {} reaches past a window of {} chunk(s); using {}",
                brush.radius, chunk_radius, required
            );
            required
        } else {
            chunk_radius
        };

        let requested = (radius as usize).saturating_mul(2).saturating_add(1).saturating_pow(3);
        let Some(bounds) = clamp_window(center_chunk, radius, self.store.chunks_per_axis()) else {
            debug!("Brush window around {:?} holds no chunks", center_chunk);
            return TerraformOutcome {
                chunk_radius: radius,
                touched: 0,
                skipped: requested,
            };
        };
        let WindowBounds { low: window_low, extent } = bounds;
        let coords: Vec<Point3<i32>> = (0..extent[2])
            .flat_map(|z| {
                (0..extent[1]).flat_map(move |y| {
                    (0..extent[0]).map(move |x| window_low + Vector3::new(x, y, z))
                })
            })
            .collect();

        self.store.mark_edited(coords.iter().copied());

        let store = &*self.store;
        let mut chunks = store.acquire(coords.iter().copied());
        let outcome = TerraformOutcome {
            chunk_radius: radius,
            touched: chunks.len(),
            skipped: requested.saturating_sub(chunks.len()),
        };
        if chunks.is_empty() {
            debug!("Brush window around {:?} holds no chunks", center_chunk);
            return outcome;
        }

        let offset_of = |coord: Point3<i32>| {
            let local = coord - window_low;
            Point3::new(
                local.x as usize * chunk_size,
                local.y as usize * chunk_size,
                local.z as usize * chunk_size,
            )
        };

        let span = extent.into_iter().max().unwrap_or(0) as usize;
        let mut window = DensityLattice::new(span * chunk_size);
        for chunk in chunks.iter_mut() {
            if chunk.begin_edit() {
                window.blit(offset_of(chunk.coord), chunk.lattice());
            }
        }

        let origin = Point3::new(
            (window_low.x * chunk_size as i32) as f32,
            (window_low.y * chunk_size as i32) as f32,
            (window_low.z * chunk_size as i32) as f32,
        );
        let local_center = brush.center - origin.to_vec();
        window.par_update(|point, value| {
            let point = Point3::new(point.x as f32, point.y as f32, point.z as f32);
            let distance = point.distance(local_center);
            if distance < brush.radius {
                value + brush.delta(distance, delta_time)
            } else {
                value
            }
        });

        for chunk in chunks.iter_mut() {
            let slice = window.slice(offset_of(chunk.coord), chunk_size);
            chunk.write_lattice(slice);
        }
        chunks.remesh(store.mesher());

        debug!(
            "Brush at {:?} edited {} chunk(s) in {:?}",
            brush.center,
            outcome.touched,
            start.elapsed()
        );
        outcome
    }
}

/// The part of a chunk window that lies inside the chunk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowBounds {
    /// Lowest chunk coordinate inside the grid.
    low: Point3<i32>,
    /// Chunks per axis from `low`.
    extent: [i32; 3],
}

/// Intersects the window of `radius` chunks around `center_chunk` with a grid
/// of `chunks_per_axis` chunks per axis. Returns `None` if they do not meet.
fn clamp_window(
    center_chunk: Point3<i32>,
    radius: u32,
    chunks_per_axis: usize,
) -> Option<WindowBounds> {
    let reach = i64::from(radius);
    let last = chunks_per_axis as i64 - 1;
    let axis = |center: i32| {
        let low = (i64::from(center) - reach).max(0);
        let high = (i64::from(center) + reach).min(last);
        (low <= high).then_some((low as i32, (high - low + 1) as i32))
    };

    let (x, width) = axis(center_chunk.x)?;
    let (y, height) = axis(center_chunk.y)?;
    let (z, depth) = axis(center_chunk.z)?;
    Some(WindowBounds {
        low: Point3::new(x, y, z),
        extent: [width, height, depth],
    })
}

/// Smallest window radius, in chunks, that contains the whole brush.
fn required_radius(center_chunk: Point3<i32>, brush: &Brush, chunk_size: usize) -> u32 {
    let size = chunk_size as f32;
    let low = [brush.center.x, brush.center.y, brush.center.z].map(|c| c - brush.radius);
    let high = [brush.center.x, brush.center.y, brush.center.z].map(|c| c + brush.radius);
    let cells = [center_chunk.x, center_chunk.y, center_chunk.z];

    (0..3)
        .map(|axis| {
            let below = (cells[axis] as f32 * size - low[axis]) / size;
            let above = (high[axis] - (cells[axis] + 1) as f32 * size) / size;
            below.max(above).ceil().max(0.0) as u32
        })
        .max()
        .unwrap_or(0)
}
