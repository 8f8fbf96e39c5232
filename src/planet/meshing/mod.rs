//! # Isosurface Meshing
//!
//! Turns a density lattice into a triangle surface with marching cubes.
//!
//! ## Per-cell steps
//!
//! 1. Cells whose own sample lies outside `[-create_gate, create_gate]` are
//!    skipped without reading their other corners.
//! 2. The eight corner samples form a configuration index, bit `i` set when
//!    corner `i` is below the iso value. Configurations 0 and 255 emit nothing.
//! 3. The triangle table lists up to five triangles as edge triples. Each edge
//!    becomes a vertex, interpolated along the edge or placed at its midpoint.
//!
//! Vertices are welded by exact position unless flat shading is requested, in
//! which case every triangle gets three vertices of its own. Normals are
//! computed once all triangles exist.
//!
//! Positions are local to the lattice: sample `(x, y, z)` sits at `(x, y, z)`.

use std::collections::HashMap;

use cgmath::Point3;

use super::{config::MeshSettings, density::DensityLattice};

mod simplify;
mod surface;
pub mod tables;

pub use simplify::{MeshSimplifier, VertexClusterSimplifier};
pub use surface::{Surface, SurfaceVertex};
use tables::{CORNER_OFFSETS, EDGE_CORNERS, TRIANGLE_TABLE};

/// Extracts isosurfaces with fixed settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsosurfaceMesher {
    settings: MeshSettings,
}

impl IsosurfaceMesher {
    /// Creates a mesher using `settings` for every extraction.
    pub fn new(settings: MeshSettings) -> Self {
        Self { settings }
    }

    /// The settings surfaces are extracted with.
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Builds the configuration index of a cell from its corner samples.
    pub fn configuration(corners: &[f32; 8], iso_value: f32) -> usize {
        corners
            .iter()
            .enumerate()
            .filter(|&(_, &density)| density < iso_value)
            .fold(0, |index, (corner, _)| index | (1 << corner))
    }

    /// Extracts the surface of `lattice` at the configured iso value.
    ///
    /// # Arguments
    /// * `lattice` - The density samples to mesh; every one of its `size³` cells is visited
    ///
    /// # Returns
    /// The surface in lattice-local coordinates. It is empty when no cell
    /// crosses the iso value.
    pub fn extract(&self, lattice: &DensityLattice) -> Surface {
        let size = lattice.size();
        let gate = self.settings.create_gate;
        let mut builder = SurfaceBuilder::new(self.settings.flat_shading);

        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let own = lattice.at(x, y, z);
                    if own < -gate || own > gate {
                        continue;
                    }

                    let corners = CORNER_OFFSETS.map(|[dx, dy, dz]| lattice.at(x + dx, y + dy, z + dz));
                    let configuration = Self::configuration(&corners, self.settings.iso_value);
                    if configuration == 0 || configuration == 255 {
                        continue;
                    }

                    let cell = [x, y, z];
                    for triangle in TRIANGLE_TABLE[configuration]
                        .chunks_exact(3)
                        .take_while(|triangle| triangle[0] >= 0)
                    {
                        for &edge in triangle {
                            let position = self.edge_vertex(cell, &corners, edge as usize);
                            builder.push(position);
                        }
                    }
                }
            }
        }

        builder.finish()
    }

    /// Places the vertex of `edge` inside the cell at `cell`.
    fn edge_vertex(&self, cell: [usize; 3], corners: &[f32; 8], edge: usize) -> Point3<f32> {
        let [a, b] = EDGE_CORNERS[edge];
        // Every cell sharing an edge walks it from its lower corner, so the
        // interpolated position is bit-identical in each of them.
        let (a, b) = if CORNER_OFFSETS[a] <= CORNER_OFFSETS[b] {
            (a, b)
        } else {
            (b, a)
        };
        let start = corner_position(cell, a);
        let end = corner_position(cell, b);

        let t = if self.settings.smooth {
            let iso = self.settings.iso_value;
            let difference = corners[b] - corners[a];
            if difference == 0.0 {
                iso
            } else {
                (iso - corners[a]) / difference
            }
        } else {
            0.5
        };

        start + (end - start) * t
    }
}

fn corner_position(cell: [usize; 3], corner: usize) -> Point3<f32> {
    let offset = CORNER_OFFSETS[corner];
    Point3::new(
        (cell[0] + offset[0]) as f32,
        (cell[1] + offset[1]) as f32,
        (cell[2] + offset[2]) as f32,
    )
}

/// Collects triangle corners into a surface, welding them unless flat shaded.
struct SurfaceBuilder {
    surface: Surface,
    flat_shading: bool,
    welded: HashMap<[u32; 3], u32>,
}

impl SurfaceBuilder {
    fn new(flat_shading: bool) -> Self {
        Self {
            surface: Surface::default(),
            flat_shading,
            welded: HashMap::new(),
        }
    }

    fn push(&mut self, position: Point3<f32>) {
        let index = if self.flat_shading {
            self.add_vertex(position)
        } else {
            let key = [position.x.to_bits(), position.y.to_bits(), position.z.to_bits()];
            match self.welded.get(&key) {
                Some(&index) => index,
                None => {
                    let index = self.add_vertex(position);
                    self.welded.insert(key, index);
                    index
                }
            }
        };
        self.surface.triangles.push(index);
    }

    fn add_vertex(&mut self, position: Point3<f32>) -> u32 {
        self.surface.vertices.push(position);
        (self.surface.vertices.len() - 1) as u32
    }

    fn finish(mut self) -> Surface {
        self.surface.recompute_normals();
        self.surface
    }
}
