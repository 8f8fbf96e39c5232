//! Lower-detail variants of a surface for distant LOD levels.

use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point3, Vector3, Zero};

use super::Surface;

/// Produces a lower-detail copy of a surface.
///
/// `quality` lies in `(0, 1]`; `1.0` asks for the full surface.
pub trait MeshSimplifier: Send + Sync {
    /// Returns a copy of `surface` keeping roughly `quality` of its detail.
    fn simplify(&self, surface: &Surface, quality: f32) -> Surface;
}

/// Merges all vertices that fall into the same cell of a uniform grid.
///
/// The grid spans the surface's bounding box with `resolution * quality`
/// cells along its longest axis. Each cluster is replaced by the average of
/// its vertices and triangles that collapse are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexClusterSimplifier {
    /// Grid cells along the longest axis at full quality.
    pub resolution: usize,
}

impl Default for VertexClusterSimplifier {
    fn default() -> Self {
        Self { resolution: 64 }
    }
}

impl MeshSimplifier for VertexClusterSimplifier {
    fn simplify(&self, surface: &Surface, quality: f32) -> Surface {
        if quality >= 1.0 || surface.is_empty() {
            return surface.clone();
        }

        let Some((min, max)) = bounds(&surface.vertices) else {
            return surface.clone();
        };
        let extent = (max - min).x.max((max - min).y).max((max - min).z);
        if extent <= 0.0 {
            return surface.clone();
        }

        let cells = ((self.resolution as f32 * quality.max(0.0)).round() as usize).max(1);
        let cell_size = extent / cells as f32;

        let mut clusters: HashMap<[i64; 3], u32> = HashMap::new();
        let mut sums: Vec<(Vector3<f32>, u32)> = Vec::new();
        let remap: Vec<u32> = surface
            .vertices
            .iter()
            .map(|vertex| {
                let local = (*vertex - min) / cell_size;
                let key = [local.x, local.y, local.z].map(|c| (c.floor() as i64).min(cells as i64 - 1));
                let cluster = *clusters.entry(key).or_insert_with(|| {
                    sums.push((Vector3::zero(), 0));
                    (sums.len() - 1) as u32
                });
                let (sum, count) = &mut sums[cluster as usize];
                *sum += vertex.to_vec();
                *count += 1;
                cluster
            })
            .collect();

        let mut simplified = Surface {
            vertices: sums
                .iter()
                .map(|(sum, count)| Point3::from_vec(*sum / *count as f32))
                .collect(),
            triangles: Vec::with_capacity(surface.triangles.len()),
            normals: Vec::new(),
        };

        for triangle in surface.triangles.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|index| remap[index as usize]);
            if a != b && b != c && a != c {
                simplified.triangles.extend_from_slice(&[a, b, c]);
            }
        }

        simplified.recompute_normals();
        simplified
    }
}

fn bounds(vertices: &[Point3<f32>]) -> Option<(Point3<f32>, Point3<f32>)> {
    let first = *vertices.first()?;
    Some(vertices.iter().fold((first, first), |(min, max), v| {
        (
            Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
            Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(quads: usize) -> Surface {
        let mut surface = Surface::default();
        for i in 0..=quads {
            surface.vertices.push(Point3::new(i as f32, 0.0, 0.0));
            surface.vertices.push(Point3::new(i as f32, quads as f32, 0.0));
        }
        for i in 0..quads as u32 {
            let base = 2 * i;
            surface.triangles.extend_from_slice(&[base, base + 2, base + 1]);
            surface.triangles.extend_from_slice(&[base + 1, base + 2, base + 3]);
        }
        surface.recompute_normals();
        surface
    }

    #[test]
    fn full_quality_returns_the_input() {
        let surface = strip(8);
        assert_eq!(VertexClusterSimplifier::default().simplify(&surface, 1.0), surface);
    }

    #[test]
    fn lower_quality_reduces_detail() {
        let surface = strip(32);
        let simplifier = VertexClusterSimplifier { resolution: 32 };
        let coarse = simplifier.simplify(&surface, 0.25);

        assert!(coarse.vertices.len() < surface.vertices.len());
        assert!(coarse.triangle_count() > 0);
        assert!(coarse.triangle_count() < surface.triangle_count());
        assert_eq!(coarse.normals.len(), coarse.vertices.len());
        assert!(coarse
            .triangles
            .iter()
            .all(|&index| (index as usize) < coarse.vertices.len()));
    }
}
