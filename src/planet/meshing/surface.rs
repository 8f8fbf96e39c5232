//! Triangle surfaces produced by the mesher.

use cgmath::{InnerSpace, Point3, Vector3, Zero};

/// An indexed triangle surface with one normal per vertex.
///
/// An empty surface is valid and means "nothing to draw or collide with here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    /// Vertex positions.
    pub vertices: Vec<Point3<f32>>,
    /// Vertex indices, three per triangle.
    pub triangles: Vec<u32>,
    /// Unit normals, one per vertex.
    pub normals: Vec<Vector3<f32>>,
}

/// A GPU-ready vertex.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    /// Position of the vertex.
    pub position: [f32; 3],
    /// Unit normal of the vertex.
    pub normal: [f32; 3],
}

impl Surface {
    /// Returns `true` if the surface has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Concatenates surfaces, moving each by its translation.
    ///
    /// Normals are carried over unchanged, so shared seams keep the normals
    /// each part computed on its own side.
    ///
    /// # Arguments
    /// * `parts` - Pairs of a surface and the offset to add to its vertices
    ///
    /// # Returns
    /// A single surface holding every vertex and triangle of the parts.
    pub fn combine<'a, I>(parts: I) -> Surface
    where
        I: IntoIterator<Item = (&'a Surface, Vector3<f32>)>,
    {
        let mut combined = Surface::default();

        for (part, translation) in parts {
            let base = combined.vertices.len() as u32;
            combined
                .vertices
                .extend(part.vertices.iter().map(|vertex| *vertex + translation));
            combined.normals.extend_from_slice(&part.normals);
            combined
                .triangles
                .extend(part.triangles.iter().map(|index| index + base));
        }

        combined
    }

    /// Recomputes every vertex normal from the triangles.
    ///
    /// Each triangle adds its unnormalized face normal to its three vertices,
    /// weighting larger triangles more. A vertex whose sum is zero keeps a zero normal.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];

        for triangle in self.triangles.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|index| index as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for normal in normals.iter_mut() {
            if normal.magnitude2() > 0.0 {
                *normal = normal.normalize();
            }
        }

        self.normals = normals;
    }

    /// Interleaves positions and normals for upload to a vertex buffer.
    pub fn to_vertices(&self) -> Vec<SurfaceVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .map(|(position, normal)| SurfaceVertex {
                position: [position.x, position.y, position.z],
                normal: [normal.x, normal.y, normal.z],
            })
            .collect()
    }
}
