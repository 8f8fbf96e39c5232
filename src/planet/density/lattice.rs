//! Dense cubic grids of density samples.

use cgmath::Point3;
use rayon::prelude::*;

/// A cube of `(size + 1)³` density samples covering `size³` cells.
///
/// Samples are stored flat, `x` fastest then `y` then `z`:
/// `index = x + D * y + D² * z` with `D = size + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityLattice {
    size: usize,
    values: Vec<f32>,
}

impl DensityLattice {
    /// Creates a lattice of `size³` cells with every sample set to zero.
    pub fn new(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    /// Creates a lattice of `size³` cells with every sample set to `value`.
    pub fn filled(size: usize, value: f32) -> Self {
        let dimension = size + 1;
        Self {
            size,
            values: vec![value; dimension * dimension * dimension],
        }
    }

    /// Creates a lattice by evaluating `f` at every sample point in parallel.
    ///
    /// Returns after every sample has been written.
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where
        F: Fn(Point3<usize>) -> f32 + Sync,
    {
        let mut lattice = Self::new(size);
        lattice.par_update(|point, _| f(point));
        lattice
    }

    /// Number of cells along each axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of samples along each axis.
    pub fn dimension(&self) -> usize {
        self.size + 1
    }

    /// All samples, x fastest, then y, then z.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable access to all samples, in the order of [`values`](Self::values).
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Flat index of a sample point. The point must lie inside the lattice.
    pub fn index_of(&self, point: Point3<usize>) -> usize {
        let dimension = self.dimension();
        point.x + dimension * (point.y + dimension * point.z)
    }

    /// Sample point of a flat index.
    pub fn point_of(&self, index: usize) -> Point3<usize> {
        let dimension = self.dimension();
        Point3::new(
            index % dimension,
            (index / dimension) % dimension,
            index / (dimension * dimension),
        )
    }

    /// Returns `true` if `point` is a sample of this lattice.
    pub fn contains(&self, point: Point3<usize>) -> bool {
        let dimension = self.dimension();
        point.x < dimension && point.y < dimension && point.z < dimension
    }

    /// Returns the sample at `point`, or `None` outside the lattice.
    pub fn get(&self, point: Point3<usize>) -> Option<f32> {
        self.contains(point)
            .then(|| self.values[self.index_of(point)])
    }

    /// Sample at `(x, y, z)`. Panics outside the lattice.
    #[inline]
    pub fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[self.index_of(Point3::new(x, y, z))]
    }

    /// Writes the sample at `point`. Returns `false` and writes nothing outside the lattice.
    pub fn set(&mut self, point: Point3<usize>, value: f32) -> bool {
        if !self.contains(point) {
            return false;
        }
        let index = self.index_of(point);
        self.values[index] = value;
        true
    }

    /// Rewrites every sample in parallel with `f(point, old_value)`.
    pub fn par_update<F>(&mut self, f: F)
    where
        F: Fn(Point3<usize>, f32) -> f32 + Sync,
    {
        let dimension = self.dimension();
        self.values
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, value)| {
                let point = Point3::new(
                    index % dimension,
                    (index / dimension) % dimension,
                    index / (dimension * dimension),
                );
                *value = f(point, *value);
            });
    }

    /// Copies out the `size³`-cell sub-lattice whose first sample is `origin`.
    ///
    /// Samples falling outside this lattice read as zero.
    pub fn slice(&self, origin: Point3<usize>, size: usize) -> DensityLattice {
        let mut slice = DensityLattice::new(size);
        let dimension = slice.dimension();

        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    let source = Point3::new(origin.x + x, origin.y + y, origin.z + z);
                    if let Some(value) = self.get(source) {
                        slice.values[x + dimension * (y + dimension * z)] = value;
                    }
                }
            }
        }

        slice
    }

    /// Writes every sample of `source` into this lattice, starting at `origin`.
    ///
    /// Samples that would land outside this lattice are discarded.
    pub fn blit(&mut self, origin: Point3<usize>, source: &DensityLattice) {
        let dimension = source.dimension();

        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    let target = Point3::new(origin.x + x, origin.y + y, origin.z + z);
                    self.set(target, source.values[x + dimension * (y + dimension * z)]);
                }
            }
        }
    }

    /// Smallest and largest sample, or `None` for a lattice without finite samples.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }
}
