//! # Density Field
//!
//! Builds the scalar volume a planet is carved from. The field starts as a
//! radial term, `1 - distance(p, center) / radius`, which is positive inside
//! the nominal sphere, negative outside and zero on its surface. Noise layers
//! are then added on top, each optionally masked by the layer before it.
//!
//! Every stage is a parallel kernel over the flat lattice index and returns
//! only once all samples are written, so the finished lattice can be handed
//! straight to the chunk store.

use cgmath::{MetricSpace, Point3};
use log::{debug, info};
use rayon::prelude::*;
use web_time::Instant;

use crate::core::math::{inverse_lerp, lerp};

use super::{
    config::{NoiseLayerConfig, PlanetConfig},
    error::ConfigError,
    noise::NoiseKernel,
};

mod lattice;

pub use lattice::DensityLattice;

/// Composes the radial planet term and the configured noise layers.
#[derive(Debug, Clone)]
pub struct DensityFieldBuilder {
    config: PlanetConfig,
    kernels: Vec<NoiseKernel>,
}

impl DensityFieldBuilder {
    /// Validates `config` and prepares one noise kernel per layer.
    ///
    /// `config.seed` is used as given; seed randomization happens before this.
    pub fn new(config: &PlanetConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let kernels = if config.use_layered_noise {
            config
                .layers
                .iter()
                .map(|layer| NoiseKernel::new(config.seed, layer))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            config: config.clone(),
            kernels,
        })
    }

    /// The planet settings the kernels were built from.
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    /// Builds the density lattice of a planet.
    ///
    /// # Arguments
    /// * `lattice_size` - Number of cells along each axis; the lattice holds `(lattice_size + 1)³` samples
    /// * `radius` - Radius of the nominal surface in lattice units, centred on the lattice
    ///
    /// # Returns
    /// The finished lattice, or an error if the size or radius is invalid.
    pub fn build(&self, lattice_size: usize, radius: f32) -> Result<DensityLattice, ConfigError> {
        if lattice_size == 0 {
            return Err(ConfigError::ZeroLatticeSize);
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ConfigError::NonPositiveRadius(radius));
        }

        let start = Instant::now();
        let half = lattice_size as f32 / 2.0;
        let center = Point3::new(half, half, half);

        let mut density = DensityLattice::from_fn(lattice_size, |point| {
            1.0 - to_f32(point).distance(center) / radius
        });

        let mut previous: Option<DensityLattice> = None;
        for (index, (kernel, layer)) in self.kernels.iter().zip(&self.config.layers).enumerate() {
            let layer_start = Instant::now();
            let field = sample_layer(kernel, layer, lattice_size);

            let mask = previous
                .as_ref()
                .filter(|_| layer.use_mask_from_previous_layer)
                .map(DensityLattice::values);
            let sign = if layer.invert { -1.0 } else { 1.0 };
            let noise = field.values();

            density
                .values_mut()
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, value)| {
                    let mask = mask.map_or(0.0, |mask| mask[i]);
                    *value += sign * (noise[i] - mask);
                });

            debug!(
                "Layer {} ({:?}) applied in {:?}",
                index,
                layer.kind,
                layer_start.elapsed()
            );
            previous = Some(field);
        }

        info!(
            "Built {}³ density field with {} noise layer(s) in {:?}",
            lattice_size,
            self.kernels.len(),
            start.elapsed()
        );

        Ok(density)
    }
}

/// Samples one layer over the whole lattice and applies its height curve.
fn sample_layer(kernel: &NoiseKernel, layer: &NoiseLayerConfig, lattice_size: usize) -> DensityLattice {
    let mut field = DensityLattice::from_fn(lattice_size, |point| kernel.sample(to_f32(point)));

    if let (Some(curve), Some((min, max))) = (&layer.height_curve, field.min_max()) {
        field.par_update(|_, value| lerp(min, max, curve.evaluate(inverse_lerp(min, max, value))));
    }

    field
}

fn to_f32(point: Point3<usize>) -> Point3<f32> {
    Point3::new(point.x as f32, point.y as f32, point.z as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::{config::NoiseKind, noise::HeightCurve};

    fn bare_planet(radius: f32) -> PlanetConfig {
        PlanetConfig {
            radius,
            use_layered_noise: false,
            ..Default::default()
        }
    }

    #[test]
    fn radial_term_is_zero_on_the_nominal_surface() {
        let builder = DensityFieldBuilder::new(&bare_planet(4.0)).unwrap();
        let lattice = builder.build(16, 4.0).unwrap();

        assert_eq!(lattice.at(8, 8, 8), 1.0);
        assert!(lattice.at(12, 8, 8).abs() < 1e-6);
        assert!(lattice.at(16, 8, 8) < 0.0);
        assert!(lattice.at(10, 8, 8) > 0.0);
    }

    #[test]
    fn rejects_degenerate_requests() {
        let builder = DensityFieldBuilder::new(&bare_planet(4.0)).unwrap();
        assert!(matches!(builder.build(0, 4.0), Err(ConfigError::ZeroLatticeSize)));
        assert!(matches!(
            builder.build(8, -1.0),
            Err(ConfigError::NonPositiveRadius(_))
        ));
    }

    #[test]
    fn a_layer_adds_its_noise_to_the_radial_term() {
        let layer = NoiseLayerConfig {
            kind: NoiseKind::Billow,
            ..Default::default()
        };
        let config = PlanetConfig {
            radius: 6.0,
            layers: vec![layer.clone()],
            ..Default::default()
        };
        let builder = DensityFieldBuilder::new(&config).unwrap();
        let radial = DensityFieldBuilder::new(&bare_planet(6.0))
            .unwrap()
            .build(8, 6.0)
            .unwrap();
        let layered = builder.build(8, 6.0).unwrap();
        let kernel = NoiseKernel::new(config.seed, &layer).unwrap();

        let point = Point3::new(3, 5, 2);
        let expected = radial.get(point).unwrap() + kernel.sample(to_f32(point));
        assert!((layered.get(point).unwrap() - expected).abs() < 1e-5);
    }

    #[test]
    fn masking_and_inversion_cancel_an_identical_layer() {
        let layer = NoiseLayerConfig::default();
        let masked = NoiseLayerConfig {
            use_mask_from_previous_layer: true,
            ..layer.clone()
        };
        let config = PlanetConfig {
            radius: 6.0,
            layers: vec![layer.clone(), masked],
            ..Default::default()
        };
        let single = PlanetConfig {
            layers: vec![layer.clone()],
            ..config.clone()
        };

        let both = DensityFieldBuilder::new(&config).unwrap().build(8, 6.0).unwrap();
        let one = DensityFieldBuilder::new(&single).unwrap().build(8, 6.0).unwrap();

        // The second layer samples the same field its mask subtracts.
        for (a, b) in both.values().iter().zip(one.values()) {
            assert!((a - b).abs() < 1e-5);
        }

        let inverted = PlanetConfig {
            layers: vec![NoiseLayerConfig {
                invert: true,
                ..layer
            }],
            ..config
        };
        let radial = DensityFieldBuilder::new(&bare_planet(6.0))
            .unwrap()
            .build(8, 6.0)
            .unwrap();
        let flipped = DensityFieldBuilder::new(&inverted).unwrap().build(8, 6.0).unwrap();
        for ((r, plus), minus) in radial.values().iter().zip(one.values()).zip(flipped.values()) {
            assert!(((plus - r) + (minus - r)).abs() < 1e-5);
        }
    }

    #[test]
    fn height_curve_reshapes_within_the_layer_range() {
        let flat = NoiseLayerConfig {
            height_curve: Some(HeightCurve::new(vec![[0.0, 0.0], [1.0, 0.0]])),
            ..Default::default()
        };
        let kernel = NoiseKernel::new(0, &flat).unwrap();
        let field = sample_layer(&kernel, &flat, 8);
        let (min, _) = field.min_max().unwrap();

        assert!(field.values().iter().all(|value| (value - min).abs() < 1e-6));
    }
}
