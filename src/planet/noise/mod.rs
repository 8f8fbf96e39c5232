//! # Noise Kernel
//!
//! Seeded scalar fields used to roughen the planet surface. A [`NoiseKernel`]
//! is an immutable value built from one [`NoiseLayerConfig`]; it holds no
//! shared state, so any number of threads may sample the same kernel and two
//! kernels built from the same seed and layer always agree.
//!
//! Three strategies are available:
//! - **Standard**: octave summation of Perlin noise, driven by
//!   `frequency`, `lacunarity`, `amplitude` and `persistence`.
//! - **Ridged**: ridged multifractal noise with sharp crests.
//! - **Billow**: billowy noise with rounded lumps.

use cgmath::Point3;
use noise::{Billow, MultiFractal, NoiseFn, Perlin, RidgedMulti};

use super::{
    config::{NoiseKind, NoiseLayerConfig},
    error::ConfigError,
};

mod height_curve;

pub use height_curve::HeightCurve;

/// The underlying noise generator of a kernel.
#[derive(Debug, Clone)]
enum Source {
    Standard(Perlin),
    Ridged(RidgedMulti<Perlin>),
    Billow(Billow<Perlin>),
}

/// A deterministic 3D noise field for one layer.
#[derive(Debug, Clone)]
pub struct NoiseKernel {
    source: Source,
    scale: f64,
    offset: [f64; 3],
    octaves: u32,
    frequency: f64,
    lacunarity: f64,
    amplitude: f64,
    persistence: f64,
    /// Output multiplier of the fractal variants.
    fractal_scale: f64,
}

impl NoiseKernel {
    /// Builds a kernel for `layer`, seeded with `seed`.
    ///
    /// # Arguments
    /// * `seed` - The planet seed; the same seed always produces the same field
    /// * `layer` - The layer settings, validated here
    ///
    /// # Returns
    /// The kernel, or the configuration error that made the layer invalid.
    pub fn new(seed: i32, layer: &NoiseLayerConfig) -> Result<Self, ConfigError> {
        layer.validate(0)?;

        // Negative seeds wrap around; every i32 maps to a distinct u32.
        let seed = seed as u32;
        let octaves = layer.octaves as usize;
        let frequency = layer.frequency as f64;
        let lacunarity = layer.lacunarity as f64;
        let fractal_persistence = layer.gain as f64;

        let source = match layer.kind {
            NoiseKind::Standard => Source::Standard(Perlin::new(seed)),
            NoiseKind::Ridged => Source::Ridged(
                RidgedMulti::<Perlin>::new(seed)
                    .set_octaves(octaves)
                    .set_frequency(frequency)
                    .set_lacunarity(lacunarity)
                    .set_persistence(fractal_persistence),
            ),
            NoiseKind::Billow => Source::Billow(
                Billow::<Perlin>::new(seed)
                    .set_octaves(octaves)
                    .set_frequency(frequency)
                    .set_lacunarity(lacunarity)
                    .set_persistence(fractal_persistence),
            ),
        };

        Ok(Self {
            source,
            scale: layer.scale as f64,
            offset: layer.offset.map(f64::from),
            octaves: layer.octaves,
            frequency,
            lacunarity,
            amplitude: layer.amplitude as f64,
            persistence: layer.persistence as f64,
            fractal_scale: (layer.amplitude * layer.strength) as f64,
        })
    }

    /// Samples the field at a lattice point.
    pub fn sample(&self, point: Point3<f32>) -> f32 {
        self.get([point.x as f64, point.y as f64, point.z as f64]) as f32
    }

    fn standard(&self, perlin: &Perlin, point: [f64; 3]) -> f64 {
        let mut value = 0.0;
        let mut frequency = self.frequency;
        let mut amplitude = self.amplitude;

        for _ in 0..self.octaves {
            value += perlin.get(point.map(|c| c * frequency)) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }

        value
    }
}

impl NoiseFn<f64, 3> for NoiseKernel {
    fn get(&self, point: [f64; 3]) -> f64 {
        let point = [
            point[0] / self.scale + self.offset[0],
            point[1] / self.scale + self.offset[1],
            point[2] / self.scale + self.offset[2],
        ];

        match &self.source {
            Source::Standard(perlin) => self.standard(perlin, point),
            Source::Ridged(ridged) => ridged.get(point) * self.fractal_scale,
            Source::Billow(billow) => billow.get(point) * self.fractal_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(kind: NoiseKind) -> NoiseLayerConfig {
        NoiseLayerConfig {
            kind,
            octaves: 4,
            ..Default::default()
        }
    }

    #[test]
    fn sampling_is_pure() {
        for kind in [NoiseKind::Standard, NoiseKind::Ridged, NoiseKind::Billow] {
            let kernel = NoiseKernel::new(1337, &layer(kind)).unwrap();
            let twin = NoiseKernel::new(1337, &layer(kind)).unwrap();
            let point = Point3::new(3.5, -12.25, 40.0);

            let first = kernel.sample(point);
            assert_eq!(first.to_bits(), kernel.sample(point).to_bits());
            assert_eq!(first.to_bits(), twin.sample(point).to_bits());
        }
    }

    #[test]
    fn seeds_change_the_field() {
        let a = NoiseKernel::new(1, &layer(NoiseKind::Standard)).unwrap();
        let b = NoiseKernel::new(2, &layer(NoiseKind::Standard)).unwrap();

        let differs = (0..32).any(|i| {
            let p = Point3::new(i as f32 * 1.7, i as f32 * 0.3, 5.0);
            a.sample(p) != b.sample(p)
        });
        assert!(differs);
    }

    #[test]
    fn standard_noise_is_bounded_by_its_amplitudes() {
        let config = NoiseLayerConfig {
            amplitude: 0.5,
            persistence: 0.5,
            octaves: 3,
            ..Default::default()
        };
        let kernel = NoiseKernel::new(9, &config).unwrap();
        // Perlin stays within [-1, 1], so the sum stays within 0.5 + 0.25 + 0.125.
        let bound = 0.875 + 1e-4;

        for i in 0..200 {
            let p = Point3::new(i as f32 * 0.91, i as f32 * 1.37, i as f32 * 0.13);
            assert!(kernel.sample(p).abs() <= bound);
        }
    }

    #[test]
    fn rejects_invalid_layers() {
        let config = NoiseLayerConfig {
            octaves: 0,
            ..Default::default()
        };
        assert!(NoiseKernel::new(0, &config).is_err());

        let config = NoiseLayerConfig {
            scale: 0.0,
            ..Default::default()
        };
        assert!(NoiseKernel::new(0, &config).is_err());
    }
}
