//! The radial sculpting brush.

use cgmath::Point3;

use crate::{core::math::smoothstep, planet::error::ConfigError};

/// Fraction of the radius within which a brush works at full strength.
pub const BRUSH_CORE: f32 = 0.7;

/// One frame's brush, in world-lattice coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Centre in world-lattice coordinates.
    pub center: Point3<f32>,
    /// Radius in lattice units.
    pub radius: f32,
    /// Density change per second at full strength.
    pub speed: f32,
    /// `true` raises density (adds ground), `false` lowers it.
    pub add: bool,
    /// Divisor applied to every change; tougher ground changes slower.
    pub ground_toughness: f32,
}

impl Brush {
    /// Creates a brush after checking its parameters.
    ///
    /// # Arguments
    /// * `center` - Brush centre in world-lattice coordinates
    /// * `radius` - Radius in lattice units, must be positive
    /// * `speed` - Density change per second at full strength, must not be negative
    /// * `add` - Whether the brush adds or removes ground
    /// * `ground_toughness` - Divisor applied to every change, must be positive
    pub fn new(
        center: Point3<f32>,
        radius: f32,
        speed: f32,
        add: bool,
        ground_toughness: f32,
    ) -> Result<Self, ConfigError> {
        if !(center.x.is_finite() && center.y.is_finite() && center.z.is_finite()) {
            return Err(ConfigError::InvalidBrush("center is not finite"));
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ConfigError::InvalidBrush("radius must be positive"));
        }
        if !(speed >= 0.0) || !speed.is_finite() {
            return Err(ConfigError::InvalidBrush("speed must not be negative"));
        }
        if !(ground_toughness > 0.0) || !ground_toughness.is_finite() {
            return Err(ConfigError::NonPositiveToughness(ground_toughness));
        }

        Ok(Self {
            center,
            radius,
            speed,
            add,
            ground_toughness,
        })
    }

    /// Strength at `distance` from the centre.
    ///
    /// 1 up to 70% of the radius, easing to 0 at the radius, 0 beyond it.
    pub fn weight(&self, distance: f32) -> f32 {
        if !(0.0..self.radius).contains(&distance) {
            return 0.0;
        }
        smoothstep(self.radius, self.radius * BRUSH_CORE, distance)
    }

    /// Signed density change at `distance` over a frame of `delta_time` seconds.
    pub fn delta(&self, distance: f32, delta_time: f32) -> f32 {
        let sign = if self.add { 1.0 } else { -1.0 };
        sign * self.speed * self.weight(distance) * delta_time / self.ground_toughness
    }
}
