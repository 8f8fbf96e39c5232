//! Piecewise-linear reshaping of a layer's normalized range.

use serde::{Deserialize, Serialize};

/// A curve over `[0, 1]` given by `(t, value)` keys sorted by `t`.
///
/// Inputs before the first key or after the last clamp to that key's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightCurve {
    /// `(t, value)` pairs, sorted by `t`.
    pub keys: Vec<[f32; 2]>,
}

impl HeightCurve {
    /// Creates a curve from its keys. They are checked when the layer is validated.
    pub fn new(keys: Vec<[f32; 2]>) -> Self {
        Self { keys }
    }

    /// The identity curve.
    pub fn linear() -> Self {
        Self::new(vec![[0.0, 0.0], [1.0, 1.0]])
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.keys.is_empty() {
            return Err("has no keys");
        }
        if self
            .keys
            .iter()
            .flatten()
            .any(|component| !component.is_finite())
        {
            return Err("has a non-finite key");
        }
        if self.keys.windows(2).any(|pair| pair[1][0] < pair[0][0]) {
            return Err("keys are not sorted");
        }
        Ok(())
    }

    /// Evaluates the curve at `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return t;
        };
        if t <= first[0] {
            return first[1];
        }

        for pair in self.keys.windows(2) {
            let [t0, v0] = pair[0];
            let [t1, v1] = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * (t - t0) / span;
            }
        }

        self.keys[self.keys.len() - 1][1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_keys() {
        let curve = HeightCurve::new(vec![[0.0, 0.0], [0.5, 1.0], [1.0, 0.0]]);

        assert_eq!(curve.evaluate(0.25), 0.5);
        assert_eq!(curve.evaluate(0.5), 1.0);
        assert_eq!(curve.evaluate(0.75), 0.5);
    }

    #[test]
    fn clamps_outside_the_key_range() {
        let curve = HeightCurve::new(vec![[0.2, 0.1], [0.8, 0.9]]);

        assert_eq!(curve.evaluate(-1.0), 0.1);
        assert_eq!(curve.evaluate(2.0), 0.9);
    }

    #[test]
    fn linear_is_identity() {
        let curve = HeightCurve::linear();
        for t in [0.0, 0.3, 0.7, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn unsorted_keys_are_rejected() {
        let curve = HeightCurve::new(vec![[0.5, 0.0], [0.1, 1.0]]);
        assert!(curve.validate().is_err());
        assert!(HeightCurve::new(Vec::new()).validate().is_err());
    }
}
