//! Scalar helpers shared by the density, meshing and terraform kernels.

use num_traits::Float;

/// Clamps `value` into `[0, 1]`.
pub fn saturate<T: Float>(value: T) -> T {
    value.max(T::zero()).min(T::one())
}

/// Linear interpolation between `a` and `b`.
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Inverse of [`lerp`]. A degenerate range maps every value to zero.
pub fn inverse_lerp<T: Float>(a: T, b: T, value: T) -> T {
    if a == b {
        return T::zero();
    }
    saturate((value - a) / (b - a))
}

/// Hermite smoothstep of `x` between the two edges.
///
/// The edges may be given in descending order, which yields a falling curve:
/// `smoothstep(1.0, 0.7, x)` is 1 at or below 0.7 and 0 at or above 1.0.
pub fn smoothstep<T: Float>(edge0: T, edge1: T, x: T) -> T {
    let t = inverse_lerp(edge0, edge1, x);
    let two = T::one() + T::one();
    let three = two + T::one();
    t * t * (three - two * t)
}
