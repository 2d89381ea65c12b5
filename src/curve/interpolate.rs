//! Values a [`super::Continuous`] or [`super::Segmented`] curve can
//! interpolate between.

use std::ops::{Add, Mul, Sub};

/// Anything that supports linear interpolation between two samples.
///
/// Blanket-implemented for any `Copy` numeric-like type supporting the
/// usual vector-space operations, which covers the floating point
/// types this crate's curves are exercised with.
pub trait Interpolatable: Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl<T> Interpolatable for T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }
}
