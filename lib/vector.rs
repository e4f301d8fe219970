//! Dense complex-valued vectors.

use std::ops::{ Index, Mul };
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::VectorError,
    parallel::WorkerPool,
};

/// An ordered, non-empty sequence of complex numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector(na::DVector<C64>);

impl From<na::DVector<C64>> for Vector {
    fn from(data: na::DVector<C64>) -> Self { Self(data) }
}

impl Index<usize> for Vector {
    type Output = C64;

    fn index(&self, idx: usize) -> &Self::Output { &self.0[idx] }
}

impl Vector {
    pub fn new(values: Vec<C64>) -> Result<Self, VectorError> {
        if values.is_empty() {
            return Err(VectorError::VectorCountHasToBeBiggerThanZero);
        }
        Ok(Self(na::DVector::from_vec(values)))
    }

    pub fn from_real(values: Vec<f64>) -> Result<Self, VectorError> {
        Self::new(values.into_iter().map(C64::from).collect())
    }

    /// Build a vector element by element, spreading the work over `pool`.
    pub fn from_fn_with<F>(count: usize, pool: &WorkerPool, f: F) -> Self
    where F: Fn(usize) -> C64 + Send + Sync
    {
        Self(na::DVector::from_vec(pool.map_range(count, f)))
    }

    /// The `index`-th canonical basis vector of length `count`.
    pub fn basis(count: usize, index: usize) -> Self {
        let mut data: na::DVector<C64> = na::DVector::zeros(count);
        data[index] = C64::from(1.0);
        Self(data)
    }

    pub fn count(&self) -> usize { self.0.len() }

    pub fn as_inner(&self) -> &na::DVector<C64> { &self.0 }

    pub fn into_inner(self) -> na::DVector<C64> { self.0 }

    pub fn as_slice(&self) -> &[C64] { self.0.as_slice() }

    pub fn iter(&self) -> impl Iterator<Item = &C64> + '_ { self.0.iter() }

    /// `Σ |vᵢ|²`.
    pub fn squared_norm(&self) -> f64 { self.0.iter().map(|z| z.norm_sqr()).sum() }

    /// Return `true` if `Σ |vᵢ|²` is within `tolerance` of one.
    pub fn is_approximately_normalized(&self, tolerance: f64) -> bool {
        (self.squared_norm() - 1.0).abs() <= tolerance
    }

    /// `⟨self|other⟩`, conjugating `self`.
    pub fn inner_product(&self, other: &Self) -> C64 { self.0.dotc(&other.0) }

    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.count() == other.count()
            && self.0.iter().zip(other.0.iter())
            .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

impl Mul<C64> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: C64) -> Self::Output { Vector(&self.0 * rhs) }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::matrix::Matrix;

    #[test]
    fn empty_vector_is_rejected() {
        assert_eq!(
            Vector::new(vec![]).unwrap_err(),
            VectorError::VectorCountHasToBeBiggerThanZero,
        );
    }

    #[test]
    fn norm_and_inner_product() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let plus = Vector::from_real(vec![s, s]).unwrap();
        let minus = Vector::from_real(vec![s, -s]).unwrap();
        assert!(plus.is_approximately_normalized(1e-12));
        assert_abs_diff_eq!(plus.inner_product(&minus).norm(), 0.0, epsilon = 1e-12);
        let i_plus = &plus * C64::i();
        assert_abs_diff_eq!(plus.inner_product(&i_plus).im, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn matrix_times_vector() {
        let zero = Vector::basis(2, 0);
        let one = &Matrix::not() * &zero;
        assert!(one.is_approximately_equal(&Vector::basis(2, 1), 1e-12));
        let pool = WorkerPool::new(2).unwrap();
        let built = Vector::from_fn_with(2, &pool, |k| C64::from(k as f64));
        assert!(built.is_approximately_equal(&Vector::basis(2, 1), 1e-12));
    }
}
