//! Dense complex-valued matrices.
//!
//! [`Matrix`] is an immutable wrapper around a [`nalgebra::DMatrix`] that adds
//! the handful of quantum-specific checks (unitarity, hermiticity) and gate
//! factories needed by the simulators.

use std::{
    fmt,
    ops::{ Add, Index, Mul, Sub },
};
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ GateError, MatrixError },
    parallel::WorkerPool,
    simulator_matrix::{ OracleMatrix, SimulatorGateMatrix, SimulatorMatrix },
    truth_table::TruthTableEntry,
    vector::Vector,
};

/// Tolerance used for all approximate comparisons unless configured
/// otherwise.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Rotation axis on the Bloch sphere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// A rectangular matrix of complex numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix(na::DMatrix<C64>);

impl From<na::DMatrix<C64>> for Matrix {
    fn from(data: na::DMatrix<C64>) -> Self { Self(data) }
}

impl Index<(usize, usize)> for Matrix {
    type Output = C64;

    fn index(&self, idx: (usize, usize)) -> &Self::Output { &self.0[idx] }
}

impl Matrix {
    /// Build a matrix from a list of rows.
    pub fn new(rows: Vec<Vec<C64>>) -> Result<Self, MatrixError> {
        let row_count = rows.len();
        let Some(column_count) = rows.first().map(|row| row.len()) else {
            return Err(MatrixError::MatrixWithoutRows);
        };
        if column_count == 0 {
            return Err(MatrixError::MatrixWithoutColumns);
        }
        if rows.iter().any(|row| row.len() != column_count) {
            return Err(MatrixError::MatrixRowsHaveDifferentSizes);
        }
        let data: Vec<C64> = rows.into_iter().flatten().collect();
        Ok(Self(na::DMatrix::from_row_slice(row_count, column_count, &data)))
    }

    /// Build a matrix from a list of rows of real numbers.
    pub fn from_real(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(C64::from).collect())
                .collect()
        )
    }

    /// Build a matrix element by element.
    pub fn from_fn<F>(row_count: usize, column_count: usize, mut f: F) -> Self
    where F: FnMut(usize, usize) -> C64
    {
        Self(na::DMatrix::from_fn(row_count, column_count, |r, c| f(r, c)))
    }

    /// Build a matrix element by element, spreading the work over `pool`.
    pub fn from_fn_with<F>(
        row_count: usize,
        column_count: usize,
        pool: &WorkerPool,
        f: F,
    ) -> Self
    where F: Fn(usize, usize) -> C64 + Send + Sync
    {
        let data: Vec<C64>
            = pool.map_range(
                row_count * column_count,
                |k| f(k / column_count, k % column_count),
            );
        Self(na::DMatrix::from_row_slice(row_count, column_count, &data))
    }

    /// Build a matrix row by row, spreading the work over `pool`.
    ///
    /// *Panics if any row returned by `f` does not have `column_count`
    /// elements.*
    pub fn from_rows_with<F>(
        row_count: usize,
        column_count: usize,
        pool: &WorkerPool,
        f: F,
    ) -> Self
    where F: Fn(usize) -> Vec<C64> + Send + Sync
    {
        let rows: Vec<Vec<C64>> = pool.map_range(row_count, f);
        debug_assert!(rows.iter().all(|row| row.len() == column_count));
        let data: Vec<C64> = rows.into_iter().flatten().collect();
        Self(na::DMatrix::from_row_slice(row_count, column_count, &data))
    }

    /// `count × count` identity.
    pub fn identity(count: usize) -> Self {
        Self(na::DMatrix::identity(count, count))
    }

    pub fn hadamard() -> Self {
        use std::f64::consts::FRAC_1_SQRT_2;
        Self(na::DMatrix::from_row_slice(2, 2, &[
            FRAC_1_SQRT_2.into(),   FRAC_1_SQRT_2.into(),
            FRAC_1_SQRT_2.into(), (-FRAC_1_SQRT_2).into(),
        ]))
    }

    pub fn not() -> Self {
        Self(na::DMatrix::from_row_slice(2, 2, &[
            0.0.into(), 1.0.into(),
            1.0.into(), 0.0.into(),
        ]))
    }

    /// Controlled-NOT with the control on the most significant bit.
    pub fn controlled_not() -> Self {
        let z0 = C64::from(0.0);
        let z1 = C64::from(1.0);
        Self(na::DMatrix::from_row_slice(4, 4, &[
            z1, z0, z0, z0,
            z0, z1, z0, z0,
            z0, z0, z0, z1,
            z0, z0, z1, z0,
        ]))
    }

    /// `diag(1, e^{iθ})`.
    pub fn phase_shift(radians: f64) -> Self {
        Self(na::DMatrix::from_row_slice(2, 2, &[
            1.0.into(), 0.0.into(),
            0.0.into(), C64::cis(radians),
        ]))
    }

    /// Rotation by `radians` about `axis`, `exp(-iθσ/2)`.
    pub fn rotation(axis: Axis, radians: f64) -> Self {
        let half = radians / 2.0;
        let cos: C64 = half.cos().into();
        let sin = half.sin();
        let data = match axis {
            Axis::X => [
                cos,                     -C64::i() * sin,
                -C64::i() * sin,         cos,
            ],
            Axis::Y => [
                cos,                     (-sin).into(),
                sin.into(),              cos,
            ],
            Axis::Z => [
                C64::cis(-half),         0.0.into(),
                0.0.into(),              C64::cis(half),
            ],
        };
        Self(na::DMatrix::from_row_slice(2, 2, &data))
    }

    /// Square matrix whose every entry is `1 / count`.
    pub fn average(count: usize) -> Self {
        let value = C64::from(1.0 / count as f64);
        Self(na::DMatrix::from_element(count, count, value))
    }

    /// Oracle over `control_count` leading control bits: `controlled` on
    /// every block whose control pattern is listed in `truth_table`, identity
    /// on the others.
    pub fn oracle<S>(truth_table: &[S], control_count: usize, controlled: &Self)
        -> Result<Self, GateError>
    where S: AsRef<str>
    {
        let entries: Vec<TruthTableEntry>
            = truth_table.iter()
            .map(|entry| TruthTableEntry::parse(entry.as_ref(), control_count))
            .collect::<Result<_, _>>()?;
        let oracle = OracleMatrix::new(controlled.clone(), control_count, &entries);
        Ok(SimulatorGateMatrix::Oracle(oracle).expanded_matrix())
    }

    pub fn row_count(&self) -> usize { self.0.nrows() }

    pub fn column_count(&self) -> usize { self.0.ncols() }

    pub fn is_square(&self) -> bool { self.0.is_square() }

    pub fn as_inner(&self) -> &na::DMatrix<C64> { &self.0 }

    pub fn into_inner(self) -> na::DMatrix<C64> { self.0 }

    /// Copy out a single row.
    pub fn row(&self, r: usize) -> Vec<C64> { self.0.row(r).iter().copied().collect() }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self { Self(self.0.adjoint()) }

    pub fn transpose(&self) -> Self { Self(self.0.transpose()) }

    pub fn conjugate(&self) -> Self { Self(self.0.conjugate()) }

    fn require_square(&self) -> Result<(), MatrixError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(MatrixError::MatrixIsNotSquare {
                rows: self.row_count(),
                columns: self.column_count(),
            })
        }
    }

    pub fn trace(&self) -> Result<C64, MatrixError> {
        self.require_square()?;
        Ok(self.0.trace())
    }

    pub fn determinant(&self) -> Result<C64, MatrixError> {
        self.require_square()?;
        Ok(self.0.determinant())
    }

    /// Return the inverse, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Result<Option<Self>, MatrixError> {
        self.require_square()?;
        Ok(self.0.clone().try_inverse().map(Self))
    }

    /// Eigenvalues of a Hermitian matrix, in ascending order.
    ///
    /// Only the lower triangle is read; the caller is responsible for checking
    /// hermiticity first.
    pub fn eigenvalues(&self) -> Result<Vec<f64>, MatrixError> {
        self.require_square()?;
        let mut values: Vec<f64>
            = self.0.clone().symmetric_eigen().eigenvalues.iter().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        Ok(values)
    }

    /// Kronecker product `self ⊗ other`.
    pub fn tensor_product(&self, other: &Self) -> Self {
        Self(self.0.kronecker(&other.0))
    }

    pub fn scaled(&self, factor: C64) -> Self { Self(&self.0 * factor) }

    /// Return `true` if both matrices have the same shape and every element
    /// differs by at most `tolerance`.
    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.0.shape() == other.0.shape()
            && self.0.iter().zip(other.0.iter())
            .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Return `true` if `U† U ≈ I`.
    pub fn is_approximately_unitary(&self, tolerance: f64) -> bool {
        self.is_square()
            && Self(self.0.adjoint() * &self.0)
            .is_approximately_equal(&Self::identity(self.row_count()), tolerance)
    }

    /// Return `true` if `A ≈ A†`.
    pub fn is_approximately_hermitian(&self, tolerance: f64) -> bool {
        self.is_square()
            && self.is_approximately_equal(&self.adjoint(), tolerance)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.row_count() {
            write!(f, "[")?;
            for c in 0..self.column_count() {
                let z = self.0[(r, c)];
                write!(f, "{:+.3}{:+.3}i", z.re, z.im)?;
                if c + 1 < self.column_count() { write!(f, ", ")?; }
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output { Matrix(&self.0 + &rhs.0) }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output { Matrix(&self.0 - &rhs.0) }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output { Matrix(&self.0 * &rhs.0) }
}

impl Mul<&Vector> for &Matrix {
    type Output = Vector;

    fn mul(self, rhs: &Vector) -> Self::Output {
        Vector::from(&self.0 * rhs.as_inner())
    }
}

impl Mul<C64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: C64) -> Self::Output { self.scaled(rhs) }
}
