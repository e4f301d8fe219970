//! Gate matrices in the form consumed by the simulation engines.
//!
//! Controlled and oracle gates are never stored as their full `2^k × 2^k`
//! matrices. Instead, each lookup checks the control bits of the row and
//! column and either forwards to the small core matrix or answers with the
//! identity.

use num_complex::Complex64 as C64;
use rustc_hash::FxHashSet;
use crate::{
    matrix::Matrix,
    truth_table::TruthTableEntry,
};

/// Read-only, index-addressed view of a square matrix.
pub trait SimulatorMatrix {
    /// Number of rows (and columns).
    fn count(&self) -> usize;

    fn element(&self, row: usize, column: usize) -> C64;

    /// All columns of `row` that may hold a non-zero value, with their values.
    fn row_entries(&self, row: usize) -> Vec<(usize, C64)> {
        (0..self.count())
            .map(|c| (c, self.element(row, c)))
            .filter(|(_, z)| *z != C64::from(0.0))
            .collect()
    }

    /// Materialize the full matrix.
    fn expanded_matrix(&self) -> Matrix {
        Matrix::from_fn(self.count(), self.count(), |r, c| self.element(r, c))
    }
}

/* Plain gates ****************************************************************/

/// A gate matrix with no controls.
#[derive(Clone, Debug, PartialEq)]
pub struct GateMatrix {
    matrix: Matrix,
}

impl GateMatrix {
    pub fn new(matrix: Matrix) -> Self { Self { matrix } }

    pub fn matrix(&self) -> &Matrix { &self.matrix }
}

impl SimulatorMatrix for GateMatrix {
    fn count(&self) -> usize { self.matrix.row_count() }

    fn element(&self, row: usize, column: usize) -> C64 { self.matrix[(row, column)] }

    fn row_entries(&self, row: usize) -> Vec<(usize, C64)> {
        self.matrix.row(row).into_iter()
            .enumerate()
            .filter(|(_, z)| *z != C64::from(0.0))
            .collect()
    }
}

/* Controlled gates ***********************************************************/

/// A core matrix applied when every one of `control_count` leading bits is
/// set.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlledMatrix {
    matrix: Matrix,
    control_count: usize,
}

impl ControlledMatrix {
    pub fn new(matrix: Matrix, control_count: usize) -> Self {
        Self { matrix, control_count }
    }
}

/* Oracle gates ***************************************************************/

/// A core matrix applied when the leading `control_count` bits match any
/// pattern in a set.
#[derive(Clone, Debug, PartialEq)]
pub struct OracleMatrix {
    matrix: Matrix,
    control_count: usize,
    activations: FxHashSet<u64>,
}

impl OracleMatrix {
    pub fn new(matrix: Matrix, control_count: usize, entries: &[TruthTableEntry])
        -> Self
    {
        let activations = entries.iter().map(|e| e.bits()).collect();
        Self { matrix, control_count, activations }
    }
}

/* Dispatch *******************************************************************/

/// Any of the gate matrix forms.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulatorGateMatrix {
    Single(GateMatrix),
    Controlled(ControlledMatrix),
    Oracle(OracleMatrix),
}

impl SimulatorGateMatrix {
    /// The matrix applied to the non-control inputs when the gate is active.
    pub fn core_matrix(&self) -> &Matrix {
        match self {
            Self::Single(m) => &m.matrix,
            Self::Controlled(m) => &m.matrix,
            Self::Oracle(m) => &m.matrix,
        }
    }

    pub fn control_count(&self) -> usize {
        match self {
            Self::Single(_) => 0,
            Self::Controlled(m) => m.control_count,
            Self::Oracle(m) => m.control_count,
        }
    }

    /// Return `true` if the core matrix acts when the control bits read
    /// `controls`.
    pub fn is_active(&self, controls: usize) -> bool {
        match self {
            Self::Single(_) => true,
            Self::Controlled(m) => {
                let ones = (1_usize << m.control_count) - 1;
                controls == ones
            },
            Self::Oracle(m) => m.activations.contains(&(controls as u64)),
        }
    }

    fn core_qubits(&self) -> u32 { self.core_matrix().row_count().trailing_zeros() }
}

impl SimulatorMatrix for SimulatorGateMatrix {
    fn count(&self) -> usize { self.core_matrix().row_count() << self.control_count() }

    fn element(&self, row: usize, column: usize) -> C64 {
        if let Self::Single(m) = self { return m.element(row, column); }
        let shift = self.core_qubits();
        let (row_controls, column_controls) = (row >> shift, column >> shift);
        if row_controls != column_controls {
            C64::from(0.0)
        } else if self.is_active(row_controls) {
            let local = (1_usize << shift) - 1;
            self.core_matrix()[(row & local, column & local)]
        } else if row == column {
            C64::from(1.0)
        } else {
            C64::from(0.0)
        }
    }

    fn row_entries(&self, row: usize) -> Vec<(usize, C64)> {
        if let Self::Single(m) = self { return m.row_entries(row); }
        let shift = self.core_qubits();
        let controls = row >> shift;
        if self.is_active(controls) {
            let local = (1_usize << shift) - 1;
            let base = controls << shift;
            self.core_matrix().row(row & local).into_iter()
                .enumerate()
                .filter(|(_, z)| *z != C64::from(0.0))
                .map(|(c, z)| (base | c, z))
                .collect()
        } else {
            vec![(row, C64::from(1.0))]
        }
    }
}

/// A validated gate matrix plus the circuit qubits it acts on.
///
/// `inputs[0]` corresponds to the most significant bit of the matrix index.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorComponents {
    pub matrix: SimulatorGateMatrix,
    pub inputs: Vec<usize>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn is_identity_on(m: &SimulatorGateMatrix, rows: &[usize]) -> bool {
        rows.iter().all(|r| {
            (0..m.count()).all(|c| {
                let expected = if *r == c { 1.0 } else { 0.0 };
                m.element(*r, c) == C64::from(expected)
            })
        })
    }

    #[test]
    fn controlled_count_and_layout() {
        let m = SimulatorGateMatrix::Controlled(ControlledMatrix::new(Matrix::not(), 2));
        assert_eq!(m.count(), 8);
        assert!(is_identity_on(&m, &[0, 1, 2, 3, 4, 5]));
        assert_eq!(m.element(6, 7), C64::from(1.0));
        assert_eq!(m.element(7, 6), C64::from(1.0));
        assert_eq!(m.element(6, 6), C64::from(0.0));
        assert_eq!(m.row_entries(3), vec![(3, C64::from(1.0))]);
        assert_eq!(m.row_entries(7), vec![(6, C64::from(1.0))]);
    }

    #[test]
    fn row_entries_skip_zeros() {
        let single = GateMatrix::new(Matrix::not());
        assert_eq!(single.row_entries(0), vec![(1, C64::from(1.0))]);
        assert_eq!(single.row_entries(1), vec![(0, C64::from(1.0))]);
        let z = Matrix::from_real(vec![vec![1.0, 0.0], vec![0.0, -1.0]]).unwrap();
        let m = SimulatorGateMatrix::Controlled(ControlledMatrix::new(z, 1));
        assert_eq!(m.row_entries(2), vec![(2, C64::from(1.0))]);
        assert_eq!(m.row_entries(3), vec![(3, C64::from(-1.0))]);
        (0..m.count()).for_each(|r| {
            let dense: Vec<(usize, C64)>
                = (0..m.count())
                .map(|c| (c, m.element(r, c)))
                .filter(|(_, z)| *z != C64::from(0.0))
                .collect();
            assert_eq!(m.row_entries(r), dense);
        });
    }

    #[test]
    fn oracle_activates_listed_patterns() {
        let entries = [
            TruthTableEntry::parse("00", 2).unwrap(),
            TruthTableEntry::parse("11", 2).unwrap(),
        ];
        let m = SimulatorGateMatrix::Oracle(OracleMatrix::new(Matrix::not(), 2, &entries));
        assert!(m.is_active(0b00));
        assert!(!m.is_active(0b01));
        assert!(m.is_active(0b11));
        assert_eq!(m.element(0, 1), C64::from(1.0));
        assert!(is_identity_on(&m, &[2, 3, 4, 5]));
        assert_eq!(m.element(7, 6), C64::from(1.0));
    }

    #[test]
    fn single_control_not_is_cnot() {
        let entries = [TruthTableEntry::parse("1", 1).unwrap()];
        let oracle = SimulatorGateMatrix::Oracle(OracleMatrix::new(Matrix::not(), 1, &entries));
        assert_eq!(oracle.expanded_matrix(), Matrix::controlled_not());
        let controlled = SimulatorGateMatrix::Controlled(ControlledMatrix::new(Matrix::not(), 1));
        assert_eq!(controlled.expanded_matrix(), Matrix::controlled_not());
    }

    #[test]
    fn empty_oracle_is_identity() {
        let m = SimulatorGateMatrix::Oracle(OracleMatrix::new(Matrix::hadamard(), 1, &[]));
        assert!(m.expanded_matrix().is_approximately_equal(&Matrix::identity(4), 1e-12));
    }

    #[test]
    fn single_forwards_to_matrix() {
        let m = SimulatorGateMatrix::Single(GateMatrix::new(Matrix::hadamard()));
        assert_eq!(m.count(), 2);
        assert!(m.expanded_matrix().is_approximately_equal(&Matrix::hadamard(), 1e-12));
        assert_eq!(m.row_entries(1).len(), 2);
    }
}
