//! Lifting a gate matrix to the size of the whole register.
//!
//! A gate acting on `m` of `n` qubits defines a `2^n × 2^n` operator that is
//! the gate on its inputs and the identity everywhere else. [`CircuitMatrix`]
//! answers element and row queries on that operator without building it.

use num_complex::Complex64 as C64;
use crate::{
    matrix::Matrix,
    parallel::WorkerPool,
    simulator_matrix::{ SimulatorComponents, SimulatorGateMatrix, SimulatorMatrix },
};

/// Moves a single bit of an index from one position to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitwiseShift {
    origin: usize,
    destination: usize,
}

impl BitwiseShift {
    pub fn new(origin: usize, destination: usize) -> Self {
        Self { origin, destination }
    }

    pub fn origin(&self) -> usize { self.origin }

    pub fn destination(&self) -> usize { self.destination }

    /// Read bit `origin` of `value` and return it placed at bit `destination`,
    /// with every other bit cleared.
    pub fn apply(&self, value: usize) -> usize {
        ((value >> self.origin) & 1) << self.destination
    }

    pub fn inverse(&self) -> Self { Self::new(self.destination, self.origin) }
}

/// Apply every shift to `value` and combine the results.
pub fn gather(shifts: &[BitwiseShift], value: usize) -> usize {
    shifts.iter().fold(0, |acc, shift| acc | shift.apply(value))
}

/// A gate viewed as an operator on the full register.
#[derive(Clone, Debug)]
pub struct CircuitMatrix {
    qubit_count: usize,
    matrix: SimulatorGateMatrix,
    to_local: Vec<BitwiseShift>,
    to_circuit: Vec<BitwiseShift>,
    input_mask: usize,
}

impl CircuitMatrix {
    /// Wrap validated components for a register of `qubit_count` qubits.
    pub fn new(qubit_count: usize, components: SimulatorComponents) -> Self {
        let SimulatorComponents { matrix, inputs } = components;
        let m = inputs.len();
        let to_local: Vec<BitwiseShift>
            = inputs.iter().enumerate()
            .map(|(j, q)| BitwiseShift::new(*q, m - 1 - j))
            .collect();
        let to_circuit: Vec<BitwiseShift>
            = to_local.iter().map(BitwiseShift::inverse).collect();
        let input_mask = inputs.iter().fold(0_usize, |acc, q| acc | (1 << *q));
        Self { qubit_count, matrix, to_local, to_circuit, input_mask }
    }

    pub fn qubit_count(&self) -> usize { self.qubit_count }

    /// Index of the gate's own matrix that circuit index `index` maps to.
    pub fn local_index(&self, index: usize) -> usize { gather(&self.to_local, index) }

    /// Circuit index whose non-input bits are those of `base` and whose input
    /// bits are given by the gate-local index `local`.
    pub fn circuit_index(&self, base: usize, local: usize) -> usize {
        (base & !self.input_mask) | gather(&self.to_circuit, local)
    }

    /// Dense copy of row `row`.
    pub fn row(&self, row: usize) -> Vec<C64> {
        let mut values = vec![C64::from(0.0); self.count()];
        self.row_entries(row).into_iter()
            .for_each(|(c, z)| { values[c] = z; });
        values
    }

    /// Build the full `2^n × 2^n` matrix, row by row over `pool`.
    pub fn expanded(&self, pool: &WorkerPool) -> Matrix {
        let n = self.count();
        Matrix::from_rows_with(n, n, pool, |r| self.row(r))
    }
}

impl SimulatorMatrix for CircuitMatrix {
    fn count(&self) -> usize { 1 << self.qubit_count }

    fn element(&self, row: usize, column: usize) -> C64 {
        if (row & !self.input_mask) != (column & !self.input_mask) {
            return C64::from(0.0);
        }
        self.matrix.element(self.local_index(row), self.local_index(column))
    }

    fn row_entries(&self, row: usize) -> Vec<(usize, C64)> {
        self.matrix.row_entries(self.local_index(row)).into_iter()
            .map(|(c, z)| (self.circuit_index(row, c), z))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gate::Gate;

    #[test]
    fn bitwise_shift_moves_one_bit() {
        assert_eq!(BitwiseShift::new(4, 2).apply(16), 4);
        assert_eq!(BitwiseShift::new(2, 4).apply(4), 16);
        assert_eq!(BitwiseShift::new(2, 4).apply(16), 0);
        assert_eq!(BitwiseShift::new(0, 0).apply(0b1011), 1);
        let shifts = [BitwiseShift::new(0, 1), BitwiseShift::new(1, 0)];
        assert_eq!(gather(&shifts, 0b01), 0b10);
    }

    #[test]
    fn not_on_middle_qubit() {
        let components = Gate::not(1).extract_components(3).unwrap();
        let m = CircuitMatrix::new(3, components);
        assert_eq!(m.count(), 8);
        (0..8).for_each(|r| {
            assert_eq!(m.row_entries(r), vec![(r ^ 0b010, C64::from(1.0))]);
        });
        assert_eq!(m.element(0b101, 0b111), C64::from(1.0));
        assert_eq!(m.element(0b101, 0b110), C64::from(0.0));
    }

    #[test]
    fn reversed_controlled_not() {
        // control on qubit 0, target qubit 1
        let components = Gate::controlled_not(1, 0).extract_components(2).unwrap();
        let m = CircuitMatrix::new(2, components).expanded(&WorkerPool::sequential());
        let expected = Matrix::from_real(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
        ]).unwrap();
        assert!(m.is_approximately_equal(&expected, 1e-12));
    }

    #[test]
    fn expansion_is_a_tensor_product() {
        let components = Gate::hadamard(1).extract_components(2).unwrap();
        let m = CircuitMatrix::new(2, components).expanded(&WorkerPool::new(2).unwrap());
        let expected = Matrix::hadamard().tensor_product(&Matrix::identity(2));
        assert!(m.is_approximately_equal(&expected, 1e-12));
    }

    #[test]
    fn element_and_row_agree() {
        let gate = Gate::oracle(["10"], vec![3, 0], Gate::hadamard(2));
        let m = CircuitMatrix::new(4, gate.extract_components(4).unwrap());
        (0..16).for_each(|r| {
            let row = m.row(r);
            (0..16).for_each(|c| { assert_eq!(row[c], m.element(r, c)); });
        });
    }
}
