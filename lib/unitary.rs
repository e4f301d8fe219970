//! Accumulating the unitary matrix of a whole circuit.

use tracing::{ debug, trace };
use num_complex::Complex64 as C64;
use crate::{
    circuit_matrix::CircuitMatrix,
    error::{ GateError, UnitaryError },
    gate::Gate,
    matrix::{ Matrix, DEFAULT_TOLERANCE },
    parallel::WorkerPool,
    simulator_matrix::SimulatorMatrix,
};

/// A `2^n × 2^n` product of gates plus the means to extend it by one more.
#[derive(Clone, Debug)]
pub struct UnitaryEvolution {
    qubit_count: usize,
    matrix: Matrix,
    pool: WorkerPool,
}

impl UnitaryEvolution {
    /// Start from the identity on `qubit_count` qubits.
    pub fn new(qubit_count: usize, pool: WorkerPool) -> Result<Self, UnitaryError> {
        if qubit_count == 0 {
            return Err(UnitaryError::CircuitQubitCountHasToBeBiggerThanZero);
        }
        Ok(Self { qubit_count, matrix: Matrix::identity(1 << qubit_count), pool })
    }

    pub fn matrix(&self) -> &Matrix { &self.matrix }

    pub fn into_matrix(self) -> Matrix { self.matrix }

    /// Return `G · U` for the circuit-scale matrix `G` of `gate`, leaving
    /// `self` unchanged.
    pub fn applying(&self, gate: &Gate) -> Result<Self, GateError> {
        let components = gate.extract_components(self.qubit_count)?;
        trace!(?gate, inputs = ?components.inputs, "accumulating gate");
        let lifted = CircuitMatrix::new(self.qubit_count, components);
        let n = lifted.count();
        let current = &self.matrix;
        let matrix = Matrix::from_rows_with(n, n, &self.pool, |r| {
            let entries = lifted.row_entries(r);
            (0..n)
                .map(|c| {
                    entries.iter()
                        .map(|(k, z)| z * current[(*k, c)])
                        .sum::<C64>()
                })
                .collect()
        });
        Ok(Self { qubit_count: self.qubit_count, matrix, pool: self.pool.clone() })
    }
}

/// Computes the unitary of a gate list.
#[derive(Clone, Debug)]
pub struct UnitarySimulator {
    pool: WorkerPool,
    tolerance: f64,
}

impl Default for UnitarySimulator {
    fn default() -> Self { Self::new(WorkerPool::sequential(), DEFAULT_TOLERANCE) }
}

impl UnitarySimulator {
    pub fn new(pool: WorkerPool, tolerance: f64) -> Self { Self { pool, tolerance } }

    /// Multiply out `gates` on a register of `qubit_count` qubits.
    ///
    /// An empty gate list gives the identity.
    pub fn unitary(&self, gates: &[Gate], qubit_count: usize)
        -> Result<Matrix, UnitaryError>
    {
        debug!(gates = gates.len(), qubits = qubit_count, "unitary run");
        let evolution
            = gates.iter().enumerate()
            .try_fold(
                UnitaryEvolution::new(qubit_count, self.pool.clone())?,
                |evolution, (index, gate)| {
                    evolution.applying(gate)
                        .map_err(|source| UnitaryError::GateThrowedError {
                            index,
                            gate: gate.clone(),
                            source,
                        })
                },
            )?;
        let matrix = evolution.into_matrix();
        if !matrix.is_approximately_unitary(self.tolerance) {
            return Err(UnitaryError::ResultingMatrixIsNotUnitary);
        }
        Ok(matrix)
    }
}
