//! Mixed-state simulation with Kraus operators.

use num_complex::Complex64 as C64;
use rustc_hash::FxHashMap;
use tracing::{ debug, trace };
use crate::{
    circuit_matrix::CircuitMatrix,
    error::{
        DensityMatrixError,
        QuantumOperatorError,
        StatevectorError,
        SummarizedProbabilitiesError,
    },
    matrix::{ Matrix, DEFAULT_TOLERANCE },
    noise::QuantumOperator,
    parallel::WorkerPool,
    statevector::{ summarize, CircuitStatevector },
};

/// A validated density matrix: Hermitian, positive semi-definite and of unit
/// trace, on a power-of-two number of basis states.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitDensityMatrix {
    matrix: Matrix,
}

// Which of the constructor or post-run error flavors to report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage { Initial, Resulting }

fn validate(matrix: &Matrix, tolerance: f64, stage: Stage) -> Result<(), DensityMatrixError> {
    use DensityMatrixError::*;
    let n = matrix.row_count();
    if !matrix.is_square() || n < 2 || !n.is_power_of_two() {
        return Err(DensityMatrixCountHasToBeAPowerOfTwo);
    }
    if !matrix.is_approximately_hermitian(tolerance) {
        return Err(match stage {
            Stage::Initial => DensityMatrixIsNotHermitian,
            Stage::Resulting => ResultingDensityMatrixIsNotHermitian,
        });
    }
    // square was checked above
    let eigenvalues = matrix.eigenvalues().map_err(|_| DensityMatrixCountHasToBeAPowerOfTwo)?;
    if eigenvalues.iter().any(|ev| *ev < -tolerance) {
        return Err(match stage {
            Stage::Initial => DensityMatrixEigenvaluesHaveNegativeValues,
            Stage::Resulting => ResultingDensityMatrixEigenvaluesHaveNegativeValues,
        });
    }
    if (eigenvalues.iter().sum::<f64>() - 1.0).abs() > tolerance {
        return Err(match stage {
            Stage::Initial => DensityMatrixEigenvaluesDoNotAddUpToOne,
            Stage::Resulting => ResultingDensityMatrixEigenvaluesDoNotAddUpToOne,
        });
    }
    Ok(())
}

impl CircuitDensityMatrix {
    pub fn new(matrix: Matrix, tolerance: f64) -> Result<Self, DensityMatrixError> {
        validate(&matrix, tolerance, Stage::Initial)?;
        Ok(Self { matrix })
    }

    /// The pure basis state named by a bit string.
    pub fn from_bits(bits: &str) -> Result<Self, DensityMatrixError> {
        let state
            = CircuitStatevector::from_bits(bits)
            .map_err(|err| match err {
                StatevectorError::BitStringCanNotBeEmpty
                    => DensityMatrixError::BitStringCanNotBeEmpty,
                StatevectorError::BitStringHasToBeBinary(s)
                    => DensityMatrixError::BitStringHasToBeBinary(s),
                _ => unreachable!(),
            })?;
        Ok(Self::from_statevector(&state))
    }

    /// `|ψ⟩⟨ψ|`.
    pub fn from_statevector(state: &CircuitStatevector) -> Self {
        let v = state.vector();
        let n = v.count();
        Self { matrix: Matrix::from_fn(n, n, |r, c| v[r] * v[c].conj()) }
    }

    pub fn qubit_count(&self) -> usize { self.matrix.row_count().trailing_zeros() as usize }

    pub fn matrix(&self) -> &Matrix { &self.matrix }

    pub fn into_matrix(self) -> Matrix { self.matrix }

    /// Diagonal of the matrix.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.matrix.row_count()).map(|k| self.matrix[(k, k)].re).collect()
    }

    pub fn summarized_probabilities(&self, qubits: &[usize])
        -> Result<FxHashMap<String, f64>, SummarizedProbabilitiesError>
    {
        summarize(&self.probabilities(), self.qubit_count(), qubits)
    }

    /// `Tr(ρ²)`; one for pure states.
    pub fn purity(&self) -> f64 {
        (&self.matrix * &self.matrix).trace().map(|z| z.re).unwrap_or(0.0)
    }
}

/// A density matrix plus the means to advance it by one operator.
#[derive(Clone, Debug)]
pub struct DensityMatrixEvolution {
    matrix: Matrix,
    pool: WorkerPool,
}

impl DensityMatrixEvolution {
    pub fn new(state: &CircuitDensityMatrix, pool: WorkerPool) -> Self {
        Self { matrix: state.matrix.clone(), pool }
    }

    pub fn matrix(&self) -> &Matrix { &self.matrix }

    /// Return `Σ Kᵢ ρ Kᵢ†` for the Kraus matrices of `operator`, leaving `self`
    /// unchanged.
    pub fn applying(&self, operator: &QuantumOperator) -> Result<Self, QuantumOperatorError> {
        let qubit_count = self.matrix.row_count().trailing_zeros() as usize;
        let kraus = operator.extract_kraus_matrices(qubit_count)?;
        trace!(
            ?operator,
            inputs = ?kraus.inputs,
            kraus = kraus.matrices.len(),
            "applying operator"
        );
        let n = self.matrix.row_count();
        let zero = Matrix::from_fn(n, n, |_, _| C64::from(0.0));
        let matrix
            = kraus.into_components().into_iter()
            .fold(zero, |acc, components| {
                let k = CircuitMatrix::new(qubit_count, components).expanded(&self.pool);
                let term = &(&k * &self.matrix) * &k.adjoint();
                &acc + &term
            });
        Ok(Self { matrix, pool: self.pool.clone() })
    }
}

/// Runs a list of gates and noise channels over an initial density matrix.
#[derive(Clone, Debug)]
pub struct DensityMatrixSimulator {
    pool: WorkerPool,
    tolerance: f64,
}

impl Default for DensityMatrixSimulator {
    fn default() -> Self { Self::new(WorkerPool::sequential(), DEFAULT_TOLERANCE) }
}

impl DensityMatrixSimulator {
    pub fn new(pool: WorkerPool, tolerance: f64) -> Self { Self { pool, tolerance } }

    pub fn apply(&self, operators: &[QuantumOperator], initial: &CircuitDensityMatrix)
        -> Result<CircuitDensityMatrix, DensityMatrixError>
    {
        debug!(
            operators = operators.len(),
            qubits = initial.qubit_count(),
            "density matrix run"
        );
        let evolution
            = operators.iter().enumerate()
            .try_fold(
                DensityMatrixEvolution::new(initial, self.pool.clone()),
                |evolution, (index, operator)| {
                    evolution.applying(operator)
                        .map_err(|source| DensityMatrixError::OperatorThrowedError {
                            index,
                            operator: operator.clone(),
                            source,
                        })
                },
            )?;
        let matrix = evolution.matrix;
        validate(&matrix, self.tolerance, Stage::Resulting)?;
        Ok(CircuitDensityMatrix { matrix })
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use super::*;
    use crate::{
        error::GateError,
        gate::Gate,
        noise::Noise,
        statevector::StatevectorSimulator,
    };

    fn run(operators: &[QuantumOperator], bits: &str) -> CircuitDensityMatrix {
        DensityMatrixSimulator::new(WorkerPool::new(2).unwrap(), 1e-6)
            .apply(operators, &CircuitDensityMatrix::from_bits(bits).unwrap())
            .unwrap()
    }

    #[test]
    fn invalid_matrices() {
        let three = Matrix::identity(3);
        assert_eq!(
            CircuitDensityMatrix::new(three, 1e-3).unwrap_err(),
            DensityMatrixError::DensityMatrixCountHasToBeAPowerOfTwo,
        );
        let skew = Matrix::from_real(vec![vec![1.0, 0.5], vec![0.0, 0.0]]).unwrap();
        assert_eq!(
            CircuitDensityMatrix::new(skew, 1e-3).unwrap_err(),
            DensityMatrixError::DensityMatrixIsNotHermitian,
        );
        let negative = Matrix::from_real(vec![vec![1.5, 0.0], vec![0.0, -0.5]]).unwrap();
        assert_eq!(
            CircuitDensityMatrix::new(negative, 1e-3).unwrap_err(),
            DensityMatrixError::DensityMatrixEigenvaluesHaveNegativeValues,
        );
        let heavy = Matrix::identity(2);
        assert_eq!(
            CircuitDensityMatrix::new(heavy, 1e-3).unwrap_err(),
            DensityMatrixError::DensityMatrixEigenvaluesDoNotAddUpToOne,
        );
        assert!(CircuitDensityMatrix::new(Matrix::average(2), 1e-3).is_ok());
        assert_eq!(
            CircuitDensityMatrix::from_bits("").unwrap_err(),
            DensityMatrixError::BitStringCanNotBeEmpty,
        );
    }

    #[test]
    fn empty_operator_list_keeps_state() {
        let state = run(&[], "01");
        assert_eq!(state, CircuitDensityMatrix::from_bits("01").unwrap());
        assert_abs_diff_eq!(state.purity(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn gates_match_statevector() {
        let gates = vec![
            Gate::hadamard(0),
            Gate::controlled_not(1, 0),
            Gate::phase_shift(0.4, 1),
            Gate::oracle(["1"], vec![1], Gate::hadamard(2)),
        ];
        let psi
            = StatevectorSimulator::default()
            .apply(&gates, &CircuitStatevector::from_bits("000").unwrap())
            .unwrap();
        let operators: Vec<QuantumOperator>
            = gates.into_iter().map(QuantumOperator::from).collect();
        let rho = run(&operators, "000");
        let expected = CircuitDensityMatrix::from_statevector(&psi);
        assert!(rho.matrix().is_approximately_equal(expected.matrix(), 1e-10));
    }

    #[test]
    fn full_bit_flip() {
        let rho = run(&[Noise::bit_flip(1.0, 0).into()], "0");
        assert_abs_diff_eq!(rho.probabilities()[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bit_flip_mixes_populations() {
        let rho = run(&[Noise::bit_flip(0.25, 1).into()], "00");
        let p = rho.probabilities();
        assert_abs_diff_eq!(p[0], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(p[2], 0.25, epsilon = 1e-12);
        assert!(rho.purity() < 1.0);
    }

    #[test]
    fn phase_damping_kills_coherence() {
        let operators = [Gate::hadamard(0).into(), Noise::phase_damping(1.0, 0).into()];
        let rho = run(&operators, "0");
        assert_abs_diff_eq!(rho.matrix()[(0, 1)].norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rho.matrix()[(0, 0)].re, 0.5, epsilon = 1e-12);
        let coherent = run(&[Gate::hadamard(0).into()], "0");
        assert_abs_diff_eq!(coherent.matrix()[(0, 1)].re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn amplitude_damping_relaxes_to_ground() {
        let rho = run(&[Noise::amplitude_damping(1.0, 0).into()], "1");
        assert_abs_diff_eq!(rho.probabilities()[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn failing_operator_is_reported_with_position() {
        let operators: Vec<QuantumOperator>
            = vec![Gate::hadamard(0).into(), Noise::depolarizing(0.1, 4).into()];
        let err
            = DensityMatrixSimulator::default()
            .apply(&operators, &CircuitDensityMatrix::from_bits("00").unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            DensityMatrixError::OperatorThrowedError {
                index: 1,
                operator: Noise::depolarizing(0.1, 4).into(),
                source: QuantumOperatorError::Gate(GateError::GateInputsAreNotInBound),
            },
        );
    }
}
