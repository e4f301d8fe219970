//! Noise channels and the operators accepted by the density-matrix engine.
//!
//! Every channel is a set of Kraus matrices `{Kᵢ}` with `Σ Kᵢ†Kᵢ = I`, acting
//! as `ρ ↦ Σ Kᵢ ρ Kᵢ†`. A unitary gate is the one-element special case.

use num_complex::Complex64 as C64;
use crate::{
    error::{ GateError, QuantumOperatorError },
    gate::{ are_unique, check_register, Gate },
    matrix::{ Matrix, DEFAULT_TOLERANCE },
    simulator_matrix::{ GateMatrix, SimulatorComponents, SimulatorGateMatrix },
};

/// A non-unitary channel on one or more qubits.
#[derive(Clone, Debug, PartialEq)]
pub enum Noise {
    /// `X` with probability `probability`.
    BitFlip { probability: f64, target: usize },
    /// `Z` with probability `probability`.
    PhaseFlip { probability: f64, target: usize },
    /// Loss of coherence without loss of energy.
    PhaseDamping { probability: f64, target: usize },
    /// Relaxation of `|1⟩` towards `|0⟩` with rate `gamma`.
    AmplitudeDamping { gamma: f64, target: usize },
    /// One of `X`, `Y`, `Z`, each with probability `probability / 3`.
    Depolarizing { probability: f64, target: usize },
    /// Explicit Kraus matrices over `inputs`.
    Matrices { matrices: Vec<Matrix>, inputs: Vec<usize> },
}

impl Noise {
    pub fn bit_flip(probability: f64, target: usize) -> Self {
        Self::BitFlip { probability, target }
    }

    pub fn phase_flip(probability: f64, target: usize) -> Self {
        Self::PhaseFlip { probability, target }
    }

    pub fn phase_damping(probability: f64, target: usize) -> Self {
        Self::PhaseDamping { probability, target }
    }

    pub fn amplitude_damping(gamma: f64, target: usize) -> Self {
        Self::AmplitudeDamping { gamma, target }
    }

    pub fn depolarizing(probability: f64, target: usize) -> Self {
        Self::Depolarizing { probability, target }
    }

    pub fn matrices(matrices: Vec<Matrix>, inputs: Vec<usize>) -> Self {
        Self::Matrices { matrices, inputs }
    }

    pub fn raw_inputs(&self) -> Vec<usize> {
        match self {
            Self::BitFlip { target, .. }
            | Self::PhaseFlip { target, .. }
            | Self::PhaseDamping { target, .. }
            | Self::AmplitudeDamping { target, .. }
            | Self::Depolarizing { target, .. }
            => vec![*target],
            Self::Matrices { inputs, .. } => inputs.clone(),
        }
    }

    fn kraus_matrices(&self) -> Result<Vec<Matrix>, QuantumOperatorError> {
        let z0 = C64::from(0.0);
        let z1 = C64::from(1.0);
        let i = C64::i();
        let pauli_x = || Matrix::not();
        let pauli_y = || Matrix::from_fn(2, 2, |r, c| {
            match (r, c) { (0, 1) => -i, (1, 0) => i, _ => z0 }
        });
        let pauli_z = || Matrix::from_fn(2, 2, |r, c| {
            match (r, c) { (0, 0) => z1, (1, 1) => -z1, _ => z0 }
        });
        let scaled = |m: Matrix, p: f64| m.scaled(C64::from(p.sqrt()));
        let check = |p: f64| -> Result<f64, QuantumOperatorError> {
            if (0.0..=1.0).contains(&p) {
                Ok(p)
            } else {
                Err(QuantumOperatorError::NoiseProbabilityIsNotInRange(p))
            }
        };
        match self {
            Self::BitFlip { probability, .. } => {
                let p = check(*probability)?;
                Ok(vec![scaled(Matrix::identity(2), 1.0 - p), scaled(pauli_x(), p)])
            },
            Self::PhaseFlip { probability, .. } => {
                let p = check(*probability)?;
                Ok(vec![scaled(Matrix::identity(2), 1.0 - p), scaled(pauli_z(), p)])
            },
            Self::PhaseDamping { probability, .. } => {
                let p = check(*probability)?;
                let k0 = Matrix::from_fn(2, 2, |r, c| {
                    match (r, c) {
                        (0, 0) => z1,
                        (1, 1) => C64::from((1.0 - p).sqrt()),
                        _ => z0,
                    }
                });
                let k1 = Matrix::from_fn(2, 2, |r, c| {
                    if (r, c) == (1, 1) { C64::from(p.sqrt()) } else { z0 }
                });
                Ok(vec![k0, k1])
            },
            Self::AmplitudeDamping { gamma, .. } => {
                let g = check(*gamma)?;
                let k0 = Matrix::from_fn(2, 2, |r, c| {
                    match (r, c) {
                        (0, 0) => z1,
                        (1, 1) => C64::from((1.0 - g).sqrt()),
                        _ => z0,
                    }
                });
                let k1 = Matrix::from_fn(2, 2, |r, c| {
                    if (r, c) == (0, 1) { C64::from(g.sqrt()) } else { z0 }
                });
                Ok(vec![k0, k1])
            },
            Self::Depolarizing { probability, .. } => {
                let p = check(*probability)?;
                Ok(vec![
                    scaled(Matrix::identity(2), 1.0 - p),
                    scaled(pauli_x(), p / 3.0),
                    scaled(pauli_y(), p / 3.0),
                    scaled(pauli_z(), p / 3.0),
                ])
            },
            Self::Matrices { matrices, inputs } => {
                let first = matrices.first()
                    .ok_or(QuantumOperatorError::NoiseMatricesCanNotBeAnEmptyList)?;
                if inputs.is_empty() {
                    return Err(GateError::GateWithEmptyInputList.into());
                }
                let (rows, cols) = (first.row_count(), first.column_count());
                if matrices.iter()
                    .any(|m| m.row_count() != rows || m.column_count() != cols)
                {
                    return Err(QuantumOperatorError::NoiseMatricesDoNotHaveSameDimensions);
                }
                if rows != cols {
                    return Err(GateError::GateMatrixIsNotSquare.into());
                }
                if !rows.is_power_of_two() {
                    return Err(GateError::GateMatrixRowCountHasToBeAPowerOfTwo.into());
                }
                if rows.trailing_zeros() as usize != inputs.len() {
                    return Err(GateError::GateInputCountDoesNotMatchGateMatrixQubitCount.into());
                }
                Ok(matrices.clone())
            },
        }
    }
}

/// Anything that can be applied to a density matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum QuantumOperator {
    Gate(Gate),
    Noise(Noise),
}

impl From<Gate> for QuantumOperator {
    fn from(gate: Gate) -> Self { Self::Gate(gate) }
}

impl From<Noise> for QuantumOperator {
    fn from(noise: Noise) -> Self { Self::Noise(noise) }
}

/// Validated Kraus matrices sharing one input list.
#[derive(Clone, Debug, PartialEq)]
pub struct KrausComponents {
    pub matrices: Vec<SimulatorGateMatrix>,
    pub inputs: Vec<usize>,
}

impl KrausComponents {
    /// Split into one set of simulator components per Kraus matrix.
    pub fn into_components(self) -> Vec<SimulatorComponents> {
        let inputs = self.inputs;
        self.matrices.into_iter()
            .map(|matrix| SimulatorComponents { matrix, inputs: inputs.clone() })
            .collect()
    }
}

impl QuantumOperator {
    pub fn raw_inputs(&self) -> Vec<usize> {
        match self {
            Self::Gate(gate) => gate.raw_inputs(),
            Self::Noise(noise) => noise.raw_inputs(),
        }
    }

    /// Validate the operator against a register of `qubit_count` qubits and
    /// return its Kraus matrices.
    pub fn extract_kraus_matrices(&self, qubit_count: usize)
        -> Result<KrausComponents, QuantumOperatorError>
    {
        match self {
            Self::Gate(gate) => {
                let components = gate.extract_components(qubit_count)?;
                Ok(KrausComponents {
                    matrices: vec![components.matrix],
                    inputs: components.inputs,
                })
            },
            Self::Noise(noise) => {
                let matrices = noise.kraus_matrices()?;
                let inputs = noise.raw_inputs();
                if !are_unique(&inputs) {
                    return Err(GateError::GateInputsAreNotUnique.into());
                }
                check_register(&inputs, qubit_count)?;
                if !satisfies_completeness(&matrices, DEFAULT_TOLERANCE) {
                    return Err(QuantumOperatorError::NoiseMatricesDoNotSatisfyIdentity);
                }
                Ok(KrausComponents {
                    matrices: matrices.into_iter()
                        .map(|m| SimulatorGateMatrix::Single(GateMatrix::new(m)))
                        .collect(),
                    inputs,
                })
            },
        }
    }
}

/// Check `Σ Kᵢ†Kᵢ ≈ I`.
fn satisfies_completeness(matrices: &[Matrix], tolerance: f64) -> bool {
    let Some(first) = matrices.first() else { return false; };
    let n = first.row_count();
    let sum
        = matrices.iter()
        .fold(Matrix::identity(n).scaled(C64::from(0.0)), |acc, k| {
            &acc + &(&k.adjoint() * k)
        });
    sum.is_approximately_equal(&Matrix::identity(n), tolerance)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::simulator_matrix::SimulatorMatrix;

    #[test]
    fn builtin_channels_are_complete() {
        let channels = [
            Noise::bit_flip(0.3, 0),
            Noise::phase_flip(0.1, 0),
            Noise::phase_damping(0.7, 0),
            Noise::amplitude_damping(0.25, 0),
            Noise::depolarizing(0.5, 0),
        ];
        channels.into_iter().for_each(|noise| {
            let kraus = QuantumOperator::from(noise).extract_kraus_matrices(1).unwrap();
            let matrices: Vec<Matrix>
                = kraus.matrices.iter().map(|m| m.expanded_matrix()).collect();
            assert!(satisfies_completeness(&matrices, 1e-12));
        });
    }

    #[test]
    fn probability_out_of_range() {
        let op = QuantumOperator::from(Noise::bit_flip(1.5, 0));
        assert_eq!(
            op.extract_kraus_matrices(1).unwrap_err(),
            QuantumOperatorError::NoiseProbabilityIsNotInRange(1.5),
        );
    }

    #[test]
    fn incomplete_matrices_are_rejected() {
        let half = Matrix::identity(2).scaled(C64::from(0.5));
        let op = QuantumOperator::from(Noise::matrices(vec![half], vec![0]));
        assert_eq!(
            op.extract_kraus_matrices(1).unwrap_err(),
            QuantumOperatorError::NoiseMatricesDoNotSatisfyIdentity,
        );
        let empty = QuantumOperator::from(Noise::matrices(vec![], vec![0]));
        assert_eq!(
            empty.extract_kraus_matrices(1).unwrap_err(),
            QuantumOperatorError::NoiseMatricesCanNotBeAnEmptyList,
        );
        let mixed = QuantumOperator::from(
            Noise::matrices(vec![Matrix::identity(2), Matrix::identity(4)], vec![0])
        );
        assert_eq!(
            mixed.extract_kraus_matrices(1).unwrap_err(),
            QuantumOperatorError::NoiseMatricesDoNotHaveSameDimensions,
        );
    }

    #[test]
    fn gate_errors_pass_through() {
        let op = QuantumOperator::from(Gate::not(3));
        assert_eq!(
            op.extract_kraus_matrices(2).unwrap_err(),
            QuantumOperatorError::Gate(GateError::GateInputsAreNotInBound),
        );
        let noise = QuantumOperator::from(Noise::bit_flip(0.1, 2));
        assert_eq!(
            noise.extract_kraus_matrices(2).unwrap_err(),
            QuantumOperatorError::Gate(GateError::GateInputsAreNotInBound),
        );
    }

    #[test]
    fn gate_is_a_single_kraus_matrix() {
        let kraus
            = QuantumOperator::from(Gate::controlled_not(0, 1))
            .extract_kraus_matrices(2)
            .unwrap();
        assert_eq!(kraus.matrices.len(), 1);
        assert_eq!(kraus.inputs, vec![1, 0]);
        assert_eq!(kraus.into_components().len(), 1);
    }
}
