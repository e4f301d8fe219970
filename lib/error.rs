//! Error types for every fallible operation in the crate.
//!
//! Failures are grouped by domain: structural problems with a gate's
//! description ([`GateError`]), numeric invariants broken by a simulation
//! ([`StatevectorError`], [`UnitaryError`], [`DensityMatrixError`]), and
//! composition errors that name the element of a larger structure that
//! failed (the `*ThrowedError` variants).

use thiserror::Error;
use crate::{
    evaluator::UseCase,
    gate::Gate,
    noise::QuantumOperator,
};

/// Returned by [`Matrix`][crate::matrix::Matrix] constructors and square-only
/// operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix must have at least one row")]
    MatrixWithoutRows,

    #[error("matrix must have at least one column")]
    MatrixWithoutColumns,

    #[error("all rows of a matrix must have the same length")]
    MatrixRowsHaveDifferentSizes,

    #[error("operation requires a square matrix, got {rows}x{columns}")]
    MatrixIsNotSquare { rows: usize, columns: usize },
}

/// Returned by [`Vector`][crate::vector::Vector] constructors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("vector must have at least one element")]
    VectorCountHasToBeBiggerThanZero,
}

/// Returned when building simulators from a
/// [`SimulatorConfig`][crate::config::SimulatorConfig].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("maximum concurrency has to be bigger than zero")]
    MaxConcurrencyHasToBeBiggerThanZero,

    #[error("tolerance has to be a positive finite number, got {0}")]
    ToleranceHasToBePositive(f64),

    #[error("failed to build worker pool: {0}")]
    WorkerPoolBuildFailed(String),
}

/// Structural and numeric problems with a single gate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("circuit qubit count has to be bigger than zero")]
    CircuitQubitCountHasToBeBiggerThanZero,

    #[error("gate controls can not be an empty list")]
    GateControlsCanNotBeAnEmptyList,

    #[error("gate input count does not match the qubit count of its matrix")]
    GateInputCountDoesNotMatchGateMatrixQubitCount,

    #[error("gate inputs are not in bound of the circuit qubit count")]
    GateInputsAreNotInBound,

    #[error("gate inputs are not unique")]
    GateInputsAreNotUnique,

    #[error("gate matrix handles more qubits than the circuit actually has")]
    GateMatrixHandlesMoreQubitsThatCircuitActuallyHas,

    #[error("gate matrix is not square")]
    GateMatrixIsNotSquare,

    #[error("gate matrix is not unitary")]
    GateMatrixIsNotUnitary,

    #[error("gate matrix row count has to be a power of two")]
    GateMatrixRowCountHasToBeAPowerOfTwo,

    #[error("gate truth table entry {entry:?} can not be represented with {control_count} controls")]
    GateTruthTableCanNotBeRepresentedWithGivenControlCount {
        entry: String,
        control_count: usize,
    },

    #[error("gate input list can not be empty")]
    GateWithEmptyInputList,
}

/// Problems with a gate or noise operator applied to a density matrix.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum QuantumOperatorError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("noise matrices can not be an empty list")]
    NoiseMatricesCanNotBeAnEmptyList,

    #[error("noise matrices do not all have the same dimensions")]
    NoiseMatricesDoNotHaveSameDimensions,

    #[error("noise matrices do not satisfy the completeness relation")]
    NoiseMatricesDoNotSatisfyIdentity,

    #[error("noise probability {0} is not in [0, 1]")]
    NoiseProbabilityIsNotInRange(f64),
}

/// Errors from building or evolving a statevector.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StatevectorError {
    #[error("bit string can not be empty")]
    BitStringCanNotBeEmpty,

    #[error("bit string {0:?} has to contain only '0' and '1'")]
    BitStringHasToBeBinary(String),

    #[error("gate #{index} ({gate:?}) failed: {source}")]
    GateThrowedError {
        index: usize,
        gate: Gate,
        #[source]
        source: GateError,
    },

    #[error("resulting statevector: addition of square modulus is not equal to one")]
    ResultingStatevectorAdditionOfSquareModulusIsNotEqualToOne,

    #[error("statevector: addition of square modulus is not equal to one")]
    StatevectorAdditionOfSquareModulusIsNotEqualToOne,

    #[error("statevector count {0} has to be a power of two")]
    StatevectorCountHasToBeAPowerOfTwo(usize),
}

/// Errors from accumulating a circuit's unitary matrix.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UnitaryError {
    #[error("circuit qubit count has to be bigger than zero")]
    CircuitQubitCountHasToBeBiggerThanZero,

    #[error("gate #{index} ({gate:?}) failed: {source}")]
    GateThrowedError {
        index: usize,
        gate: Gate,
        #[source]
        source: GateError,
    },

    #[error("resulting matrix is not unitary")]
    ResultingMatrixIsNotUnitary,
}

/// Errors from building or evolving a density matrix.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DensityMatrixError {
    #[error("bit string can not be empty")]
    BitStringCanNotBeEmpty,

    #[error("bit string {0:?} has to contain only '0' and '1'")]
    BitStringHasToBeBinary(String),

    #[error("density matrix has to be square with a power-of-two size")]
    DensityMatrixCountHasToBeAPowerOfTwo,

    #[error("density matrix eigenvalues do not add up to one")]
    DensityMatrixEigenvaluesDoNotAddUpToOne,

    #[error("density matrix has negative eigenvalues")]
    DensityMatrixEigenvaluesHaveNegativeValues,

    #[error("density matrix is not hermitian")]
    DensityMatrixIsNotHermitian,

    #[error("operator #{index} ({operator:?}) failed: {source}")]
    OperatorThrowedError {
        index: usize,
        operator: QuantumOperator,
        #[source]
        source: QuantumOperatorError,
    },

    #[error("resulting density matrix eigenvalues do not add up to one")]
    ResultingDensityMatrixEigenvaluesDoNotAddUpToOne,

    #[error("resulting density matrix has negative eigenvalues")]
    ResultingDensityMatrixEigenvaluesHaveNegativeValues,

    #[error("resulting density matrix is not hermitian")]
    ResultingDensityMatrixIsNotHermitian,
}

/// Errors from summarizing probabilities over a subset of qubits.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SummarizedProbabilitiesError {
    #[error("qubits can not be an empty list")]
    QubitsCanNotBeAnEmptyList,

    #[error("qubits are not unique")]
    QubitsAreNotUnique,

    #[error("qubits are not in bound")]
    QubitsAreNotInBound,
}

/// Errors from decomposing a single-qubit gate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecomposeGateError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("gate acts on {0} qubits, expected one")]
    GateDoesNotActOnASingleQubit(usize),
}

/// Errors from decomposing a list of gates.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DecomposeGatesError {
    #[error("gate #{index} ({gate:?}) failed: {source}")]
    GateThrowedError {
        index: usize,
        gate: Gate,
        #[source]
        source: GateError,
    },
}

/// Errors from rendering a circuit.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DrawCircuitError {
    #[error("circuit qubit count has to be bigger than zero")]
    CircuitQubitCountHasToBeBiggerThanZero,

    #[error("gate #{0} has an empty input list")]
    GateWithEmptyInputList(usize),

    #[error("gate #{0} has repeated inputs")]
    GateWithRepeatedInputs(usize),

    #[error("gate #{0} has repeated controls")]
    GateWithRepeatedControls(usize),

    #[error("gate #{0} uses some of its inputs as controls")]
    GateInputsAreAlsoControls(usize),

    #[error("gate #{0} has qubits out of bound")]
    GateQubitsAreNotInBound(usize),
}

/// Errors from solving a homogeneous GF(2) system.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum XorGaussError {
    #[error("{0} free variables give more solutions than can be enumerated")]
    TooManyFreeVariables(usize),
}

/// Errors from evaluating a candidate circuit against a set of use cases.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvaluateCircuitError {
    #[error("use case list can not be empty")]
    UseCaseListCanNotBeEmpty,

    #[error("use case output {0:?} does not match the circuit qubit count")]
    UseCaseOutputDoesNotMatchQubitCount(String),

    #[error("use case {use_case:?} failed: {source}")]
    UseCaseMeasurementThrowedError {
        use_case: UseCase,
        #[source]
        source: StatevectorError,
    },

    #[error("use case {use_case:?} measures invalid qubits: {source}")]
    UseCaseQubitsThrowedError {
        use_case: UseCase,
        #[source]
        source: SummarizedProbabilitiesError,
    },
}
