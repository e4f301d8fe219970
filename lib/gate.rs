//! Gates acting on a register of qubits.
//!
//! A [`Gate`] is a small, owned description: a target or input list plus
//! whatever defines its matrix. Nothing is expanded to circuit scale until a
//! simulator asks for the gate's components via
//! [`Gate::extract_components`].

use std::f64::consts::PI;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use crate::{
    error::GateError,
    matrix::{ Axis, Matrix, DEFAULT_TOLERANCE },
    simulator_matrix::{
        ControlledMatrix,
        GateMatrix,
        OracleMatrix,
        SimulatorComponents,
        SimulatorGateMatrix,
    },
    truth_table::TruthTableEntry,
};

static NOT: Lazy<Matrix> = Lazy::new(Matrix::not);
static HADAMARD: Lazy<Matrix> = Lazy::new(Matrix::hadamard);
static SWAP: Lazy<Matrix> = Lazy::new(|| {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    Matrix::from_fn(4, 4, |r, c| {
        let swapped = ((r & 1) << 1) | (r >> 1);
        if swapped == c { z1 } else { z0 }
    })
});

/// Description of a single gate.
///
/// `Oracle` and `Controlled` own their inner gate, so gates form a tree. The
/// inputs of either are its controls followed by the inner gate's inputs, with
/// the first control on the most significant bit.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    /// Pauli X on one qubit.
    Not { target: usize },
    /// Hadamard on one qubit.
    Hadamard { target: usize },
    /// `diag(1, e^{iθ})` on one qubit.
    PhaseShift { radians: f64, target: usize },
    /// `exp(-iθσ/2)` about `axis` on one qubit.
    Rotation { axis: Axis, radians: f64, target: usize },
    /// Arbitrary unitary; `inputs[0]` is the most significant bit of the
    /// matrix's index.
    Matrix { matrix: Matrix, inputs: Vec<usize> },
    /// Apply `gate` only when the controls match one of the patterns in
    /// `truth_table`.
    Oracle { truth_table: Vec<String>, controls: Vec<usize>, gate: Box<Gate> },
    /// Apply `gate` only when every control is set.
    Controlled { gate: Box<Gate>, controls: Vec<usize> },
}

impl Gate {
    pub fn not(target: usize) -> Self { Self::Not { target } }

    pub fn hadamard(target: usize) -> Self { Self::Hadamard { target } }

    pub fn phase_shift(radians: f64, target: usize) -> Self {
        Self::PhaseShift { radians, target }
    }

    pub fn rotation(axis: Axis, radians: f64, target: usize) -> Self {
        Self::Rotation { axis, radians, target }
    }

    pub fn matrix(matrix: Matrix, inputs: Vec<usize>) -> Self {
        Self::Matrix { matrix, inputs }
    }

    pub fn oracle<I, S>(truth_table: I, controls: Vec<usize>, gate: Gate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Oracle {
            truth_table: truth_table.into_iter().map(Into::into).collect(),
            controls,
            gate: Box::new(gate),
        }
    }

    pub fn controlled(gate: Gate, controls: Vec<usize>) -> Self {
        Self::Controlled { gate: Box::new(gate), controls }
    }

    pub fn controlled_not(target: usize, control: usize) -> Self {
        Self::controlled(Self::not(target), vec![control])
    }

    /// Exchange the states of two qubits.
    pub fn swap(a: usize, b: usize) -> Self { Self::matrix(SWAP.clone(), vec![a, b]) }

    /// Return `true` for gates that the decomposition solvers leave untouched.
    pub fn is_elementary(&self) -> bool {
        matches!(
            self,
            Self::Not { .. } | Self::PhaseShift { .. } | Self::Rotation { .. }
        )
    }

    /// All qubits the gate touches, controls first.
    pub fn raw_inputs(&self) -> Vec<usize> {
        match self {
            Self::Not { target }
            | Self::Hadamard { target }
            | Self::PhaseShift { target, .. }
            | Self::Rotation { target, .. }
            => vec![*target],
            Self::Matrix { inputs, .. } => inputs.clone(),
            Self::Oracle { controls, gate, .. }
            | Self::Controlled { gate, controls }
            => {
                let mut inputs = controls.clone();
                inputs.append(&mut gate.raw_inputs());
                inputs
            },
        }
    }

    /// Build the gates of a quantum Fourier transform over `inputs`, where
    /// `inputs[0]` holds the most significant bit of the register.
    ///
    /// The inverse transform is the same sequence reversed with negated phase
    /// angles.
    pub fn quantum_fourier_transform(inputs: &[usize], inverse: bool) -> Vec<Self> {
        let n = inputs.len();
        let mut gates: Vec<Self> = Vec::new();
        for j in 0..n {
            gates.push(Self::hadamard(inputs[j]));
            for k in j + 1..n {
                let radians = 2.0 * PI / f64::from(1_u32 << (k - j + 1));
                let radians = if inverse { -radians } else { radians };
                gates.push(
                    Self::controlled(Self::phase_shift(radians, inputs[j]), vec![inputs[k]])
                );
            }
        }
        (0..n / 2).for_each(|j| { gates.push(Self::swap(inputs[j], inputs[n - 1 - j])); });
        if inverse { gates.reverse(); }
        gates
    }

    /// Validate the gate on its own and return its components, without
    /// reference to a register size.
    pub fn extract_raw_components(&self) -> Result<SimulatorComponents, GateError> {
        let raw = self.extract_raw()?;
        if raw.inputs.is_empty() {
            return Err(GateError::GateWithEmptyInputList);
        }
        if !are_unique(&raw.inputs) {
            return Err(GateError::GateInputsAreNotUnique);
        }
        let matrix = match raw.activation {
            Activation::Always
                => SimulatorGateMatrix::Single(GateMatrix::new(raw.matrix)),
            Activation::AllOnes(control_count)
                => SimulatorGateMatrix::Controlled(
                    ControlledMatrix::new(raw.matrix, control_count)
                ),
            Activation::Table { width, entries }
                => SimulatorGateMatrix::Oracle(
                    OracleMatrix::new(raw.matrix, width, &entries)
                ),
        };
        Ok(SimulatorComponents { matrix, inputs: raw.inputs })
    }

    /// Validate the gate against an `qubit_count`-qubit register and return
    /// its components.
    pub fn extract_components(&self, qubit_count: usize)
        -> Result<SimulatorComponents, GateError>
    {
        let components = self.extract_raw_components()?;
        check_register(&components.inputs, qubit_count)?;
        Ok(components)
    }

    fn extract_raw(&self) -> Result<RawComponents, GateError> {
        match self {
            Self::Not { target }
                => Ok(RawComponents::single(NOT.clone(), *target)),
            Self::Hadamard { target }
                => Ok(RawComponents::single(HADAMARD.clone(), *target)),
            Self::PhaseShift { radians, target }
                => Ok(RawComponents::single(Matrix::phase_shift(*radians), *target)),
            Self::Rotation { axis, radians, target }
                => Ok(RawComponents::single(Matrix::rotation(*axis, *radians), *target)),
            Self::Matrix { matrix, inputs } => {
                if inputs.is_empty() {
                    return Err(GateError::GateWithEmptyInputList);
                }
                check_gate_matrix(matrix, inputs.len())?;
                Ok(RawComponents {
                    matrix: matrix.clone(),
                    inputs: inputs.clone(),
                    activation: Activation::Always,
                })
            },
            Self::Controlled { gate, controls } => {
                if controls.is_empty() {
                    return Err(GateError::GateControlsCanNotBeAnEmptyList);
                }
                let inner = gate.extract_raw()?;
                inner.wrapped(controls, Activation::AllOnes(controls.len()))
            },
            Self::Oracle { truth_table, controls, gate } => {
                if controls.is_empty() {
                    return Err(GateError::GateControlsCanNotBeAnEmptyList);
                }
                let entries: Vec<TruthTableEntry>
                    = truth_table.iter()
                    .map(|text| TruthTableEntry::parse(text, controls.len()))
                    .collect::<Result<_, _>>()?;
                let inner = gate.extract_raw()?;
                let outer = Activation::Table { width: controls.len(), entries };
                inner.wrapped(controls, outer)
            },
        }
    }
}

/// Check that a gate matrix is a unitary acting on `input_count` qubits.
pub(crate) fn check_gate_matrix(matrix: &Matrix, input_count: usize)
    -> Result<(), GateError>
{
    if !matrix.is_square() {
        return Err(GateError::GateMatrixIsNotSquare);
    }
    if !matrix.row_count().is_power_of_two() {
        return Err(GateError::GateMatrixRowCountHasToBeAPowerOfTwo);
    }
    if matrix.row_count().trailing_zeros() as usize != input_count {
        return Err(GateError::GateInputCountDoesNotMatchGateMatrixQubitCount);
    }
    if !matrix.is_approximately_unitary(DEFAULT_TOLERANCE) {
        return Err(GateError::GateMatrixIsNotUnitary);
    }
    Ok(())
}

/// Check a complete input list against a register of `qubit_count` qubits.
pub(crate) fn check_register(inputs: &[usize], qubit_count: usize)
    -> Result<(), GateError>
{
    if qubit_count == 0 {
        return Err(GateError::CircuitQubitCountHasToBeBiggerThanZero);
    }
    if inputs.len() > qubit_count {
        return Err(GateError::GateMatrixHandlesMoreQubitsThatCircuitActuallyHas);
    }
    if inputs.iter().any(|q| *q >= qubit_count) {
        return Err(GateError::GateInputsAreNotInBound);
    }
    Ok(())
}

pub(crate) fn are_unique(qubits: &[usize]) -> bool {
    let mut seen: rustc_hash::FxHashSet<usize> = Default::default();
    qubits.iter().all(|q| seen.insert(*q))
}

// When a gate's core matrix is applied, given the values of its controls.
#[derive(Clone, Debug)]
enum Activation {
    Always,
    AllOnes(usize),
    Table { width: usize, entries: Vec<TruthTableEntry> },
}

impl Activation {
    fn width(&self) -> usize {
        match self {
            Self::Always => 0,
            Self::AllOnes(w) => *w,
            Self::Table { width, .. } => *width,
        }
    }

    fn entries(&self) -> Vec<TruthTableEntry> {
        match self {
            Self::Always => Vec::new(),
            Self::AllOnes(w) => vec![TruthTableEntry::all_ones(*w)],
            Self::Table { entries, .. } => entries.clone(),
        }
    }

    // `self` guards controls that sit above those of `inner`
    fn nest(self, inner: Self) -> Result<Self, GateError> {
        match (self, inner) {
            (outer, Self::Always) => Ok(outer),
            (Self::AllOnes(a), Self::AllOnes(b)) => Ok(Self::AllOnes(a + b)),
            (outer, inner) => {
                let width = outer.width() + inner.width();
                if width > TruthTableEntry::MAX_WIDTH {
                    return Err(
                        GateError::GateTruthTableCanNotBeRepresentedWithGivenControlCount {
                            entry: String::new(),
                            control_count: width,
                        }
                    );
                }
                let entries
                    = TruthTableEntry::cartesian_concat(&outer.entries(), &inner.entries());
                Ok(Self::Table { width, entries })
            },
        }
    }
}

#[derive(Clone, Debug)]
struct RawComponents {
    matrix: Matrix,
    inputs: Vec<usize>,
    activation: Activation,
}

impl RawComponents {
    fn single(matrix: Matrix, target: usize) -> Self {
        Self { matrix, inputs: vec![target], activation: Activation::Always }
    }

    fn wrapped(self, controls: &[usize], outer: Activation)
        -> Result<Self, GateError>
    {
        let mut inputs = controls.to_vec();
        inputs.extend(self.inputs);
        let activation = outer.nest(self.activation)?;
        Ok(Self { matrix: self.matrix, inputs, activation })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::simulator_matrix::SimulatorMatrix;

    #[test]
    fn raw_inputs_lists_controls_first() {
        let gate = Gate::oracle(["01"], vec![3, 2], Gate::controlled_not(0, 1));
        assert_eq!(gate.raw_inputs(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn empty_matrix_inputs() {
        let gate = Gate::matrix(Matrix::not(), vec![]);
        assert_eq!(
            gate.extract_components(2).unwrap_err(),
            GateError::GateWithEmptyInputList,
        );
    }

    #[test]
    fn repeated_inputs() {
        let gate = Gate::controlled_not(1, 1);
        assert_eq!(gate.extract_components(2).unwrap_err(), GateError::GateInputsAreNotUnique);
    }

    #[test]
    fn matrix_qubit_count_mismatch() {
        let gate = Gate::matrix(Matrix::controlled_not(), vec![0]);
        assert_eq!(
            gate.extract_components(2).unwrap_err(),
            GateError::GateInputCountDoesNotMatchGateMatrixQubitCount,
        );
        let odd = Gate::matrix(Matrix::identity(3), vec![0, 1]);
        assert_eq!(
            odd.extract_components(2).unwrap_err(),
            GateError::GateMatrixRowCountHasToBeAPowerOfTwo,
        );
    }

    #[test]
    fn non_unitary_matrix() {
        let gate = Gate::matrix(Matrix::average(2), vec![0]);
        assert_eq!(gate.extract_components(1).unwrap_err(), GateError::GateMatrixIsNotUnitary);
    }

    #[test]
    fn register_bounds() {
        let gate = Gate::controlled_not(0, 2);
        assert_eq!(
            gate.extract_components(0).unwrap_err(),
            GateError::CircuitQubitCountHasToBeBiggerThanZero,
        );
        assert_eq!(
            gate.extract_components(1).unwrap_err(),
            GateError::GateMatrixHandlesMoreQubitsThatCircuitActuallyHas,
        );
        assert_eq!(gate.extract_components(2).unwrap_err(), GateError::GateInputsAreNotInBound);
        assert!(gate.extract_components(3).is_ok());
    }

    #[test]
    fn empty_controls() {
        let gate = Gate::controlled(Gate::not(0), vec![]);
        assert_eq!(
            gate.extract_components(1).unwrap_err(),
            GateError::GateControlsCanNotBeAnEmptyList,
        );
        let oracle = Gate::oracle(["1"], vec![], Gate::not(0));
        assert_eq!(
            oracle.extract_components(1).unwrap_err(),
            GateError::GateControlsCanNotBeAnEmptyList,
        );
    }

    #[test]
    fn malformed_truth_table() {
        let gate = Gate::oracle(["2"], vec![1], Gate::not(0));
        assert!(matches!(
            gate.extract_components(2),
            Err(GateError::GateTruthTableCanNotBeRepresentedWithGivenControlCount { .. }),
        ));
    }

    #[test]
    fn controlled_not_expands_to_canonical_matrix() {
        let components = Gate::controlled_not(0, 1).extract_components(2).unwrap();
        assert_eq!(components.inputs, vec![1, 0]);
        assert!(
            components.matrix.expanded_matrix()
                .is_approximately_equal(&Matrix::controlled_not(), 1e-12)
        );
    }

    #[test]
    fn nested_oracles_compose_truth_tables() {
        // outer pattern "0" on qubit 3, inner patterns "1" on qubit 2
        let gate = Gate::oracle(["0"], vec![3], Gate::oracle(["1"], vec![2], Gate::not(0)));
        let components = gate.extract_components(4).unwrap();
        assert_eq!(components.inputs, vec![3, 2, 0]);
        let m = components.matrix.expanded_matrix();
        // local index: bit 2 = qubit 3, bit 1 = qubit 2, bit 0 = qubit 0
        assert_eq!(m[(0b010, 0b011)], C64::from(1.0));
        assert_eq!(m[(0b110, 0b110)], C64::from(1.0));
        assert_eq!(m[(0b110, 0b111)], C64::from(0.0));
    }

    #[test]
    fn controlled_inside_controlled_is_fully_controlled() {
        let gate = Gate::controlled(Gate::controlled_not(0, 1), vec![2]);
        let components = gate.extract_components(3).unwrap();
        assert!(matches!(components.matrix, SimulatorGateMatrix::Controlled(_)));
        assert_eq!(components.matrix.control_count(), 2);
    }

    #[test]
    fn quantum_fourier_transform_layout() {
        let qft = Gate::quantum_fourier_transform(&[2, 1, 0], false);
        // 3 hadamards, 3 controlled phases, 1 swap
        assert_eq!(qft.len(), 7);
        assert_eq!(qft[0], Gate::hadamard(2));
        assert_eq!(qft.last().unwrap(), &Gate::swap(2, 0));
        let inverse = Gate::quantum_fourier_transform(&[2, 1, 0], true);
        assert_eq!(inverse[0], Gate::swap(2, 0));
        assert_eq!(inverse.last().unwrap(), &Gate::hadamard(2));
    }
}
