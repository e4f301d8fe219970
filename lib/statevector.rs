//! Pure-state simulation.
//!
//! A register of `n` qubits is a normalized vector of `2^n` amplitudes; basis
//! index `i` carries qubit `q` in bit `q` of `i`, and bit strings are written
//! most significant qubit first. Gates are applied one at a time by a
//! [`StatevectorTransformation`]. The four implementations below compute the
//! same result by different means and are freely interchangeable.

use std::{ fmt, sync::Arc };
use nalgebra as na;
use num_complex::Complex64 as C64;
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{ debug, trace };
use crate::{
    circuit_matrix::CircuitMatrix,
    error::{ GateError, StatevectorError, SummarizedProbabilitiesError },
    gate::{ are_unique, Gate },
    matrix::DEFAULT_TOLERANCE,
    parallel::WorkerPool,
    simulator_matrix::{ SimulatorComponents, SimulatorGateMatrix, SimulatorMatrix },
    vector::Vector,
};

/* State **********************************************************************/

/// A validated, normalized register state.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitStatevector {
    vector: Vector,
}

impl CircuitStatevector {
    /// Wrap `vector`, checking that its length is a power of two and that it
    /// is normalized to within `tolerance`.
    pub fn new(vector: Vector, tolerance: f64) -> Result<Self, StatevectorError> {
        if vector.count() < 2 || !vector.count().is_power_of_two() {
            return Err(StatevectorError::StatevectorCountHasToBeAPowerOfTwo(vector.count()));
        }
        if !vector.is_approximately_normalized(tolerance) {
            return Err(StatevectorError::StatevectorAdditionOfSquareModulusIsNotEqualToOne);
        }
        Ok(Self { vector })
    }

    /// The basis state named by a bit string such as `"01"` (qubit 0 set).
    pub fn from_bits(bits: &str) -> Result<Self, StatevectorError> {
        let index = parse_bits(bits)?;
        Ok(Self { vector: Vector::basis(1 << bits.len(), index) })
    }

    /// `|0…0⟩` on `qubit_count` qubits.
    ///
    /// *Panics if `qubit_count` is zero.*
    pub fn zeros(qubit_count: usize) -> Self {
        assert!(qubit_count > 0, "CircuitStatevector::zeros: empty register");
        Self { vector: Vector::basis(1 << qubit_count, 0) }
    }

    pub fn qubit_count(&self) -> usize { self.vector.count().trailing_zeros() as usize }

    pub fn vector(&self) -> &Vector { &self.vector }

    pub fn into_vector(self) -> Vector { self.vector }

    /// `|aᵢ|²` for every basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.vector.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Marginal probabilities over `qubits`, keyed by their values written in
    /// the order given.
    pub fn summarized_probabilities(&self, qubits: &[usize])
        -> Result<FxHashMap<String, f64>, SummarizedProbabilitiesError>
    {
        summarize(&self.probabilities(), self.qubit_count(), qubits)
    }

    /// Sample a basis index according to the Born rule.
    pub fn measure<R>(&self, rng: &mut R) -> usize
    where R: Rng + ?Sized
    {
        sample(&self.probabilities(), rng)
    }

    /// Sample `shots` basis states, counting outcomes by bit string.
    pub fn measure_shots<R>(&self, shots: usize, rng: &mut R) -> FxHashMap<String, usize>
    where R: Rng + ?Sized
    {
        let probs = self.probabilities();
        let n = self.qubit_count();
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        (0..shots).for_each(|_| {
            *counts.entry(index_to_bits(sample(&probs, rng), n)).or_insert(0) += 1;
        });
        counts
    }
}

impl fmt::Display for CircuitStatevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.qubit_count();
        for (k, a) in self.vector.iter().enumerate() {
            if a.norm_sqr() > 0.0 {
                writeln!(f, "|{}⟩ : {:+.5}{:+.5}i", index_to_bits(k, n), a.re, a.im)?;
            }
        }
        Ok(())
    }
}

/// Parse a most-significant-first bit string into a basis index.
pub(crate) fn parse_bits(bits: &str) -> Result<usize, StatevectorError> {
    if bits.is_empty() {
        return Err(StatevectorError::BitStringCanNotBeEmpty);
    }
    if !bits.chars().all(|c| c == '0' || c == '1') || bits.len() >= usize::BITS as usize {
        return Err(StatevectorError::BitStringHasToBeBinary(bits.to_string()));
    }
    Ok(bits.chars().fold(0, |acc, c| (acc << 1) | usize::from(c == '1')))
}

/// Render the low `width` bits of `index`, most significant first.
pub fn index_to_bits(index: usize, width: usize) -> String {
    format!("{:0width$b}", index, width = width)
}

pub(crate) fn summarize(probs: &[f64], qubit_count: usize, qubits: &[usize])
    -> Result<FxHashMap<String, f64>, SummarizedProbabilitiesError>
{
    if qubits.is_empty() {
        return Err(SummarizedProbabilitiesError::QubitsCanNotBeAnEmptyList);
    }
    if !are_unique(qubits) {
        return Err(SummarizedProbabilitiesError::QubitsAreNotUnique);
    }
    if qubits.iter().any(|q| *q >= qubit_count) {
        return Err(SummarizedProbabilitiesError::QubitsAreNotInBound);
    }
    let mut summary: FxHashMap<String, f64> = FxHashMap::default();
    probs.iter().enumerate()
        .filter(|(_, p)| **p > 0.0)
        .for_each(|(k, p)| {
            let key: String
                = qubits.iter()
                .map(|q| if (k >> q) & 1 == 1 { '1' } else { '0' })
                .collect();
            *summary.entry(key).or_insert(0.0) += p;
        });
    Ok(summary)
}

fn sample<R>(probs: &[f64], rng: &mut R) -> usize
where R: Rng + ?Sized
{
    let total: f64 = probs.iter().sum();
    let r: f64 = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for (k, p) in probs.iter().enumerate() {
        acc += p;
        if r < acc { return k; }
    }
    probs.iter().rposition(|p| *p > 0.0).unwrap_or(0)
}

/* Transformations ************************************************************/

/// Applies one validated gate to a full statevector.
pub trait StatevectorTransformation: fmt::Debug + Send + Sync {
    /// Return the image of `vector` under the gate described by `components`.
    ///
    /// `components` must already have been validated against the qubit count
    /// of `vector`.
    fn apply(&self, components: SimulatorComponents, vector: &Vector) -> Vector;
}

fn qubit_count_of(vector: &Vector) -> usize { vector.count().trailing_zeros() as usize }

/// Updates amplitudes directly from the gate's own matrix.
///
/// One-qubit gates without controls are applied as independent updates on
/// pairs of amplitudes. Anything else visits, for every output amplitude, the
/// handful of input amplitudes its row touches.
#[derive(Clone, Debug, Default)]
pub struct DirectStatevectorTransformation {
    pool: WorkerPool,
}

impl DirectStatevectorTransformation {
    pub fn new(pool: WorkerPool) -> Self { Self { pool } }

    fn apply_single_qubit(&self, target: usize, matrix: &SimulatorGateMatrix, vector: &Vector)
        -> Vector
    {
        let m = matrix.core_matrix();
        let (m00, m01, m10, m11) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
        let stride = 1_usize << target;
        let mut data: Vec<C64> = vector.as_slice().to_vec();
        self.pool.for_each_chunk_mut(&mut data, stride << 1, |_, chunk| {
            let (lo, hi) = chunk.split_at_mut(stride);
            lo.iter_mut().zip(hi.iter_mut())
                .for_each(|(a, b)| {
                    let (a0, b0) = (*a, *b);
                    *a = m00 * a0 + m01 * b0;
                    *b = m10 * a0 + m11 * b0;
                });
        });
        Vector::from(na::DVector::from_vec(data))
    }

    fn apply_multi_qubit(&self, components: SimulatorComponents, vector: &Vector) -> Vector {
        let matrix = CircuitMatrix::new(qubit_count_of(vector), components);
        Vector::from_fn_with(vector.count(), &self.pool, |i| {
            matrix.row_entries(i).into_iter()
                .map(|(c, z)| z * vector[c])
                .sum()
        })
    }
}

impl StatevectorTransformation for DirectStatevectorTransformation {
    fn apply(&self, components: SimulatorComponents, vector: &Vector) -> Vector {
        match (&components.matrix, components.inputs.as_slice()) {
            (SimulatorGateMatrix::Single(_), [target])
                => self.apply_single_qubit(*target, &components.matrix, vector),
            _ => self.apply_multi_qubit(components, vector),
        }
    }
}

/// Builds the full circuit-scale matrix and multiplies.
#[derive(Clone, Debug, Default)]
pub struct MatrixStatevectorTransformation {
    pool: WorkerPool,
}

impl MatrixStatevectorTransformation {
    pub fn new(pool: WorkerPool) -> Self { Self { pool } }
}

impl StatevectorTransformation for MatrixStatevectorTransformation {
    fn apply(&self, components: SimulatorComponents, vector: &Vector) -> Vector {
        let matrix = CircuitMatrix::new(qubit_count_of(vector), components);
        &matrix.expanded(&self.pool) * vector
    }
}

/// Builds one dense circuit-scale row at a time and takes its dot product with
/// the state.
#[derive(Clone, Debug, Default)]
pub struct RowByRowStatevectorTransformation {
    pool: WorkerPool,
}

impl RowByRowStatevectorTransformation {
    pub fn new(pool: WorkerPool) -> Self { Self { pool } }
}

impl StatevectorTransformation for RowByRowStatevectorTransformation {
    fn apply(&self, components: SimulatorComponents, vector: &Vector) -> Vector {
        let matrix = CircuitMatrix::new(qubit_count_of(vector), components);
        Vector::from_fn_with(vector.count(), &self.pool, |r| {
            matrix.row(r).into_iter()
                .zip(vector.iter())
                .map(|(z, a)| z * a)
                .sum()
        })
    }
}

/// Computes every output amplitude from individual circuit-scale matrix
/// elements.
#[derive(Clone, Debug, Default)]
pub struct ElementByElementStatevectorTransformation {
    pool: WorkerPool,
}

impl ElementByElementStatevectorTransformation {
    pub fn new(pool: WorkerPool) -> Self { Self { pool } }
}

impl StatevectorTransformation for ElementByElementStatevectorTransformation {
    fn apply(&self, components: SimulatorComponents, vector: &Vector) -> Vector {
        let matrix = CircuitMatrix::new(qubit_count_of(vector), components);
        Vector::from_fn_with(vector.count(), &self.pool, |r| {
            vector.iter().enumerate()
                .map(|(c, a)| matrix.element(r, c) * a)
                .sum()
        })
    }
}

/* Evolution ******************************************************************/

/// A state plus the means to advance it by one gate.
#[derive(Clone, Debug)]
pub struct TimeEvolution {
    state: Vector,
    transformation: Arc<dyn StatevectorTransformation>,
}

impl TimeEvolution {
    pub fn new(state: Vector, transformation: Arc<dyn StatevectorTransformation>) -> Self {
        Self { state, transformation }
    }

    pub fn state(&self) -> &Vector { &self.state }

    pub fn into_state(self) -> Vector { self.state }

    /// Return the evolution after `gate`, leaving `self` unchanged.
    pub fn applying(&self, gate: &Gate) -> Result<Self, GateError> {
        let components = gate.extract_components(qubit_count_of(&self.state))?;
        trace!(?gate, inputs = ?components.inputs, "applying gate");
        let state = self.transformation.apply(components, &self.state);
        Ok(Self { state, transformation: Arc::clone(&self.transformation) })
    }
}

/// Runs a gate list over an initial state.
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    transformation: Arc<dyn StatevectorTransformation>,
    tolerance: f64,
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new(Arc::new(DirectStatevectorTransformation::default()), DEFAULT_TOLERANCE)
    }
}

impl StatevectorSimulator {
    pub fn new(transformation: Arc<dyn StatevectorTransformation>, tolerance: f64) -> Self {
        Self { transformation, tolerance }
    }

    pub fn tolerance(&self) -> f64 { self.tolerance }

    /// Apply `gates` in order to `initial`.
    ///
    /// Stops at the first invalid gate, reporting its position.
    pub fn apply(&self, gates: &[Gate], initial: &CircuitStatevector)
        -> Result<CircuitStatevector, StatevectorError>
    {
        debug!(
            gates = gates.len(),
            qubits = initial.qubit_count(),
            transformation = ?self.transformation,
            "statevector run"
        );
        let evolution
            = gates.iter().enumerate()
            .try_fold(
                TimeEvolution::new(initial.vector.clone(), Arc::clone(&self.transformation)),
                |evolution, (index, gate)| {
                    evolution.applying(gate)
                        .map_err(|source| StatevectorError::GateThrowedError {
                            index,
                            gate: gate.clone(),
                            source,
                        })
                },
            )?;
        let vector = evolution.into_state();
        if !vector.is_approximately_normalized(self.tolerance) {
            return Err(StatevectorError::ResultingStatevectorAdditionOfSquareModulusIsNotEqualToOne);
        }
        Ok(CircuitStatevector { vector })
    }
}
