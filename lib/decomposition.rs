//! Rewriting arbitrary gates as elementary ones.
//!
//! The target gate set is `not`, `phaseShift` and `rotation`, each possibly
//! wrapped in controls or an oracle. One-qubit unitaries are split into a
//! phase shift and up to three Z/Y/Z rotations. Larger unitaries are first
//! reduced to two-level unitaries with Givens eliminations; each two-level
//! unitary is then a Gray-code ladder of fully-controlled NOTs around one
//! fully-controlled one-qubit gate.

use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    error::{ DecomposeGateError, DecomposeGatesError },
    gate::Gate,
    matrix::{ Axis, Matrix },
};

/// Bound below which angles and matrix entries are treated as zero.
pub const DECOMPOSITION_TOLERANCE: f64 = 1e-9;

/* One qubit ******************************************************************/

/// Euler-angle decomposition of one-qubit gates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CosineSineDecompositionSolver {
    tolerance: f64,
}

impl Default for CosineSineDecompositionSolver {
    fn default() -> Self { Self::new(DECOMPOSITION_TOLERANCE) }
}

impl CosineSineDecompositionSolver {
    pub fn new(tolerance: f64) -> Self { Self { tolerance } }

    /// Decompose a gate acting on exactly one qubit.
    ///
    /// The returned gates are in application order.
    pub fn decompose_gate(&self, gate: &Gate) -> Result<Vec<Gate>, DecomposeGateError> {
        let components = gate.extract_raw_components()?;
        if components.inputs.len() != 1 {
            return Err(DecomposeGateError::GateDoesNotActOnASingleQubit(components.inputs.len()));
        }
        Ok(self.decompose_matrix(components.matrix.core_matrix(), components.inputs[0]))
    }

    /// Decompose a `2 × 2` unitary acting on `target`.
    ///
    /// Returns nothing for the identity and a single `not` for the NOT matrix;
    /// otherwise at most a phase shift followed by `Rz`, `Ry`, `Rz`.
    pub fn decompose_matrix(&self, matrix: &Matrix, target: usize) -> Vec<Gate> {
        let mut gates: Vec<Gate> = Vec::new();
        if let Some(trivial) = self.trivial(matrix, target) {
            gates.extend(trivial);
            return gates;
        }
        let det = matrix[(0, 0)] * matrix[(1, 1)] - matrix[(0, 1)] * matrix[(1, 0)];
        let phi = det.arg();
        let special
            = if phi.abs() > self.tolerance {
                gates.push(Gate::phase_shift(phi, target));
                matrix * &Matrix::phase_shift(-phi)
            } else {
                matrix.clone()
            };
        if let Some(trivial) = self.trivial(&special, target) {
            gates.extend(trivial);
            return gates;
        }
        let a = special[(0, 0)];
        let b = special[(0, 1)];
        let lambda = if a.norm() > self.tolerance { -a.arg() } else { 0.0 };
        let mu = if b.norm() > self.tolerance { -b.arg() } else { 0.0 };
        let theta = -b.norm().atan2(a.norm());
        [(lambda - mu, Axis::Z), (2.0 * theta, Axis::Y), (lambda + mu, Axis::Z)]
            .into_iter()
            .filter(|(angle, _)| angle.abs() > self.tolerance)
            .for_each(|(angle, axis)| { gates.push(Gate::rotation(axis, angle, target)); });
        gates
    }

    fn trivial(&self, matrix: &Matrix, target: usize) -> Option<Vec<Gate>> {
        if matrix.is_approximately_equal(&Matrix::identity(2), self.tolerance) {
            Some(Vec::new())
        } else if matrix.is_approximately_equal(&Matrix::not(), self.tolerance) {
            Some(vec![Gate::not(target)])
        } else {
            None
        }
    }
}

/* Many qubits ****************************************************************/

/// Decomposition of arbitrary uncontrolled gates into fully-controlled
/// elementary gates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TwoLevelDecompositionSolver {
    single: CosineSineDecompositionSolver,
}

// A unitary acting only on local basis states `low < high`.
#[derive(Clone, Debug)]
struct TwoLevel {
    low: usize,
    high: usize,
    matrix: Matrix,
}

impl TwoLevelDecompositionSolver {
    pub fn new(single: CosineSineDecompositionSolver) -> Self { Self { single } }

    /// Decompose an uncontrolled gate on any number of qubits.
    ///
    /// Controlled and oracle gates are rejected here; see [`decompose_gates`]
    /// for those.
    pub fn decompose_gate(&self, gate: &Gate) -> Result<Vec<Gate>, DecomposeGateError> {
        let components = gate.extract_raw_components()?;
        let matrix = components.matrix.core_matrix();
        let inputs = components.inputs;
        if components.matrix.control_count() > 0 {
            return Err(DecomposeGateError::GateDoesNotActOnASingleQubit(inputs.len()));
        }
        if inputs.len() == 1 {
            return Ok(self.single.decompose_matrix(matrix, inputs[0]));
        }
        Ok(self.decompose_matrix(matrix, &inputs))
    }

    /// Decompose a `2^m × 2^m` unitary acting on `inputs`, `inputs[0]` being
    /// the most significant bit of the matrix index.
    pub fn decompose_matrix(&self, matrix: &Matrix, inputs: &[usize]) -> Vec<Gate> {
        let tol = self.single.tolerance;
        let d = matrix.row_count();
        let m = inputs.len();
        let mut work: Vec<Vec<C64>> = (0..d).map(|r| matrix.row(r)).collect();
        let mut eliminations: Vec<TwoLevel> = Vec::new();
        for c in 0..d - 1 {
            for r in c + 1..d {
                if work[r][c].norm() <= tol { continue; }
                eliminations.push(eliminate(&mut work, c, r));
            }
            // column c is now a unit vector up to the phase of work[c][c]
            if (work[c][c] - C64::from(1.0)).norm() > tol {
                eliminations.push(eliminate(&mut work, c, c + 1));
            }
        }

        let mut gates: Vec<Gate> = Vec::new();
        let phase = work[d - 1][d - 1].arg();
        if phase.abs() > tol {
            let target = inputs[m - 1];
            gates.push(Gate::controlled(Gate::phase_shift(phase, target), inputs[..m - 1].to_vec()));
        }
        eliminations.iter().rev()
            .for_each(|two_level| { gates.append(&mut self.two_level_gates(two_level, inputs)); });
        debug!(
            qubits = m,
            two_level = eliminations.len(),
            gates = gates.len(),
            "two-level decomposition"
        );
        gates
    }

    fn two_level_gates(&self, two_level: &TwoLevel, inputs: &[usize]) -> Vec<Gate> {
        let m = inputs.len();
        let TwoLevel { low, high, matrix } = two_level;
        let differing: Vec<usize>
            = (0..m).filter(|bit| ((low ^ high) >> bit) & 1 == 1).collect();
        let Some((last, ladder)) = differing.split_last() else { return Vec::new(); };

        // walk low → (neighbour of high) one bit at a time
        let mut flips: Vec<Gate> = Vec::new();
        let mut current = *low;
        ladder.iter().for_each(|bit| {
            flips.push(fully_controlled(Gate::not(inputs[m - 1 - bit]), current, *bit, inputs));
            current ^= 1_usize << *bit;
        });

        // `current` now plays the role of `low` next to `high`
        let oriented
            = if (current >> last) & 1 == 0 {
                matrix.clone()
            } else {
                Matrix::from_fn(2, 2, |i, j| matrix[(1 - i, 1 - j)])
            };
        let core: Vec<Gate>
            = self.single.decompose_matrix(&oriented, inputs[m - 1 - last])
            .into_iter()
            .map(|gate| fully_controlled(gate, current, *last, inputs))
            .collect();

        let mut gates = flips.clone();
        gates.extend(core);
        gates.extend(flips.into_iter().rev());
        gates
    }
}

// Zero work[r][c] against work[c][c] with a Givens rotation on rows c and r,
// returning the adjoint of the rotation so that U = G₁† ⋯ Gₖ† D.
fn eliminate(work: &mut [Vec<C64>], c: usize, r: usize) -> TwoLevel {
    let a = work[c][c];
    let b = work[r][c];
    let n = (a.norm_sqr() + b.norm_sqr()).sqrt();
    let g = [[a.conj() / n, b.conj() / n], [-b / n, a / n]];
    for k in 0..work[c].len() {
        let (x, y) = (work[c][k], work[r][k]);
        work[c][k] = g[0][0] * x + g[0][1] * y;
        work[r][k] = g[1][0] * x + g[1][1] * y;
    }
    let adjoint = Matrix::from_fn(2, 2, |i, j| g[j][i].conj());
    TwoLevel { low: c, high: r, matrix: adjoint }
}

// Wrap `gate` so that it acts only when every input other than local bit
// `target_bit` matches `pattern`.
fn fully_controlled(gate: Gate, pattern: usize, target_bit: usize, inputs: &[usize]) -> Gate {
    let m = inputs.len();
    let target = inputs[m - 1 - target_bit];
    let (controls, bits): (Vec<usize>, String)
        = inputs.iter().enumerate()
        .filter(|(_, q)| **q != target)
        .map(|(i, q)| {
            let bit = if (pattern >> (m - 1 - i)) & 1 == 1 { '1' } else { '0' };
            (*q, bit)
        })
        .unzip();
    Gate::oracle([bits], controls, gate)
}

/* Gate lists *****************************************************************/

// Control layers peeled off a gate, outermost first.
#[derive(Clone, Debug)]
enum Wrapper<'a> {
    Controlled(&'a [usize]),
    Oracle(&'a [String], &'a [usize]),
}

fn peel(gate: &Gate) -> (Vec<Wrapper<'_>>, &Gate) {
    let mut wrappers: Vec<Wrapper> = Vec::new();
    let mut core = gate;
    loop {
        match core {
            Gate::Controlled { gate, controls } => {
                wrappers.push(Wrapper::Controlled(controls));
                core = gate.as_ref();
            },
            Gate::Oracle { truth_table, controls, gate } => {
                wrappers.push(Wrapper::Oracle(truth_table, controls));
                core = gate.as_ref();
            },
            _ => return (wrappers, core),
        }
    }
}

fn rewrap(gate: Gate, wrappers: &[Wrapper<'_>]) -> Gate {
    wrappers.iter().rev()
        .fold(gate, |inner, wrapper| match wrapper {
            Wrapper::Controlled(controls) => Gate::controlled(inner, controls.to_vec()),
            Wrapper::Oracle(truth_table, controls)
                => Gate::oracle(truth_table.iter().cloned(), controls.to_vec(), inner),
        })
}

/// Rewrite every gate in `gates` as elementary gates, keeping each gate's
/// original controls and truth table around every produced gate.
///
/// `not`, `phaseShift` and `rotation` pass through unchanged.
pub fn decompose_gates(gates: &[Gate]) -> Result<Vec<Gate>, DecomposeGatesError> {
    let solver = TwoLevelDecompositionSolver::default();
    let mut decomposed: Vec<Gate> = Vec::new();
    for (index, gate) in gates.iter().enumerate() {
        if gate.is_elementary() {
            decomposed.push(gate.clone());
            continue;
        }
        gate.extract_raw_components()
            .map_err(|source| DecomposeGatesError::GateThrowedError {
                index,
                gate: gate.clone(),
                source,
            })?;
        let (wrappers, core) = peel(gate);
        let pieces
            = if core.is_elementary() {
                vec![core.clone()]
            } else {
                solver.decompose_gate(core)
                    .map_err(|err| match err {
                        DecomposeGateError::Gate(source)
                            => DecomposeGatesError::GateThrowedError {
                                index,
                                gate: gate.clone(),
                                source,
                            },
                        // cores never carry controls
                        DecomposeGateError::GateDoesNotActOnASingleQubit(_)
                            => unreachable!(),
                    })?
            };
        decomposed.extend(pieces.into_iter().map(|piece| rewrap(piece, &wrappers)));
    }
    Ok(decomposed)
}
