//! High-level entry points: build engines once from a [`SimulatorConfig`],
//! then run gate lists through them.

use tracing::debug;
use crate::{
    config::SimulatorConfig,
    decomposition::decompose_gates,
    density_matrix::{ CircuitDensityMatrix, DensityMatrixSimulator },
    drawer::draw_circuit,
    error::{
        ConfigError,
        DecomposeGatesError,
        DensityMatrixError,
        DrawCircuitError,
        StatevectorError,
        UnitaryError,
    },
    evaluator::CircuitEvaluator,
    gate::Gate,
    matrix::Matrix,
    noise::QuantumOperator,
    parallel::WorkerPool,
    statevector::{ CircuitStatevector, StatevectorSimulator },
    unitary::UnitarySimulator,
};

/// Builds [`Circuit`]s and [`NoiseCircuit`]s that share one set of engines.
#[derive(Clone, Debug)]
pub struct CircuitFactory {
    config: SimulatorConfig,
    statevector: StatevectorSimulator,
    unitary: UnitarySimulator,
    density_matrix: DensityMatrixSimulator,
}

impl CircuitFactory {
    /// Validate `config` and build its engines.
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let statevector
            = StatevectorSimulator::new(
                config.statevector.make_transformation()?,
                config.tolerance,
            );
        let unitary
            = UnitarySimulator::new(
                WorkerPool::new(config.unitary.max_concurrency)?,
                config.tolerance,
            );
        let density_matrix
            = DensityMatrixSimulator::new(
                WorkerPool::new(config.density_matrix.max_concurrency)?,
                config.tolerance,
            );
        debug!(?config, "circuit factory ready");
        Ok(Self { config, statevector, unitary, density_matrix })
    }

    pub fn config(&self) -> &SimulatorConfig { &self.config }

    pub fn make_circuit(&self, gates: Vec<Gate>) -> Circuit {
        Circuit {
            gates,
            statevector: self.statevector.clone(),
            unitary: self.unitary.clone(),
        }
    }

    pub fn make_noise_circuit(&self, operators: Vec<QuantumOperator>) -> NoiseCircuit {
        NoiseCircuit { operators, density_matrix: self.density_matrix.clone() }
    }

    /// An evaluator running on this factory's statevector engine.
    pub fn make_evaluator(&self, threshold: f64) -> CircuitEvaluator {
        CircuitEvaluator::new(self.statevector.clone(), threshold)
    }
}

/// A gate list bound to statevector and unitary engines.
#[derive(Clone, Debug)]
pub struct Circuit {
    pub gates: Vec<Gate>,
    statevector: StatevectorSimulator,
    unitary: UnitarySimulator,
}

impl Circuit {
    /// Run the circuit on `initial`.
    pub fn statevector(&self, initial: &CircuitStatevector)
        -> Result<CircuitStatevector, StatevectorError>
    {
        self.statevector.apply(&self.gates, initial)
    }

    /// Run the circuit on the basis state named by `bits`.
    pub fn statevector_from_bits(&self, bits: &str)
        -> Result<CircuitStatevector, StatevectorError>
    {
        self.statevector(&CircuitStatevector::from_bits(bits)?)
    }

    /// The circuit's unitary on a register of `qubit_count` qubits.
    pub fn unitary(&self, qubit_count: usize) -> Result<Matrix, UnitaryError> {
        self.unitary.unitary(&self.gates, qubit_count)
    }

    pub fn draw(&self, qubit_count: usize) -> Result<String, DrawCircuitError> {
        draw_circuit(&self.gates, qubit_count)
    }

    /// The same circuit with every gate rewritten as elementary gates.
    pub fn decomposed(&self) -> Result<Self, DecomposeGatesError> {
        Ok(Self {
            gates: decompose_gates(&self.gates)?,
            statevector: self.statevector.clone(),
            unitary: self.unitary.clone(),
        })
    }
}

/// A list of gates and noise channels bound to a density-matrix engine.
#[derive(Clone, Debug)]
pub struct NoiseCircuit {
    pub operators: Vec<QuantumOperator>,
    density_matrix: DensityMatrixSimulator,
}

impl NoiseCircuit {
    pub fn density_matrix(&self, initial: &CircuitDensityMatrix)
        -> Result<CircuitDensityMatrix, DensityMatrixError>
    {
        self.density_matrix.apply(&self.operators, initial)
    }

    pub fn density_matrix_from_bits(&self, bits: &str)
        -> Result<CircuitDensityMatrix, DensityMatrixError>
    {
        self.density_matrix(&CircuitDensityMatrix::from_bits(bits)?)
    }
}
