//! Scoring candidate circuits against input/output examples.
//!
//! A fitness function for circuit search: run the candidate on every use
//! case's input and read off the probability of the expected output.

use std::sync::Mutex;
use rayon::prelude::*;
use tracing::{ debug, warn };
use crate::{
    error::{ EvaluateCircuitError, StatevectorError },
    gate::Gate,
    matrix::DEFAULT_TOLERANCE,
    statevector::{ parse_bits, CircuitStatevector, StatevectorSimulator },
};

/// One input/output example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseCase {
    /// Initial basis state, most significant qubit first.
    pub input_bits: String,
    /// Expected measurement, written over `qubits` in the order listed, or
    /// over the whole register when `qubits` is empty.
    pub expected_output: String,
    pub qubits: Vec<usize>,
}

impl UseCase {
    /// A use case measuring the whole register.
    pub fn new<S, T>(input_bits: S, expected_output: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            input_bits: input_bits.into(),
            expected_output: expected_output.into(),
            qubits: Vec::new(),
        }
    }

    /// Measure only `qubits`.
    pub fn with_qubits(mut self, qubits: Vec<usize>) -> Self {
        self.qubits = qubits;
        self
    }
}

/// Aggregate score of a circuit over a set of use cases.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Number of use cases whose expected output had probability below the
    /// threshold.
    pub misses: usize,
    /// Largest probability of *not* observing the expected output.
    pub max_probability: f64,
}

impl Default for Evaluation {
    fn default() -> Self { Self { misses: 0, max_probability: 0.0 } }
}

/// Runs use cases concurrently and folds their scores into one
/// [`Evaluation`].
#[derive(Clone, Debug)]
pub struct CircuitEvaluator {
    simulator: StatevectorSimulator,
    threshold: f64,
}

impl Default for CircuitEvaluator {
    fn default() -> Self {
        Self::new(StatevectorSimulator::default(), 1.0 - DEFAULT_TOLERANCE)
    }
}

impl CircuitEvaluator {
    /// A use case counts as a hit when its expected output has probability at
    /// least `threshold`.
    pub fn new(simulator: StatevectorSimulator, threshold: f64) -> Self {
        Self { simulator, threshold }
    }

    /// Probability of `use_case.expected_output` after running `gates`.
    pub fn probability(&self, gates: &[Gate], use_case: &UseCase)
        -> Result<f64, EvaluateCircuitError>
    {
        let measurement_error = |source: StatevectorError| {
            EvaluateCircuitError::UseCaseMeasurementThrowedError {
                use_case: use_case.clone(),
                source,
            }
        };
        let initial
            = CircuitStatevector::from_bits(&use_case.input_bits)
            .map_err(measurement_error)?;
        let measured_count
            = if use_case.qubits.is_empty() {
                initial.qubit_count()
            } else {
                use_case.qubits.len()
            };
        if use_case.expected_output.len() != measured_count {
            return Err(EvaluateCircuitError::UseCaseOutputDoesNotMatchQubitCount(
                use_case.expected_output.clone()
            ));
        }
        let expected = parse_bits(&use_case.expected_output).map_err(measurement_error)?;
        let result = self.simulator.apply(gates, &initial).map_err(measurement_error)?;
        if use_case.qubits.is_empty() {
            return Ok(result.probabilities()[expected]);
        }
        let summary
            = result.summarized_probabilities(&use_case.qubits)
            .map_err(|source| EvaluateCircuitError::UseCaseQubitsThrowedError {
                use_case: use_case.clone(),
                source,
            })?;
        Ok(summary.get(&use_case.expected_output).copied().unwrap_or(0.0))
    }

    /// Score `gates` against every use case.
    ///
    /// The first failing use case aborts the evaluation.
    pub fn evaluate(&self, gates: &[Gate], use_cases: &[UseCase])
        -> Result<Evaluation, EvaluateCircuitError>
    {
        if use_cases.is_empty() {
            return Err(EvaluateCircuitError::UseCaseListCanNotBeEmpty);
        }
        let accumulator: Mutex<Evaluation> = Mutex::new(Evaluation::default());
        use_cases.par_iter()
            .try_for_each(|use_case| {
                let p
                    = self.probability(gates, use_case)
                    .map_err(|err| {
                        warn!(?use_case, %err, "use case failed");
                        err
                    })?;
                debug!(?use_case, probability = p, "use case evaluated");
                let mut acc = accumulator.lock().unwrap_or_else(|e| e.into_inner());
                if p < self.threshold { acc.misses += 1; }
                acc.max_probability = acc.max_probability.max(1.0 - p);
                Ok(())
            })?;
        Ok(accumulator.into_inner().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use super::*;
    use crate::error::SummarizedProbabilitiesError;

    fn not_circuit() -> Vec<Gate> { vec![Gate::not(0)] }

    #[test]
    fn perfect_circuit() {
        let use_cases = vec![UseCase::new("00", "01"), UseCase::new("11", "10")];
        let eval = CircuitEvaluator::default().evaluate(&not_circuit(), &use_cases).unwrap();
        assert_eq!(eval.misses, 0);
        assert_abs_diff_eq!(eval.max_probability, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn misses_are_counted() {
        let use_cases = vec![
            UseCase::new("00", "01"),
            UseCase::new("00", "00"),
            UseCase::new("10", "10"),
        ];
        let eval = CircuitEvaluator::default().evaluate(&not_circuit(), &use_cases).unwrap();
        assert_eq!(eval.misses, 2);
        assert_abs_diff_eq!(eval.max_probability, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn partial_measurement() {
        let gates = vec![Gate::hadamard(1), Gate::not(0)];
        let use_case = UseCase::new("00", "1").with_qubits(vec![0]);
        let evaluator = CircuitEvaluator::new(StatevectorSimulator::default(), 0.5);
        assert_abs_diff_eq!(evaluator.probability(&gates, &use_case).unwrap(), 1.0, epsilon = 1e-12);
        let half = UseCase::new("00", "1").with_qubits(vec![1]);
        assert_abs_diff_eq!(evaluator.probability(&gates, &half).unwrap(), 0.5, epsilon = 1e-12);
        let eval = evaluator.evaluate(&gates, &[use_case, half]).unwrap();
        assert_eq!(eval.misses, 0);
    }

    #[test]
    fn invalid_use_cases() {
        let evaluator = CircuitEvaluator::default();
        assert_eq!(
            evaluator.evaluate(&not_circuit(), &[]).unwrap_err(),
            EvaluateCircuitError::UseCaseListCanNotBeEmpty,
        );
        assert_eq!(
            evaluator.evaluate(&not_circuit(), &[UseCase::new("00", "1")]).unwrap_err(),
            EvaluateCircuitError::UseCaseOutputDoesNotMatchQubitCount("1".to_string()),
        );
        let bad_input = UseCase::new("0a", "00");
        assert_eq!(
            evaluator.evaluate(&not_circuit(), &[bad_input.clone()]).unwrap_err(),
            EvaluateCircuitError::UseCaseMeasurementThrowedError {
                use_case: bad_input,
                source: StatevectorError::BitStringHasToBeBinary("0a".to_string()),
            },
        );
        let bad_qubits = UseCase::new("00", "1").with_qubits(vec![5]);
        assert_eq!(
            evaluator.evaluate(&not_circuit(), &[bad_qubits.clone()]).unwrap_err(),
            EvaluateCircuitError::UseCaseQubitsThrowedError {
                use_case: bad_qubits,
                source: SummarizedProbabilitiesError::QubitsAreNotInBound,
            },
        );
    }
}
