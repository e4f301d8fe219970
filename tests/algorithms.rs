use std::f64::consts::PI;
use approx::assert_abs_diff_eq;
use num_complex::Complex64 as C64;
use num_rational::Ratio;
use circuit_sim::{
    config::StatevectorConfiguration,
    evaluator::{ CircuitEvaluator, UseCase },
    number_theory::{ modular_pow, ContinuedFractionsSolver, EuclideanSolver },
    statevector::StatevectorSimulator,
    CircuitFactory,
    Gate,
    SimulatorConfig,
};

// qubit 1 holds x, qubit 0 is the |−⟩ ancilla
fn deutsch(truth_table: &[&str]) -> Vec<Gate> {
    vec![
        Gate::hadamard(1),
        Gate::hadamard(0),
        Gate::oracle(truth_table.iter().copied(), vec![1], Gate::not(0)),
        Gate::hadamard(1),
    ]
}

#[test]
fn deutsch_decides_balanced_and_constant() {
    let factory = CircuitFactory::new(SimulatorConfig::default()).unwrap();
    let cases: [(&[&str], &str); 4] = [
        (&["0"], "1"),
        (&["1"], "1"),
        (&[], "0"),
        (&["0", "1"], "0"),
    ];
    cases.into_iter()
        .for_each(|(table, expected)| {
            let state = factory.make_circuit(deutsch(table)).statevector_from_bits("01").unwrap();
            let summary = state.summarized_probabilities(&[1]).unwrap();
            assert_abs_diff_eq!(summary[expected], 1.0, epsilon = 1e-12);
        });
}

#[test]
fn deutsch_as_use_cases() {
    let evaluator = CircuitEvaluator::new(StatevectorSimulator::default(), 0.99);
    let use_case = UseCase::new("01", "1").with_qubits(vec![1]);
    let eval = evaluator.evaluate(&deutsch(&["0"]), &[use_case.clone()]).unwrap();
    assert_eq!(eval.misses, 0);
    let eval = evaluator.evaluate(&deutsch(&[]), &[use_case]).unwrap();
    assert_eq!(eval.misses, 1);
    assert_abs_diff_eq!(eval.max_probability, 1.0, epsilon = 1e-12);
}

// search register on qubits n..1, phase-kickback ancilla on qubit 0
fn grover(marked: &str, iterations: usize) -> Vec<Gate> {
    let n = marked.len();
    let register: Vec<usize> = (1..=n).rev().collect();
    let mut gates: Vec<Gate> = register.iter().map(|q| Gate::hadamard(*q)).collect();
    gates.push(Gate::hadamard(0));
    (0..iterations).for_each(|_| {
        gates.push(Gate::oracle([marked], register.clone(), Gate::not(0)));
        register.iter().for_each(|q| { gates.push(Gate::hadamard(*q)); });
        register.iter().for_each(|q| { gates.push(Gate::not(*q)); });
        gates.push(
            Gate::controlled(Gate::phase_shift(PI, register[n - 1]), register[..n - 1].to_vec())
        );
        register.iter().for_each(|q| { gates.push(Gate::not(*q)); });
        register.iter().for_each(|q| { gates.push(Gate::hadamard(*q)); });
    });
    gates
}

#[test]
fn grover_finds_marked_state() {
    [
        StatevectorConfiguration::Direct { max_concurrency: 1 },
        StatevectorConfiguration::RowByRow { max_concurrency: 2 },
    ]
    .into_iter()
    .for_each(|sv| {
        let config = SimulatorConfig::default().with_statevector(sv);
        let factory = CircuitFactory::new(config).unwrap();

        let state = factory.make_circuit(grover("10", 1)).statevector_from_bits("001").unwrap();
        let summary = state.summarized_probabilities(&[2, 1]).unwrap();
        assert_abs_diff_eq!(summary["10"], 1.0, epsilon = 1e-9);

        let state = factory.make_circuit(grover("011", 2)).statevector_from_bits("0001").unwrap();
        let summary = state.summarized_probabilities(&[3, 2, 1]).unwrap();
        assert!(summary["011"] > 0.9);
    });
}

#[test]
fn fourier_transform_is_the_dft() {
    let factory = CircuitFactory::new(SimulatorConfig::parallel(2)).unwrap();
    let n: usize = 3;
    let count = 1_usize << n;
    let inputs: Vec<usize> = (0..n).rev().collect();
    let u = factory.make_circuit(Gate::quantum_fourier_transform(&inputs, false))
        .unitary(n)
        .unwrap();
    let norm = (count as f64).sqrt().recip();
    (0..count).for_each(|r| {
        (0..count).for_each(|c| {
            let expected
                = C64::from_polar(norm, 2.0 * PI * ((r * c) % count) as f64 / count as f64);
            assert_abs_diff_eq!((u[(r, c)] - expected).norm(), 0.0, epsilon = 1e-9);
        });
    });

    let mut round_trip = Gate::quantum_fourier_transform(&inputs, false);
    round_trip.append(&mut Gate::quantum_fourier_transform(&inputs, true));
    let identity = factory.make_circuit(round_trip).unitary(n).unwrap();
    assert!(identity.is_approximately_equal(&circuit_sim::Matrix::identity(count), 1e-9));
}

#[test]
fn decomposed_fourier_transform_is_equivalent() {
    let factory = CircuitFactory::new(SimulatorConfig::default()).unwrap();
    let circuit = factory.make_circuit(Gate::quantum_fourier_transform(&[1, 0], false));
    let decomposed = circuit.decomposed().unwrap();
    assert!(decomposed.gates.iter().all(|g| !matches!(g, Gate::Hadamard { .. })));
    assert!(circuit.unitary(2).unwrap()
        .is_approximately_equal(&decomposed.unitary(2).unwrap(), 1e-8));
}

#[test]
fn shor_post_processing_for_fifteen() {
    assert_eq!(EuclideanSolver::find_greatest_common_divisor(252, 105), 21);
    // period of 7 mod 15 is 4; a measured phase of 6/8 on three bits
    assert_eq!(modular_pow(7, 4, 15), 1);
    let approx
        = ContinuedFractionsSolver::find_approximation(Ratio::new(6, 8), Ratio::new(1, 16))
        .unwrap();
    assert_eq!(*approx.denom(), 4);
    let half = modular_pow(7, 2, 15) as i64;
    assert_eq!(EuclideanSolver::find_greatest_common_divisor(half - 1, 15), 3);
    assert_eq!(EuclideanSolver::find_greatest_common_divisor(half + 1, 15), 5);
}
