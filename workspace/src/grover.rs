use std::f64::consts::PI;
use circuit_sim::{ CircuitFactory, Gate, SimulatorConfig };
use itertools::Itertools;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MARKED: &str = "1011";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let n = MARKED.len();
    // search register on qubits n..1, phase-kickback ancilla on qubit 0
    let register: Vec<usize> = (1..=n).rev().collect();
    let iterations = (PI / 4.0 * f64::from(1_u32 << n).sqrt()).floor() as usize;

    let mut gates: Vec<Gate> = register.iter().map(|q| Gate::hadamard(*q)).collect();
    gates.push(Gate::hadamard(0));
    for _ in 0..iterations {
        gates.push(Gate::oracle([MARKED], register.clone(), Gate::not(0)));
        gates.extend(register.iter().map(|q| Gate::hadamard(*q)));
        gates.extend(register.iter().map(|q| Gate::not(*q)));
        gates.push(
            Gate::controlled(Gate::phase_shift(PI, register[n - 1]), register[..n - 1].to_vec())
        );
        gates.extend(register.iter().map(|q| Gate::not(*q)));
        gates.extend(register.iter().map(|q| Gate::hadamard(*q)));
    }

    let factory = CircuitFactory::new(SimulatorConfig::parallel(4))?;
    let circuit = factory.make_circuit(gates);
    let initial = format!("{}1", "0".repeat(n));
    let state = circuit.statevector_from_bits(&initial)?;
    let summary = state.summarized_probabilities(&register)?;
    info!(iterations, gate_count = circuit.gates.len(), "grover");
    summary.iter()
        .sorted_by(|a, b| b.1.total_cmp(a.1))
        .take(4)
        .for_each(|(bits, p)| { println!("{}: {:.4}", bits, p); });
    Ok(())
}
