use circuit_sim::{ CircuitFactory, Gate, SimulatorConfig };
use tracing::info;
use tracing_subscriber::EnvFilter;

// qubit 1 holds x, qubit 0 the |−⟩ ancilla; a truth table lists the values
// of x for which f(x) = 1
fn deutsch(truth_table: &[&str]) -> Vec<Gate> {
    vec![
        Gate::hadamard(1),
        Gate::hadamard(0),
        Gate::oracle(truth_table.iter().copied(), vec![1], Gate::not(0)),
        Gate::hadamard(1),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let factory = CircuitFactory::new(SimulatorConfig::default())?;
    let tables: [&[&str]; 4] = [&[], &["0"], &["1"], &["0", "1"]];
    for table in tables.into_iter() {
        let circuit = factory.make_circuit(deutsch(table));
        println!("{}", circuit.draw(2)?);
        let state = circuit.statevector_from_bits("01")?;
        let summary = state.summarized_probabilities(&[1])?;
        let balanced = summary.get("1").copied().unwrap_or(0.0);
        info!(?table, balanced, "deutsch");
        println!(
            "f = {:?}: {}",
            table,
            if balanced > 0.5 { "balanced" } else { "constant" },
        );
    }
    Ok(())
}
