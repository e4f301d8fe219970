use std::collections::BTreeSet;
use circuit_sim::{
    xor_gauss::XorGaussianEliminationSolver,
    CircuitFactory,
    CircuitStatevector,
    Gate,
    SimulatorConfig,
};
use rand::thread_rng;
use tracing::{ debug, info };
use tracing_subscriber::EnvFilter;

const N: usize = 3;
const SECRET: usize = 0b110;
const SHOTS: usize = 3 * N;

// x_i on qubit N + i, f(x)_i on qubit i; f(x) = f(x ^ SECRET)
fn oracle() -> Vec<Gate> {
    let mut gates: Vec<Gate>
        = (0..N).map(|i| Gate::controlled_not(i, N + i)).collect();
    let j = SECRET.trailing_zeros() as usize;
    gates.extend(
        (0..N).filter(|i| (SECRET >> i) & 1 == 1)
            .map(|i| Gate::controlled_not(i, N + j))
    );
    gates
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut gates: Vec<Gate> = (N..2 * N).map(Gate::hadamard).collect();
    gates.append(&mut oracle());
    gates.extend((N..2 * N).map(Gate::hadamard));

    let factory = CircuitFactory::new(SimulatorConfig::default())?;
    let circuit = factory.make_circuit(gates);
    println!("{}", circuit.draw(2 * N)?);
    let state = circuit.statevector(&CircuitStatevector::zeros(2 * N))?;

    let mut rng = thread_rng();
    let equations: Vec<BTreeSet<usize>>
        = (0..SHOTS)
        .map(|_| {
            let outcome = state.measure(&mut rng);
            let y: BTreeSet<usize>
                = (0..N).filter(|i| (outcome >> (N + i)) & 1 == 1).collect();
            debug!(?y, "measured");
            y
        })
        .collect();
    let solutions = XorGaussianEliminationSolver::new().find_activated_variables(&equations)?;
    info!(count = solutions.len(), "solved");
    solutions.iter()
        .filter(|s| !s.is_empty())
        .for_each(|s| {
            let secret: usize = s.iter().map(|i| 1 << i).sum();
            println!("candidate secret: {:0w$b}", secret, w = N);
        });
    Ok(())
}
