use circuit_sim::{
    number_theory::{ modular_pow, ContinuedFractionsSolver, EuclideanSolver },
    CircuitFactory,
    Gate,
    Matrix,
    SimulatorConfig,
};
use num_complex::Complex64 as C64;
use num_rational::Ratio;
use rand::thread_rng;
use tracing::{ debug, info, warn };
use tracing_subscriber::EnvFilter;

const MODULUS: u64 = 15;
const BASE: u64 = 7;
const WORK: usize = 4;
const COUNTING: usize = 4;
const ATTEMPTS: usize = 10;

// |y⟩ -> |multiplier · y mod MODULUS⟩ on the work register, fixing values
// outside 0..MODULUS
fn multiplication(multiplier: u64) -> Matrix {
    let size = 1_usize << WORK;
    Matrix::from_fn(size, size, |r, c| {
        let image
            = if (c as u64) < MODULUS {
                (multiplier * c as u64 % MODULUS) as usize
            } else {
                c
            };
        if r == image { C64::from(1.0) } else { C64::from(0.0) }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let work: Vec<usize> = (0..WORK).rev().collect();
    let counting: Vec<usize> = (WORK..WORK + COUNTING).rev().collect();
    let mut gates: Vec<Gate> = counting.iter().map(|q| Gate::hadamard(*q)).collect();
    (0..COUNTING).for_each(|k| {
        let multiplier = modular_pow(BASE, 1 << k, MODULUS);
        gates.push(Gate::controlled(
            Gate::matrix(multiplication(multiplier), work.clone()),
            vec![WORK + k],
        ));
    });
    gates.append(&mut Gate::quantum_fourier_transform(&counting, true));

    let factory = CircuitFactory::new(SimulatorConfig::parallel(4))?;
    let circuit = factory.make_circuit(gates);
    let initial = format!("{}1", "0".repeat(WORK + COUNTING - 1));
    let state = circuit.statevector_from_bits(&initial)?;

    let scale = 1_i64 << COUNTING;
    let mut rng = thread_rng();
    for attempt in 0..ATTEMPTS {
        let measured = (state.measure(&mut rng) >> WORK) as i64;
        let phase = Ratio::new(measured, scale);
        let Some(approx)
            = ContinuedFractionsSolver::find_approximation(phase, Ratio::new(1, 2 * scale))
            else { continue; };
        let period = *approx.denom();
        debug!(attempt, measured, period, "measured phase");
        if period % 2 == 1 || modular_pow(BASE, period as u64, MODULUS) != 1 {
            continue;
        }
        let half = modular_pow(BASE, period as u64 / 2, MODULUS) as i64;
        let modulus = MODULUS as i64;
        let factors = [
            EuclideanSolver::find_greatest_common_divisor(half - 1, modulus),
            EuclideanSolver::find_greatest_common_divisor(half + 1, modulus),
        ];
        if factors.iter().all(|f| *f > 1 && *f < MODULUS) {
            info!(attempt, period, "found factors");
            println!("{} = {} × {}", MODULUS, factors[0], factors[1]);
            return Ok(());
        }
    }
    warn!(attempts = ATTEMPTS, "no factors found");
    Ok(())
}
