use circuit_sim::{
    config::DensityMatrixConfiguration,
    CircuitFactory,
    Gate,
    Noise,
    QuantumOperator,
    SimulatorConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config
        = SimulatorConfig::default()
        .with_density_matrix(DensityMatrixConfiguration { max_concurrency: 2 });
    let factory = CircuitFactory::new(config)?;
    for p in [0.0, 0.05, 0.1, 0.25, 0.5] {
        let operators: Vec<QuantumOperator> = vec![
            Gate::hadamard(1).into(),
            Gate::controlled_not(0, 1).into(),
            Noise::depolarizing(p, 0).into(),
            Noise::amplitude_damping(p, 1).into(),
        ];
        let rho = factory.make_noise_circuit(operators).density_matrix_from_bits("00")?;
        let probs = rho.probabilities();
        info!(p, purity = rho.purity(), "noisy bell pair");
        println!(
            "p = {:.2}: P(00) = {:.4}, P(11) = {:.4}, purity = {:.4}",
            p, probs[0b00], probs[0b11], rho.purity(),
        );
    }
    Ok(())
}
