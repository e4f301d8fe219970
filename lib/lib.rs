#![allow(non_snake_case)]

//! Tools for simulating quantum circuits on classical hardware.
//!
//! Gates are described by [`gate::Gate`] and expanded to full-register
//! operators on demand. Three engines run them:
//!
//! - [`statevector`] evolves a pure state, with interchangeable strategies
//!   for applying each gate;
//! - [`unitary`] accumulates the unitary of a whole circuit;
//! - [`density_matrix`] evolves mixed states through gates and the noise
//!   channels in [`noise`].
//!
//! [`decomposition`] rewrites arbitrary gates into single-qubit rotations and
//! phase shifts with controls, and [`circuit`] ties everything together behind
//! a [`config::SimulatorConfig`].
//!
//! Qubit `q` is bit `q` of a basis index. Bit strings are written most
//! significant qubit first, so `"01"` is the state with qubit 0 set.

pub mod error;
pub mod parallel;
pub mod matrix;
pub mod vector;
pub mod truth_table;
pub mod gate;
pub mod simulator_matrix;
pub mod circuit_matrix;
pub mod statevector;
pub mod unitary;
pub mod noise;
pub mod density_matrix;
pub mod config;
pub mod decomposition;
pub mod drawer;
pub mod evaluator;
pub mod xor_gauss;
pub mod number_theory;
pub mod circuit;

pub use circuit::{ Circuit, CircuitFactory, NoiseCircuit };
pub use config::SimulatorConfig;
pub use gate::Gate;
pub use matrix::{ Axis, Matrix };
pub use noise::{ Noise, QuantumOperator };
pub use statevector::CircuitStatevector;
pub use density_matrix::CircuitDensityMatrix;
pub use vector::Vector;
