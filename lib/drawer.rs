//! Plain-text circuit diagrams.
//!
//! One wire per qubit, highest qubit on top, one column per gate:
//!
//! ```text
//! q1: ─H──●──
//!         │
//! q0: ────X──
//! ```
//!
//! `●` marks a control that fires on `1`; oracle controls are shown as `◆`.

use itertools::Itertools;
use crate::{
    error::DrawCircuitError,
    gate::{ are_unique, Gate },
};

// Qubits a gate touches, split into the ones it controls on and the ones
// its core acts on.
#[derive(Clone, Debug)]
struct Footprint {
    controls: Vec<(usize, char)>,
    targets: Vec<usize>,
    label: String,
}

fn footprint(gate: &Gate) -> Footprint {
    let mut controls: Vec<(usize, char)> = Vec::new();
    let mut core = gate;
    loop {
        match core {
            Gate::Controlled { gate, controls: c } => {
                controls.extend(c.iter().map(|q| (*q, '●')));
                core = gate.as_ref();
            },
            Gate::Oracle { gate, controls: c, .. } => {
                controls.extend(c.iter().map(|q| (*q, '◆')));
                core = gate.as_ref();
            },
            _ => break,
        }
    }
    let label = match core {
        Gate::Not { .. } => "X".to_string(),
        Gate::Hadamard { .. } => "H".to_string(),
        Gate::PhaseShift { .. } => "P".to_string(),
        Gate::Rotation { axis, .. } => format!("R{}", axis.to_string().to_lowercase()),
        Gate::Matrix { .. } => "U".to_string(),
        Gate::Oracle { .. } | Gate::Controlled { .. } => unreachable!(),
    };
    Footprint { controls, targets: core.raw_inputs(), label }
}

fn check(index: usize, fp: &Footprint, qubit_count: usize) -> Result<(), DrawCircuitError> {
    let controls: Vec<usize> = fp.controls.iter().map(|(q, _)| *q).collect();
    if fp.targets.is_empty() {
        return Err(DrawCircuitError::GateWithEmptyInputList(index));
    }
    if !are_unique(&fp.targets) {
        return Err(DrawCircuitError::GateWithRepeatedInputs(index));
    }
    if !are_unique(&controls) {
        return Err(DrawCircuitError::GateWithRepeatedControls(index));
    }
    if controls.iter().any(|c| fp.targets.contains(c)) {
        return Err(DrawCircuitError::GateInputsAreAlsoControls(index));
    }
    if controls.iter().chain(fp.targets.iter()).any(|q| *q >= qubit_count) {
        return Err(DrawCircuitError::GateQubitsAreNotInBound(index));
    }
    Ok(())
}

/// Render `gates` on a register of `qubit_count` qubits.
pub fn draw_circuit(gates: &[Gate], qubit_count: usize) -> Result<String, DrawCircuitError> {
    if qubit_count == 0 {
        return Err(DrawCircuitError::CircuitQubitCountHasToBeBiggerThanZero);
    }
    let footprints: Vec<Footprint> = gates.iter().map(footprint).collect();
    footprints.iter().enumerate()
        .try_for_each(|(k, fp)| check(k, fp, qubit_count))?;

    // wires[q] is the wire of qubit q, gaps[q] the line just below it
    let mut wires: Vec<String> = (0..qubit_count).map(|_| String::from("─")).collect();
    let mut gaps: Vec<String> = (0..qubit_count).map(|_| String::from(" ")).collect();
    for fp in footprints.iter() {
        let width = fp.label.chars().count();
        let touched: Vec<usize>
            = fp.controls.iter().map(|(q, _)| *q)
            .chain(fp.targets.iter().copied())
            .collect();
        let (lo, hi) = touched.iter().copied().minmax().into_option().unwrap_or((0, 0));
        for q in 0..qubit_count {
            let symbol: String
                = if fp.targets.contains(&q) {
                    fp.label.clone()
                } else if let Some((_, c)) = fp.controls.iter().find(|(c, _)| *c == q) {
                    c.to_string()
                } else if q > lo && q < hi {
                    "┼".to_string()
                } else {
                    "─".to_string()
                };
            wires[q].push_str(&format!("{:─^w$}──", symbol, w = width));
            let link = if q > lo && q <= hi { "│" } else { " " };
            gaps[q].push_str(&format!("{: ^w$}  ", link, w = width));
        }
    }
    let label_width = format!("q{}", qubit_count - 1).len();
    let text
        = (0..qubit_count).rev()
        .map(|q| {
            let label = format!("{:<w$}: ", format!("q{}", q), w = label_width);
            let mut block = format!("{}{}", label, wires[q]);
            if q > 0 {
                let gap = gaps[q].trim_end();
                block.push('\n');
                block.push_str(&" ".repeat(label_width + 2));
                block.push_str(gap);
            }
            block.trim_end().to_string()
        })
        .join("\n");
    Ok(text)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bell_pair_diagram() {
        let gates = [Gate::hadamard(1), Gate::controlled_not(0, 1)];
        let text = draw_circuit(&gates, 2).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("q1: "));
        assert!(lines[0].contains('H'));
        assert!(lines[0].contains('●'));
        assert!(lines[1].contains('│'));
        assert!(lines[2].starts_with("q0: "));
        assert!(lines[2].contains('X'));
    }

    #[test]
    fn oracle_controls_are_marked() {
        let gates = [Gate::oracle(["0"], vec![2], Gate::rotation(crate::matrix::Axis::Y, 1.0, 0))];
        let text = draw_circuit(&gates, 3).unwrap();
        assert!(text.contains('◆'));
        assert!(text.contains("Ry"));
        assert!(text.contains('┼'));
    }

    #[test]
    fn validations() {
        assert_eq!(
            draw_circuit(&[], 0).unwrap_err(),
            DrawCircuitError::CircuitQubitCountHasToBeBiggerThanZero,
        );
        let empty = Gate::matrix(crate::matrix::Matrix::identity(1), vec![]);
        assert_eq!(
            draw_circuit(&[Gate::not(0), empty], 2).unwrap_err(),
            DrawCircuitError::GateWithEmptyInputList(1),
        );
        let repeated = Gate::matrix(crate::matrix::Matrix::identity(4), vec![1, 1]);
        assert_eq!(
            draw_circuit(&[repeated], 2).unwrap_err(),
            DrawCircuitError::GateWithRepeatedInputs(0),
        );
        let repeated_controls = Gate::controlled(Gate::not(0), vec![1, 1]);
        assert_eq!(
            draw_circuit(&[repeated_controls], 2).unwrap_err(),
            DrawCircuitError::GateWithRepeatedControls(0),
        );
        assert_eq!(
            draw_circuit(&[Gate::controlled_not(0, 0)], 2).unwrap_err(),
            DrawCircuitError::GateInputsAreAlsoControls(0),
        );
        assert_eq!(
            draw_circuit(&[Gate::controlled_not(0, 4)], 2).unwrap_err(),
            DrawCircuitError::GateQubitsAreNotInBound(0),
        );
    }

    #[test]
    fn empty_circuit_is_bare_wires() {
        let text = draw_circuit(&[], 2).unwrap();
        assert_eq!(text, "q1: ─\nq0: ─");
    }
}
