//! Lowered circuits compute the same reversible function as the source.

use proptest::prelude::*;
use qtg_compile::{CancelInverses, Pass, PropertySet, lower};
use qtg_ir::{Circuit, ComparatorGate, QubitId};

/// Classical action of a circuit built from comparators and X-type gates.
fn run_classical(circuit: &Circuit, mut state: u64) -> u64 {
    for inst in circuit.instructions() {
        let (last, rest) = inst.qubits.split_last().unwrap();
        let flip = match inst.as_gate().map(|g| &g.kind) {
            Some(qtg_ir::GateKind::Comparator(cmp)) => {
                let register = rest
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (k, q)| acc | ((state >> q.0) & 1) << k);
                cmp.evaluate(register)
            }
            _ => rest.iter().all(|q| (state >> q.0) & 1 == 1),
        };
        if flip {
            state ^= 1 << last.0;
        }
    }
    state
}

fn comparator_chain(width: u32, values: &[(i64, bool)]) -> Circuit {
    let mut circuit = Circuit::with_size("chain", width + 1, 0);
    let register: Vec<_> = (0..width).map(QubitId).collect();
    for &(value, geq) in values {
        circuit
            .comparator(ComparatorGate { width, value, geq }, &register, QubitId(width))
            .unwrap();
        circuit.x(QubitId(value.rem_euclid(i64::from(width)) as u32)).unwrap();
    }
    circuit
}

proptest! {
    #[test]
    fn lowering_preserves_function(
        width in 1u32..5,
        values in prop::collection::vec((-2i64..20, any::<bool>()), 1..5),
    ) {
        let circuit = comparator_chain(width, &values);
        let lowered = lower(&circuit).unwrap();
        let mut cancelled = lowered.clone();
        CancelInverses.run(&mut cancelled, &mut PropertySet::new()).unwrap();
        prop_assert!(cancelled.num_ops() <= lowered.num_ops());

        for input in 0..(1u64 << (width + 1)) {
            let expected = run_classical(&circuit, input);
            prop_assert_eq!(run_classical(&lowered, input), expected);
            prop_assert_eq!(run_classical(&cancelled, input), expected);
        }
    }
}
