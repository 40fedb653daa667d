//! Threshold comparator.

use qtg_ir::{Circuit, ComparatorGate, IrResult, QubitId};

/// Writes `[sum < t]` (or `[sum ≥ t]`) into a flag qubit.
///
/// The comparison is XOR-ed into the flag, so applying the same comparator
/// twice restores it. Thresholds outside `1..2^m` make the strict comparison
/// constant: never true for `t ≤ 0`, always true for `t ≥ 2^m`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdComparator {
    gate: ComparatorGate,
}

impl ThresholdComparator {
    /// `flag ^= [sum < threshold]` over a `width`-bit register.
    pub fn less_than(width: u32, threshold: i64) -> Self {
        Self {
            gate: ComparatorGate::less_than(width, threshold),
        }
    }

    /// `flag ^= [sum ≥ threshold]` over a `width`-bit register.
    pub fn greater_equal(width: u32, threshold: i64) -> Self {
        Self {
            gate: ComparatorGate::greater_equal(width, threshold),
        }
    }

    /// Register width.
    pub fn width(&self) -> u32 {
        self.gate.width
    }

    /// The threshold `t`.
    pub fn threshold(&self) -> i64 {
        self.gate.value
    }

    /// Classical value written into the flag for register value `sum`.
    pub fn evaluate(&self, sum: u64) -> bool {
        self.gate.evaluate(sum)
    }

    /// The underlying gate.
    pub fn gate(&self) -> &ComparatorGate {
        &self.gate
    }

    /// Append to `circuit`; `register` is least significant bit first.
    pub fn append(&self, circuit: &mut Circuit, register: &[QubitId], flag: QubitId) -> IrResult<()> {
        circuit.comparator(self.gate.clone(), register, flag)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtg_adapter_sim::Statevector;

    /// Prepare `sum`, apply the comparator `times` times, return the flag.
    fn run(cmp: &ThresholdComparator, sum: u64, times: usize, lowered: bool) -> bool {
        let width = cmp.width();
        let mut circuit = Circuit::with_size("cmp", width + 1, 0);
        let register: Vec<QubitId> = (0..width).map(QubitId).collect();
        for k in 0..width {
            if (sum >> k) & 1 == 1 {
                circuit.x(QubitId(k)).unwrap();
            }
        }
        for _ in 0..times {
            cmp.append(&mut circuit, &register, QubitId(width)).unwrap();
        }
        if lowered {
            circuit = qtg_compile::lower(&circuit).unwrap();
        }
        let sv = Statevector::from_circuit(&circuit).unwrap();
        let expected_index = sum as usize;
        let flagged = expected_index | (1 << width);
        let probs = sv.probabilities();
        assert!(probs[expected_index] + probs[flagged] > 1.0 - 1e-10, "sum register disturbed");
        probs[flagged] > 0.5
    }

    #[test]
    fn test_strict_less_truth_table() {
        for width in 1..=3u32 {
            for t in -1..=(1i64 << width) + 1 {
                let cmp = ThresholdComparator::less_than(width, t);
                for sum in 0..(1u64 << width) {
                    let expected = (sum as i64) < t;
                    assert_eq!(run(&cmp, sum, 1, false), expected, "w={width} t={t} s={sum}");
                    assert_eq!(run(&cmp, sum, 1, true), expected, "lowered w={width} t={t} s={sum}");
                }
            }
        }
    }

    #[test]
    fn test_involution() {
        for width in 1..=3u32 {
            for t in 0..=(1i64 << width) {
                for cmp in [
                    ThresholdComparator::less_than(width, t),
                    ThresholdComparator::greater_equal(width, t),
                ] {
                    for sum in 0..(1u64 << width) {
                        assert!(!run(&cmp, sum, 2, false));
                        assert!(!run(&cmp, sum, 2, true));
                    }
                }
            }
        }
    }

    #[test]
    fn test_greater_equal() {
        let cmp = ThresholdComparator::greater_equal(3, 5);
        assert!(cmp.evaluate(5));
        assert!(!cmp.evaluate(4));
        assert!(run(&cmp, 6, 1, true));
    }
}
