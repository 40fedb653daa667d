//! Quadratic knapsack instances and their text format.
//!
//! ```text
//! <label>
//! <n>
//! <p₀₀ p₁₁ … pₙ₋₁ₙ₋₁>          diagonal profits
//! <p₀₁ p₀₂ … p₀ₙ₋₁>            n − 1 rows of the upper triangle,
//! …                            row i holds n − 1 − i values
//! <pₙ₋₂ₙ₋₁>
//! <constraint type>
//! <capacity>
//! <w₀ w₁ … wₙ₋₁>
//! ```
//!
//! Blank lines are skipped. Anything after the weights line, such as
//! appended solution summaries, is ignored.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProblemError, ProblemResult};

/// Constraint-type marker written by the instance generator.
pub const DEFAULT_CONSTRAINT_TYPE: i64 = 1;

/// A single-constraint quadratic knapsack instance.
///
/// Maximise `Σᵢⱼ pᵢⱼ xᵢ xⱼ` subject to `Σᵢ wᵢ xᵢ ≤ C`, with `p` symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackInstance {
    label: String,
    profits: Vec<Vec<i64>>,
    weights: Vec<i64>,
    capacity: i64,
}

impl KnapsackInstance {
    /// Create an instance, checking shapes, symmetry and signs.
    pub fn new(
        label: impl Into<String>,
        profits: Vec<Vec<i64>>,
        weights: Vec<i64>,
        capacity: i64,
    ) -> ProblemResult<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(ProblemError::InvalidInstance("no items".into()));
        }
        if profits.len() != n || profits.iter().any(|row| row.len() != n) {
            return Err(ProblemError::InvalidInstance(format!(
                "profit matrix must be {n}×{n}"
            )));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if profits[i][j] != profits[j][i] {
                    return Err(ProblemError::InvalidInstance(format!(
                        "profit matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        if let Some(i) = weights.iter().position(|w| *w < 0) {
            return Err(ProblemError::InvalidInstance(format!(
                "weight of item {i} is negative"
            )));
        }
        if capacity < 0 {
            return Err(ProblemError::InvalidInstance(format!(
                "capacity {capacity} is negative"
            )));
        }
        Ok(Self {
            label: label.into(),
            profits,
            weights,
            capacity,
        })
    }

    /// Read an instance file.
    pub fn from_file(path: impl AsRef<Path>) -> ProblemResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let instance = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            label = %instance.label,
            items = instance.num_items(),
            "read instance"
        );
        Ok(instance)
    }

    /// Parse the text format.
    pub fn parse(text: &str) -> ProblemResult<Self> {
        let mut lines = Lines::new(text);

        let label = lines.next("instance label")?.1.to_string();
        let (line, n_text) = lines.next("number of items")?;
        let n: usize = n_text.parse().map_err(|_| ProblemError::Parse {
            line,
            message: format!("invalid item count '{n_text}'"),
        })?;
        if n == 0 {
            return Err(ProblemError::Parse {
                line,
                message: "item count must be positive".into(),
            });
        }

        let mut profits = vec![vec![0i64; n]; n];
        let diagonal = lines.numbers("diagonal profits", n)?;
        for (i, p) in diagonal.into_iter().enumerate() {
            profits[i][i] = p;
        }
        for i in 0..n - 1 {
            let row = lines.numbers("profit row", n - 1 - i)?;
            for (k, p) in row.into_iter().enumerate() {
                let j = i + 1 + k;
                profits[i][j] = p;
                profits[j][i] = p;
            }
        }

        let (line, marker) = lines.next("constraint type")?;
        parse_number(marker, line)?;
        let capacity = lines.numbers("capacity", 1)?[0];
        let (line, _) = lines.peek("item weights")?;
        let weights = lines.numbers("item weights", n)?;

        Self::new(label, profits, weights, capacity).map_err(|e| match e {
            ProblemError::InvalidInstance(message) => ProblemError::Parse { line, message },
            other => other,
        })
    }

    /// Instance label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of items `n`.
    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Symmetric profit matrix.
    pub fn profits(&self) -> &[Vec<i64>] {
        &self.profits
    }

    /// Item weights.
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    /// Knapsack capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Objective value `Σᵢⱼ pᵢⱼ xᵢ xⱼ` of a selection.
    pub fn value(&self, selection: &[bool]) -> i64 {
        let mut total = 0;
        for (i, row) in self.profits.iter().enumerate() {
            if !selection.get(i).copied().unwrap_or(false) {
                continue;
            }
            for (j, p) in row.iter().enumerate() {
                if selection.get(j).copied().unwrap_or(false) {
                    total += p;
                }
            }
        }
        total
    }

    /// Total weight of a selection.
    pub fn weight(&self, selection: &[bool]) -> i64 {
        self.weights
            .iter()
            .zip(selection)
            .filter(|(_, x)| **x)
            .map(|(w, _)| *w)
            .sum()
    }

    /// Whether a selection respects the capacity.
    pub fn is_feasible(&self, selection: &[bool]) -> bool {
        self.weight(selection) <= self.capacity
    }

    /// Parse a selection bitstring for this instance, character `i` = item `i`.
    pub fn selection(&self, bits: &str) -> ProblemResult<Vec<bool>> {
        let selection = parse_selection(bits)?;
        if selection.len() != self.num_items() {
            return Err(ProblemError::SelectionLength {
                expected: self.num_items(),
                got: selection.len(),
            });
        }
        Ok(selection)
    }
}

impl FromStr for KnapsackInstance {
    type Err = ProblemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KnapsackInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num_items();
        writeln!(f, "{}", self.label)?;
        writeln!(f, "{n}")?;
        writeln!(f, "{}", join((0..n).map(|i| self.profits[i][i])))?;
        for i in 0..n - 1 {
            writeln!(f, "{}", join(((i + 1)..n).map(|j| self.profits[i][j])))?;
        }
        writeln!(f)?;
        writeln!(f, "{DEFAULT_CONSTRAINT_TYPE}")?;
        writeln!(f, "{}", self.capacity)?;
        writeln!(f, "{}", join(self.weights.iter().copied()))
    }
}

fn join(values: impl Iterator<Item = i64>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

/// Parse a `0`/`1` selection string, character `i` = item `i`.
pub fn parse_selection(bits: &str) -> ProblemResult<Vec<bool>> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            character => Err(ProblemError::InvalidCharacter {
                bitstring: bits.to_string(),
                character,
            }),
        })
        .collect()
}

/// Render a selection as a bitstring, character `i` = item `i`.
pub fn selection_string(selection: &[bool]) -> String {
    selection.iter().map(|x| if *x { '1' } else { '0' }).collect()
}

fn parse_number(token: &str, line: usize) -> ProblemResult<i64> {
    token.parse().map_err(|_| ProblemError::Parse {
        line,
        message: format!("invalid integer '{token}'"),
    })
}

/// Non-blank lines with their 1-based line numbers.
struct Lines<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn peek(&self, expected: &str) -> ProblemResult<(usize, &'a str)> {
        self.lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| ProblemError::UnexpectedEof {
                line: self.pos.checked_sub(1).map_or(1, |k| self.lines[k].0 + 1),
                expected: expected.to_string(),
            })
    }

    fn next(&mut self, expected: &str) -> ProblemResult<(usize, &'a str)> {
        let item = self.peek(expected)?;
        self.pos += 1;
        Ok(item)
    }

    fn numbers(&mut self, expected: &str, count: usize) -> ProblemResult<Vec<i64>> {
        let (line, text) = self.next(expected)?;
        let values = text
            .split_whitespace()
            .map(|t| parse_number(t, line))
            .collect::<ProblemResult<Vec<_>>>()?;
        if values.len() != count {
            return Err(ProblemError::WrongCount {
                line,
                expected: count,
                got: values.len(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "TestInstance1
3
1 2 3
4 5
6

1
4
2 3 1
";

    #[test]
    fn test_parse_sample() {
        let inst = KnapsackInstance::parse(SAMPLE).unwrap();
        assert_eq!(inst.label(), "TestInstance1");
        assert_eq!(inst.num_items(), 3);
        assert_eq!(
            inst.profits(),
            &[vec![1, 4, 5], vec![4, 2, 6], vec![5, 6, 3]]
        );
        assert_eq!(inst.capacity(), 4);
        assert_eq!(inst.weights(), &[2, 3, 1]);
    }

    #[test]
    fn test_appended_summary_ignored() {
        let text = format!(
            "{SAMPLE}\nQTG-QAOA solution:\nBest Value:  9\nBest Solution: 101\n"
        );
        let inst = KnapsackInstance::parse(&text).unwrap();
        assert_eq!(inst.weights(), &[2, 3, 1]);
        assert_eq!(inst.capacity(), 4);
    }

    #[test]
    fn test_single_item() {
        let inst = KnapsackInstance::parse("one\n1\n7\n1\n3\n2\n").unwrap();
        assert_eq!(inst.profits(), &[vec![7]]);
        assert_eq!(inst.weights(), &[2]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let bad = SAMPLE.replace("4 5", "4 x");
        assert!(matches!(
            KnapsackInstance::parse(&bad),
            Err(ProblemError::Parse { line: 4, .. })
        ));

        let short = SAMPLE.replace("2 3 1", "2 3");
        assert!(matches!(
            KnapsackInstance::parse(&short),
            Err(ProblemError::WrongCount {
                line: 9,
                expected: 3,
                got: 2
            })
        ));

        let truncated = "label\n3\n1 2 3\n";
        assert!(matches!(
            KnapsackInstance::parse(truncated),
            Err(ProblemError::UnexpectedEof { line: 4, .. })
        ));

        let negative = SAMPLE.replace("2 3 1", "2 -3 1");
        assert!(matches!(
            KnapsackInstance::parse(&negative),
            Err(ProblemError::Parse { line: 9, .. })
        ));
    }

    #[test]
    fn test_value_counts_both_triangles() {
        let inst = KnapsackInstance::parse(SAMPLE).unwrap();
        // items 0 and 2: p00 + p22 + 2·p02
        assert_eq!(inst.value(&[true, false, true]), 1 + 3 + 2 * 5);
        assert_eq!(inst.weight(&[true, false, true]), 3);
        assert!(inst.is_feasible(&[true, false, true]));
        assert!(!inst.is_feasible(&[true, true, false]));
    }

    #[test]
    fn test_display_round_trip() {
        let inst = KnapsackInstance::parse(SAMPLE).unwrap();
        let again: KnapsackInstance = inst.to_string().parse().unwrap();
        assert_eq!(inst, again);
    }

    #[test]
    fn test_selection_parsing() {
        let inst = KnapsackInstance::parse(SAMPLE).unwrap();
        assert_eq!(inst.selection("101").unwrap(), vec![true, false, true]);
        assert!(matches!(
            inst.selection("10"),
            Err(ProblemError::SelectionLength { .. })
        ));
        assert!(matches!(
            parse_selection("1x"),
            Err(ProblemError::InvalidCharacter { character: 'x', .. })
        ));
        assert_eq!(selection_string(&[false, true]), "01");
    }

    #[test]
    fn test_rejects_asymmetric() {
        let result = KnapsackInstance::new("a", vec![vec![1, 2], vec![3, 1]], vec![1, 1], 1);
        assert!(matches!(result, Err(ProblemError::InvalidInstance(_))));
    }
}
