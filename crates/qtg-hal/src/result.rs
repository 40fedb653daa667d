//! Measurement counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Histogram of measured bitstrings.
///
/// Character `i` of every key is classical bit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(bitstring, count)` pairs; repeated keys accumulate.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.total_shots() == 0
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate outcomes in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// The most frequent outcome; ties resolve to the lexicographically
    /// smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .fold(None, |best: Option<(&String, u64)>, (k, c)| match best {
                Some((_, bc)) if bc >= *c => best,
                _ => Some((k, *c)),
            })
    }

    /// Outcomes sorted by descending count.
    pub fn sorted(&self) -> Vec<(&String, u64)> {
        let mut v: Vec<_> = self.counts.iter().map(|(k, c)| (k, *c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// Relative frequencies, summing to one.
    pub fn frequencies(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, c)| (k.clone(), *c as f64 / total as f64))
            .collect()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("01", 1);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 3);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 4);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let counts = Counts::from_pairs([("11", 5), ("00", 5), ("01", 2)]);
        assert_eq!(counts.most_frequent(), Some((&"00".to_string(), 5)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_frequencies() {
        let counts = Counts::from_pairs([("0", 1), ("1", 3)]);
        let freq = counts.frequencies();
        assert!((freq["0"] - 0.25).abs() < 1e-12);
        assert!((freq["1"] - 0.75).abs() < 1e-12);
        assert!(Counts::new().frequencies().is_empty());
    }

    #[test]
    fn test_sorted() {
        let counts = Counts::from_pairs([("a", 1), ("b", 3), ("c", 2)]);
        let order: Vec<&str> = counts.sorted().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }
}
