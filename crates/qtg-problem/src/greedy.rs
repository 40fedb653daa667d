//! Greedy deletion heuristic.
//!
//! Start from the full selection and, while it is over capacity, drop the
//! item whose removal loses the least objective per unit of weight. The
//! result seeds the bias ansatz of the tree generator.

use tracing::{debug, trace};

use crate::instance::KnapsackInstance;

/// Greedy-deletion selection for `instance`; item `i` at index `i`.
pub fn greedy_deletion(instance: &KnapsackInstance) -> Vec<bool> {
    let weights = instance.weights();
    let mut selection = vec![true; instance.num_items()];
    let mut total: i64 = weights.iter().sum();
    let mut current = instance.value(&selection);

    while total > instance.capacity() {
        let mut best: Option<(f64, usize)> = None;
        for (i, &w) in weights.iter().enumerate() {
            if !selection[i] || w <= 0 {
                continue;
            }
            selection[i] = false;
            let loss = (current - instance.value(&selection)) as f64;
            selection[i] = true;
            let ratio = loss / w as f64;
            if best.is_none_or(|(r, _)| ratio < r) {
                best = Some((ratio, i));
            }
        }
        // Over capacity implies a selected item with positive weight.
        let Some((ratio, i)) = best else { break };
        trace!(item = i, ratio, "removing item");
        selection[i] = false;
        total -= weights[i];
        current = instance.value(&selection);
    }

    debug!(
        value = current,
        weight = total,
        items = selection.iter().filter(|x| **x).count(),
        "greedy deletion finished"
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(profits: Vec<Vec<i64>>, weights: Vec<i64>, capacity: i64) -> KnapsackInstance {
        KnapsackInstance::new("t", profits, weights, capacity).unwrap()
    }

    #[test]
    fn test_feasible_instance_keeps_everything() {
        let inst = instance(vec![vec![1, 0], vec![0, 1]], vec![1, 1], 5);
        assert_eq!(greedy_deletion(&inst), vec![true, true]);
    }

    #[test]
    fn test_removes_least_valuable_per_weight() {
        // losses: item0 = 10, item1 = 2, item2 = 6; weights 2, 1, 3
        // ratios: 5, 2, 2 → tie, lowest index (1) goes first
        let profits = vec![vec![10, 0, 0], vec![0, 2, 0], vec![0, 0, 6]];
        let inst = instance(profits, vec![2, 1, 3], 5);
        assert_eq!(greedy_deletion(&inst), vec![true, false, true]);
    }

    #[test]
    fn test_interactions_count_in_loss() {
        // item 2 alone is worth little but pairs strongly with item 0
        let profits = vec![vec![5, 0, 8], vec![0, 6, 0], vec![8, 0, 1]];
        let inst = instance(profits, vec![1, 1, 1], 2);
        let selection = greedy_deletion(&inst);
        assert_eq!(selection, vec![true, false, true]);
        assert!(inst.is_feasible(&selection));
    }

    #[test]
    fn test_zero_capacity() {
        let inst = instance(vec![vec![3, 1], vec![1, 4]], vec![2, 0], 0);
        assert_eq!(greedy_deletion(&inst), vec![false, true]);
    }
}
