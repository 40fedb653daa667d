//! Instance files, heuristics and the cost Hamiltonian together.

use proptest::prelude::*;
use qtg_problem::{
    KnapsackInstance, SolutionSummary, cost_hamiltonian, greedy_deletion, selection_string,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("qtg-problem-{}-{name}", std::process::id()))
}

fn instance_strategy() -> impl Strategy<Value = KnapsackInstance> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(0i64..20, n * n),
            prop::collection::vec(0i64..10, n),
            0i64..30,
        )
            .prop_map(move |(raw, weights, capacity)| {
                let mut profits = vec![vec![0; n]; n];
                for i in 0..n {
                    for j in i..n {
                        profits[i][j] = raw[i * n + j];
                        profits[j][i] = raw[i * n + j];
                    }
                }
                KnapsackInstance::new("prop", profits, weights, capacity).unwrap()
            })
    })
}

#[test]
fn summary_append_keeps_file_readable() {
    let path = temp_path("append.txt");
    let instance = KnapsackInstance::new(
        "file",
        vec![vec![3, 1], vec![1, 2]],
        vec![2, 2],
        3,
    )
    .unwrap();
    std::fs::write(&path, instance.to_string()).unwrap();

    let greedy = greedy_deletion(&instance);
    let summary = SolutionSummary {
        best_value: 3,
        best: "10".into(),
        greedy_value: instance.value(&greedy),
        greedy: selection_string(&greedy),
    };
    summary.append_to(&path).unwrap();
    summary.append_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("QTG-QAOA solution:").count(), 2);
    assert_eq!(KnapsackInstance::from_file(&path).unwrap(), instance);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let result = KnapsackInstance::from_file(temp_path("does-not-exist.txt"));
    assert!(matches!(result, Err(qtg_problem::ProblemError::Io(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cost_energy_is_negative_value(instance in instance_strategy()) {
        let h = cost_hamiltonian(&instance).unwrap();
        let n = instance.num_items();
        for index in 0..(1u64 << n) {
            let selection: Vec<bool> = (0..n).map(|i| (index >> i) & 1 == 1).collect();
            let expected = -(instance.value(&selection) as f64);
            prop_assert!((h.basis_expectation(index) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn greedy_is_feasible(instance in instance_strategy()) {
        let selection = greedy_deletion(&instance);
        prop_assert!(instance.is_feasible(&selection));
    }

    #[test]
    fn text_format_round_trips(instance in instance_strategy()) {
        let again = KnapsackInstance::parse(&instance.to_string()).unwrap();
        prop_assert_eq!(again, instance);
    }
}
