//! Cost Hamiltonian of a quadratic knapsack instance.
//!
//! Maximising `Σᵢⱼ pᵢⱼ xᵢ xⱼ` is minimising its negation. With
//! `xᵢ = (1 − Zᵢ)/2` this becomes
//!
//! ```text
//! H = c·I + Σᵢ (Σⱼ pᵢⱼ / 2) Zᵢ − Σᵢ<ⱼ (pᵢⱼ / 2) ZᵢZⱼ
//! c = −Σᵢ pᵢᵢ / 2 − Σᵢ<ⱼ pᵢⱼ / 2
//! ```
//!
//! so that `⟨x|H|x⟩ = −value(x)` for every selection.

use qtg_sim::hamiltonian::DEFAULT_TOLERANCE;
use qtg_sim::{Hamiltonian, HamiltonianTerm};

use crate::error::ProblemResult;
use crate::instance::KnapsackInstance;

/// Diagonal cost Hamiltonian on `n` qubits, qubit `i` = item `i`.
///
/// Terms with `|c| < 1e-8` are dropped.
#[allow(clippy::cast_possible_truncation)]
pub fn cost_hamiltonian(instance: &KnapsackInstance) -> ProblemResult<Hamiltonian> {
    let n = instance.num_items();
    let p = instance.profits();
    let mut terms = Vec::new();

    let mut constant = 0.0;
    for i in 0..n {
        constant -= p[i][i] as f64 / 2.0;
        for j in (i + 1)..n {
            constant -= p[i][j] as f64 / 2.0;
        }
    }
    terms.push(HamiltonianTerm::identity(constant));

    for (i, row) in p.iter().enumerate() {
        let linear: f64 = row.iter().map(|v| *v as f64).sum::<f64>() / 2.0;
        terms.push(HamiltonianTerm::z(i as u32, linear));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            terms.push(HamiltonianTerm::zz(i as u32, j as u32, -(p[i][j] as f64) / 2.0));
        }
    }

    let hamiltonian = Hamiltonian::new(n as u32, terms)?;
    Ok(hamiltonian.simplify(DEFAULT_TOLERANCE))
}
