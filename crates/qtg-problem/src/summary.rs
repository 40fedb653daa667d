//! Solution summaries appended to instance files.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ProblemResult;

/// Best solution found by the solver next to the greedy baseline.
///
/// Bitstrings use character `i` = item `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub best_value: i64,
    pub best: String,
    pub greedy_value: i64,
    pub greedy: String,
}

impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\nQTG-QAOA solution:\n")?;
        writeln!(f, "Best Value:  {}", self.best_value)?;
        writeln!(f, "Best Solution: {}", self.best)?;
        write!(f, "\nGreedy solution:\n")?;
        writeln!(f, "Best Value:  {}", self.greedy_value)?;
        writeln!(f, "Best Solution: {}", self.greedy)
    }
}

impl SolutionSummary {
    /// Append the summary to an existing instance file.
    ///
    /// The instance reader ignores everything after the weights line, so the
    /// file stays readable.
    pub fn append_to(&self, path: impl AsRef<Path>) -> ProblemResult<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().append(true).open(path)?;
        file.write_all(self.to_string().as_bytes())?;
        info!(path = %path.display(), value = self.best_value, "appended solution summary");
        Ok(())
    }
}
