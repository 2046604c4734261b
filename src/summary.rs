//! Run summaries reported by the estimation procedures.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Which estimation procedure produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    MonteCarlo,
    TemporalDifference,
    QLearning,
}

impl Algorithm {
    /// Short display name used by progress reporting.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::MonteCarlo => "MC",
            Algorithm::TemporalDifference => "TD",
            Algorithm::QLearning => "Q",
        }
    }
}

/// Result of one run procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Procedure that was run
    pub algorithm: Algorithm,

    /// Number of episodes completed
    pub episodes: usize,

    /// Exploration rate, for Q-learning runs only
    pub epsilon: Option<f64>,

    /// Number of universe states with at least one visit in the
    /// procedure's own table after the run
    pub states_visited: usize,
}

impl RunSummary {
    /// Save the summary to a JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a summary from a JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_serializes_snake_case() {
        let json = serde_json::to_string(&Algorithm::MonteCarlo).unwrap();
        assert_eq!(json, "\"monte_carlo\"");
        let json = serde_json::to_string(&Algorithm::QLearning).unwrap();
        assert_eq!(json, "\"q_learning\"");
    }

    #[test]
    fn summary_round_trips_through_json() {
        let summary = RunSummary {
            algorithm: Algorithm::QLearning,
            episodes: 100,
            epsilon: Some(0.4),
            states_visited: 42,
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.algorithm, Algorithm::QLearning);
        assert_eq!(back.episodes, 100);
        assert_eq!(back.epsilon, Some(0.4));
        assert_eq!(back.states_visited, 42);
    }
}
