#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when `max_budget` and `eta` yield no valid bracket plan
    /// (`s_max` would be negative).
    #[error(
        "invalid bracket configuration: max_budget ({max_budget}) must be >= 1 and eta ({eta}) must be > 1"
    )]
    InvalidBracketConfiguration {
        /// The rejected maximum per-candidate budget.
        max_budget: f64,
        /// The rejected downsample rate.
        eta: f64,
    },

    /// Returned when the evaluator produced a result without a usable
    /// score (NaN). Fatal to the current run; no record is stored for
    /// the offending call.
    #[error("malformed trial result in bracket {bracket}, round {round}, trial {sequence}: score is not a number")]
    MalformedTrialResult {
        /// The bracket index `s` being executed.
        bracket: usize,
        /// The round index within the bracket.
        round: usize,
        /// The sequence number allocated to the offending trial.
        sequence: u64,
    },

    /// Returned when the evaluator itself failed. Fatal to the current
    /// run; there is no automatic retry.
    #[error("evaluation failed in bracket {bracket}, round {round}, trial {sequence}: {message}")]
    EvaluationFailed {
        /// The bracket index `s` being executed.
        bracket: usize,
        /// The round index within the bracket.
        round: usize,
        /// The sequence number allocated to the offending trial.
        sequence: u64,
        /// The evaluator's error, stringified.
        message: String,
    },

    /// Returned when querying for a best result before any trial has
    /// completed. Recoverable; query again after running more trials.
    #[error("no trial results recorded")]
    EmptyResult,
}

pub type Result<T> = core::result::Result<T, Error>;
