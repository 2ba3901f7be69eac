//! Core value types for the scheduler.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single metadata value attached to a [`TrialReport`].
///
/// The scheduler never interprets metadata; it is carried verbatim from
/// the evaluator into the matching [`ResultRecord`] for later reporting.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaValue {
    /// A floating-point value.
    Float(f64),
    /// An integer value.
    Int(i64),
    /// A string value.
    String(String),
    /// A boolean value.
    Bool(bool),
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::String(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::String(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

/// The outcome of one evaluator invocation.
///
/// `score` is the quality of the configuration at the given budget —
/// higher is better. A NaN score violates the evaluator contract and
/// fails the run (see [`Error::MalformedTrialResult`](crate::Error)).
///
/// # Examples
///
/// ```
/// use hyperband::TrialReport;
///
/// let report = TrialReport::new(0.87)
///     .with_meta("val_loss", 0.42)
///     .with_meta("converged", true);
/// assert_eq!(report.score, 0.87);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialReport {
    /// The quality score for this trial. Higher is better.
    pub score: f64,
    /// Opaque evaluator-defined metadata, carried into the stored record.
    pub metadata: HashMap<String, MetaValue>,
}

impl TrialReport {
    /// Create a report with the given score and no metadata.
    #[must_use]
    pub fn new(score: f64) -> Self {
        Self {
            score,
            metadata: HashMap::new(),
        }
    }

    /// Attach one metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One trial's immutable, append-only record.
///
/// Created by the scheduler after each evaluator call and owned by the
/// [`ResultStore`](crate::ResultStore) for the lifetime of the run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultRecord<C> {
    /// Strictly increasing, unique trial number, assigned at evaluation time.
    pub sequence: u64,
    /// The configuration that was evaluated. Opaque to the scheduler.
    pub configuration: C,
    /// The resource budget the evaluator was given for this trial.
    pub budget: f64,
    /// The score the evaluator reported.
    pub score: f64,
    /// Wall-clock duration of the evaluator call, rounded to whole seconds.
    pub elapsed_seconds: u64,
    /// Evaluator-defined metadata from the matching [`TrialReport`].
    pub metadata: HashMap<String, MetaValue>,
}

/// A snapshot of one scheduler's accumulated progress.
///
/// State persists and accumulates across repeated
/// [`Scheduler::run`](crate::Scheduler::run) calls on the same instance;
/// it is never reset mid-run.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerState {
    /// Number of trials evaluated so far.
    pub trial_counter: u64,
    /// Best score seen so far; `f64::NEG_INFINITY` before any trial.
    pub best_score: f64,
    /// Sequence number of the best trial, if any trial has completed.
    pub best_sequence: Option<u64>,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            trial_counter: 0,
            best_score: f64::NEG_INFINITY,
            best_sequence: None,
        }
    }
}
