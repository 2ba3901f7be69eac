//! Collaborator traits at the scheduler boundary.
//!
//! The scheduler's entire contact with the outside world goes through
//! two traits: a [`ConfigGenerator`] that samples candidate
//! configurations and an [`Evaluator`] that spends budget on one
//! configuration and reports back a score. Both have blanket impls for
//! plain closures, so simple collaborators need no struct:
//!
//! ```
//! use hyperband::prelude::*;
//!
//! let scheduler = Scheduler::builder(
//!     || 0.5_f64,
//!     |budget: f64, x: &f64| Ok::<_, Error>(TrialReport::new(x * budget)),
//! )
//! .build()
//! .unwrap();
//! ```
//!
//! Implement the traits on a struct when the collaborator carries state
//! of its own (an RNG, a connection to a training cluster, a process
//! pool). Both traits are `Send + Sync` so a parallel evaluation step
//! can share them across worker threads.

use crate::types::TrialReport;

/// Produces one candidate configuration per call.
///
/// The scheduler assumes nothing about the sampling strategy: repeat
/// calls may return different or overlapping configurations, and no
/// uniqueness is required. The generator is consulted exactly `n` times
/// when a bracket with initial population `n` starts.
pub trait ConfigGenerator<C>: Send + Sync {
    /// Sample one candidate configuration.
    fn next_candidate(&self) -> C;
}

impl<C, F> ConfigGenerator<C> for F
where
    F: Fn() -> C + Send + Sync,
{
    fn next_candidate(&self) -> C {
        self()
    }
}

/// Runs the underlying workload for one configuration at one budget.
///
/// The evaluator owns all domain-specific execution (model training,
/// simulation, ...). It must be safe to call repeatedly with the same
/// configuration at increasing budgets: a surviving candidate is
/// re-evaluated each round with a strictly larger budget, and whether
/// that resumes from a checkpoint or restarts from scratch is the
/// evaluator's own business, opaque to the scheduler.
pub trait Evaluator<C>: Send + Sync {
    /// The error type returned by [`evaluate`](Evaluator::evaluate).
    type Error: ToString;

    /// Evaluate `config` with `budget` units of effort.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`. An error is fatal to
    /// the current run: the scheduler never retries or skips a failed
    /// candidate, since silently dropping one would corrupt survivor
    /// selection.
    fn evaluate(&self, budget: f64, config: &C) -> Result<TrialReport, Self::Error>;
}

impl<C, F, E> Evaluator<C> for F
where
    F: Fn(f64, &C) -> Result<TrialReport, E> + Send + Sync,
    E: ToString,
{
    type Error = E;

    fn evaluate(&self, budget: f64, config: &C) -> Result<TrialReport, E> {
        self(budget, config)
    }
}
