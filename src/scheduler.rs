//! Scheduler orchestration: bracket planning, successive halving, and
//! result bookkeeping behind one public run/query surface.

use crate::bracket::BracketPlanner;
use crate::error::Result;
use crate::evaluator::{ConfigGenerator, Evaluator};
use crate::halving;
use crate::store::ResultStore;
use crate::types::{ResultRecord, SchedulerState};

/// Callback invoked after every recorded trial with the new record and a
/// state snapshot (running best included).
///
/// This is the seam for progress reporting — console output, telemetry,
/// persistence — kept out of the scheduling loop itself.
pub type TrialObserver<C> = Box<dyn Fn(&ResultRecord<C>, SchedulerState) + Send + Sync>;

/// Drives the full Hyperband schedule over a generator/evaluator pair.
///
/// A scheduler owns its [`ResultStore`]: repeated [`run`](Self::run)
/// calls on the same instance strictly append to one accumulated
/// history, supporting incremental search sessions. Queries
/// ([`best_results`](Self::best_results),
/// [`best_configuration`](Self::best_configuration),
/// [`state`](Self::state)) are read-only and callable at any time.
///
/// # Examples
///
/// ```
/// use hyperband::prelude::*;
/// use parking_lot::Mutex;
///
/// let rng = Mutex::new(fastrand::Rng::with_seed(42));
/// let scheduler = Scheduler::builder(
///     move || 0.2 + rng.lock().f64() * 0.7,
///     |budget: f64, x: &f64| Ok::<_, Error>(TrialReport::new(x * budget)),
/// )
/// .max_budget(9.0)
/// .build()
/// .unwrap();
///
/// let records = scheduler.run().unwrap();
/// assert_eq!(records.len(), scheduler.n_trials());
/// ```
pub struct Scheduler<C, G, E> {
    planner: BracketPlanner,
    skip_last: usize,
    generator: G,
    evaluator: E,
    store: ResultStore<C>,
    observer: Option<TrialObserver<C>>,
}

impl<C, G, E> Scheduler<C, G, E>
where
    C: Clone,
    G: ConfigGenerator<C>,
    E: Evaluator<C>,
{
    /// Start building a scheduler around the two collaborators.
    ///
    /// Defaults: `max_budget = 81`, `eta = 3`, `skip_last = 0`, no
    /// observer.
    #[must_use]
    pub fn builder(generator: G, evaluator: E) -> SchedulerBuilder<C, G, E> {
        SchedulerBuilder {
            max_budget: 81.0,
            eta: 3.0,
            skip_last: 0,
            generator,
            evaluator,
            observer: None,
        }
    }

    /// Execute every bracket, most exploratory first (`s = s_max` down
    /// to `0`), feeding each trial into the result store. Returns the
    /// full accumulated record list, including records from prior `run`
    /// calls on this instance.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::MalformedTrialResult`](crate::Error) and
    /// [`Error::EvaluationFailed`](crate::Error) unmodified, with the
    /// bracket, round, and sequence number that triggered the failure.
    /// Records stored before the failure are kept.
    pub fn run(&self) -> Result<Vec<ResultRecord<C>>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "hyperband",
            s_max = self.planner.s_max(),
            skip_last = self.skip_last
        )
        .entered();

        for bracket in self.planner.brackets() {
            halving::run_bracket(
                &bracket,
                self.planner.eta(),
                self.skip_last,
                &self.generator,
                &self.evaluator,
                &self.store,
                self.observer.as_deref(),
            )?;
        }

        Ok(self.store.records())
    }

    /// The `n` best records so far, highest score first, ties broken by
    /// earliest sequence number.
    #[must_use]
    pub fn best_results(&self, n: usize) -> Vec<ResultRecord<C>> {
        self.store.top_n(n)
    }

    /// The configuration of the best trial so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`](crate::Error) if no trial has
    /// completed yet; recoverable by running (more of) the schedule.
    pub fn best_configuration(&self) -> Result<C> {
        self.store.best_configuration()
    }

    /// All records accumulated so far, in sequence order.
    #[must_use]
    pub fn records(&self) -> Vec<ResultRecord<C>> {
        self.store.records()
    }

    /// Number of trials evaluated so far.
    #[must_use]
    pub fn n_trials(&self) -> usize {
        self.store.len()
    }

    /// Snapshot of the accumulated state (trial counter, running best).
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.store.state()
    }

    /// The bracket plan this scheduler executes.
    #[must_use]
    pub fn planner(&self) -> &BracketPlanner {
        &self.planner
    }
}

/// Fluent construction for [`Scheduler`].
///
/// # Examples
///
/// ```
/// use hyperband::prelude::*;
///
/// let scheduler = Scheduler::builder(
///     || 0.5_f64,
///     |budget: f64, x: &f64| Ok::<_, Error>(TrialReport::new(x * budget)),
/// )
/// .max_budget(27.0)
/// .eta(3.0)
/// .skip_last(1)
/// .build()
/// .unwrap();
/// assert_eq!(scheduler.planner().s_max(), 3);
/// ```
pub struct SchedulerBuilder<C, G, E> {
    max_budget: f64,
    eta: f64,
    skip_last: usize,
    generator: G,
    evaluator: E,
    observer: Option<TrialObserver<C>>,
}

impl<C, G, E> SchedulerBuilder<C, G, E>
where
    C: Clone,
    G: ConfigGenerator<C>,
    E: Evaluator<C>,
{
    /// Set the largest feasible per-candidate budget (default 81).
    #[must_use]
    pub fn max_budget(mut self, max_budget: f64) -> Self {
        self.max_budget = max_budget;
        self
    }

    /// Set the downsample rate `eta` (default 3).
    #[must_use]
    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Omit the final `skip_last` rounds of every bracket (default 0).
    #[must_use]
    pub fn skip_last(mut self, skip_last: usize) -> Self {
        self.skip_last = skip_last;
        self
    }

    /// Install a per-trial observer (see [`TrialObserver`]).
    #[must_use]
    pub fn observer(
        mut self,
        observer: impl Fn(&ResultRecord<C>, SchedulerState) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Build the scheduler, validating the bracket configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBracketConfiguration`](crate::Error) when
    /// `max_budget` and `eta` admit no bracket plan; fatal, not retried.
    pub fn build(self) -> Result<Scheduler<C, G, E>> {
        let planner = BracketPlanner::new(self.max_budget, self.eta)?;
        Ok(Scheduler {
            planner,
            skip_last: self.skip_last,
            generator: self.generator,
            evaluator: self.evaluator,
            store: ResultStore::new(),
            observer: self.observer,
        })
    }
}
