//! Successive-halving execution of a single bracket.
//!
//! One bracket samples `n` configurations and then repeatedly evaluates
//! a shrinking population at growing budgets: round `i` evaluates every
//! survivor at `r * eta^i` budget and keeps the top
//! `floor(n * eta^-i / eta)` by score. Selection sorts descending by
//! score with a stable sort, so equal scores keep their original sample
//! order and schedules stay reproducible.

use std::time::Instant;

use crate::bracket::Bracket;
use crate::error::{Error, Result};
use crate::evaluator::{ConfigGenerator, Evaluator};
use crate::store::ResultStore;
use crate::types::{ResultRecord, SchedulerState};

/// Borrowed form of [`crate::TrialObserver`], threaded through the
/// bracket loop.
type ObserverRef<'a, C> = &'a (dyn Fn(&ResultRecord<C>, SchedulerState) + Send + Sync);

/// Execute one bracket end-to-end, recording every trial into `store`.
///
/// `skip_last` omits that many final rounds; a bracket whose entire
/// round sequence is skipped samples nothing, preserving the guarantee
/// that every sampled configuration is evaluated at least once.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub(crate) fn run_bracket<C, G, E>(
    bracket: &Bracket,
    eta: f64,
    skip_last: usize,
    generator: &G,
    evaluator: &E,
    store: &ResultStore<C>,
    observer: Option<ObserverRef<'_, C>>,
) -> Result<()>
where
    C: Clone,
    G: ConfigGenerator<C>,
    E: Evaluator<C>,
{
    let s = bracket.index;
    let n = bracket.initial_population;
    let r = bracket.initial_budget;

    let rounds = (s + 1).saturating_sub(skip_last);
    if rounds == 0 {
        trace_debug!(bracket = s, skip_last, "bracket fully skipped");
        return Ok(());
    }

    let mut population: Vec<C> = (0..n).map(|_| generator.next_candidate()).collect();

    for round in 0..rounds {
        let n_configs = n as f64 / eta.powi(round as i32);
        let n_iterations = r * eta.powi(round as i32);

        trace_info!(
            bracket = s,
            round,
            population = population.len(),
            budget = n_iterations,
            "successive halving round"
        );

        let scores =
            evaluate_population(s, round, &population, n_iterations, evaluator, store, observer)?;

        // Keep the top floor(n_configs / eta) by score. The stable sort
        // breaks ties by original sample order.
        let keep = (n_configs / eta).floor() as usize;
        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(core::cmp::Ordering::Equal));
        ranked.truncate(keep);
        population = ranked.iter().map(|&(i, _)| population[i].clone()).collect();

        trace_debug!(bracket = s, round, survivors = population.len(), "survivors selected");
    }

    Ok(())
}

/// Evaluate every candidate in `population` at `budget`, in list order,
/// recording one result per candidate. Returns the scores in population
/// order.
///
/// This is the bracket's only hot loop and every candidate in it is
/// independent, so a bounded worker pool can replace the sequential
/// iteration without touching round or selection semantics — results
/// only need to come back paired with their originating index.
fn evaluate_population<C, E>(
    bracket: usize,
    round: usize,
    population: &[C],
    budget: f64,
    evaluator: &E,
    store: &ResultStore<C>,
    observer: Option<ObserverRef<'_, C>>,
) -> Result<Vec<f64>>
where
    C: Clone,
    E: Evaluator<C>,
{
    let mut scores = Vec::with_capacity(population.len());

    for config in population {
        let sequence = store.allocate_sequence();
        let started = Instant::now();

        let report =
            evaluator
                .evaluate(budget, config)
                .map_err(|e| Error::EvaluationFailed {
                    bracket,
                    round,
                    sequence,
                    message: e.to_string(),
                })?;

        if report.score.is_nan() {
            return Err(Error::MalformedTrialResult {
                bracket,
                round,
                sequence,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let elapsed_seconds = started.elapsed().as_secs_f64().round() as u64;

        let record = ResultRecord {
            sequence,
            configuration: config.clone(),
            budget,
            score: report.score,
            elapsed_seconds,
            metadata: report.metadata,
        };
        scores.push(record.score);

        store.record(record.clone());
        if let Some(observe) = observer {
            observe(&record, store.state());
        }
        trace_info!(sequence, score = record.score, "trial recorded");
    }

    Ok(scores)
}
