//! Integration tests for the Hyperband scheduler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyperband::prelude::*;
use parking_lot::Mutex;

/// Generator sampling `x` uniformly in `[0.2, 0.9]`, seeded.
fn uniform_generator(seed: u64) -> impl Fn() -> f64 + Send + Sync {
    let rng = Mutex::new(fastrand::Rng::with_seed(seed));
    move || 0.2 + rng.lock().f64() * 0.7
}

/// Deterministic evaluator: `score = x * budget`.
fn linear(budget: f64, x: &f64) -> Result<TrialReport> {
    Ok(TrialReport::new(x * budget))
}

// =============================================================================
// Test: full (81, 3) schedule evaluates the exact number of trials
// =============================================================================

#[test]
fn full_schedule_trial_count() {
    let scheduler = Scheduler::builder(uniform_generator(1), linear)
        .build()
        .expect("default configuration is valid");

    let records = scheduler.run().expect("run should succeed");

    // Per bracket: 121 + 49 + 21 + 10 + 5 trials.
    assert_eq!(records.len(), 206);
    assert_eq!(scheduler.n_trials(), 206);
    assert_eq!(scheduler.state().trial_counter, 206);

    // Sequence numbers are strictly increasing and unique.
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.sequence, i as u64 + 1);
    }
}

// =============================================================================
// Test: best tracking matches the maximum over all records
// =============================================================================

#[test]
fn best_results_match_running_best() {
    let scheduler = Scheduler::builder(uniform_generator(2), linear)
        .build()
        .unwrap();
    let records = scheduler.run().unwrap();

    let max_score = records
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);

    let best = scheduler.best_results(1);
    assert_eq!(best.len(), 1);
    assert!((best[0].score - max_score).abs() < 1e-12);
    assert!((scheduler.state().best_score - max_score).abs() < 1e-12);
    assert_eq!(scheduler.state().best_sequence, Some(best[0].sequence));

    // TopN is sorted descending by score.
    let top = scheduler.best_results(20);
    assert_eq!(top.len(), 20);
    for pair in top.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

// =============================================================================
// Test: end-to-end quality — the winner is a top-decile sample
// =============================================================================

#[test]
fn best_configuration_lands_in_top_decile() {
    let scheduler = Scheduler::builder(uniform_generator(42), linear)
        .build()
        .unwrap();
    let records = scheduler.run().unwrap();

    // Every sampled configuration is evaluated at least once, so the
    // record list contains the whole sampled population.
    let mut sampled: Vec<f64> = records.iter().map(|r| r.configuration).collect();
    sampled.sort_by(|a, b| a.partial_cmp(b).unwrap());
    sampled.dedup();

    let decile_threshold = sampled[sampled.len() * 9 / 10];
    let best = scheduler.best_configuration().unwrap();
    assert!(
        best >= decile_threshold,
        "best x {best} should be in the top decile (>= {decile_threshold})"
    );
}

// =============================================================================
// Test: repeated run strictly appends, never rewrites history
// =============================================================================

#[test]
fn repeated_run_appends_to_history() {
    let scheduler = Scheduler::builder(uniform_generator(3), linear)
        .build()
        .unwrap();

    let first = scheduler.run().unwrap();
    assert_eq!(first.len(), 206);

    let second = scheduler.run().unwrap();
    assert_eq!(second.len(), 412);

    // The first run's records are unchanged in the accumulated history.
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.sequence, b.sequence);
        assert!((a.score - b.score).abs() < 1e-12);
    }
    assert_eq!(second[206].sequence, 207);
}

// =============================================================================
// Test: contract violations are fatal
// =============================================================================

#[test]
fn nan_score_fails_the_run() {
    let scheduler = Scheduler::builder(uniform_generator(4), |_budget: f64, _x: &f64| {
        Ok::<_, Error>(TrialReport::new(f64::NAN))
    })
    .build()
    .unwrap();

    let err = scheduler.run().unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedTrialResult {
            bracket: 4,
            round: 0,
            sequence: 1,
        }
    ));
    // No record is stored for the offending call.
    assert_eq!(scheduler.n_trials(), 0);
    assert!(matches!(
        scheduler.best_configuration(),
        Err(Error::EmptyResult)
    ));
}

#[test]
fn evaluator_error_fails_the_run() {
    let scheduler = Scheduler::builder(uniform_generator(5), |_budget: f64, _x: &f64| {
        Err::<TrialReport, _>("gpu on fire")
    })
    .build()
    .unwrap();

    let err = scheduler.run().unwrap_err();
    match err {
        Error::EvaluationFailed { message, .. } => assert_eq!(message, "gpu on fire"),
        other => panic!("expected EvaluationFailed, got {other:?}"),
    }
}

// =============================================================================
// Test: observer sees every trial with a consistent state snapshot
// =============================================================================

#[test]
fn observer_sees_every_trial() {
    let seen = Arc::new(AtomicUsize::new(0));
    let running_best = Arc::new(Mutex::new(f64::NEG_INFINITY));

    let seen_in_observer = Arc::clone(&seen);
    let best_in_observer = Arc::clone(&running_best);
    let scheduler = Scheduler::builder(uniform_generator(6), linear)
        .observer(move |record: &ResultRecord<f64>, state: SchedulerState| {
            seen_in_observer.fetch_add(1, Ordering::SeqCst);
            let mut best = best_in_observer.lock();
            *best = best.max(record.score);
            // The snapshot already includes this trial.
            assert!((state.best_score - *best).abs() < 1e-12);
            assert!(state.trial_counter >= record.sequence);
        })
        .build()
        .unwrap();

    scheduler.run().unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 206);
}

// =============================================================================
// Test: skip_last larger than every bracket runs nothing
// =============================================================================

#[test]
fn skip_last_beyond_all_brackets_runs_nothing() {
    let sampled = Arc::new(AtomicUsize::new(0));
    let sampled_in_generator = Arc::clone(&sampled);
    let scheduler = Scheduler::builder(
        move || {
            sampled_in_generator.fetch_add(1, Ordering::SeqCst);
            0.5_f64
        },
        linear,
    )
    .skip_last(10)
    .build()
    .unwrap();

    let records = scheduler.run().unwrap();
    assert!(records.is_empty());
    assert_eq!(sampled.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Test: metadata flows from the evaluator into the stored record
// =============================================================================

#[test]
fn metadata_is_carried_into_records() {
    let scheduler = Scheduler::builder(uniform_generator(7), |budget: f64, x: &f64| {
        Ok::<_, Error>(
            TrialReport::new(x * budget)
                .with_meta("val_loss", 1.0 - x)
                .with_meta("backend", "stub"),
        )
    })
    .max_budget(3.0)
    .build()
    .unwrap();

    let records = scheduler.run().unwrap();
    assert!(!records.is_empty());
    for record in &records {
        assert_eq!(
            record.metadata.get("backend"),
            Some(&MetaValue::String("stub".to_string()))
        );
        assert!(matches!(
            record.metadata.get("val_loss"),
            Some(MetaValue::Float(_))
        ));
    }
}
