use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::types::{ResultRecord, SchedulerState};

/// Append-only, in-memory store of trial outcomes.
///
/// The store accumulates one [`ResultRecord`] per evaluator call, tracks
/// the running best score, and answers top-N queries. Records are never
/// mutated or reordered once appended; repeated
/// [`Scheduler::run`](crate::Scheduler::run) calls strictly extend the
/// history.
///
/// Appends are safe under concurrency (a read-write lock around the
/// record vector, an atomic sequence counter), so a parallelized
/// evaluation step can record results directly.
pub struct ResultStore<C> {
    records: Arc<RwLock<Vec<ResultRecord<C>>>>,
    next_sequence: AtomicU64,
    /// Running best as `(score, sequence)`.
    best: RwLock<Option<(f64, u64)>>,
}

impl<C> ResultStore<C> {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            next_sequence: AtomicU64::new(0),
            best: RwLock::new(None),
        }
    }

    /// Atomically allocate the next trial sequence number (1-based).
    pub(crate) fn allocate_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Append a record, updating the running best if its score is
    /// strictly greater. O(1) amortized.
    pub fn record(&self, record: ResultRecord<C>) {
        {
            let mut best = self.best.write();
            if best.is_none_or(|(score, _)| record.score > score) {
                *best = Some((record.score, record.sequence));
            }
        }
        self.records.write().push(record);
    }

    /// Number of records stored so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no trial has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// A snapshot of the accumulated scheduler state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        let best = *self.best.read();
        SchedulerState {
            trial_counter: self.next_sequence.load(Ordering::SeqCst),
            best_score: best.map_or(f64::NEG_INFINITY, |(score, _)| score),
            best_sequence: best.map(|(_, sequence)| sequence),
        }
    }
}

impl<C: Clone> ResultStore<C> {
    /// All records in append (sequence) order.
    #[must_use]
    pub fn records(&self) -> Vec<ResultRecord<C>> {
        self.records.read().clone()
    }

    /// The `n` records with the highest scores, descending, ties broken
    /// by earliest sequence number. Returns fewer when fewer exist.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<ResultRecord<C>> {
        let records = self.records.read();
        // Sort indices instead of cloning all records, then clone only the
        // top n. Records are stored in sequence order and the sort is
        // stable, so equal scores keep the earliest sequence first.
        let mut indices: Vec<usize> = (0..records.len()).collect();
        indices.sort_by(|&a, &b| {
            records[b]
                .score
                .partial_cmp(&records[a].score)
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        indices.truncate(n);
        indices.iter().map(|&i| records[i].clone()).collect()
    }

    /// The configuration of the best record so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] when no trial has been recorded.
    pub fn best_configuration(&self) -> Result<C> {
        let (_, sequence) = self.best.read().ok_or(Error::EmptyResult)?;
        let records = self.records.read();
        records
            .iter()
            .find(|r| r.sequence == sequence)
            .map(|r| r.configuration.clone())
            .ok_or(Error::EmptyResult)
    }
}

impl<C> Default for ResultStore<C> {
    fn default() -> Self {
        Self::new()
    }
}
