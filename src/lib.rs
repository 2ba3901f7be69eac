#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Hyperband: an adaptive resource-allocation scheduler for black-box
//! optimization (typically hyperparameter search). Hyperband trades off
//! "explore many candidates briefly" against "exploit promising candidates
//! longer" by running several successive-halving brackets, each with a
//! different balance between initial population size and starting budget.
//!
//! The crate owns the scheduling arithmetic only. What a configuration
//! *means* and how a budget is *spent* belong to two collaborators you
//! supply: a [`ConfigGenerator`] that samples candidate configurations and
//! an [`Evaluator`] that runs the workload and reports a score.
//!
//! # Getting Started
//!
//! Maximize `score = x * budget` over randomly sampled `x`:
//!
//! ```
//! use hyperband::prelude::*;
//! use parking_lot::Mutex;
//!
//! let rng = Mutex::new(fastrand::Rng::with_seed(7));
//! let scheduler = Scheduler::builder(
//!     move || 0.2 + rng.lock().f64() * 0.7,
//!     |budget: f64, x: &f64| Ok::<_, Error>(TrialReport::new(x * budget)),
//! )
//! .max_budget(27.0)
//! .eta(3.0)
//! .build()
//! .unwrap();
//!
//! let records = scheduler.run().unwrap();
//! assert!(!records.is_empty());
//!
//! let best = scheduler.best_configuration().unwrap();
//! assert!((0.2..=0.9).contains(&best));
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Scheduler`] | Drive the full Hyperband schedule: plan brackets, run rounds, track results. |
//! | [`BracketPlanner`] | Pure arithmetic deriving the bracket table from `(max_budget, eta)`. |
//! | [`ResultStore`] | Append-only record of every trial, with running-best and top-N queries. |
//! | [`ConfigGenerator`] | Collaborator producing one candidate configuration per call. |
//! | [`Evaluator`] | Collaborator running one configuration at a given budget. |
//!
//! The configuration type is an opaque generic `C`: the scheduler forwards
//! values to the evaluator and stores clones in [`ResultRecord`]s, but never
//! inspects them.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on the public value types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at round and trial boundaries | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod bracket;
mod error;
mod evaluator;
mod halving;
mod scheduler;
mod store;
mod types;

pub use bracket::{Bracket, BracketPlanner};
pub use error::{Error, Result};
pub use evaluator::{ConfigGenerator, Evaluator};
pub use scheduler::{Scheduler, SchedulerBuilder, TrialObserver};
pub use store::ResultStore;
pub use types::{MetaValue, ResultRecord, SchedulerState, TrialReport};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use hyperband::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bracket::{Bracket, BracketPlanner};
    pub use crate::error::{Error, Result};
    pub use crate::evaluator::{ConfigGenerator, Evaluator};
    pub use crate::scheduler::{Scheduler, SchedulerBuilder, TrialObserver};
    pub use crate::store::ResultStore;
    pub use crate::types::{MetaValue, ResultRecord, SchedulerState, TrialReport};
}
