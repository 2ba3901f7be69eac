//! Bracket planning arithmetic.
//!
//! Hyperband runs `s_max + 1` successive-halving brackets, each a
//! different trade-off between the number of configurations and the
//! starting budget:
//!
//! - **Bracket `s_max`**: many configurations, small starting budget
//!   (aggressive early elimination)
//! - **Bracket `0`**: few configurations, full budget (no elimination)
//!
//! For `max_budget = 81` and `eta = 3` the plan is:
//!
//! | `s` | population `n` | starting budget `r` |
//! |-----|---------------|---------------------|
//! | 4   | 81            | 1                   |
//! | 3   | 34            | 3                   |
//! | 2   | 15            | 9                   |
//! | 1   | 8             | 27                  |
//! | 0   | 5             | 81                  |
//!
//! The plan is a deterministic pure function of `(max_budget, eta)`;
//! no randomness, no side effects.

use crate::error::{Error, Result};

/// One (population size, starting budget) exploration strategy within
/// the overall search. Derived by [`BracketPlanner`], never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bracket {
    /// The bracket index `s`, counting down from `s_max` to 0.
    pub index: usize,
    /// Number of configurations sampled at the start of the bracket.
    pub initial_population: usize,
    /// Per-candidate budget for the bracket's first round.
    pub initial_budget: f64,
}

/// Computes the Hyperband bracket schedule for a fixed total budget.
///
/// Given `max_budget` (the largest feasible per-candidate resource) and
/// the downsample rate `eta`:
///
/// - `s_max = floor(ln(max_budget) / ln(eta))`
/// - total budget `B = (s_max + 1) * max_budget`
/// - bracket `s` starts with `n = ceil(B / max_budget / (s + 1) * eta^s)`
///   configurations at `r = max_budget / eta^s` budget each.
///
/// Rounding policy, pinned for reproducibility: initial populations use
/// `ceil`, survivor counts use `floor`, budgets stay exact `f64`.
///
/// # Examples
///
/// ```
/// use hyperband::BracketPlanner;
///
/// let planner = BracketPlanner::new(81.0, 3.0).unwrap();
/// assert_eq!(planner.s_max(), 4);
/// assert_eq!(planner.total_budget(), 405.0);
///
/// let brackets = planner.brackets();
/// assert_eq!(brackets[0].initial_population, 81); // s = 4, most exploratory
/// assert_eq!(brackets[4].initial_population, 5); // s = 0, full budget
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BracketPlanner {
    max_budget: f64,
    eta: f64,
    s_max: usize,
}

impl BracketPlanner {
    /// Create a planner for the given budget ceiling and downsample rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBracketConfiguration`] unless
    /// `max_budget >= 1` and `eta > 1` (both finite); anything else would
    /// make `s_max` negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(max_budget: f64, eta: f64) -> Result<Self> {
        if !max_budget.is_finite() || !eta.is_finite() || max_budget < 1.0 || eta <= 1.0 {
            return Err(Error::InvalidBracketConfiguration { max_budget, eta });
        }
        let s_max = (max_budget.ln() / eta.ln()).floor() as usize;
        Ok(Self {
            max_budget,
            eta,
            s_max,
        })
    }

    /// The largest bracket index (`floor(ln(max_budget) / ln(eta))`).
    #[must_use]
    pub fn s_max(&self) -> usize {
        self.s_max
    }

    /// The budget ceiling this planner was built with.
    #[must_use]
    pub fn max_budget(&self) -> f64 {
        self.max_budget
    }

    /// The downsample rate this planner was built with.
    #[must_use]
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Total budget `B = (s_max + 1) * max_budget` spread across brackets.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn total_budget(&self) -> f64 {
        (self.s_max as f64 + 1.0) * self.max_budget
    }

    /// All brackets, most exploratory first (`s = s_max` down to `0`).
    #[must_use]
    pub fn brackets(&self) -> Vec<Bracket> {
        (0..=self.s_max).rev().map(|s| self.bracket(s)).collect()
    }

    /// The bracket at index `s`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn bracket(&self, s: usize) -> Bracket {
        let s_f = s as f64;
        let power = self.eta.powi(s as i32);
        let n = (self.total_budget() / self.max_budget / (s_f + 1.0) * power).ceil() as usize;
        let r = self.max_budget / power;
        Bracket {
            index: s,
            initial_population: n,
            initial_budget: r,
        }
    }
}
