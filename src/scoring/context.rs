//! Per-run scoring state
//!
//! One [`ScoringContext`] is created per test run and passed by reference
//! through the policies and the runner. It owns the observer stack, the
//! skip predicate stack, the score accumulator and the counts.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use super::counts::Counts;
use super::dynamic::Dynamic;
use super::layering::{Observers, Outcome, SkipPredicate};
use super::score::Score;
use crate::common::{Error, Result};

/// Scoring state for one test run
#[derive(Default)]
pub struct ScoringContext {
    pub(super) frames: Vec<Observers>,
    pub(super) skip_predicates: Vec<SkipPredicate>,
    /// Frame whose callback is running, if any
    pub(super) cursor: Option<usize>,
    score: Dynamic<Score>,
    counts: Counts,
}

impl ScoringContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score held by the innermost binding
    pub fn score(&self) -> Result<Score> {
        self.score.get().copied()
    }

    pub fn set_score(&mut self, score: Score) -> Result<()> {
        self.score.set(score)
    }

    pub fn update_score(&mut self, f: impl FnOnce(Score) -> Score) -> Result<()> {
        self.score.update(f)
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Number of active observer frames
    pub fn layer_depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of live score bindings
    pub fn score_depth(&self) -> usize {
        self.score.depth()
    }

    /// Bind a fresh score for the lifetime of the returned scope
    pub fn bind_score(&mut self, initial: Score) -> ScoreScope<'_> {
        let depth = self.score.push(initial);
        debug!(depth, "score scope entered");
        ScoreScope { ctx: self, depth }
    }

    /// Run `body` with `initial` bound, returning the body's result and the
    /// score accumulated in the binding
    ///
    /// The binding is popped whether `body` returns, fails or panics.
    pub fn with_score<R>(
        &mut self,
        initial: Score,
        body: impl FnOnce(&mut ScoringContext) -> Result<R>,
    ) -> Result<(R, Score)> {
        let mut scope = self.bind_score(initial);
        let result = body(&mut scope)?;
        let score = scope.release()?;
        Ok((result, score))
    }

    /// Zero the binding at `depth` and every binding nested above it,
    /// keeping their maximums
    pub fn zero_scores_from(&mut self, depth: usize) -> Result<()> {
        self.score.update_from(depth, |score| *score = score.zeroed())
    }

    /// Record an outcome in the counts and emit it to the innermost layer
    pub fn report(&mut self, outcome: Outcome) -> Result<()> {
        self.counts.record(&outcome);
        self.emit(&outcome)
    }
}

/// Guard for one score binding; derefs to the whole context
pub struct ScoreScope<'a> {
    ctx: &'a mut ScoringContext,
    depth: usize,
}

impl ScoreScope<'_> {
    /// Pop the binding and return the score accumulated in it
    pub fn release(self) -> Result<Score> {
        let mut this = std::mem::ManuallyDrop::new(self);
        let depth = this.depth;
        let score = this.ctx.score.pop_to(depth).ok_or(Error::UnboundVariable)?;
        debug!(depth, %score, "score scope released");
        Ok(score)
    }
}

impl Deref for ScoreScope<'_> {
    type Target = ScoringContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for ScoreScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for ScoreScope<'_> {
    fn drop(&mut self) {
        if self.ctx.score.pop_to(self.depth).is_some() {
            debug!(depth = self.depth, "score scope dropped");
        }
    }
}
