//! Scoring policies
//!
//! Policies wrap a body that reports outcomes and decide how those outcomes
//! turn into a score. They nest freely, e.g. `scale(50)` around two
//! `all_or_nothing` groups each holding a few checks.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::context::ScoringContext;
use super::layering::{Observers, SkipPredicate};
use super::score::Score;
use crate::common::Result;

/// Outermost scope of a run
///
/// Binds an empty score, counts every check with [`cumulative`], and
/// returns the body's result together with the final score.
pub fn keep_score<R>(
    ctx: &mut ScoringContext,
    body: impl FnOnce(&mut ScoringContext) -> Result<R>,
) -> Result<(R, Score)> {
    ctx.with_score(Score::zero(), |ctx| cumulative(ctx, body))
}

/// One point per check: pass adds `1/1`, fail and skip add `0/1`
pub fn cumulative<R>(
    ctx: &mut ScoringContext,
    body: impl FnOnce(&mut ScoringContext) -> Result<R>,
) -> Result<R> {
    let observers = Observers::new()
        .on_pass(|ctx, _| add_to_score(ctx, 1.0, 1.0))
        .on_fail(|ctx, _| add_to_score(ctx, 0.0, 1.0))
        .on_skip(|ctx, _| add_to_score(ctx, 0.0, 1.0));

    ctx.with_layer(observers, None, body)
}

fn add_to_score(ctx: &mut ScoringContext, value: f64, maximum: f64) -> Result<()> {
    let delta = Score::new(value, maximum)?;
    ctx.update_score(|score| score + delta)
}

/// Rescale whatever `body` scores to `maximum`
///
/// The body accumulates into a fresh binding. Its rescaled score is then
/// added to the enclosing binding. A body that scored nothing contributes
/// `0/maximum`.
pub fn scale<R>(
    ctx: &mut ScoringContext,
    maximum: f64,
    body: impl FnOnce(&mut ScoringContext) -> Result<R>,
) -> Result<R> {
    let empty = Score::new(0.0, maximum)?;

    let (result, inner) = ctx.with_score(Score::zero(), body)?;

    let contribution = if inner.maximum() == 0.0 {
        empty
    } else {
        inner.rescale(maximum)?
    };
    debug!(%inner, %contribution, "scaled scope");

    ctx.update_score(|score| score + contribution)?;
    Ok(result)
}

/// Score nothing unless every check passes
///
/// A failure anywhere inside, nested policies included, zeroes the score
/// bound when the group was entered, keeping its maximum. Bindings opened
/// inside the group are zeroed too. Every check after the failure is
/// skipped without running.
pub fn all_or_nothing<R>(
    ctx: &mut ScoringContext,
    body: impl FnOnce(&mut ScoringContext) -> Result<R>,
) -> Result<R> {
    let failed = Rc::new(Cell::new(false));
    let enclosing = ctx.score_depth().saturating_sub(1);

    let flag = failed.clone();
    let observers = Observers::forwarding().watch_failures(move |ctx, _| {
        ctx.zero_scores_from(enclosing)?;
        if !flag.replace(true) {
            debug!("all-or-nothing group failed, skipping the rest");
        }
        Ok(())
    });

    let skip_if: SkipPredicate = Box::new(move || failed.get());
    ctx.with_layer(observers, Some(skip_if), body)
}
