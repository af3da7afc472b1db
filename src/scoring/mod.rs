//! Composable scoring
//!
//! Checks report [`Outcome`]s into a [`ScoringContext`]. Layers of observers
//! turn those outcomes into a [`Score`] according to the active policies
//! ([`cumulative`], [`scale`], [`all_or_nothing`]), while a skip gate lets
//! a policy stop the remaining checks of its scope from running.

mod context;
mod counts;
mod dynamic;
mod layering;
mod policy;
mod score;

pub use context::{ScoreScope, ScoringContext};
pub use counts::Counts;
pub use dynamic::Dynamic;
pub use layering::{Callback, Layer, Observers, Outcome, SkipPredicate};
pub use policy::{all_or_nothing, cumulative, keep_score, scale};
pub use score::Score;
