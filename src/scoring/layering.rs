//! Observer layers and the skip gate
//!
//! A layer is one frame of pass/fail/skip callbacks, optionally paired with
//! a skip predicate. Layers nest LIFO and are removed by their guard on
//! every exit path.
//!
//! Events go to the innermost frame only. A callback that wants enclosing
//! layers to see the event calls [`ScoringContext::forward`] itself, which
//! lets each policy decide whether to pass an event on, translate it, or
//! swallow it.
//!
//! Failures are also shown to every frame registered with
//! [`Observers::watch_failures`], after the innermost frame has handled
//! them. A watcher sees failures from anywhere inside its layer, whatever
//! the frames in between did with the event.

use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use super::context::ScoringContext;
use crate::common::Result;

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(String),
    Skip,
}

/// Observer callback invoked with the context and the event being handled
pub type Callback = Box<dyn FnMut(&mut ScoringContext, &Outcome) -> Result<()>>;

/// Returns true when the upcoming check must be skipped
pub type SkipPredicate = Box<dyn Fn() -> bool>;

/// One frame of callbacks; a missing callback ignores its event
#[derive(Default)]
pub struct Observers {
    on_pass: Option<Callback>,
    on_fail: Option<Callback>,
    on_skip: Option<Callback>,
    failure_watch: Option<Callback>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame that hands every event to the next-outer frame
    pub fn forwarding() -> Self {
        Self::new()
            .on_pass(forward)
            .on_fail(forward)
            .on_skip(forward)
    }

    pub fn on_pass(
        mut self,
        callback: impl FnMut(&mut ScoringContext, &Outcome) -> Result<()> + 'static,
    ) -> Self {
        self.on_pass = Some(Box::new(callback));
        self
    }

    pub fn on_fail(
        mut self,
        callback: impl FnMut(&mut ScoringContext, &Outcome) -> Result<()> + 'static,
    ) -> Self {
        self.on_fail = Some(Box::new(callback));
        self
    }

    pub fn on_skip(
        mut self,
        callback: impl FnMut(&mut ScoringContext, &Outcome) -> Result<()> + 'static,
    ) -> Self {
        self.on_skip = Some(Box::new(callback));
        self
    }

    /// Called for every failure reported inside this layer
    pub fn watch_failures(
        mut self,
        callback: impl FnMut(&mut ScoringContext, &Outcome) -> Result<()> + 'static,
    ) -> Self {
        self.failure_watch = Some(Box::new(callback));
        self
    }

    fn slot(&mut self, outcome: &Outcome) -> &mut Option<Callback> {
        match outcome {
            Outcome::Pass => &mut self.on_pass,
            Outcome::Fail(_) => &mut self.on_fail,
            Outcome::Skip => &mut self.on_skip,
        }
    }
}

fn forward(ctx: &mut ScoringContext, outcome: &Outcome) -> Result<()> {
    ctx.forward(outcome)
}

impl ScoringContext {
    /// Push an observer frame and, if given, a skip predicate
    pub fn enter_layer(
        &mut self,
        observers: Observers,
        skip_if: Option<SkipPredicate>,
    ) -> Layer<'_> {
        let frames = self.frames.len();
        let predicates = self.skip_predicates.len();

        self.frames.push(observers);
        if let Some(predicate) = skip_if {
            self.skip_predicates.push(predicate);
        }
        debug!(depth = frames + 1, "layer entered");

        Layer {
            ctx: self,
            frames,
            predicates,
        }
    }

    /// Run `body` inside a layer
    pub fn with_layer<R>(
        &mut self,
        observers: Observers,
        skip_if: Option<SkipPredicate>,
        body: impl FnOnce(&mut ScoringContext) -> Result<R>,
    ) -> Result<R> {
        let mut layer = self.enter_layer(observers, skip_if);
        body(&mut layer)
    }

    /// Deliver an event to the innermost frame, then show failures to
    /// every watching frame, innermost first
    pub fn emit(&mut self, outcome: &Outcome) -> Result<()> {
        self.dispatch(self.frames.len(), outcome)?;
        if matches!(outcome, Outcome::Fail(_)) {
            for index in (0..self.frames.len()).rev() {
                self.invoke(index, outcome, |frame| &mut frame.failure_watch)?;
            }
        }
        Ok(())
    }

    /// Deliver an event to the frame enclosing the one currently handling it
    ///
    /// Outside of a callback this behaves like [`emit`](Self::emit).
    pub fn forward(&mut self, outcome: &Outcome) -> Result<()> {
        let above = self.cursor.unwrap_or(self.frames.len());
        self.dispatch(above, outcome)
    }

    /// True if any active skip predicate asks for a skip
    pub fn should_skip(&self) -> bool {
        self.skip_predicates.iter().rev().any(|predicate| predicate())
    }

    /// Invoke the callback of the frame directly below `above`
    fn dispatch(&mut self, above: usize, outcome: &Outcome) -> Result<()> {
        let Some(index) = above.checked_sub(1) else {
            trace!(?outcome, "event reached the bottom of the layer stack");
            return Ok(());
        };
        self.invoke(index, outcome, |frame| frame.slot(outcome))
    }

    /// Run the callback that `slot` selects in frame `index`, if it has one
    fn invoke(
        &mut self,
        index: usize,
        outcome: &Outcome,
        slot: impl Fn(&mut Observers) -> &mut Option<Callback>,
    ) -> Result<()> {
        // The callback is taken out of its frame while it runs so that it
        // can receive the context mutably.
        let Some(mut callback) = self.frames.get_mut(index).and_then(|f| slot(f).take()) else {
            trace!(index, ?outcome, "no observer for event");
            return Ok(());
        };

        trace!(index, ?outcome, "dispatching event");
        let saved = self.cursor.replace(index);
        let result = callback(self, outcome);
        self.cursor = saved;

        if let Some(frame) = self.frames.get_mut(index) {
            *slot(frame) = Some(callback);
        }
        result
    }
}

/// Guard for one layer; derefs to the whole context
pub struct Layer<'a> {
    ctx: &'a mut ScoringContext,
    frames: usize,
    predicates: usize,
}

impl Deref for Layer<'_> {
    type Target = ScoringContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for Layer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for Layer<'_> {
    fn drop(&mut self) {
        self.ctx.frames.truncate(self.frames);
        self.ctx.skip_predicates.truncate(self.predicates);
        debug!(depth = self.frames, "layer exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn record(
        log: Rc<RefCell<Vec<String>>>,
        tag: &'static str,
    ) -> impl FnMut(&mut ScoringContext, &Outcome) -> Result<()> + 'static {
        move |_, outcome| {
            log.borrow_mut().push(format!("{tag}:{outcome:?}"));
            Ok(())
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Observers {
        Observers::new()
            .on_pass(record(log.clone(), tag))
            .on_fail(record(log.clone(), tag))
            .on_skip(record(log.clone(), tag))
    }

    #[test]
    fn test_emit_reaches_innermost_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ScoringContext::new();

        let mut outer = ctx.enter_layer(recorder(&log, "outer"), None);
        let mut inner = outer.enter_layer(recorder(&log, "inner"), None);
        inner.emit(&Outcome::Pass).unwrap();
        drop(inner);
        outer.emit(&Outcome::Skip).unwrap();

        assert_eq!(*log.borrow(), vec!["inner:Pass", "outer:Skip"]);
    }

    #[test]
    fn test_forwarding_frame_passes_events_outward() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ScoringContext::new();

        let mut outer = ctx.enter_layer(recorder(&log, "outer"), None);
        let mut middle = outer.enter_layer(Observers::forwarding(), None);
        let mut inner = middle.enter_layer(Observers::forwarding(), None);
        inner.emit(&Outcome::Fail("bad".to_string())).unwrap();

        assert_eq!(*log.borrow(), vec!["outer:Fail(\"bad\")"]);
    }

    #[test]
    fn test_omitted_callbacks_are_noops() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ScoringContext::new();

        let mut outer = ctx.enter_layer(recorder(&log, "outer"), None);
        let mut inner = outer.enter_layer(Observers::new().on_pass(forward), None);
        inner.emit(&Outcome::Skip).unwrap();
        inner.emit(&Outcome::Pass).unwrap();

        assert_eq!(*log.borrow(), vec!["outer:Pass"]);
    }

    #[test]
    fn test_failure_watchers_see_failures_past_swallowing_frames() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ScoringContext::new();

        let mut outer = ctx.enter_layer(
            Observers::new().watch_failures(record(log.clone(), "outer-watch")),
            None,
        );
        let mut middle = outer.enter_layer(
            Observers::new().watch_failures(record(log.clone(), "middle-watch")),
            None,
        );
        // Handles every event without forwarding
        let mut inner = middle.enter_layer(recorder(&log, "inner"), None);
        inner.emit(&Outcome::Pass).unwrap();
        inner.emit(&Outcome::Fail("bad".to_string())).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "inner:Pass",
                "inner:Fail(\"bad\")",
                "middle-watch:Fail(\"bad\")",
                "outer-watch:Fail(\"bad\")",
            ]
        );
    }

    #[test]
    fn test_forward_does_not_reach_watchers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ScoringContext::new();

        let mut layer = ctx.enter_layer(
            Observers::forwarding().watch_failures(record(log.clone(), "watch")),
            None,
        );
        layer.forward(&Outcome::Fail("x".to_string())).unwrap();
        assert!(log.borrow().is_empty());

        layer.emit(&Outcome::Fail("y".to_string())).unwrap();
        assert_eq!(*log.borrow(), vec!["watch:Fail(\"y\")"]);
    }

    #[test]
    fn test_callbacks_survive_repeated_events() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut ctx = ScoringContext::new();

        let mut layer = ctx.enter_layer(
            Observers::new().on_pass(move |_, _| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
            None,
        );
        for _ in 0..3 {
            layer.emit(&Outcome::Pass).unwrap();
        }
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_skip_gate_any_predicate() {
        let flag = Rc::new(Cell::new(false));
        let mut ctx = ScoringContext::new();
        assert!(!ctx.should_skip());

        let seen = flag.clone();
        let outer_skip: SkipPredicate = Box::new(move || seen.get());
        let inner_skip: SkipPredicate = Box::new(|| false);
        let mut outer = ctx.enter_layer(Observers::new(), Some(outer_skip));
        let inner = outer.enter_layer(Observers::new(), Some(inner_skip));
        assert!(!inner.should_skip());

        flag.set(true);
        assert!(inner.should_skip());
        drop(inner);
        drop(outer);
        assert!(!ctx.should_skip());
    }

    #[test]
    fn test_layers_released_on_error() {
        let mut ctx = ScoringContext::new();
        let always: SkipPredicate = Box::new(|| true);
        let result: Result<()> = ctx.with_layer(Observers::new(), Some(always), |ctx| {
            ctx.with_layer(Observers::new(), None, |_| {
                Err(Error::Internal("inner body failed".to_string()))
            })
        });

        assert!(result.is_err());
        assert_eq!(ctx.layer_depth(), 0);
        assert!(!ctx.should_skip());
    }

    #[test]
    fn test_callback_error_propagates_and_frame_is_kept() {
        let mut ctx = ScoringContext::new();
        let mut layer = ctx.enter_layer(
            Observers::new().on_fail(|_, _| Err(Error::Internal("observer failed".to_string()))),
            None,
        );

        assert!(layer.emit(&Outcome::Fail("x".to_string())).is_err());
        assert!(layer.emit(&Outcome::Fail("y".to_string())).is_err());
        assert_eq!(layer.layer_depth(), 1);
    }
}
