//! A headless [MediaEnvironment] driven by a simulated viewport.
//!
//! Useful for tests and for rendering outside a real window system. It
//! evaluates the practical subset of media expressions this library's
//! consumers use for breakpoints: `(min-width: Npx)`, `(max-width: Npx)`,
//! `(min-height: Npx)` and `(max-height: Npx)`, joined with `and`. Anything
//! else is malformed and fails in this facility's own failure domain.

use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    environment::{MediaEnvironment, WatchCallback, WatchId},
    error::EnvironmentError,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Feature {
    Width,
    Height,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Bound {
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Clause {
    feature: Feature,
    bound: Bound,
    px: f64,
}

impl Clause {
    fn matches(&self, width: f64, height: f64) -> bool {
        let value = match self.feature {
            Feature::Width => width,
            Feature::Height => height,
        };
        match self.bound {
            Bound::Min => value >= self.px,
            Bound::Max => value <= self.px,
        }
    }
}

/// A parsed query: a conjunction of clauses.
#[derive(Clone, Debug, PartialEq)]
struct Condition {
    clauses: Vec<Clause>,
}

impl Condition {
    fn parse(query: &str) -> Result<Condition, EnvironmentError> {
        let malformed = || EnvironmentError::Malformed(query.to_string());

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(malformed());
        }

        let mut clauses = Vec::new();
        for part in trimmed.split(" and ") {
            let part = part.trim();
            let inner = part
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(malformed)?;
            let (name, value) = inner.split_once(':').ok_or_else(malformed)?;

            let (bound, feature) = match name.trim() {
                "min-width" => (Bound::Min, Feature::Width),
                "max-width" => (Bound::Max, Feature::Width),
                "min-height" => (Bound::Min, Feature::Height),
                "max-height" => (Bound::Max, Feature::Height),
                _ => return Err(malformed()),
            };

            let px = value
                .trim()
                .strip_suffix("px")
                .ok_or_else(malformed)?
                .trim()
                .parse::<f64>()
                .map_err(|_| malformed())?;

            clauses.push(Clause { feature, bound, px });
        }

        Ok(Condition { clauses })
    }

    fn matches(&self, width: f64, height: f64) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.matches(width, height))
    }
}

struct Watcher {
    condition: Condition,
    callback: WatchCallback,
    matched: bool,
}

struct State {
    width: f64,
    height: f64,
    // Registration order is notification order.
    watchers: IndexMap<WatchId, Watcher>,
}

/// A live, in-process matching facility over a simulated viewport.
///
/// Cloning yields another handle to the same viewport, so a test can keep
/// one handle to drive [set_viewport](HeadlessEnvironment::set_viewport)
/// while components hold the other.
#[derive(Clone)]
pub struct HeadlessEnvironment {
    state: Rc<RefCell<State>>,
}

impl HeadlessEnvironment {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                width,
                height,
                watchers: IndexMap::new(),
            })),
        }
    }

    /// Resize the simulated viewport. Watchers whose match state flips are
    /// notified synchronously, in registration order, before this returns.
    pub fn set_viewport(&self, width: f64, height: f64) {
        // Collect notifications first so callbacks run without the state
        // borrowed; a callback may re-enter through evaluate or unwatch.
        let pending: Vec<(WatchCallback, bool)> = {
            let mut state = self.state.borrow_mut();
            state.width = width;
            state.height = height;

            let mut pending = Vec::new();
            for watcher in state.watchers.values_mut() {
                let now = watcher.condition.matches(width, height);
                if now != watcher.matched {
                    watcher.matched = now;
                    pending.push((watcher.callback.clone(), now));
                }
            }
            pending
        };

        for (callback, matches) in pending {
            callback(matches);
        }
    }

    /// Resize only the viewport width, keeping the current height.
    pub fn set_viewport_width(&self, width: f64) {
        let height = self.state.borrow().height;
        self.set_viewport(width, height);
    }

    /// Number of currently attached watches. Tests use this to assert that
    /// teardown detached everything.
    pub fn watch_count(&self) -> usize {
        self.state.borrow().watchers.len()
    }
}

impl Default for HeadlessEnvironment {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl MediaEnvironment for HeadlessEnvironment {
    fn is_live(&self) -> bool {
        true
    }

    fn evaluate(&self, query: &str) -> Result<bool, EnvironmentError> {
        let condition = Condition::parse(query)?;
        let state = self.state.borrow();
        Ok(condition.matches(state.width, state.height))
    }

    fn watch(&self, query: &str, callback: WatchCallback) -> Result<WatchId, EnvironmentError> {
        let condition = Condition::parse(query)?;
        let id = WatchId::next();
        let mut state = self.state.borrow_mut();
        let matched = condition.matches(state.width, state.height);
        state.watchers.insert(
            id,
            Watcher {
                condition,
                callback,
                matched,
            },
        );
        Ok(id)
    }

    fn unwatch(&self, id: WatchId) {
        self.state.borrow_mut().watchers.shift_remove(&id);
    }
}
