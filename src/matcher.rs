//! The single-query observing unit.
//!
//! Resolution order follows the provider contract: a query string that names
//! an entry in an ancestor provider's registry reads that entry; otherwise a
//! live environment gets its own watch; otherwise the configured fallback
//! holds for the unit's whole lifetime.

use std::{cell::Cell, rc::Rc};

use matchmedia_reactive::{
    create_rw_signal, use_context, with_scope, RwSignal, Scope, SignalGet, SignalUpdate,
};
use tracing::{debug, warn};

use crate::{
    environment::{MediaEnvironment, WatchId},
    error::EnvironmentError,
    node::Node,
    provider::MediaQueries,
};

enum Mode {
    /// Reading one entry of an ancestor provider's registry.
    Provided { name: String, registry: MediaQueries },
    /// Own environment watch feeding a signal.
    Watched {
        matches: RwSignal<bool>,
        watch: Cell<Option<WatchId>>,
    },
    /// No live facility, or no usable configuration: constant fallback.
    Fallback,
}

impl std::fmt::Debug for MatchMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchMedia")
            .field("scope", &self.scope)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// A single media query's current boolean match state, updated reactively.
pub struct MatchMedia {
    scope: Scope,
    env: Rc<dyn MediaEnvironment>,
    mode: Mode,
    fallback: bool,
}

impl MatchMedia {
    /// Start observing `query`. The query string passes through to the
    /// environment unmodified, so a malformed expression surfaces as the
    /// environment's own error.
    ///
    /// `query = None` is a recoverable misconfiguration: it is logged and
    /// the unit degrades to the fallback rather than failing the tree.
    pub fn new(
        env: Rc<dyn MediaEnvironment>,
        query: Option<&str>,
        fallback: bool,
    ) -> Result<MatchMedia, EnvironmentError> {
        let scope = Scope::current().create_child();

        let mode = with_scope(scope, || -> Result<Mode, EnvironmentError> {
            let registry = use_context::<MediaQueries>();

            let query = match query {
                Some(query) => query,
                None => {
                    if registry.is_none() {
                        warn!("no query configured and no ancestor provider; exposing the fallback");
                    } else {
                        warn!("no query configured; exposing the fallback");
                    }
                    return Ok(Mode::Fallback);
                }
            };

            if let Some(registry) = registry.filter(|registry| registry.contains(query)) {
                debug!(name = query, "reading ancestor provider entry");
                return Ok(Mode::Provided {
                    name: query.to_string(),
                    registry,
                });
            }

            if !env.is_live() {
                return Ok(Mode::Fallback);
            }

            let matches = create_rw_signal(env.evaluate(query)?);
            let watch = env.watch(query, Rc::new(move |now| matches.set(now)))?;
            debug!(query, "registered media watch");
            Ok(Mode::Watched {
                matches,
                watch: Cell::new(Some(watch)),
            })
        });

        let mode = match mode {
            Ok(mode) => mode,
            Err(err) => {
                scope.dispose();
                return Err(err);
            }
        };

        Ok(MatchMedia {
            scope,
            env,
            mode,
            fallback,
        })
    }

    /// The current match state. Reading it inside an effect subscribes the
    /// effect, so consumers re-render on every change notification.
    pub fn matches(&self) -> bool {
        match &self.mode {
            Mode::Provided { name, registry } => registry.get(name).unwrap_or(self.fallback),
            Mode::Watched { matches, .. } => matches.try_get().unwrap_or(self.fallback),
            Mode::Fallback => self.fallback,
        }
    }

    /// The current match state, without subscribing.
    pub fn matches_untracked(&self) -> bool {
        match &self.mode {
            Mode::Provided { name, registry } => {
                registry.get_untracked(name).unwrap_or(self.fallback)
            }
            Mode::Watched { matches, .. } => matches.try_get_untracked().unwrap_or(self.fallback),
            Mode::Fallback => self.fallback,
        }
    }

    /// Function-as-child rendering: hands the current match state to the
    /// caller's rendering function and returns its nodes as-is, unwrapped.
    pub fn render(&self, children: impl FnOnce(bool) -> Vec<Node>) -> Vec<Node> {
        children(self.matches())
    }

    /// Detach the watch (if this unit owns one) and dispose its scope.
    /// Idempotent: a second call, or the implicit call on drop, is a no-op.
    pub fn dispose(&self) {
        if let Mode::Watched { watch, .. } = &self.mode {
            if let Some(id) = watch.take() {
                self.env.unwatch(id);
                debug!("detached media watch");
            }
        }
        self.scope.dispose();
    }
}

impl Drop for MatchMedia {
    fn drop(&mut self) {
        self.dispose();
    }
}
