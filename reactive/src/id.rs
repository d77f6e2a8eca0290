use std::sync::atomic::AtomicU64;

use crate::{effect::observer_clean_up, runtime::RUNTIME, signal::Signal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash)]
/// A stable identifier for an element of the reactive system.
pub(crate) struct Id(u64);

impl Id {
    pub(crate) fn next() -> Id {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Id(COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed))
    }

    pub(crate) fn signal(&self) -> Option<Signal> {
        RUNTIME
            .try_with(|runtime| runtime.signals.borrow().get(self).cloned())
            .ok()
            .flatten()
    }

    pub(crate) fn add_signal(&self, signal: Signal) {
        RUNTIME.with(|runtime| runtime.signals.borrow_mut().insert(*self, signal));
    }

    /// Record this Id as a child of the current Scope, and remember the
    /// parent link so that scoped context lookups can walk upward.
    pub(crate) fn set_scope(&self) {
        RUNTIME.with(|runtime| {
            let scope = *runtime.current_scope.borrow();
            runtime
                .children
                .borrow_mut()
                .entry(scope)
                .or_default()
                .insert(*self);
            runtime.parents.borrow_mut().insert(*self, scope);
        });
    }

    /// Dispose every child of this Id, but keep the Id itself (and its
    /// parent link) alive. Effects use this between runs.
    pub(crate) fn dispose_children(&self) {
        let children = RUNTIME
            .try_with(|runtime| runtime.children.borrow_mut().remove(self))
            .ok()
            .flatten();
        if let Some(children) = children {
            for child in children {
                child.dispose();
            }
        }
    }

    /// Dispose this Id and everything under it. Safe to call repeatedly, and
    /// safe during thread teardown when the runtime is already gone.
    pub(crate) fn dispose(&self) {
        self.dispose_children();

        let signal = RUNTIME
            .try_with(|runtime| {
                runtime.parents.borrow_mut().remove(self);
                runtime.contexts.borrow_mut().remove(self);
                runtime.signals.borrow_mut().remove(self)
            })
            .ok()
            .flatten();

        if let Some(signal) = signal {
            for (_, effect) in signal.subscribers() {
                observer_clean_up(&effect);
            }
        }
    }
}
