use std::{any::Any, cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::{
    id::Id,
    runtime::RUNTIME,
    scope::{with_scope, Scope},
    signal::Signal,
};

pub(crate) trait EffectTrait {
    fn id(&self) -> Id;
    fn run(&self);
    fn add_observer(&self, signal: Signal);
    fn current_observers(&self) -> FxHashMap<Id, Signal>;
    fn clear_observers(&self);
}

struct Effect<T, F>
where
    T: 'static,
    F: Fn(Option<T>) -> T,
{
    id: Id,
    f: F,
    value: RefCell<Option<T>>,
    observers: Rc<RefCell<FxHashMap<Id, Signal>>>,
}

impl<T, F> Drop for Effect<T, F>
where
    T: 'static,
    F: Fn(Option<T>) -> T,
{
    fn drop(&mut self) {
        self.id.dispose();
    }
}

/// Create an Effect that re-runs whenever a Signal it accessed in its last
/// run changes.
///
/// The given function runs immediately once, tracking all the signals it
/// subscribed to in that run. When any of those Signals update, the function
/// re-runs, and the signals are re-tracked on each run so only the signals
/// actually read in the last run can trigger it again.
pub fn create_effect<T>(f: impl Fn(Option<T>) -> T + 'static)
where
    T: Any + 'static,
{
    let id = Id::next();
    let effect = Rc::new(Effect {
        id,
        f,
        value: RefCell::new(None),
        observers: Rc::new(RefCell::new(FxHashMap::default())),
    });
    id.set_scope();

    run_effect(effect);
}

/// Signal accesses wrapped in untrack will not subscribe the current effect
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let prev_effect = RUNTIME.with(|runtime| runtime.current_effect.borrow_mut().take());
    let result = f();
    RUNTIME.with(|runtime| {
        *runtime.current_effect.borrow_mut() = prev_effect;
    });
    result
}

/// Run the given function while deferring effect runs: each effect triggered
/// by signal writes inside the batch runs once, at the end of the outermost
/// batch.
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    let already_batching = RUNTIME.with(|runtime| runtime.batching.replace(true));
    let result = f();
    if !already_batching {
        RUNTIME.with(|runtime| {
            runtime.batching.set(false);
            runtime.run_pending_effects();
        });
    }
    result
}

pub(crate) fn run_effect(effect: Rc<dyn EffectTrait>) {
    effect.id().dispose_children();

    observer_clean_up(&effect);

    RUNTIME.with(|runtime| {
        *runtime.current_effect.borrow_mut() = Some(effect.clone());
    });

    with_scope(Scope(effect.id()), || {
        effect.run();
    });

    RUNTIME.with(|runtime| {
        *runtime.current_effect.borrow_mut() = None;
    });
}

/// Observer clean up at the beginning of each effect run. It clears the
/// effect from all the Signals it subscribes to, and clears all the signals
/// stored in the effect, so that the next run can re-track.
pub(crate) fn observer_clean_up(effect: &Rc<dyn EffectTrait>) {
    for (_, observer) in effect.current_observers().iter() {
        observer.subscribers.borrow_mut().remove(&effect.id());
    }
    effect.clear_observers();
}

impl<T, F> EffectTrait for Effect<T, F>
where
    T: 'static,
    F: Fn(Option<T>) -> T,
{
    fn id(&self) -> Id {
        self.id
    }

    fn run(&self) {
        let curr_value = self.value.borrow_mut().take();
        let new_value = (self.f)(curr_value);
        *self.value.borrow_mut() = Some(new_value);
    }

    fn add_observer(&self, signal: Signal) {
        self.observers.borrow_mut().insert(signal.id, signal);
    }

    fn current_observers(&self) -> FxHashMap<Id, Signal> {
        self.observers.borrow().clone()
    }

    fn clear_observers(&self) {
        self.observers.borrow_mut().clear();
    }
}
