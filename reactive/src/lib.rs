//! # A condensed fine-grained reactive runtime
//!
//! Signals hold values, Effects re-run when the Signals they read change,
//! and Scopes own both so that disposing a Scope tears down everything
//! created under it. Context values provided in a Scope are visible to all
//! of its descendant Scopes.
//!
//! All state lives in a thread-local Runtime: the reactive system is
//! single-threaded by design, and signals must stay on the thread that
//! created them.

mod context;
mod effect;
mod id;
mod read;
mod runtime;
mod scope;
mod signal;
mod write;

pub use context::{provide_context, use_context};
pub use effect::{batch, create_effect, untrack};
pub use read::{SignalGet, SignalWith};
pub use scope::{with_scope, Scope};
pub use signal::{create_rw_signal, create_signal, ReadSignal, RwSignal, WriteSignal};
pub use write::SignalUpdate;
