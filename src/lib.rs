//! # matchmedia
//! Reactive media-query matching for fine-grained-reactive component trees.
//!
//! A [MatchMedia](matcher::MatchMedia) observes one query expression and
//! exposes its boolean match state as reactive data, and a
//! [MediaQueryProvider](provider::MediaQueryProvider) owns a set of named
//! queries and publishes a name → boolean registry to its entire descendant
//! subtree through scoped context. Consumers read the state inside effects
//! and re-render automatically on every change notification.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use matchmedia::prelude::*;
//!
//! let env = HeadlessEnvironment::new(640.0, 480.0);
//! let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());
//!
//! let provider = MediaQueryProvider::new(
//!     shared,
//!     ProviderOptions::new([
//!         ("isMobile", "(max-width: 767px)"),
//!         ("isDesktop", "(min-width: 768px)"),
//!     ]),
//! )
//! .unwrap();
//!
//! let queries = provider.media_queries();
//! assert_eq!(queries.get("isMobile"), Some(true));
//!
//! // Resizing the viewport flips the published state with no rebuild.
//! env.set_viewport(1040.0, 480.0);
//! assert_eq!(queries.get("isMobile"), Some(false));
//! assert_eq!(queries.get("isDesktop"), Some(true));
//! ```
//!
//! ## Environments
//! All observation goes through the [MediaEnvironment](environment::MediaEnvironment)
//! capability: a live implementation backs real matching
//! ([HeadlessEnvironment](headless::HeadlessEnvironment) for tests and
//! headless use), while [NoopEnvironment](environment::NoopEnvironment)
//! models non-interactive rendering, where every match state resolves to its
//! configured fallback.
//!
//! ## Server-rendered markup
//! When the same markup was first produced by a non-live render, build the
//! provider with `ssr = true`: queries then resolve only once
//! [attach](provider::MediaQueryProvider::attach) is called past the
//! reconciliation boundary, so the first live render agrees with the
//! server's output instead of flashing to freshly evaluated states.

pub mod environment;
pub mod error;
pub mod headless;
pub mod matcher;
pub mod node;
pub mod provider;

/// The reactive system backing this crate.
pub mod reactive {
    pub use matchmedia_reactive::*;
}

pub mod prelude {
    pub use crate::environment::{MediaEnvironment, NoopEnvironment, WatchCallback, WatchId};
    pub use crate::error::EnvironmentError;
    pub use crate::headless::HeadlessEnvironment;
    pub use crate::matcher::MatchMedia;
    pub use crate::node::{wrap_nodes, Node};
    pub use crate::provider::{
        use_media_queries, Fallback, MediaQueries, MediaQueryProvider, ProviderOptions,
    };
    pub use matchmedia_reactive::{
        batch, create_effect, untrack, with_scope, RwSignal, Scope, SignalGet, SignalUpdate,
        SignalWith,
    };
}
