//! The multi-query provider: owns one watch per named query and publishes a
//! name → boolean registry to its entire descendant subtree through scoped
//! context, so consumers at any depth read it without prop threading.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use indexmap::IndexMap;
use matchmedia_reactive::{
    provide_context, use_context, with_scope, Scope, SignalGet, SignalUpdate, SignalWith,
};
use tracing::debug;

use crate::{
    environment::{MediaEnvironment, WatchId},
    error::EnvironmentError,
    node::{wrap_nodes, Node},
};

/// Which named queries report `true` when no live matching facility exists,
/// and before the first live snapshot arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    #[default]
    None,
    Name(String),
    Names(Vec<String>),
}

impl From<&str> for Fallback {
    fn from(name: &str) -> Self {
        Fallback::Name(name.to_string())
    }
}

impl From<String> for Fallback {
    fn from(name: String) -> Self {
        Fallback::Name(name)
    }
}

impl From<Vec<String>> for Fallback {
    fn from(names: Vec<String>) -> Self {
        Fallback::Names(names)
    }
}

impl<const N: usize> From<[&str; N]> for Fallback {
    fn from(names: [&str; N]) -> Self {
        Fallback::Names(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Outward notification for one named query's change, tagged with the name.
pub type OnQueryChange = Rc<dyn Fn(&str, bool)>;

/// Configuration for a [MediaQueryProvider].
#[derive(Clone)]
pub struct ProviderOptions {
    /// Ordered mapping of logical name → query expression.
    pub queries: IndexMap<String, String>,
    pub fallback: Fallback,
    /// Defer watch registration until [attach](MediaQueryProvider::attach):
    /// set this when the same markup was also produced by a non-live render,
    /// so the first live render agrees with it. Explicit by design; the
    /// provider never sniffs its environment.
    pub ssr: bool,
    /// Tag used when the rendered children need a wrapping element.
    pub wrapper_tag: String,
    pub on_change: Option<OnQueryChange>,
}

impl ProviderOptions {
    pub fn new<K, V>(queries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            queries: queries
                .into_iter()
                .map(|(name, query)| (name.into(), query.into()))
                .collect(),
            fallback: Fallback::None,
            ssr: false,
            wrapper_tag: "span".to_string(),
            on_change: None,
        }
    }

    pub fn fallback(mut self, fallback: impl Into<Fallback>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }

    pub fn wrapper_tag(mut self, tag: impl Into<String>) -> Self {
        self.wrapper_tag = tag.into();
        self
    }

    pub fn on_change(mut self, f: impl Fn(&str, bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

/// The published registry: an ordered name → match-state mapping, readable
/// from any descendant. Reads are reactive; only the owning provider's
/// callbacks write it.
#[derive(Clone, Copy)]
pub struct MediaQueries {
    entries: matchmedia_reactive::RwSignal<IndexMap<String, bool>>,
}

impl MediaQueries {
    /// Current match state of a named query, subscribing the running effect.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .try_with(|entries| entries.and_then(|entries| entries.get(name).copied()))
    }

    /// Like [get](Self::get), without subscribing.
    pub fn get_untracked(&self, name: &str) -> Option<bool> {
        self.entries
            .try_with_untracked(|entries| entries.and_then(|entries| entries.get(name).copied()))
    }

    /// Whether the registry carries an entry for this name. Does not
    /// subscribe: presence is fixed at provider construction.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .try_with_untracked(|entries| {
                entries.map(|entries| entries.contains_key(name))
            })
            .unwrap_or(false)
    }

    /// An untracked copy of the whole mapping, in registry order.
    pub fn snapshot(&self) -> IndexMap<String, bool> {
        self.entries.try_get_untracked().unwrap_or_default()
    }

    fn set(&self, name: &str, matches: bool) {
        self.entries.update(|entries| {
            entries.insert(name.to_string(), matches);
        });
    }
}

impl fmt::Debug for MediaQueries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

/// Retrieve the registry published by the closest ancestor provider, if any.
pub fn use_media_queries() -> Option<MediaQueries> {
    use_context::<MediaQueries>()
}

/// Owns one environment watch per named query and publishes the resulting
/// [MediaQueries] registry to its descendant subtree.
///
/// Every entry starts `false`, except fallback-listed names which start
/// `true`; a fallback name absent from the query mapping is still recorded
/// `true` as a synthetic entry and never changes afterwards. The first live
/// snapshot of each real entry overwrites its initial state; after that,
/// each change notification rewrites only its own entry.
impl std::fmt::Debug for MediaQueryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaQueryProvider")
            .field("scope", &self.scope)
            .field("queries", &self.queries)
            .field("wrapper_tag", &self.wrapper_tag)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

pub struct MediaQueryProvider {
    scope: Scope,
    env: Rc<dyn MediaEnvironment>,
    queries: IndexMap<String, String>,
    wrapper_tag: String,
    on_change: Option<OnQueryChange>,
    registry: MediaQueries,
    watches: RefCell<Vec<WatchId>>,
    attached: Cell<bool>,
}

impl MediaQueryProvider {
    /// Build the provider and publish its registry into the current scope's
    /// subtree. With `ssr = false` the watches are registered and the first
    /// snapshots taken here; with `ssr = true` both wait for
    /// [attach](Self::attach).
    pub fn new(
        env: Rc<dyn MediaEnvironment>,
        options: ProviderOptions,
    ) -> Result<MediaQueryProvider, EnvironmentError> {
        let scope = Scope::current().create_child();

        let mut initial: IndexMap<String, bool> = options
            .queries
            .keys()
            .map(|name| (name.clone(), false))
            .collect();
        match &options.fallback {
            Fallback::None => {}
            Fallback::Name(name) => {
                initial.insert(name.clone(), true);
            }
            Fallback::Names(names) => {
                for name in names {
                    initial.insert(name.clone(), true);
                }
            }
        }

        let registry = MediaQueries {
            entries: scope.create_rw_signal(initial),
        };
        with_scope(scope, || provide_context(registry));

        let provider = MediaQueryProvider {
            scope,
            env,
            queries: options.queries,
            wrapper_tag: options.wrapper_tag,
            on_change: options.on_change,
            registry,
            watches: RefCell::new(Vec::new()),
            attached: Cell::new(false),
        };

        if !options.ssr {
            provider.attach()?;
        }

        Ok(provider)
    }

    /// Register the watches and take the first snapshot of every entry.
    /// Called by the host integration once the tree is attached past the
    /// reconciliation boundary; calling it again is a no-op.
    pub fn attach(&self) -> Result<(), EnvironmentError> {
        if self.attached.replace(true) {
            return Ok(());
        }
        if !self.env.is_live() {
            debug!("no live matching facility; registry keeps its fallback states");
            return Ok(());
        }

        for (name, query) in &self.queries {
            let registry = self.registry;
            let entry = name.clone();
            let on_change = self.on_change.clone();
            let id = self.env.watch(
                query,
                Rc::new(move |matches| {
                    registry.set(&entry, matches);
                    if let Some(notify) = &on_change {
                        notify(&entry, matches);
                    }
                }),
            )?;
            self.watches.borrow_mut().push(id);

            // First snapshot; overwrites a fallback-true initial state.
            self.registry.set(name, self.env.evaluate(query)?);
        }
        debug!(queries = self.queries.len(), "media query provider attached");
        Ok(())
    }

    /// The published registry. Descendants normally pick it up through
    /// [use_media_queries] instead.
    pub fn media_queries(&self) -> MediaQueries {
        self.registry
    }

    /// The scope owning everything this provider created. Descendant
    /// consumers built under it (see [with_children](Self::with_children))
    /// resolve the registry through context.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Run `f` in a fresh child scope of this provider, so that anything it
    /// constructs can see the published registry and is torn down with the
    /// provider.
    pub fn with_children<T: 'static>(&self, f: impl FnOnce() -> T) -> T {
        with_scope(self.scope.create_child(), f)
    }

    /// Normalize child nodes per the wrapper policy: nothing stays nothing,
    /// a lone element passes through, anything else is wrapped in this
    /// provider's `wrapper_tag`.
    pub fn render(&self, children: Vec<Node>) -> Option<Node> {
        wrap_nodes(children, &self.wrapper_tag)
    }

    /// Detach every watch and dispose the provider's scope. Idempotent.
    pub fn dispose(&self) {
        let watches: Vec<WatchId> = self.watches.borrow_mut().drain(..).collect();
        if !watches.is_empty() {
            debug!(watches = watches.len(), "detaching media query watches");
        }
        for id in watches {
            self.env.unwatch(id);
        }
        self.scope.dispose();
    }
}

impl Drop for MediaQueryProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}
