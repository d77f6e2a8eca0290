use std::{cell::RefCell, rc::Rc};

use matchmedia::prelude::*;

fn breakpoints() -> ProviderOptions {
    ProviderOptions::new([
        ("isMobile", "(max-width: 767px)"),
        ("isTablet", "(min-width: 768px) and (max-width: 1023px)"),
        ("isDesktop", "(min-width: 1024px)"),
    ])
}

fn live(width: f64) -> (HeadlessEnvironment, Rc<dyn MediaEnvironment>) {
    let env = HeadlessEnvironment::new(width, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());
    (env, shared)
}

#[test]
fn initial_mapping_is_true_exactly_at_fallback_names() {
    let env: Rc<dyn MediaEnvironment> = Rc::new(NoopEnvironment::new());
    let provider =
        MediaQueryProvider::new(env, breakpoints().fallback(["isMobile", "isTablet"])).unwrap();

    let queries = provider.media_queries();
    assert_eq!(queries.get("isMobile"), Some(true));
    assert_eq!(queries.get("isTablet"), Some(true));
    assert_eq!(queries.get("isDesktop"), Some(false));
}

#[test]
fn fallback_name_absent_from_the_mapping_is_a_synthetic_true_entry() {
    let env: Rc<dyn MediaEnvironment> = Rc::new(NoopEnvironment::new());
    let provider = MediaQueryProvider::new(env, breakpoints().fallback("isPrint")).unwrap();

    let queries = provider.media_queries();
    assert_eq!(queries.get("isPrint"), Some(true));
    assert_eq!(
        queries.snapshot().keys().map(String::as_str).collect::<Vec<_>>(),
        ["isMobile", "isTablet", "isDesktop", "isPrint"]
    );
}

#[test]
fn eager_mode_snapshots_overwrite_the_fallback_at_construction() {
    let (env, shared) = live(1040.0);
    let provider = MediaQueryProvider::new(shared, breakpoints().fallback("isMobile")).unwrap();

    let queries = provider.media_queries();
    assert_eq!(queries.get("isMobile"), Some(false));
    assert_eq!(queries.get("isDesktop"), Some(true));
    assert_eq!(env.watch_count(), 3);
}

#[test]
fn change_notifications_rewrite_only_their_own_entry() {
    let (env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();
    let queries = provider.media_queries();

    env.set_viewport_width(800.0);
    assert_eq!(queries.get("isMobile"), Some(false));
    assert_eq!(queries.get("isTablet"), Some(true));
    assert_eq!(queries.get("isDesktop"), Some(false));

    env.set_viewport_width(1400.0);
    assert_eq!(queries.get("isTablet"), Some(false));
    assert_eq!(queries.get("isDesktop"), Some(true));
}

#[test]
fn on_change_is_tagged_with_the_entry_name() {
    let (env, shared) = live(640.0);

    let events = Rc::new(RefCell::new(Vec::new()));
    let provider = MediaQueryProvider::new(
        shared,
        breakpoints().on_change({
            let events = events.clone();
            move |name, matches| events.borrow_mut().push((name.to_string(), matches))
        }),
    )
    .unwrap();

    // First snapshots are not change notifications
    assert!(events.borrow().is_empty());

    env.set_viewport_width(800.0);
    env.set_viewport_width(1040.0);

    assert_eq!(
        *events.borrow(),
        vec![
            ("isMobile".to_string(), false),
            ("isTablet".to_string(), true),
            ("isTablet".to_string(), false),
            ("isDesktop".to_string(), true),
        ]
    );
    drop(provider);
}

#[test]
fn registry_is_visible_at_any_descendant_depth() {
    let (_env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();

    let found = provider.with_children(|| {
        // Two scope levels below the child scope
        let inner = Scope::current().create_child().create_child();
        with_scope(inner, || use_media_queries())
    });
    assert!(found.is_some());
    assert_eq!(found.unwrap().get("isMobile"), Some(true));

    // Scopes outside the provider's subtree see nothing
    let outside = Scope::new();
    assert!(with_scope(outside, || use_media_queries()).is_none());
}

#[test]
fn consumers_rerender_per_entry() {
    let (env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();
    let queries = provider.media_queries();

    let labels = Rc::new(RefCell::new(Vec::new()));
    create_effect({
        let labels = labels.clone();
        move |_| {
            let label = if queries.get("isMobile") == Some(true) {
                "isMobile"
            } else if queries.get("isTablet") == Some(true) {
                "isTablet"
            } else {
                "isDesktop"
            };
            labels.borrow_mut().push(label);
        }
    });

    env.set_viewport_width(800.0);
    env.set_viewport_width(1400.0);
    assert_eq!(labels.borrow().first(), Some(&"isMobile"));
    assert_eq!(labels.borrow().last(), Some(&"isDesktop"));
}

#[test]
fn attach_is_idempotent() {
    let (env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();

    provider.attach().unwrap();
    provider.attach().unwrap();
    assert_eq!(env.watch_count(), 3);
}

#[test]
fn teardown_detaches_every_watch_exactly_once() {
    let (env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();
    assert_eq!(env.watch_count(), 3);

    provider.dispose();
    assert_eq!(env.watch_count(), 0);

    provider.dispose();
    assert_eq!(env.watch_count(), 0);
}

#[test]
fn dropping_the_provider_detaches_its_watches() {
    let (env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints()).unwrap();
    assert_eq!(env.watch_count(), 3);

    drop(provider);
    assert_eq!(env.watch_count(), 0);
}

#[test]
fn malformed_entry_fails_construction_and_leaks_nothing() {
    let (env, shared) = live(640.0);
    let err = MediaQueryProvider::new(
        shared,
        ProviderOptions::new([("isMobile", "(max-width: 767px)"), ("bad", "width < 768")]),
    )
    .unwrap_err();

    assert_eq!(err, EnvironmentError::Malformed("width < 768".to_string()));
    assert_eq!(env.watch_count(), 0);
}

#[test]
fn render_wraps_children_with_the_configured_tag() {
    let (_env, shared) = live(640.0);
    let provider = MediaQueryProvider::new(shared, breakpoints().wrapper_tag("div")).unwrap();

    assert_eq!(provider.render(Vec::new()), None);

    let lone = Node::element("p", vec![Node::text("hi")]);
    assert_eq!(provider.render(vec![lone.clone()]), Some(lone.clone()));

    let wrapped = provider.render(vec![lone.clone(), Node::text("x")]).unwrap();
    assert_eq!(
        wrapped,
        Node::element("div", vec![lone, Node::text("x")])
    );
}
