use std::{cell::RefCell, rc::Rc};

use matchmedia::prelude::*;

fn live(width: f64) -> (HeadlessEnvironment, Rc<dyn MediaEnvironment>) {
    let env = HeadlessEnvironment::new(width, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());
    (env, shared)
}

#[test]
fn initial_state_equals_immediate_evaluation() {
    let (_env, shared) = live(640.0);

    let mobile = MatchMedia::new(shared.clone(), Some("(max-width: 767px)"), false).unwrap();
    assert!(mobile.matches());

    let desktop = MatchMedia::new(shared, Some("(min-width: 768px)"), true).unwrap();
    assert!(!desktop.matches());
}

#[test]
fn non_live_environment_exposes_constant_fallback() {
    let env: Rc<dyn MediaEnvironment> = Rc::new(NoopEnvironment::new());

    let with_true = MatchMedia::new(env.clone(), Some("(min-width: 768px)"), true).unwrap();
    let with_false = MatchMedia::new(env, Some("(min-width: 768px)"), false).unwrap();

    assert!(with_true.matches());
    assert!(!with_false.matches());
}

#[test]
fn every_notification_updates_state_in_order() {
    let (env, shared) = live(640.0);
    let matcher = Rc::new(MatchMedia::new(shared, Some("(min-width: 768px)"), false).unwrap());

    let observed = Rc::new(RefCell::new(Vec::new()));
    create_effect({
        let matcher = matcher.clone();
        let observed = observed.clone();
        move |_| {
            observed.borrow_mut().push(matcher.matches());
        }
    });
    assert_eq!(*observed.borrow(), vec![false]);

    for width in [800.0, 1024.0, 640.0, 320.0, 1400.0] {
        env.set_viewport_width(width);
        assert_eq!(matcher.matches_untracked(), width >= 768.0);
    }

    // One re-render per transition, in emission order, nothing coalesced
    assert_eq!(*observed.borrow(), vec![false, true, false, true]);
}

#[test]
fn teardown_is_idempotent_and_detaches_the_watch() {
    let (env, shared) = live(640.0);
    let matcher = MatchMedia::new(shared, Some("(max-width: 767px)"), false).unwrap();

    assert_eq!(env.watch_count(), 1);

    matcher.dispose();
    assert_eq!(env.watch_count(), 0);

    matcher.dispose();
    assert_eq!(env.watch_count(), 0);
}

#[test]
fn malformed_queries_pass_through_and_their_error_propagates() {
    let (env, shared) = live(640.0);

    let err = MatchMedia::new(shared.clone(), Some(""), false).unwrap_err();
    assert_eq!(err, EnvironmentError::Malformed(String::new()));

    let err = MatchMedia::new(shared, Some("(min-depth: 3px)"), false).unwrap_err();
    assert_eq!(
        err,
        EnvironmentError::Malformed("(min-depth: 3px)".to_string())
    );

    assert_eq!(env.watch_count(), 0);
}

#[test]
fn missing_query_degrades_to_the_fallback() {
    let (env, shared) = live(640.0);

    let matcher = MatchMedia::new(shared, None, true).unwrap();
    assert!(matcher.matches());
    assert_eq!(env.watch_count(), 0);
}

#[test]
fn query_naming_a_provider_entry_reads_the_registry() {
    let (env, shared) = live(640.0);

    let provider = MediaQueryProvider::new(
        shared.clone(),
        ProviderOptions::new([
            ("isMobile", "(max-width: 767px)"),
            ("isDesktop", "(min-width: 768px)"),
        ]),
    )
    .unwrap();
    assert_eq!(env.watch_count(), 2);

    let matcher = provider
        .with_children(|| MatchMedia::new(shared, Some("isMobile"), false))
        .unwrap();

    // No extra watch: the matcher reads the provider's entry
    assert_eq!(env.watch_count(), 2);
    assert!(matcher.matches());

    env.set_viewport_width(1040.0);
    assert!(!matcher.matches());
}

#[test]
fn render_passes_the_match_state_through_unwrapped() {
    let (_env, shared) = live(640.0);
    let matcher = MatchMedia::new(shared, Some("(max-width: 767px)"), false).unwrap();

    let nodes = matcher.render(|matches| {
        vec![Node::text(if matches { "isMobile" } else { "isDesktop" })]
    });
    assert_eq!(nodes, vec![Node::text("isMobile")]);
}
