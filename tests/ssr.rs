use std::rc::Rc;

use matchmedia::prelude::*;

fn options() -> ProviderOptions {
    ProviderOptions::new([
        ("isMobile", "(max-width: 767px)"),
        ("isDesktop", "(min-width: 768px)"),
    ])
    .fallback("isMobile")
}

/// The query-dependent markup both renders produce.
fn render_label(queries: &MediaQueries) -> Node {
    let label = if queries.get("isMobile") == Some(true) {
        "isMobile"
    } else {
        "isDesktop"
    };
    Node::element("p", vec![Node::text(label)])
}

#[test]
fn deferred_mode_registers_nothing_before_attach() {
    let env = HeadlessEnvironment::new(1040.0, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());

    let provider = MediaQueryProvider::new(shared, options().ssr(true)).unwrap();
    let queries = provider.media_queries();

    // Until attach, the mapping is exactly the fallback state, even though
    // a live evaluation would already disagree with it.
    assert_eq!(env.watch_count(), 0);
    assert_eq!(queries.get("isMobile"), Some(true));
    assert_eq!(queries.get("isDesktop"), Some(false));

    provider.attach().unwrap();
    assert_eq!(env.watch_count(), 2);
    assert_eq!(queries.get("isMobile"), Some(false));
    assert_eq!(queries.get("isDesktop"), Some(true));
}

#[test]
fn server_and_first_client_render_agree() {
    // Server pass: no live facility, fallback decides
    let server_env: Rc<dyn MediaEnvironment> = Rc::new(NoopEnvironment::new());
    let server = MediaQueryProvider::new(server_env, options()).unwrap();
    let server_markup = render_label(&server.media_queries());

    // Client pass against the same markup, deferred until attach
    let env = HeadlessEnvironment::new(640.0, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());
    let client = MediaQueryProvider::new(shared, options().ssr(true)).unwrap();

    let first_paint = render_label(&client.media_queries());
    assert_eq!(first_paint.text_content(), server_markup.text_content());

    // Attaching past the reconciliation boundary applies the live snapshot;
    // at this viewport it agrees with the fallback, so nothing flashes.
    client.attach().unwrap();
    let hydrated = render_label(&client.media_queries());
    assert_eq!(hydrated.text_content(), server_markup.text_content());
}

#[test]
fn eager_client_render_resolves_before_first_paint() {
    let env = HeadlessEnvironment::new(1040.0, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());

    let provider = MediaQueryProvider::new(shared, options()).unwrap();
    let markup = render_label(&provider.media_queries());
    assert_eq!(markup.text_content(), "isDesktop");
}

#[test]
fn resize_flips_the_rendered_state_without_a_rebuild() {
    let env = HeadlessEnvironment::new(640.0, 480.0);
    let shared: Rc<dyn MediaEnvironment> = Rc::new(env.clone());

    let provider = MediaQueryProvider::new(shared, options()).unwrap();
    let queries = provider.media_queries();

    assert_eq!(render_label(&queries).text_content(), "isMobile");

    env.set_viewport(1040.0, 480.0);
    assert_eq!(render_label(&queries).text_content(), "isDesktop");

    env.set_viewport(640.0, 480.0);
    assert_eq!(render_label(&queries).text_content(), "isMobile");
}
