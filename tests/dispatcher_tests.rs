use http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use switchyard::router::Router;
use switchyard::{
    Dispatched, Dispatcher, Handler, RequestContext, Response, RouterError, UpgradeHook,
};

mod tracing_util;
use tracing_util::TestTracing;

struct CountingHandler {
    hits: Arc<AtomicUsize>,
}

impl Handler for CountingHandler {
    fn handle(&self, _ctx: &mut RequestContext) -> anyhow::Result<Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(Response::json(200, json!({ "ok": true })))
    }
}

struct FailingHandler;

impl Handler for FailingHandler {
    fn handle(&self, _ctx: &mut RequestContext) -> anyhow::Result<Response> {
        anyhow::bail!("backing store unavailable")
    }
}

struct PanickingHandler;

impl Handler for PanickingHandler {
    fn handle(&self, _ctx: &mut RequestContext) -> anyhow::Result<Response> {
        panic!("handler bug")
    }
}

struct FallbackHandler;

impl Handler for FallbackHandler {
    fn handle(&self, ctx: &mut RequestContext) -> anyhow::Result<Response> {
        // The fallback contract: no extracted parameters.
        assert!(ctx.params.is_empty());
        Ok(Response::json(200, json!({ "fallback": ctx.path })))
    }
}

struct RecordingUpgrade {
    accept: bool,
    attempts: Arc<AtomicUsize>,
}

impl UpgradeHook for RecordingUpgrade {
    fn try_upgrade(&self, _ctx: &mut RequestContext) -> bool {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.accept
    }
}

fn ok(_ctx: &mut RequestContext) -> anyhow::Result<Response> {
    Ok(Response::json(200, json!({ "ok": true })))
}

fn dispatch(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
    let mut ctx = RequestContext::new(method, path);
    match dispatcher.dispatch(&mut ctx) {
        Dispatched::Response(response) => response,
        Dispatched::Upgraded => panic!("unexpected upgrade"),
    }
}

#[test]
fn test_not_found_without_fallback_is_404() {
    let table = Router::new().build().unwrap();
    let dispatcher = Dispatcher::new(table);

    let response = dispatch(&dispatcher, Method::GET, "/nowhere");
    assert_eq!(response.status, 404);
    assert_eq!(response.body, json!({ "error": "Not Found" }));
}

#[test]
fn test_fallback_runs_with_empty_params() {
    let mut router = Router::new();
    router.get("/known", ok);
    router.fallback(FallbackHandler);
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let response = dispatch(&dispatcher, Method::GET, "/nowhere");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "fallback": "/nowhere" }));
}

#[test]
fn test_default_error_response_hides_detail() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.get("/flaky", FailingHandler);
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let response = dispatch(&dispatcher, Method::GET, "/flaky");
    assert_eq!(response.status, 500);
    // No internal detail leaks into the body.
    assert_eq!(response.body, json!({ "error": "Internal Server Error" }));
}

#[test]
fn test_custom_error_handler_renders_uncaught_errors() {
    let mut router = Router::new();
    router.get("/flaky", FailingHandler);
    let mut dispatcher = Dispatcher::new(router.build().unwrap());
    dispatcher.set_error_handler(|err| {
        Response::json(599, json!({ "rendered": err.to_string() }))
    });

    let response = dispatch(&dispatcher, Method::GET, "/flaky");
    assert_eq!(response.status, 599);
    assert_eq!(
        response.body,
        json!({ "rendered": "backing store unavailable" })
    );
}

#[test]
fn test_handler_panic_becomes_500() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.get("/boom", PanickingHandler);
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let response = dispatch(&dispatcher, Method::GET, "/boom");
    assert_eq!(response.status, 500);
}

#[test]
fn test_static_route_served_without_rerunning_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router
        .get("/version", CountingHandler { hits: hits.clone() })
        .cache_static();
    let dispatcher = Dispatcher::new(router.build().unwrap());

    // The capture at build() is the only execution.
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    for _ in 0..3 {
        let response = dispatch(&dispatcher, Method::GET, "/version");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "ok": true }));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_static_route_with_params_fails_build() {
    let mut router = Router::new();
    router.get("/users/{id}", ok).cache_static();
    let err = router.build().unwrap_err();
    assert!(matches!(err, RouterError::StaticCache { .. }));
}

#[test]
fn test_failing_static_capture_fails_build() {
    let mut router = Router::new();
    router.get("/broken", FailingHandler).cache_static();
    let err = router.build().unwrap_err();
    assert!(matches!(err, RouterError::StaticCapture { .. }));
}

#[test]
fn test_upgrade_hook_bypasses_response_path() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let handler_hits = Arc::new(AtomicUsize::new(0));

    let mut router = Router::new();
    router
        .get(
            "/ws",
            CountingHandler {
                hits: handler_hits.clone(),
            },
        )
        .upgrade(Arc::new(RecordingUpgrade {
            accept: true,
            attempts: attempts.clone(),
        }));
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let mut ctx = RequestContext::new(Method::GET, "/ws");
    assert!(matches!(dispatcher.dispatch(&mut ctx), Dispatched::Upgraded));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(handler_hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_upgrade_falls_through_to_handler() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    router.get("/ws", ok).upgrade(Arc::new(RecordingUpgrade {
        accept: false,
        attempts: attempts.clone(),
    }));
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let response = dispatch(&dispatcher, Method::GET, "/ws");
    assert_eq!(response.status, 200);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reload_swaps_table_atomically_for_new_requests() {
    let mut before = Router::new();
    before.get("/old", ok);
    let dispatcher = Dispatcher::new(before.build().unwrap());

    assert_eq!(dispatch(&dispatcher, Method::GET, "/old").status, 200);
    assert_eq!(dispatch(&dispatcher, Method::GET, "/new").status, 404);

    let mut after = Router::new();
    after.get("/new", ok);
    dispatcher.install(after.build().unwrap());

    assert_eq!(dispatch(&dispatcher, Method::GET, "/old").status, 404);
    assert_eq!(dispatch(&dispatcher, Method::GET, "/new").status, 200);
}

#[test]
fn test_matched_route_visible_on_context() {
    let mut router = Router::new();
    router.get("/users/{id}", ok).name("users.show");
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let mut ctx = RequestContext::new(Method::GET, "/users/7");
    dispatcher.dispatch(&mut ctx);

    let route = ctx.route.as_ref().expect("route should be recorded on the context");
    assert_eq!(route.template, "/users/{id}");
    assert_eq!(ctx.param("id"), Some("7"));
}

#[test]
fn test_dispatch_uses_host_for_domain_routes() {
    let mut router = Router::new();
    router.get("/portal", ok).domain("{tenant}.example.com");
    let dispatcher = Dispatcher::new(router.build().unwrap());

    let mut ctx = RequestContext::new(Method::GET, "/portal");
    ctx.host = Some("acme.example.com".to_string());
    match dispatcher.dispatch(&mut ctx) {
        Dispatched::Response(response) => assert_eq!(response.status, 200),
        Dispatched::Upgraded => panic!("unexpected upgrade"),
    }
    assert_eq!(ctx.param("tenant"), Some("acme"));

    let response = dispatch(&dispatcher, Method::GET, "/portal");
    assert_eq!(response.status, 404);
}
