use serde_json::json;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use switchyard::middleware::MetricsMiddleware;
use switchyard::router::Router;
use switchyard::server::{AppService, HttpServer};
use switchyard::{Dispatcher, RequestContext, Response};

mod tracing_util;
use tracing_util::TestTracing;

fn hello(ctx: &mut RequestContext) -> anyhow::Result<Response> {
    Ok(Response::json(
        200,
        json!({ "greeting": "hello", "name": ctx.param("name") }),
    ))
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

fn http_get(addr: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_millis(500)))
        .expect("set timeout");
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n"
    )
    .expect("write request");
    stream.flush().expect("flush");

    // Read until the peer closes or the timeout fires; responses here are
    // small enough that one timeout window is plenty.
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[test]
fn test_end_to_end_request_cycle() {
    let _tracing = TestTracing::init();

    let metrics = Arc::new(MetricsMiddleware::new());
    let mut router = Router::new();
    router.middleware(metrics.clone());
    router.get("/hello/{name}", hello);

    let dispatcher = Arc::new(Dispatcher::new(router.build().unwrap()));
    let mut service = AppService::new(dispatcher);
    service.set_metrics(metrics.clone());

    let port = free_port();
    let addr = format!("127.0.0.1:{port}");
    let handle = HttpServer(service).start(&addr).expect("start server");
    handle.wait_ready().expect("server ready");

    let reply = http_get(&addr, "/hello/amelia");
    assert!(reply.starts_with("HTTP/1.1 200"), "got: {reply}");
    assert!(reply.contains("\"greeting\":\"hello\""), "got: {reply}");
    assert!(reply.contains("\"name\":\"amelia\""), "got: {reply}");

    let missing = http_get(&addr, "/nowhere");
    assert!(missing.starts_with("HTTP/1.1 404"), "got: {missing}");

    let health = http_get(&addr, "/health");
    assert!(health.starts_with("HTTP/1.1 200"), "got: {health}");
    assert!(health.contains("\"status\":\"ok\""), "got: {health}");

    let scraped = http_get(&addr, "/metrics");
    assert!(scraped.contains("switchyard_requests_total"), "got: {scraped}");
    // Only matched requests run the chain, so exactly the /hello call counts.
    assert!(metrics.request_count() >= 1);

    handle.stop();
}
