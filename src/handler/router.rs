//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::{AppState, RoutesConfig};
use crate::handler::continents;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body since no route reads it.
#[allow(clippy::unused_async)]
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut response = dispatch(&req, &state);
    http::apply_common_headers(&mut response, &state.config.http);

    if state.config.logging.access_log {
        let entry = build_access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run the request through every check and produce its response
fn dispatch<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *method == Method::HEAD,
    };

    route_request(&ctx, &state.config.routes, state)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and configuration
fn route_request(
    ctx: &RequestContext<'_>,
    routes: &RoutesConfig,
    state: &AppState,
) -> Response<Full<Bytes>> {
    // 0. Health check endpoints (highest priority, always fast)
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response("ok");
    }

    // 1. Continent lookups
    if ctx.path.starts_with(routes.continents_prefix.as_str()) {
        return continents::serve_continent(ctx, &routes.continents_prefix, &state.continents);
    }

    // 2. Nothing else is served
    http::build_404_response()
}

fn build_access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = logger::format_version(req.version());
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(&config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(method: Method, path: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Empty::new())
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, path: &str) -> (StatusCode, String) {
        let response = handle_request(request(method, path), Arc::clone(state), peer())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    const EXPECTED: [(&str, &str); 7] = [
        ("asia", r#"{"name":"asia","area":44614000,"population":4700000000}"#),
        ("africa", r#"{"name":"africa","area":30365000,"population":1400000000}"#),
        (
            "north_america",
            r#"{"name":"north america","area":24230000,"population":600000000}"#,
        ),
        (
            "south_america",
            r#"{"name":"south america","area":17814000,"population":430000000}"#,
        ),
        ("antarctica", r#"{"name":"antarctica","area":14200000,"population":0}"#),
        ("europe", r#"{"name":"europe","area":10000000,"population":750000000}"#),
        (
            "oceania",
            r#"{"name":"australia/oceania","area":8510900,"population":44000000}"#,
        ),
    ];

    #[tokio::test]
    async fn test_every_continent_is_served() {
        let state = test_state();
        for (key, json) in EXPECTED {
            let (status, body) = send(&state, Method::GET, &format!("/continents/{key}")).await;
            assert_eq!(status, StatusCode::OK, "key {key}");
            assert_eq!(body, json, "key {key}");
        }
    }

    #[tokio::test]
    async fn test_json_content_type() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/continents/europe"), state, peer())
            .await
            .unwrap();
        assert_eq!(
            response.headers()["content-type"],
            "application/json;charset=UTF-8"
        );
        assert_eq!(response.headers()["server"], "continent-server/0.1");
    }

    #[tokio::test]
    async fn test_misses() {
        let state = test_state();
        for key in ["unknown", "", "Asia", "EUROPE", "asia2", "north_america2"] {
            let req = request(Method::GET, &format!("/continents/{key}"));
            let response = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "key {key:?}");
            assert_eq!(
                response.headers()["content-type"],
                "text/plain;charset=UTF-8"
            );
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(bytes, format!("Continent {key} not found"));
        }
    }

    #[tokio::test]
    async fn test_key_is_not_decoded() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/continents/north%20america").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Continent north%20america not found");
    }

    #[tokio::test]
    async fn test_end_to_end_scenarios() {
        let state = test_state();
        assert_eq!(
            send(&state, Method::GET, "/continents/oceania").await,
            (
                StatusCode::OK,
                r#"{"name":"australia/oceania","area":8510900,"population":44000000}"#.to_string()
            )
        );
        assert_eq!(
            send(&state, Method::GET, "/continents/unknown").await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Continent unknown not found".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let state = test_state();
        let first = send(&state, Method::GET, "/continents/africa").await;
        for _ in 0..10 {
            assert_eq!(send(&state, Method::GET, "/continents/africa").await, first);
        }
        let miss = send(&state, Method::GET, "/continents/atlantis").await;
        assert_eq!(send(&state, Method::GET, "/continents/atlantis").await, miss);
        assert_eq!(state.continents.len(), 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_do_not_interfere() {
        let state = test_state();
        let mut tasks = Vec::new();
        for i in 0..64 {
            let state = Arc::clone(&state);
            let (key, json) = EXPECTED[i % EXPECTED.len()];
            tasks.push(tokio::spawn(async move {
                let (status, body) = send(&state, Method::GET, &format!("/continents/{key}")).await;
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body, json);
                let (status, body) = send(&state, Method::GET, &format!("/continents/{key}x")).await;
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, format!("Continent {key}x not found"));
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = test_state();
        let (status, _) = send(&state, Method::GET, "/continents").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&state, Method::GET, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = test_state();
        assert_eq!(
            send(&state, Method::GET, "/healthz").await,
            (StatusCode::OK, "ok".to_string())
        );
        assert_eq!(
            send(&state, Method::GET, "/readyz").await,
            (StatusCode::OK, "ok".to_string())
        );
    }

    #[tokio::test]
    async fn test_method_checks() {
        let state = test_state();
        let (status, _) = send(&state, Method::POST, "/continents/asia").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, body) = send(&state, Method::OPTIONS, "/continents/asia").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        let (status, body) = send(&state, Method::HEAD, "/continents/asia").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::GET)
            .uri("/continents/asia")
            .header("content-length", "999999999")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_access_entry() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/continents/asia?x=1")
            .header("user-agent", "curl/8.0")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = http::build_json_response("{}".to_string(), false);
        let entry = build_access_entry(&req, &response, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/continents/asia");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 2);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
