use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::health;
use super::middleware::logging_middleware;
use super::proxy;
use super::state::AppState;

/// Create the proxy router
///
/// `cors_origins` lists the browser origins allowed to call the chat
/// endpoints; an empty list allows any origin.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Chat proxy, reachable under both names the frontend has used
        .route("/api/chat", post(proxy::proxy_chat))
        .route("/api/ask", post(proxy::proxy_chat))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::upstream::UpstreamClient;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router_for(base_url: &str) -> Router {
        let upstream = UpstreamClient::new(base_url, "/ask", Duration::from_secs(5)).unwrap();
        create_router(AppState::new(upstream), &[])
    }

    fn chat_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json_of(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router_for("http://localhost:1")
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json_of(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_without_upstream_is_unavailable() {
        let response = router_for("")
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_proxy_relays_upstream_answer() {
        let server = MockServer::start().await;
        let answer = json!({"question": "Show me your projects", "answer": "Here they are", "extra": [1, 2]});

        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({"question": "Show me your projects"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&server.uri())
            .oneshot(chat_request("/api/chat", r#"{"question":"Show me your projects"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json_of(response).await, answer);
    }

    #[tokio::test]
    async fn test_ask_alias_forwards_too() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"question": "q", "answer": "a"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&server.uri())
            .oneshot(chat_request("/api/ask", r#"{"question":"q"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_proxy_propagates_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let response = router_for(&server.uri())
            .oneshot(chat_request("/api/chat", r#"{"question":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json_of(response).await,
            json!({"message": "Backend API error: Service Unavailable"})
        );
    }

    #[tokio::test]
    async fn test_proxy_unreachable_upstream_is_internal_error() {
        // Nothing listens on port 1
        let response = router_for("http://127.0.0.1:1")
            .oneshot(chat_request("/api/chat", r#"{"question":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json_of(response).await,
            json!({"message": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_proxy_malformed_body_is_internal_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = router_for(&server.uri())
            .oneshot(chat_request("/api/chat", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json_of(response).await,
            json!({"message": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_proxy_non_json_upstream_body_is_internal_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let response = router_for(&server.uri())
            .oneshot(chat_request("/api/chat", r#"{"question":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_cors_preflight_for_configured_origin() {
        let upstream =
            UpstreamClient::new("http://localhost:1", "/ask", Duration::from_secs(1)).unwrap();
        let router = create_router(
            AppState::new(upstream),
            &["https://portfolio.example.com".to_string()],
        );

        let response = router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chat")
                    .header("origin", "https://portfolio.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://portfolio.example.com"
        );
    }
}
