//! Router-level tests for the gateway.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::IntoResponse,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::Config;
use crate::constants::EMPTY_FEATURE_DETAIL;
use crate::embedding::MockEmbedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::RecommendResponse;
use crate::gateway::state::HandlerState;
use crate::gateway::{create_app, create_router_with_state};
use crate::ranking::RankingError;

const ALLOWED_ORIGIN: &str = "http://localhost:10000";

fn cats_embedder() -> MockEmbedder {
    MockEmbedder::new(4)
        .with_vector("I love cats", vec![1.0, 0.2, 0.0, 0.0])
        .with_vector("Feline companionship", vec![0.8, 0.5, 0.1, 0.0])
        .with_vector("Stock market trends", vec![0.0, 0.0, 0.3, 1.0])
}

fn cats_request_json() -> serde_json::Value {
    serde_json::json!({
        "target": "I love cats",
        "feature": [
            {"bookIsbn": 1, "bookSummary": "I love cats"},
            {"bookIsbn": 2, "bookSummary": "Stock market trends"},
            {"bookIsbn": 3, "bookSummary": "Feline companionship"}
        ]
    })
}

fn test_router(embedder: MockEmbedder, top_k: usize) -> Router {
    let state = HandlerState::from_embedder(embedder, top_k).expect("valid top_k");
    create_router_with_state(state)
}

fn test_app() -> Router {
    let state = HandlerState::from_embedder(cats_embedder(), 9).expect("valid top_k");
    let origins = Config::default()
        .cors_header_values()
        .expect("default origins are valid");
    create_app(state, origins)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_recommend(router: &Router, body: serde_json::Value) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

mod greeting_tests {
    use super::*;

    #[tokio::test]
    async fn test_root_says_hello_world() {
        let router = test_router(cats_embedder(), 9);

        let response = get(&router, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Hello World");
    }

    #[tokio::test]
    async fn test_hello_name() {
        let router = test_router(cats_embedder(), 9);

        let response = get(&router, "/hello/Minji").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Hello Minji");
    }

    #[tokio::test]
    async fn test_hello_percent_decoded() {
        let router = test_router(cats_embedder(), 9);

        let response = get(&router, "/hello/Jo%20Ann").await;

        assert_eq!(body_json(response).await["message"], "Hello Jo Ann");
    }
}

mod recommend_tests {
    use super::*;

    #[tokio::test]
    async fn test_recommend_cats_scenario() {
        let router = test_router(cats_embedder(), 2);

        let response = send_recommend(&router, cats_request_json()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recommendedBookIsbns"], serde_json::json!([1, 3]));
    }

    #[tokio::test]
    async fn test_recommend_default_k_returns_all_three() {
        let router = test_router(cats_embedder(), 9);

        let response = send_recommend(&router, cats_request_json()).await;

        let body: RecommendResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.recommended_book_isbns, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_recommend_caps_at_nine() {
        let router = test_router(MockEmbedder::new(8), 9);
        let feature: Vec<serde_json::Value> = (0..15)
            .map(|i| serde_json::json!({"bookIsbn": 9788900000000i64 + i, "bookSummary": format!("book {i}")}))
            .collect();

        let response = send_recommend(
            &router,
            serde_json::json!({"target": "a quiet novel", "feature": feature}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recommendedBookIsbns"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_recommend_empty_feature_is_bad_request() {
        let embedder = Arc::new(cats_embedder());
        let state = HandlerState::from_embedder(Arc::clone(&embedder), 9).unwrap();
        let router = create_router_with_state(state);

        let response = send_recommend(
            &router,
            serde_json::json!({"target": "I love cats", "feature": []}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], EMPTY_FEATURE_DETAIL);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recommend_missing_target_is_unprocessable() {
        let router = test_router(cats_embedder(), 9);

        let response = send_recommend(
            &router,
            serde_json::json!({"feature": [{"bookIsbn": 1, "bookSummary": "x"}]}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("target"), "detail was: {detail}");
    }

    #[tokio::test]
    async fn test_recommend_wrong_isbn_type_is_unprocessable() {
        let router = test_router(cats_embedder(), 9);

        let response = send_recommend(
            &router,
            serde_json::json!({
                "target": "x",
                "feature": [{"bookIsbn": "not-a-number", "bookSummary": "x"}]
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_recommend_quoted_isbn_is_unprocessable() {
        let router = test_router(cats_embedder(), 9);

        let response = send_recommend(
            &router,
            serde_json::json!({
                "target": "x",
                "feature": [{"bookIsbn": "9788901234567", "bookSummary": "x"}]
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("invalid type"), "detail was: {detail}");
    }

    #[tokio::test]
    async fn test_recommend_malformed_json_is_unprocessable() {
        let router = test_router(cats_embedder(), 9);
        let request = Request::builder()
            .method("POST")
            .uri("/recommend")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"target\": "))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await.get("detail").is_some());
    }

    #[tokio::test]
    async fn test_recommend_embedder_failure_is_server_error() {
        let embedder = cats_embedder();
        embedder.fail_with("model unavailable");
        let router = test_router(embedder, 9);

        let response = send_recommend(&router, cats_request_json()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_recommend_get_not_allowed() {
        let router = test_router(cats_embedder(), 9);

        let response = get(&router, "/recommend").await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_embedder() {
        let embedder = Arc::new(cats_embedder());
        let state = HandlerState::from_embedder(Arc::clone(&embedder), 2).unwrap();
        let router = create_router_with_state(state);

        let requests = (0..8).map(|_| send_recommend(&router, cats_request_json()));
        let responses = futures::future::join_all(requests).await;

        for response in responses {
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await["recommendedBookIsbns"],
                serde_json::json!([1, 3])
            );
        }
        assert_eq!(embedder.call_count(), 8);
    }
}

mod status_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = test_router(cats_embedder(), 9);

        let response = get(&router, "/healthz").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_endpoint_reports_embedder() {
        let router = test_router(cats_embedder(), 5);

        let response = get(&router, "/ready").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedder_mode"], "stub");
        assert_eq!(body["device"], "cpu");
        assert_eq!(body["embedding_dim"], 4);
        assert_eq!(body["top_k"], 5);
    }
}

mod cors_tests {
    use super::*;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/recommend")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        let response = test_app().oneshot(preflight(ALLOWED_ORIGIN)).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ALLOWED_ORIGIN
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type"
        );
    }

    #[tokio::test]
    async fn test_second_default_origin_allowed() {
        let response = test_app()
            .oneshot(preflight("http://43.201.250.218:10000"))
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_preflight_from_unknown_origin() {
        let response = test_app()
            .oneshot(preflight("http://evil.example.com"))
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_simple_request_carries_allow_origin() {
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(header::ORIGIN, ALLOWED_ORIGIN)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            ALLOWED_ORIGIN
        );
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_request_renders_detail() {
        let response = GatewayError::InvalidRequest(EMPTY_FEATURE_DETAIL.to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"detail": "Feature list is empty."})
        );
    }

    #[test]
    fn test_ranking_error_mapping() {
        let err: GatewayError = RankingError::EmptyCandidates.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), EMPTY_FEATURE_DETAIL);

        let err: GatewayError = RankingError::EmbeddingCountMismatch {
            expected: 3,
            actual: 1,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: GatewayError = RankingError::InvalidTopK.into();
        assert!(matches!(err, GatewayError::InternalError(_)));
    }

    #[test]
    fn test_schema_error_status() {
        let err = GatewayError::InvalidSchema("missing field `target`".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("missing field"));
    }
}
