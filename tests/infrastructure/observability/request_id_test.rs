use axum::Router;
use axum::body::Body;
use axum::extract::Extension;
use axum::http::Request;
use axum::middleware;
use axum::routing::get;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wordstamp::infrastructure::observability::{
    REQUEST_ID_HEADER, RequestId, request_id_middleware,
};

fn echo_router() -> Router {
    Router::new()
        .route(
            "/echo",
            get(|Extension(id): Extension<RequestId>| async move { id.0 }),
        )
        .layer(middleware::from_fn(request_id_middleware))
}

#[test]
fn given_request_id_header_constant_when_accessed_then_returns_correct_value() {
    assert_eq!(REQUEST_ID_HEADER, "x-request-id");
}

#[tokio::test]
async fn given_client_request_id_when_handling_then_handler_and_response_see_it() {
    let request = Request::builder()
        .uri("/echo")
        .header(REQUEST_ID_HEADER, "client-7")
        .body(Body::empty())
        .unwrap();

    let response = echo_router().oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "client-7");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"client-7");
}

#[tokio::test]
async fn given_oversized_request_id_when_handling_then_generates_fresh_one() {
    let request = Request::builder()
        .uri("/echo")
        .header(REQUEST_ID_HEADER, "x".repeat(500))
        .body(Body::empty())
        .unwrap();

    let response = echo_router().oneshot(request).await.unwrap();

    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
