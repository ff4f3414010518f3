//! End-to-end tests for the request/response bridge.

use axum::http::Method;
use ring_bridge::ring::{KwValue, NormalizedResponse, RequestBody};

mod common;

use common::{client, spawn_bridge, FailingHandler, RecordingHandler};

#[tokio::test]
async fn test_root_prefix_is_stripped_before_dispatch() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("/api", Box::new(handler.clone())).await;

    let res = client()
        .get(format!("http://{addr}/api/widgets/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = handler.last_request().unwrap();
    assert_eq!(seen.uri, "/widgets/7");
    assert_eq!(seen.method, Method::GET);

    shutdown.trigger();
}

#[tokio::test]
async fn test_get_request_has_no_body_key() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    client()
        .get(format!("http://{addr}/things"))
        .send()
        .await
        .unwrap();

    let seen = handler.last_request().unwrap();
    assert!(seen.body.is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_post_body_is_decoded() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    client()
        .post(format!("http://{addr}/things"))
        .header("content-type", "application/json")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .unwrap();

    let seen = handler.last_request().unwrap();
    assert_eq!(
        seen.body,
        Some(RequestBody::Json(serde_json::json!({"a": 1})))
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_form_post_keeps_repeated_keys_in_order() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    client()
        .post(format!("http://{addr}/things"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("a=1&a=2")
        .send()
        .await
        .unwrap();

    let seen = handler.last_request().unwrap();
    let Some(RequestBody::Form(params)) = seen.body else {
        panic!("expected form body");
    };
    assert_eq!(params.values("a"), vec!["1", "2"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_without_content_type_is_raw_text() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    client()
        .post(format!("http://{addr}/things"))
        .body("opaque payload")
        .send()
        .await
        .unwrap();

    let seen = handler.last_request().unwrap();
    assert_eq!(
        seen.body,
        Some(RequestBody::Text("opaque payload".to_string()))
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_handler_response_converts_out() {
    let response = NormalizedResponse::new(201)
        .with_header("x-widget", "7")
        .with_body(KwValue::map([(
            "widget",
            KwValue::map([("id", KwValue::from(7i64))]),
        )]));
    let handler = RecordingHandler::new(response);
    let (addr, shutdown) = spawn_bridge("/api", Box::new(handler)).await;

    let res = client()
        .post(format!("http://{addr}/api/widgets"))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(res.headers().get("x-widget").unwrap(), "7");
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"widget": {"id": 7}}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_headers_reach_the_handler_in_order() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    client()
        .get(format!("http://{addr}/things"))
        .header("x-custom", "value")
        .send()
        .await
        .unwrap();

    let seen = handler.last_request().unwrap();
    assert_eq!(seen.header("X-Custom"), Some("value"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_handler_failure_surfaces_as_500() {
    let (addr, shutdown) = spawn_bridge("", Box::new(FailingHandler)).await;

    let res = client()
        .get(format!("http://{addr}/things"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let handler = RecordingHandler::new(NormalizedResponse::new(200));
    let (addr, shutdown) = spawn_bridge("", Box::new(handler.clone())).await;

    let res = client()
        .post(format!("http://{addr}/things"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    // The handler was never invoked.
    assert!(handler.last_request().is_none());

    shutdown.trigger();
}
