//! Analyze, ask and study guide endpoints.
//!
//! The mock language model answers unless a test points the service at a
//! fake chat completions server.

mod common;

use common::{bible_api_payload, keys, test_config, TestApp};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40}
    })
}

#[tokio::test]
async fn analyze_with_text_skips_scripture_lookup() {
    let scripture = MockServer::start().await;
    let app = TestApp::spawn(&scripture.uri()).await;

    let response = app
        .post_json(
            "/analyze",
            &json!({"reference": "Romans 8:15", "text": "Ye have received the Spirit of adoption"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(keys(&body), ["analysis", "reference", "text"]);
    assert_eq!(body["reference"], "Romans 8:15");
    assert!(body["analysis"]
        .as_str()
        .unwrap()
        .contains("Ye have received the Spirit of adoption"));

    assert!(scripture.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn analyze_with_reference_resolves_once() {
    let scripture = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/John%203:16"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bible_api_payload("John 3:16", "For God so loved the world")),
        )
        .expect(1)
        .mount(&scripture)
        .await;

    let app = TestApp::spawn(&scripture.uri()).await;
    let response = app
        .post_json("/api/analyze", &json!({"reference": "John 3:16"}))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reference"], "John 3:16");
    assert_eq!(body["text"], "For God so loved the world");
}

#[tokio::test]
async fn analyze_unresolvable_reference_is_404() {
    let scripture = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&scripture)
        .await;

    let app = TestApp::spawn(&scripture.uri()).await;
    let response = app
        .post_json("/analyze", &json!({"reference": "Nowhere 1:1"}))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Could not fetch verse for analysis"}));
}

#[tokio::test]
async fn analyze_body_errors_are_400() {
    let scripture = MockServer::start().await;
    let app = TestApp::spawn(&scripture.uri()).await;

    let response = app
        .client
        .post(format!("{}/analyze", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Request body is required"}));

    let response = app
        .client
        .post(format!("{}/analyze", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Request body is required"}));

    let response = app.post_json("/analyze", &json!({"text": "only text"})).await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Reference and text are required"}));
}

#[tokio::test]
async fn ask_unresolvable_reference_is_400() {
    let scripture = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&scripture)
        .await;

    let app = TestApp::spawn(&scripture.uri()).await;
    let response = app
        .post_json(
            "/ask",
            &json!({"reference": "Nowhere 1:1", "question": "What does this mean?"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "Reference, text, and question are required"})
    );
}

#[tokio::test]
async fn ask_returns_answer_with_inputs() {
    let scripture = MockServer::start().await;
    let app = TestApp::spawn(&scripture.uri()).await;

    let response = app
        .post_json(
            "/ask",
            &json!({
                "reference": "Galatians 4:6",
                "text": "God hath sent forth the Spirit of his Son into your hearts",
                "question": "What does Abba mean?"
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(keys(&body), ["answer", "question", "reference", "text"]);
    assert_eq!(body["question"], "What does Abba mean?");
    assert!(body["answer"].as_str().unwrap().contains("What does Abba mean?"));
}

#[tokio::test]
async fn ask_without_question_is_400() {
    let scripture = MockServer::start().await;
    let app = TestApp::spawn(&scripture.uri()).await;

    let response = app
        .post_json("/ask", &json!({"reference": "John 1:12", "text": "sons of God"}))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn oversized_question_is_400() {
    let scripture = MockServer::start().await;
    let app = TestApp::spawn(&scripture.uri()).await;

    let response = app
        .post_json(
            "/ask",
            &json!({"reference": "John 1:12", "text": "sons of God", "question": "?".repeat(2001)}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "question is too long"}));
}

#[tokio::test]
async fn study_guide_never_touches_scripture() {
    let scripture = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&scripture)
        .await;

    let app = TestApp::spawn(&scripture.uri()).await;
    let response = app.get("/study?topic=adoption").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(keys(&body), ["content", "topic"]);
    assert_eq!(body["topic"], "adoption");

    let response = app.get("/study").await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Topic parameter is required"}));
}

#[tokio::test]
async fn openai_completion_is_returned() {
    let scripture = MockServer::start().await;
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4.1-mini", "max_tokens": 600})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A guide on sonship")))
        .expect(1)
        .mount(&openai)
        .await;

    let app = TestApp::spawn_with(test_config(&scripture.uri(), Some(&openai.uri()))).await;
    let response = app.get("/api/study?topic=inheritance").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"topic": "inheritance", "content": "A guide on sonship"})
    );
}

#[tokio::test]
async fn openai_failure_is_500() {
    let scripture = MockServer::start().await;
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&openai)
        .await;

    let app = TestApp::spawn_with(test_config(&scripture.uri(), Some(&openai.uri()))).await;
    let response = app
        .post_json(
            "/analyze",
            &json!({"reference": "Ephesians 1:5", "text": "predestinated us unto the adoption"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Could not generate analysis"}));
}

#[tokio::test]
async fn slow_generation_is_500() {
    let scripture = MockServer::start().await;
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&openai)
        .await;

    // test_config bounds generation at 1 second
    let app = TestApp::spawn_with(test_config(&scripture.uri(), Some(&openai.uri()))).await;
    let response = app.get("/study?topic=freedom").await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Could not generate study guide"}));
}
