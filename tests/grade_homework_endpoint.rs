use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dr_owl_lib::grading::fallback::fallback_result;
use dr_owl_lib::grading::image::ImagePayload;
use dr_owl_lib::grading::GradingGateway;
use dr_owl_lib::providers::VisionModel;
use dr_owl_lib::server::{router, AppState, GRADE_HOMEWORK_PATH, GRADING_MODE_HEADER};
use dr_owl_lib::settings::Settings;
use futures::future::BoxFuture;
use serde_json::{json, Value};

const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

struct CannedModel {
    reply: String,
    calls: AtomicUsize,
}

impl VisionModel for CannedModel {
    fn describe(&self) -> String {
        "canned".to_string()
    }

    fn analyze_image<'a>(&'a self, _prompt: &'a str, _image: &'a ImagePayload) -> BoxFuture<'a, anyhow::Result<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        Box::pin(async move { Ok(reply) })
    }
}

async fn spawn_server(gateway: GradingGateway) -> SocketAddr {
    let app = router(AppState::new(gateway), Settings::default().max_body_bytes());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_with_reply(reply: &str) -> (SocketAddr, Arc<CannedModel>) {
    let model = Arc::new(CannedModel {
        reply: reply.to_string(),
        calls: AtomicUsize::new(0),
    });
    let gateway = GradingGateway::with_model(model.clone(), Settings::default().max_image_bytes);
    (spawn_server(gateway).await, model)
}

fn url(addr: SocketAddr) -> String {
    format!("http://{}{}", addr, GRADE_HOMEWORK_PATH)
}

fn graded_document() -> Value {
    json!({
        "parent_analysis": {
            "overall_assessment": "Letters are well formed for this age.",
            "glows": ["Consistent letter size"],
            "grows": ["Leave a finger space between words"],
            "parent_child_activities": ["Play letter bingo"]
        },
        "child_encouragement": {
            "praise_message": "Super writing! ✨",
            "badges": ["Alphabet Star"],
            "fun_challenges": ["Write the alphabet backwards"]
        },
        "scores": {
            "letter_formation": 38,
            "line_adherence": 24,
            "consistency_spacing": 15,
            "overall_effort": 9
        },
        "total_score": 86
    })
}

#[tokio::test]
async fn missing_image_returns_400_without_upstream_call() {
    let (addr, model) = spawn_with_reply("unused").await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": "", "filename": "blank.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No image provided" }));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn null_or_absent_image_returns_400_without_upstream_call() {
    let (addr, model) = spawn_with_reply("unused").await;
    let client = reqwest::Client::new();

    for body in [json!({ "image": null, "filename": "a.png" }), json!({ "filename": "a.png" })] {
        let response = client.post(url(addr)).json(&body).send().await.unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "No image provided" }));
    }
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn extra_model_fields_reach_the_client() {
    let mut document = graded_document();
    document["confidence"] = json!("high");
    document["scores"]["overall_effort"] = json!(9.0);
    let (addr, _model) = spawn_with_reply(&format!("```json\n{}\n```", document)).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": PNG_1X1, "filename": "hw.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[GRADING_MODE_HEADER], "authoritative");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, document);
}

#[tokio::test]
async fn non_json_body_is_a_client_error() {
    let (addr, model) = spawn_with_reply("unused").await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .header("Content-Type", "application/json")
        .body("this is not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fenced_reply_is_returned_field_for_field() {
    let document = graded_document();
    let reply = format!("Dr. Owl says:\n```json\n{}\n```", serde_json::to_string_pretty(&document).unwrap());
    let (addr, model) = spawn_with_reply(&reply).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": format!("data:image/png;base64,{}", PNG_1X1), "filename": "hw.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[GRADING_MODE_HEADER], "authoritative");
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, document);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unparseable_reply_returns_fallback_with_200() {
    let (addr, _model) = spawn_with_reply("The picture is too dark for me to grade.").await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": PNG_1X1, "filename": "dark.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[GRADING_MODE_HEADER], "degraded");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::to_value(fallback_result()).unwrap());
}

#[tokio::test]
async fn reply_without_scores_returns_500_with_details() {
    let mut document = graded_document();
    document.as_object_mut().unwrap().remove("scores");
    let (addr, _model) = spawn_with_reply(&format!("```json\n{}\n```", document)).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": PNG_1X1, "filename": "hw.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to process homework grading");
    assert!(body["details"].as_str().unwrap().contains("scores"));
}

#[tokio::test]
async fn unconfigured_provider_returns_500() {
    let addr = spawn_server(GradingGateway::from_settings(&Settings::default())).await;

    let response = reqwest::Client::new()
        .post(url(addr))
        .json(&json!({ "image": PNG_1X1, "filename": "hw.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Server configuration error");
    assert!(body["details"].as_str().unwrap().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn options_preflight_allows_cross_origin_posts() {
    let (addr, _model) = spawn_with_reply("unused").await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, url(addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn health_check_responds() {
    let (addr, _model) = spawn_with_reply("unused").await;

    let body = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}
