#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose};
use clap::Parser;
use nutriscope_api::{
    application::http::server::http_server::{router, state},
    args::Args,
};
use futures::{StreamExt, stream};
use serde_json::{Value, json};
use tempfile::{NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const GEMINI_API_KEY: &str = "test-key";

pub const EMPTY_PLATE: &[u8] = b"empty plate";
pub const UNREADABLE_PHOTO: &[u8] = b"unreadable photo";

pub const ANSWER_FRAGMENTS: [&str; 3] = ["Kale ", "is ", "nutritious."];

pub const DEFAULT_INDEX: &[(&str, [f32; 2])] = &[
    ("avocado", [1.0, 0.0]),
    ("guacamole", [0.9, 0.1]),
    ("sugar", [0.0, 1.0]),
    ("honey", [0.1, 0.9]),
];

/// A running Nutriscope router backed by a local stand-in for the Gemini API.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
    _index_file: NamedTempFile,
    gemini: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn(items: &[(&str, [f32; 2])]) -> Self {
        let (base_url, gemini) = spawn_fake_gemini().await;
        Self::spawn_with(items, base_url, gemini).await
    }

    /// Points the app at a Gemini address nothing listens on.
    pub async fn spawn_unreachable(items: &[(&str, [f32; 2])]) -> (Self, String) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let app = Self::spawn_with(
            items,
            format!("http://{}/v1beta", addr),
            tokio::spawn(async {}),
        )
        .await;
        (app, addr)
    }

    async fn spawn_with(
        items: &[(&str, [f32; 2])],
        base_url: String,
        gemini: JoinHandle<()>,
    ) -> Self {
        let index_file = NamedTempFile::new().unwrap();
        let index = json!({
            "version": 1,
            "dimension": 2,
            "metric": "cosine",
            "items": items
                .iter()
                .map(|(id, vector)| json!({"id": id, "vector": vector}))
                .collect::<Vec<_>>(),
        });
        std::fs::write(index_file.path(), index.to_string()).unwrap();

        let upload_dir = TempDir::new().unwrap();

        let args = Args::try_parse_from([
            "nutriscope-server",
            "--gemini-api-key",
            GEMINI_API_KEY,
            "--gemini-base-url",
            &base_url,
            "--index-path",
            index_file.path().to_str().unwrap(),
            "--index-dimension",
            "2",
            "--upload-dir",
            upload_dir.path().to_str().unwrap(),
            "--upload-max-bytes",
            "1024",
        ])
        .unwrap();

        let app_state = state(Arc::new(args)).await.unwrap();
        let app = router(app_state).unwrap();
        let server = TestServer::builder().http_transport().build(app).unwrap();

        Self {
            server,
            upload_dir,
            _index_file: index_file,
            gemini,
        }
    }

    /// Number of files left behind in the upload directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.gemini.abort();
    }
}

async fn spawn_fake_gemini() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/v1beta/models/{call}", post(fake_gemini));

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), handle)
}

async fn fake_gemini(
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers
        .get("x-goog-api-key")
        .is_some_and(|key| key == GEMINI_API_KEY);
    if !authorized {
        return (StatusCode::FORBIDDEN, "missing API key header").into_response();
    }

    match call.split_once(':').map(|(_, method)| method) {
        Some("embedContent") => embed(&body),
        Some("generateContent") => extract_meal(&body),
        Some("streamGenerateContent") => stream_answer(&body),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn embed(body: &Value) -> Response {
    let text = body["content"]["parts"][0]["text"].as_str().unwrap_or_default();

    if text.contains("explode") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "embedding backend down").into_response();
    }

    let values = if text.contains("avocado") {
        [1.0, 0.0]
    } else if text.contains("sugar") {
        [0.0, 1.0]
    } else {
        [0.7, 0.7]
    };

    Json(json!({"embedding": {"values": values}})).into_response()
}

fn extract_meal(body: &Value) -> Response {
    let encoded = body["contents"][0]["parts"][1]["inline_data"]["data"]
        .as_str()
        .unwrap_or_default();
    let image = general_purpose::STANDARD.decode(encoded).unwrap_or_default();

    let extraction = if image == EMPTY_PLATE {
        json!({"ingredients": []})
    } else if image == UNREADABLE_PHOTO {
        return (StatusCode::INTERNAL_SERVER_ERROR, "vision backend down").into_response();
    } else {
        json!({"ingredients": [
            {"name": "avocado", "grams": 100, "calories": 160, "protein_g": 2,
             "carbohydrates_g": 8.5, "fat_g": 14.7},
            {"name": "toast", "grams": 40, "calories": 110, "protein_g": 4,
             "carbohydrates_g": 20, "fat_g": 1.5}
        ]})
    };

    Json(json!({"candidates": [{
        "content": {"role": "model", "parts": [{"text": extraction.to_string()}]},
        "finishReason": "STOP"
    }]}))
    .into_response()
}

fn stream_answer(body: &Value) -> Response {
    if body["system_instruction"]["parts"][0]["text"]
        .as_str()
        .is_none_or(str::is_empty)
    {
        return (StatusCode::BAD_REQUEST, "missing system instruction").into_response();
    }

    let question = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if question.contains("fail") {
        return (StatusCode::SERVICE_UNAVAILABLE, "model overloaded").into_response();
    }

    if question.contains("slowly") {
        // First fragment only, then the stream stays open without finishing.
        let first = sse_event(json!({
            "content": {"role": "model", "parts": [{"text": ANSWER_FRAGMENTS[0]}]}
        }));
        let body =
            stream::iter([Ok::<_, std::convert::Infallible>(first)]).chain(stream::pending());
        return (
            [(header::CONTENT_TYPE, "text/event-stream")],
            Body::from_stream(body),
        )
            .into_response();
    }

    let mut events = String::new();
    for (i, fragment) in ANSWER_FRAGMENTS.iter().enumerate() {
        let mut candidate = json!({"content": {"role": "model", "parts": [{"text": fragment}]}});
        if i == ANSWER_FRAGMENTS.len() - 1 {
            candidate["finishReason"] = json!("STOP");
        }
        events.push_str(&sse_event(candidate));
    }

    ([(header::CONTENT_TYPE, "text/event-stream")], events).into_response()
}

fn sse_event(candidate: Value) -> String {
    format!("data: {}\n\n", json!({"candidates": [candidate]}))
}
