use super::mocks::{FixedClassifier, MockLlmClient};
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use dermassist::{
    chat::ChatSession,
    classifier::SkinAnalyzer,
    config::{ServerConfig, default_class_names},
    history::HistoryStorage,
    server::{AppState, router},
};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "dermassist-test-boundary";

/// Scores that make "Ringworm" the winner with 0.72.
pub fn ringworm_scores() -> Vec<f32> {
    vec![0.02, 0.03, 0.1, 0.05, 0.72, 0.03, 0.03, 0.02]
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub llm: MockLlmClient,
    // Holds the database file and static bundle alive for the test.
    pub temp_dir: TempDir,
}

pub async fn create_test_app(llm: MockLlmClient) -> TestApp {
    create_test_app_with(llm, ringworm_scores()).await
}

pub async fn create_test_app_with(llm: MockLlmClient, scores: Vec<f32>) -> TestApp {
    let chat = ChatSession::with_client(Box::new(llm.clone()), "PROMPT", None);
    create_test_app_with_chat(chat, llm, scores).await
}

pub async fn create_test_app_with_chat(
    chat: ChatSession,
    llm: MockLlmClient,
    scores: Vec<f32>,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let static_dir = temp_dir.path().join("dist");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>DermAssist</html>").unwrap();

    let db_path = temp_dir.path().join("history.db");
    let history = HistoryStorage::new(&db_path.to_string_lossy())
        .await
        .unwrap();

    let analyzer = SkinAnalyzer::new(
        Arc::new(FixedClassifier { size: 16, scores }),
        default_class_names(),
    );

    let state = AppState::new(chat, analyzer, history);
    let server = ServerConfig {
        static_dir: static_dir.to_string_lossy().to_string(),
        ..ServerConfig::default()
    };

    TestApp {
        router: router(state.clone(), &server),
        state,
        llm,
        temp_dir,
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    request
}

/// `name=value` of the first Set-Cookie header, ready to send back.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, image::Rgb([200, 120, 90])))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// One multipart part: field name, optional filename, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                part.name, file_name
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
