use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

mod common;
use common::*;

async fn server() -> (TestServer, TestApp) {
    let app = create_test_app(MockLlmClient::new().with_replies(&["one", "two"])).await;
    let server = TestServer::new(app.router.clone()).unwrap();
    (server, app)
}

#[tokio::test]
async fn test_signup_login_profile_with_cookie() {
    let (server, _app) = server().await;

    let signup = server
        .post("/api/signup")
        .json(&json!({
            "email": "sam@example.com",
            "password": "pa55word",
            "first_name": "Sam",
            "last_name": "Lee"
        }))
        .await;
    assert_eq!(signup.status_code(), StatusCode::OK);

    let login = server
        .post("/api/login")
        .json(&json!({ "email": "sam@example.com", "password": "pa55word" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    assert_eq!(
        login.json::<Value>(),
        json!({ "message": "Login successful" })
    );

    let profile = server
        .get("/api/profile")
        .add_cookie(login.cookie("session"))
        .await;
    assert_eq!(profile.status_code(), StatusCode::OK);
    assert_eq!(profile.json::<Value>()["first_name"], "Sam");
}

#[tokio::test]
async fn test_shared_chat_history_across_callers() {
    let (server, app) = server().await;

    let first = server
        .post("/api/chat")
        .json(&json!({ "message": "from caller A" }))
        .await;
    let second = server
        .post("/chat")
        .json(&json!({ "message": "from caller B" }))
        .await;

    assert_eq!(first.json::<Value>()["response"], "one");
    assert_eq!(second.json::<Value>()["response"], "two");

    // One conversation for everybody: the second caller's request carries the
    // first caller's turn.
    let requests = app.llm.get_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 3);
    assert!(requests[1].messages[0].content.ends_with("User: from caller A"));
}

#[tokio::test]
async fn test_error_bodies_always_have_error_key() {
    let (server, _app) = server().await;

    let responses = [
        server.post("/api/login").json(&json!({})).await,
        server.post("/api/signup").json(&json!({})).await,
        server.post("/api/chat").json(&json!({})).await,
        server.get("/api/profile").await,
        server.post("/api/appointments").json(&json!({})).await,
    ];

    for response in responses {
        assert!(response.status_code().is_client_error());
        assert!(response.json::<Value>()["error"].is_string());
    }
}
