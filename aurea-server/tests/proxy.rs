//! End-to-end tests: the real router on an ephemeral port, Ollama mocked with wiremock.

use aurea_client::{APOLOGY, ChatClient, ClientError, Conversation, Phase, run_turn};
use aurea_server::{AppState, ChatMode, ServerConfig};
use aurea_types::Message;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HI_THERE: &str = concat!(
    r#"{"model":"gemma3:4b","message":{"role":"assistant","content":"Hi"},"done":false}"#,
    "\n",
    r#"{"model":"gemma3:4b","message":{"role":"assistant","content":" there"},"done":false}"#,
    "\n",
);

async fn spawn_proxy(ollama_url: &str, mode: ChatMode) -> String {
    let config = ServerConfig {
        ollama_url: ollama_url.to_string(),
        mode,
        ..Default::default()
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        aurea_server::serve_with_shutdown(
            listener,
            AppState::from_config(&config),
            std::future::pending(),
        )
        .await
    });
    format!("http://{addr}")
}

async fn ollama_streaming(body: &'static str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "gemma3:4b",
            "messages": [{ "role": "user", "content": "hello" }],
            "stream": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn post_chat(proxy: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{proxy}/api/chat"))
        .json(&body)
        .send()
        .await
        .expect("proxy reachable")
}

#[tokio::test]
async fn stream_relays_fragments_as_data_frames() {
    let ollama = ollama_streaming(HI_THERE).await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Stream).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    assert_eq!(response.headers()["cache-control"], "no-cache");
    assert_eq!(
        response.text().await.expect("body"),
        "data: Hi\n\ndata:  there\n\n"
    );
}

#[tokio::test]
async fn hello_yields_single_assistant_message() {
    let ollama = ollama_streaming(HI_THERE).await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Stream).await;

    let client = ChatClient::new(proxy);
    let mut conversation = Conversation::new();
    run_turn(&client, &mut conversation, "hello", |_| {})
        .await
        .expect("turn");

    assert_eq!(
        conversation.messages(),
        &[Message::user("hello"), Message::assistant("Hi there")]
    );
    assert_eq!(conversation.phase(), Phase::Complete);
}

#[tokio::test]
async fn malformed_upstream_lines_are_dropped() {
    let body = concat!(
        r#"{"message":{"content":"Hi"}}"#,
        "\n",
        "{oops\n",
        r#"{"message":{"content":" there"}}"#,
        "\n",
        r#"{"message":{"content":""},"done":true}"#,
        "\n",
    );
    let ollama = ollama_streaming(body).await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Stream).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(
        response.text().await.expect("body"),
        "data: Hi\n\ndata:  there\n\n"
    );
}

#[tokio::test]
async fn multiline_fragment_is_rendered_without_newlines() {
    let body = concat!(
        r#"{"message":{"content":"line one\n"}}"#,
        "\n",
        r#"{"message":{"content":"line two"}}"#,
        "\n",
    );
    let ollama = ollama_streaming(body).await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Stream).await;

    let client = ChatClient::new(proxy);
    let mut conversation = Conversation::new();
    run_turn(&client, &mut conversation, "hello", |_| {})
        .await
        .expect("turn");
    assert_eq!(conversation.messages()[1].text, "line oneline two");
}

#[tokio::test]
async fn unreachable_upstream_writes_error_frame() {
    let proxy = spawn_proxy("http://127.0.0.1:9", ChatMode::Stream).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.starts_with("data: Error: network error:"), "body: {body:?}");
    assert!(body.ends_with("\n\n"));
    assert_eq!(body.matches("data: ").count(), 1);
}

#[tokio::test]
async fn unreachable_upstream_leaves_only_apology() {
    let proxy = spawn_proxy("http://127.0.0.1:9", ChatMode::Stream).await;

    let client = ChatClient::new(proxy);
    let mut conversation = Conversation::new();
    let err = run_turn(&client, &mut conversation, "hello", |_| {})
        .await
        .unwrap_err();

    assert!(
        matches!(&err, ClientError::Upstream(reason) if reason.starts_with("network error:")),
        "got: {err:?}"
    );
    assert_eq!(
        conversation.messages(),
        &[Message::user("hello"), Message::assistant(APOLOGY)]
    );
    assert_eq!(conversation.phase(), Phase::Error);
}

#[tokio::test]
async fn upstream_status_error_writes_error_frame() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "error": "model \"gemma3:4b\" not found" })),
        )
        .mount(&ollama)
        .await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Stream).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(
        response.text().await.expect("body"),
        "data: Error: model not found: model \"gemma3:4b\" not found\n\n"
    );
}

#[tokio::test]
async fn batch_mode_returns_response_json() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "gemma3:4b",
            "message": { "role": "assistant", "content": "Hi there" },
            "done": true,
        })))
        .expect(1)
        .mount(&ollama)
        .await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Batch).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body, serde_json::json!({ "response": "Hi there" }));
}

#[tokio::test]
async fn batch_mode_failure_returns_500_error_json() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .mount(&ollama)
        .await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Batch).await;

    let response = post_chat(&proxy, serde_json::json!({ "message": "hello" })).await;
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body, serde_json::json!({ "error": "service unavailable: loading" }));
}

#[tokio::test]
async fn batch_mode_client_turn() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": { "role": "assistant", "content": "Hi there" },
            "done": true,
        })))
        .mount(&ollama)
        .await;
    let proxy = spawn_proxy(&ollama.uri(), ChatMode::Batch).await;

    let client = ChatClient::new(proxy);
    let mut conversation = Conversation::new();
    run_turn(&client, &mut conversation, "hello", |_| {})
        .await
        .expect("turn");
    assert_eq!(conversation.messages()[1], Message::assistant("Hi there"));
}

#[tokio::test]
async fn malformed_request_body_is_400() {
    let proxy = spawn_proxy("http://127.0.0.1:9", ChatMode::Stream).await;

    let response = post_chat(&proxy, serde_json::json!({ "text": "hello" })).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("invalid request body")),
        "body: {body}"
    );
}

#[tokio::test]
async fn index_serves_chat_page() {
    let proxy = spawn_proxy("http://127.0.0.1:9", ChatMode::Stream).await;

    let response = reqwest::get(format!("{proxy}/")).await.expect("get");
    assert_eq!(response.status(), 200);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = response.text().await.expect("body");
    assert!(html.contains("/api/chat"));
    assert!(html.contains("AUREA"));
}

#[tokio::test]
async fn health_is_ok() {
    let proxy = spawn_proxy("http://127.0.0.1:9", ChatMode::Stream).await;
    let response = reqwest::get(format!("{proxy}/health")).await.expect("get");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}
