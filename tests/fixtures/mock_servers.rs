//! Mock Genie servers
//!
//! Each helper starts a wiremock server and mounts the two protocol endpoints.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Server that accepts any reference and answers every synthesis with `pcm`.
pub async fn healthy_server(pcm: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    accept_reference(&server).await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pcm))
        .mount(&server)
        .await;
    server
}

/// Server whose reference registration always fails with `status`.
pub async fn failing_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set_reference_audio"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

/// Mount a 200 response for `POST /set_reference_audio`.
pub async fn accept_reference(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/set_reference_audio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(server)
        .await;
}

/// Mount a synthesis response for requests whose `text` equals `text`.
pub async fn respond_to_text(server: &MockServer, text: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/tts"))
        .and(body_partial_json(json!({ "text": text })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Requests a server received on `endpoint`.
pub async fn requests_to(server: &MockServer, endpoint: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == endpoint)
        .collect()
}

/// `text` fields of the synthesis requests a server received.
pub async fn synthesized_texts(server: &MockServer) -> Vec<String> {
    requests_to(server, "/tts")
        .await
        .iter()
        .filter_map(|r| serde_json::from_slice::<serde_json::Value>(&r.body).ok())
        .filter_map(|body| body["text"].as_str().map(str::to_string))
        .collect()
}
