//! Exercises `OpenAiProvider` against a one-shot local HTTP responder.

use provider::{
    CompletionProvider, CompletionRequest, InlineImage, OpenAiProvider, ProviderConfig,
    ProviderError,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, capture the request, answer with `status` and `body`.
async fn one_shot_server(status: u16, body: String) -> (String, JoinHandle<(String, Value)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let (head, body_start, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                break (head, pos + 4, length);
            }
        };

        while buf.len() < body_start + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body: Value =
            serde_json::from_slice(&buf[body_start..body_start + content_length]).unwrap();

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        (head, request_body)
    });

    (format!("http://{addr}/v1"), handle)
}

fn provider_for(base_url: String) -> OpenAiProvider {
    OpenAiProvider::new(ProviderConfig {
        api_key: Some("sk-test".into()),
        base_url,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn text_completion_round_trip() {
    let reply = json!({
        "choices": [ { "message": { "role": "assistant", "content": "{\"appeal_strength\":\"weak\"}" } } ]
    });
    let (base_url, server) = one_shot_server(200, reply.to_string()).await;

    let text = provider_for(base_url)
        .complete(CompletionRequest::text("assess"))
        .await
        .unwrap();
    assert_eq!(text, "{\"appeal_strength\":\"weak\"}");

    let (head, body) = server.await.unwrap();
    assert!(head.starts_with("POST /v1/chat/completions "));
    assert!(head
        .lines()
        .any(|l| l.eq_ignore_ascii_case("authorization: Bearer sk-test")));
    assert_eq!(body["messages"][0]["content"], "assess");
}

#[tokio::test]
async fn image_completion_sends_data_url() {
    let reply = json!({ "choices": [ { "message": { "content": "{}" } } ] });
    let (base_url, server) = one_shot_server(200, reply.to_string()).await;

    let request = CompletionRequest::with_image("read", InlineImage::new("image/png", vec![1, 2, 3]));
    provider_for(base_url).complete(request).await.unwrap();

    let (_, body) = server.await.unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(
        body["messages"][0]["content"][1]["image_url"]["url"],
        "data:image/png;base64,AQID"
    );
}

#[tokio::test]
async fn blank_content_is_returned_as_text() {
    for content in [json!(""), json!(null), json!("   ")] {
        let reply = json!({ "choices": [ { "message": { "content": content.clone() } } ] });
        let (base_url, server) = one_shot_server(200, reply.to_string()).await;

        let text = provider_for(base_url)
            .complete(CompletionRequest::text("assess"))
            .await
            .unwrap();

        assert_eq!(text.trim(), "", "content {content}");
        server.await.unwrap();
    }
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let reply = json!({ "error": { "message": "Rate limit reached for gpt-4o" } });
    let (base_url, server) = one_shot_server(429, reply.to_string()).await;

    let err = provider_for(base_url)
        .complete(CompletionRequest::text("assess"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProviderError::Status {
            status: 429,
            body: "Rate limit reached for gpt-4o".into()
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let err = provider_for(format!("http://{addr}/v1"))
        .complete(CompletionRequest::text("assess"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Request(_)));
}
