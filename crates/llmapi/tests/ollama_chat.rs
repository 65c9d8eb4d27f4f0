use llmapi::{LLMClient, LLMMessage, LLMMessageType, LLMProvider, get_llm_chat};
use mockito::Matcher;
use serde_json::{Map, json};

fn caption_request() -> Vec<LLMMessage> {
    vec![
        LLMMessage::system("Caption the image in one sentence."),
        LLMMessage::new(
            None,
            "user",
            vec![
                LLMMessageType::text("Describe this image."),
                LLMMessageType::image_b64("aGVsbG8="),
            ],
        ),
    ]
}

#[tokio::test]
async fn chat_returns_assistant_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "llava",
            "stream": false,
            "options": { "temperature": 0.1 },
            "messages": [
                { "role": "system", "content": "Caption the image in one sentence." },
                { "role": "user", "content": "Describe this image.", "images": ["aGVsbG8="] }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "model": "llava",
                "created_at": "2024-05-01T10:00:00Z",
                "message": { "role": "assistant", "content": "A dog asleep on a rug." },
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut options = Map::new();
    options.insert("temperature".into(), json!(0.1));
    let client = LLMClient::new(LLMProvider::Ollama, server.url(), "llava").with_options(options);
    let chat = get_llm_chat(client);

    let reply = chat(caption_request()).await.expect("chat should succeed");

    assert_eq!(reply.text(), "A dog asleep on a rug.");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_surfaces_server_error_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"model \"llava\" not found, try pulling it first"}"#)
        .create_async()
        .await;

    let client = LLMClient::new(LLMProvider::Ollama, server.url(), "llava");
    let chat = get_llm_chat(client);

    let err = chat(caption_request()).await.expect_err("chat should fail");

    assert!(err.to_string().contains("not found, try pulling it first"));
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_rejects_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = LLMClient::new(LLMProvider::Ollama, server.url(), "llava");
    let chat = get_llm_chat(client);

    assert!(chat(caption_request()).await.is_err());
}

#[tokio::test]
async fn chat_fails_when_server_is_unreachable() {
    // Port 9 (discard) is not an Ollama server on any test host.
    let client = LLMClient::new(LLMProvider::Ollama, "http://127.0.0.1:9", "llava");
    let chat = get_llm_chat(client);

    assert!(chat(caption_request()).await.is_err());
}
