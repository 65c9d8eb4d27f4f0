use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::types::{ChatFn, ChatFuture, LLMClient, LLMMessage, LLMMessageType};

use super::models::{OllamaChatResponse, OllamaErrorResponse};

const OLLAMA_CHAT_PATH: &str = "/api/chat";

pub fn chat(client: LLMClient) -> ChatFn {
    Arc::new(move |messages: Vec<LLMMessage>| -> ChatFuture {
        let client = client.clone();
        Box::pin(async move { send_chat_request(&client, messages).await })
    })
}

pub async fn send_chat_request(client: &LLMClient, messages: Vec<LLMMessage>) -> Result<LLMMessage> {
    let url = format!("{}{}", client.endpoint(), OLLAMA_CHAT_PATH);
    let payload = build_chat_payload(client, messages);

    tracing::debug!(url = %url, model = client.default_model(), "sending Ollama chat request");

    let response = client
        .http()
        .post(&url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("Ollama request to {url} failed"))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .context("Failed to read Ollama response body")?;

    if !status.is_success() {
        let message = serde_json::from_str::<OllamaErrorResponse>(&response_text)
            .map(|body| body.error)
            .unwrap_or(response_text);
        return Err(anyhow!("Ollama returned status {status}: {message}"));
    }

    let response: OllamaChatResponse = serde_json::from_str(&response_text)
        .with_context(|| format!("Failed to decode Ollama response JSON: {response_text}"))?;

    convert_ollama_response(response)
}

/// Non-streaming `/api/chat` body. `options` is left out entirely when empty.
pub fn build_chat_payload(client: &LLMClient, messages: Vec<LLMMessage>) -> Value {
    let mut payload = json!({
        "model": client.default_model(),
        "messages": messages.into_iter().map(convert_message).collect::<Vec<_>>(),
        "stream": false
    });

    if !client.options().is_empty() {
        payload["options"] = Value::Object(client.options().clone());
    }

    payload
}

fn convert_message(message: LLMMessage) -> Value {
    let mut text_segments = Vec::new();
    let mut images = Vec::new();

    for part in message.content {
        match part {
            LLMMessageType::TEXT(text) => text_segments.push(text),
            LLMMessageType::IMAGE { data_b64, .. } => images.push(data_b64),
        }
    }

    let mut value = json!({
        "role": message.role.as_str(),
        "content": text_segments.join("\n")
    });

    if !images.is_empty() {
        value["images"] = json!(images);
    }

    value
}

fn convert_ollama_response(response: OllamaChatResponse) -> Result<LLMMessage> {
    let message = response
        .message
        .ok_or_else(|| anyhow!("No message returned from Ollama"))?;

    if !response.done {
        tracing::warn!(
            model = response.model.as_deref().unwrap_or_default(),
            "Ollama reported an unfinished response"
        );
    }

    let role = message.role.unwrap_or_else(|| "assistant".to_string());

    Ok(LLMMessage::new(
        response.created_at,
        &role,
        vec![LLMMessageType::text(message.content)],
    ))
}
