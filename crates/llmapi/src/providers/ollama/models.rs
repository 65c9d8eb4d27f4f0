use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub model: Option<String>,
    pub created_at: Option<String>,
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    pub done_reason: Option<String>,
    pub total_duration: Option<u64>,
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaMessage {
    pub role: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct OllamaErrorResponse {
    pub error: String,
}
