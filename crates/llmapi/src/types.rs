use crate::utils;
use anyhow::Result;
use reqwest::Client;
use serde_json::{Map, Value};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMProvider {
    Ollama,
}

#[derive(Clone, Debug)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE {
        data_b64: String,
        file_path: Option<String>,
    },
}
impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }
    pub fn image_b64(data_b64: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: data_b64.into(),
            file_path: None,
        }
    }
    /// Reads and encodes the file up front so an unreadable image fails
    /// before any request is sent.
    pub fn image(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data_b64 = utils::encode_image_to_base64(path)?;
        Ok(LLMMessageType::IMAGE {
            data_b64,
            file_path: Some(path.display().to_string()),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMUserType {
    Human,
    AI,
    System,
}
impl LLMUserType {
    pub fn from_str(role_str: &str) -> Option<Self> {
        match role_str.trim().to_lowercase().as_str() {
            "user" | "human" => Some(LLMUserType::Human),
            "model" | "ai" | "assistant" => Some(LLMUserType::AI),
            "system" => Some(LLMUserType::System),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LLMUserType::Human => "user",
            LLMUserType::AI => "assistant",
            LLMUserType::System => "system",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub id: String,
    pub role: LLMUserType,
    pub content: Vec<LLMMessageType>,
    pub created_at: i64,
}

impl LLMMessage {
    pub fn new(id: Option<String>, role: &str, content: Vec<LLMMessageType>) -> Self {
        let id = id.unwrap_or_else(|| utils::current_timestamp_millis().to_string());
        Self {
            id,
            role: LLMUserType::from_str(role).unwrap_or(LLMUserType::Human),
            content,
            created_at: utils::current_timestamp_millis() as i64,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(None, "system", vec![LLMMessageType::text(text)])
    }

    /// Concatenates the text parts in order, ignoring attachments.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                LLMMessageType::TEXT(text) => Some(text.as_str()),
                LLMMessageType::IMAGE { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Handle to one model on one server. The HTTP client inside is built once
/// and shared by every clone.
#[derive(Clone, Debug)]
pub struct LLMClient {
    pub(crate) provider: LLMProvider,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
    pub(crate) options: Map<String, Value>,
    pub(crate) http: Client,
}

impl LLMClient {
    pub fn new(
        provider: LLMProvider,
        endpoint: impl AsRef<str>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            endpoint: utils::normalize_host(endpoint.as_ref()),
            default_model: default_model.into(),
            options: Map::new(),
            http: Client::new(),
        }
    }

    /// Inference options forwarded verbatim with every chat request.
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

pub type ChatFuture = Pin<Box<dyn Future<Output = Result<LLMMessage>> + Send + 'static>>;

pub type ChatFn = Arc<dyn Fn(Vec<LLMMessage>) -> ChatFuture + Send + Sync>;
