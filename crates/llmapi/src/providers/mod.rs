pub mod ollama;

use crate::types::{ChatFn, LLMClient, LLMProvider};

pub use ollama::{chat as ollama_chat, send_chat_request};

pub fn get_llm_chat(client: LLMClient) -> ChatFn {
    match client.provider() {
        LLMProvider::Ollama => ollama_chat(client),
    }
}
