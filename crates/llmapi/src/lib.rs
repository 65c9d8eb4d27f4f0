pub mod providers;
pub mod types;
pub mod utils;

pub use providers::get_llm_chat;
pub use types::{ChatFn, ChatFuture, LLMClient, LLMMessage, LLMMessageType, LLMProvider, LLMUserType};
