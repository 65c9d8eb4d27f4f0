mod commands;
mod config;
mod constants;
mod fs_utils;
mod models;

use std::path::Path;

use anyhow::Result;
use llmapi::{get_llm_chat, LLMClient, LLMProvider};

pub use commands::caption::{caption_images, format_caption, generate_caption};
pub use commands::prompts::{build_caption_messages, build_user_prompt, filename_hint};

pub use config::{
    CaptionConfig, ConfigError, OllamaConfig, PathsConfig, ProcessingConfig, PromptsConfig,
};
pub use constants::{CAPTION_EXTENSION, DEFAULT_CONFIG_FILE};

pub use fs_utils::{caption_output_path, collect_directory_images, has_valid_extension};

pub use models::{CaptionReport, ImageEntry};

/// True when the run stopped because the config file does not exist. That
/// case is reported but does not produce a failing exit status.
pub fn is_missing_config(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NotFound(_))
    )
}

/// Loads the config at `config_path`, connects to the configured Ollama model
/// and captions the whole input folder.
pub async fn run(config_path: &Path) -> Result<CaptionReport> {
    let config = CaptionConfig::from_file(config_path)?;

    let client = LLMClient::new(
        LLMProvider::Ollama,
        &config.ollama.host,
        config.ollama.model.clone(),
    )
    .with_options(config.ollama.options.clone());
    tracing::debug!(endpoint = client.endpoint(), "using Ollama server");

    let chat = get_llm_chat(client);
    caption_images(&config, &chat).await
}
