use anyhow::{Context, Result};
use base64::Engine as _;
use std::fs;
use std::path::Path;

pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";

pub fn encode_image_to_base64(img_path: &Path) -> Result<String> {
    let bytes = fs::read(img_path)
        .with_context(|| format!("Failed to read image file: {}", img_path.display()))?;
    Ok(encode_byte_to_base64(bytes))
}

pub fn encode_byte_to_base64(bytes: Vec<u8>) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Turns a user-supplied host such as `localhost:11434` into a base URL
/// without a trailing slash.
pub fn normalize_host(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_OLLAMA_HOST.to_string();
    }
    if is_http_url(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
