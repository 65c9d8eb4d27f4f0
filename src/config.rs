//! Loading and validation of the YAML run configuration.
//!
//! The file is read once at startup into [`CaptionConfig`]. Every required key
//! is checked up front and all missing ones are reported together, so a bad
//! config never fails halfway through a run.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("unable to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub paths: PathsConfig,
    pub ollama: OllamaConfig,
    pub processing: ProcessingConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub valid_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub use_filename_context: bool,
    pub filename_strip_prefixes: Vec<String>,
    pub trigger_word: Option<String>,
}

impl ProcessingConfig {
    /// The trigger word, if one is set and non-empty.
    pub fn trigger(&self) -> Option<&str> {
        self.trigger_word.as_deref().filter(|word| !word.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct PromptsConfig {
    pub system_instruction: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    paths: Option<RawPaths>,
    ollama: Option<RawOllama>,
    processing: Option<RawProcessing>,
    prompts: Option<RawPrompts>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPaths {
    input_folder: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    valid_extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOllama {
    host: Option<String>,
    model: Option<String>,
    options: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProcessing {
    use_filename_context: Option<bool>,
    filename_strip_prefixes: Option<Vec<String>>,
    trigger_word: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPrompts {
    system_instruction: Option<String>,
}

impl CaptionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content, path)
    }

    /// Parses YAML text; `origin` is only used in error messages.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: origin.to_path_buf(),
                source,
            })?
        };

        validate(raw)
    }
}

fn require<T>(missing: &mut Vec<String>, key: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        missing.push(key.to_string());
    }
    value
}

fn validate(raw: RawConfig) -> Result<CaptionConfig, ConfigError> {
    let paths = raw.paths.unwrap_or_default();
    let ollama = raw.ollama.unwrap_or_default();
    let processing = raw.processing.unwrap_or_default();
    let prompts = raw.prompts.unwrap_or_default();

    let mut missing = Vec::new();
    let input_folder = require(&mut missing, "paths.input_folder", paths.input_folder);
    let output_folder = require(&mut missing, "paths.output_folder", paths.output_folder);
    let valid_extensions = require(
        &mut missing,
        "paths.valid_extensions",
        paths.valid_extensions,
    );
    let host = require(&mut missing, "ollama.host", ollama.host);
    let model = require(
        &mut missing,
        "ollama.model",
        ollama.model.filter(|model| !model.trim().is_empty()),
    );
    let use_filename_context = require(
        &mut missing,
        "processing.use_filename_context",
        processing.use_filename_context,
    );
    let system_instruction = require(
        &mut missing,
        "prompts.system_instruction",
        prompts.system_instruction,
    );

    match (
        input_folder,
        output_folder,
        valid_extensions,
        host,
        model,
        use_filename_context,
        system_instruction,
    ) {
        (
            Some(input_folder),
            Some(output_folder),
            Some(valid_extensions),
            Some(host),
            Some(model),
            Some(use_filename_context),
            Some(system_instruction),
        ) => Ok(CaptionConfig {
            paths: PathsConfig {
                input_folder,
                output_folder,
                valid_extensions,
            },
            ollama: OllamaConfig {
                host,
                model,
                options: ollama.options.unwrap_or_default(),
            },
            processing: ProcessingConfig {
                use_filename_context,
                filename_strip_prefixes: processing.filename_strip_prefixes.unwrap_or_default(),
                trigger_word: processing.trigger_word,
            },
            prompts: PromptsConfig { system_instruction },
        }),
        _ => Err(ConfigError::MissingFields(missing)),
    }
}
