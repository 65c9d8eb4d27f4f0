use std::path::Path;

use anyhow::{Context, Result};
use llmapi::ChatFn;

use crate::commands::prompts::{build_caption_messages, filename_hint};
use crate::config::CaptionConfig;
use crate::fs_utils::{
    caption_output_path, collect_directory_images, ensure_output_dir, write_caption,
};
use crate::models::CaptionReport;

/// Asks the model for one caption and returns it trimmed. Any failure, from
/// reading the image to decoding the reply, is returned rather than logged.
pub async fn generate_caption(
    chat: &ChatFn,
    image_path: &Path,
    filename_hint: Option<&str>,
    config: &CaptionConfig,
) -> Result<String> {
    let messages =
        build_caption_messages(&config.prompts.system_instruction, image_path, filename_hint)?;

    let reply = chat(messages)
        .await
        .with_context(|| format!("Caption request for '{}' failed", image_path.display()))?;

    Ok(reply.text().trim().to_string())
}

/// `"<trigger>, <caption>"` when a trigger is set, else the caption unchanged.
pub fn format_caption(caption: &str, trigger: Option<&str>) -> String {
    match trigger {
        Some(trigger) => format!("{trigger}, {caption}"),
        None => caption.to_string(),
    }
}

/// Captions every matching image in the input folder, one request at a time.
///
/// Errors for a single image are logged and counted; only a missing input
/// folder or an output folder that cannot be created abort the run.
pub async fn caption_images(config: &CaptionConfig, chat: &ChatFn) -> Result<CaptionReport> {
    let input_dir = &config.paths.input_folder;
    let output_dir = ensure_output_dir(&config.paths.output_folder).await?;
    let images = collect_directory_images(input_dir, &config.paths.valid_extensions).await?;

    let total = images.len();
    let mut report = CaptionReport {
        found: total,
        ..CaptionReport::default()
    };

    tracing::info!(
        "Found {} images in '{}'. Starting captioning with model '{}'...",
        total,
        input_dir.display(),
        config.ollama.model
    );

    for (index, image) in images.iter().enumerate() {
        let output_path = caption_output_path(&output_dir, &image.file_name);

        let hint = config.processing.use_filename_context.then(|| {
            filename_hint(&image.file_name, &config.processing.filename_strip_prefixes)
        });

        tracing::debug!(image = %image.file_name, hint = ?hint, "requesting caption");

        match generate_caption(chat, &image.path, hint.as_deref(), config).await {
            Ok(caption) if caption.is_empty() => {
                tracing::warn!(image = %image.path.display(), "model returned an empty caption, skipping");
                report.empty += 1;
            }
            Ok(caption) => {
                let final_caption = format_caption(&caption, config.processing.trigger());
                match write_caption(&output_path, &final_caption).await {
                    Ok(()) => report.written += 1,
                    Err(err) => {
                        tracing::error!("Error processing {}: {err:#}", image.path.display());
                        report.failed += 1;
                    }
                }
            }
            Err(err) => {
                tracing::error!("Error processing {}: {err:#}", image.path.display());
                report.failed += 1;
            }
        }

        tracing::info!("Captioning [{}/{}] {}", index + 1, total, image.file_name);
    }

    tracing::info!("Processing complete! {report}");

    Ok(report)
}
