use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::fs::try_exists;

use crate::constants::CAPTION_EXTENSION;
use crate::models::ImageEntry;

pub async fn ensure_output_dir(path: &Path) -> Result<PathBuf> {
    if !try_exists(path)
        .await
        .with_context(|| format!("Failed to check directory '{}'", path.display()))?
    {
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Unable to create directory '{}'", path.display()))?;
    }
    Ok(path.to_path_buf())
}

/// Case-insensitive suffix match against the configured extensions. An empty
/// extension matches every name.
pub fn has_valid_extension(file_name: &str, valid_extensions: &[String]) -> bool {
    let lowered = file_name.to_lowercase();
    valid_extensions
        .iter()
        .any(|ext| lowered.ends_with(&ext.to_lowercase()))
}

/// Lists regular files directly inside `dir` that carry one of the accepted
/// extensions, sorted by file name. Subdirectories are not entered. Entries
/// whose metadata cannot be read (dangling symlinks, files removed mid-listing)
/// are kept so the captioning step reports them as per-image failures.
pub async fn collect_directory_images(
    dir: &Path,
    valid_extensions: &[String],
) -> Result<Vec<ImageEntry>> {
    let mut images = Vec::new();

    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Unable to read directory '{}'", dir.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to iterate directory '{}'", dir.display()))?
    {
        let path = entry.path();
        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                tracing::warn!(?name, "skipping file with non UTF-8 name");
                continue;
            }
        };

        if !has_valid_extension(&file_name, valid_extensions) {
            continue;
        }

        // Follows symlinks, unlike DirEntry::metadata.
        match fs::metadata(&path).await {
            Ok(metadata) if !metadata.is_file() => continue,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), "unable to read metadata: {err}");
            }
        }

        images.push(ImageEntry { file_name, path });
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// `<output_dir>/<stem>.txt`, where the stem drops only the last extension.
pub fn caption_output_path(output_dir: &Path, file_name: &str) -> PathBuf {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    output_dir.join(format!("{stem}.{CAPTION_EXTENSION}"))
}

pub async fn write_caption(path: &Path, caption: &str) -> Result<()> {
    fs::write(path, caption)
        .await
        .with_context(|| format!("Unable to write caption file '{}'", path.display()))
}
