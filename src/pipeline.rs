use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::FrameError;
use crate::exif::{self, TagMap};
use crate::frame::FrameComposer;
use crate::render::{EncodedImage, Rasterizer};

/// Extensions the decoder can turn into a bitmap.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff"];

/// The result of framing a single photo.
#[derive(Debug)]
pub struct FrameOutcome {
    pub path: PathBuf,
    pub tags: TagMap,
    /// `None` when the rasterizer failed; the failure has already been logged.
    pub framed: Option<EncodedImage>,
}

/// Check if a file has an extension the decoder supports.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read, extract, compose.
///
/// Extraction runs first and fails fast: a photo without readable metadata is
/// never composed.
///
/// # Example
///
/// ```rust,no_run
/// use exif_frame::config::Config;
/// use exif_frame::frame::FrameComposer;
/// use exif_frame::pipeline::{frame_file, output_path, write_output};
/// use exif_frame::render::SoftwareRasterizer;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let composer = FrameComposer::new(SoftwareRasterizer::with_system_font()?, &config);
///
/// let input = Path::new("IMG_0001.jpg");
/// let outcome = frame_file(input, &composer).await?;
/// if let Some(ref framed) = outcome.framed {
///     write_output(&output_path(input, &config.output), framed).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn frame_file<R: Rasterizer>(
    path: &Path,
    composer: &FrameComposer<R>,
) -> Result<FrameOutcome, FrameError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tags = exif::read_tags(&bytes)?;
    log::info!("Read {} tag(s) from {}", tags.len(), path.display());

    let framed = composer.compose(&bytes, &tags).await?;
    Ok(FrameOutcome {
        path: path.to_path_buf(),
        tags,
        framed,
    })
}

/// `<dir>/<stem><suffix>.jpg`, where `dir` defaults to the input's directory.
pub fn output_path(input: &Path, output: &OutputConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let file_name = format!("{stem}{}.jpg", output.suffix);
    match &output.dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Write an encoded composite to disk, creating the parent directory.
pub async fn write_output(path: &Path, image: &EncodedImage) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, &image.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
