//! High-level, ergonomic library API: normalize encoded bytes, build chat
//! content parts, process files and whole directories. Prefer these entrypoints
//! over the low-level `core` and `io` modules when integrating imgnorm.
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::normalizer::ImageNormalizer;
use crate::core::params::NormalizeParams;
use crate::error::{Error, Result};
use crate::io::data_url::{ImageUrlPart, parse_data_url, to_data_url};
use crate::io::decode::{decode, decode_with_hint};
use crate::io::encode::{encode, write_atomic};
use crate::types::{OutputFormat, RasterImage, ResolutionTier, SourceFormat};

/// Extensions picked up by the directory helpers.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp", "webp",
];

/// Result of in-memory normalization
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Tier applied by the document strategy; `None` for the direct strategy
    pub tier: Option<ResolutionTier>,
    pub source_format: SourceFormat,
    pub source_frames: usize,
    pub bytes: Vec<u8>,
}

impl NormalizedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn to_data_url(&self) -> String {
        to_data_url(&self.bytes, self.mime_type())
    }

    pub fn to_content_part(&self) -> ImageUrlPart {
        ImageUrlPart::new(self.to_data_url())
    }
}

fn normalize_raster(raster: RasterImage, params: &NormalizeParams) -> Result<NormalizedImage> {
    let normalizer = ImageNormalizer::new(params.clone())?;
    let source_format = raster.format();
    let source_frames = raster.frame_count();
    let (out, plan) = normalizer.normalize_with_plan(raster)?;
    let bytes = encode(&out, params.format, params.jpeg_quality)?;
    Ok(NormalizedImage {
        width: out.width(),
        height: out.height(),
        format: params.format,
        tier: plan.tier,
        source_format,
        source_frames,
        bytes,
    })
}

/// Decode, normalize and re-encode an image held in memory (no disk I/O)
pub fn normalize_bytes(bytes: &[u8], params: &NormalizeParams) -> Result<NormalizedImage> {
    let raster = decode(bytes, &params.limits)?;
    normalize_raster(raster, params)
}

/// Like [`normalize_bytes`], trusting a MIME type such as `image/tiff` for the container.
pub fn normalize_bytes_with_mime(
    bytes: &[u8],
    mime: &str,
    params: &NormalizeParams,
) -> Result<NormalizedImage> {
    let raster = match SourceFormat::from_mime(mime) {
        Some(hint) => decode_with_hint(bytes, hint, &params.limits)?,
        None => decode(bytes, &params.limits)?,
    };
    normalize_raster(raster, params)
}

/// Normalize an image and wrap it as an `image_url` chat content part
pub fn normalize_to_content_part(bytes: &[u8], params: &NormalizeParams) -> Result<ImageUrlPart> {
    Ok(normalize_bytes(bytes, params)?.to_content_part())
}

/// Normalize an image that arrived as a base64 data URL, returning a fresh data URL
pub fn normalize_data_url(url: &str, params: &NormalizeParams) -> Result<String> {
    let (mime, bytes) = parse_data_url(url)?;
    Ok(normalize_bytes_with_mime(&bytes, &mime, params)?.to_data_url())
}

/// Content part for the image, or `None` when it could not be processed.
///
/// The failure is logged; the caller continues the chat turn without the image.
pub fn normalize_or_skip(bytes: &[u8], params: &NormalizeParams) -> Option<ImageUrlPart> {
    match normalize_to_content_part(bytes, params) {
        Ok(part) => Some(part),
        Err(e) => {
            error!("Continuing without the image: {}", e);
            None
        }
    }
}

/// Normalize one file on disk and write the result atomically
pub fn normalize_path_to_path(
    input: &Path,
    output: &Path,
    params: &NormalizeParams,
) -> Result<NormalizedImage> {
    let bytes = std::fs::read(input)?;
    let normalized = normalize_bytes(&bytes, params)?;
    write_atomic(output, &normalized.bytes)?;
    info!(
        "Normalized {:?} -> {:?} ({}x{})",
        input, output, normalized.width, normalized.height
    );
    Ok(normalized)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub errors: usize,
}

/// Iterate image files (by extension) in a directory, sorted by path
pub fn iterate_image_files(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Normalize every image in `input_dir` into `output_dir`, in path order.
///
/// Entries without an image extension are ignored.
/// Outputs keep the input file stem with the extension of `params.format`.
/// With `continue_on_error`, per-image failures are counted and skipped;
/// otherwise the first failure is returned.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &NormalizeParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    params.validate()?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for path in iterate_image_files(input_dir)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Processing(format!("no file name in {:?}", path)))?;
        let output = output_dir.join(format!("{}.{}", stem, params.format.extension()));

        match normalize_path_to_path(&path, &output, params) {
            Ok(_) => report.processed += 1,
            Err(e) if continue_on_error => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Batch complete: processed={} errors={}",
        report.processed, report.errors
    );
    Ok(report)
}
