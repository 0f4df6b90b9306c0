//! Shared types and enums used across imgnorm.
//! Includes `ResolutionTier`, `ResizeStrategy`, `SourceFormat`, `OutputFormat`,
//! and the ephemeral `RasterImage` that flows through a normalization call.
use clap::ValueEnum;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Size bucket deciding how far an image is shrunk or grown.
///
/// Ordered from the most aggressive downscale to the near-identity pass; tier
/// selection checks them in declaration order and the first match wins.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    Extreme,
    VeryLarge,
    Large,
    Small,
    Default,
}

impl ResolutionTier {
    pub const ALL: [ResolutionTier; 5] = [
        ResolutionTier::Extreme,
        ResolutionTier::VeryLarge,
        ResolutionTier::Large,
        ResolutionTier::Small,
        ResolutionTier::Default,
    ];

    pub fn is_downscale(&self) -> bool {
        matches!(
            self,
            ResolutionTier::Extreme | ResolutionTier::VeryLarge | ResolutionTier::Large
        )
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionTier::Extreme => "Extreme",
            ResolutionTier::VeryLarge => "VeryLarge",
            ResolutionTier::Large => "Large",
            ResolutionTier::Small => "Small",
            ResolutionTier::Default => "Default",
        };
        write!(f, "{}", s)
    }
}

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResizeStrategy {
    /// Tier table with DPI arithmetic, format flattening and first-frame collapse
    #[default]
    Document,
    /// Purely geometric fit against the standard and lower bounds
    Direct,
}

impl std::fmt::Display for ResizeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeStrategy::Document => write!(f, "Document"),
            ResizeStrategy::Direct => write!(f, "Direct"),
        }
    }
}

/// Container the input was decoded from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Tiff,
    Gif,
    Bmp,
    WebP,
    Other,
}

impl SourceFormat {
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Png => SourceFormat::Png,
            image::ImageFormat::Jpeg => SourceFormat::Jpeg,
            image::ImageFormat::Tiff => SourceFormat::Tiff,
            image::ImageFormat::Gif => SourceFormat::Gif,
            image::ImageFormat::Bmp => SourceFormat::Bmp,
            image::ImageFormat::WebP => SourceFormat::WebP,
            _ => SourceFormat::Other,
        }
    }

    pub fn to_image_format(self) -> Option<image::ImageFormat> {
        match self {
            SourceFormat::Png => Some(image::ImageFormat::Png),
            SourceFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            SourceFormat::Tiff => Some(image::ImageFormat::Tiff),
            SourceFormat::Gif => Some(image::ImageFormat::Gif),
            SourceFormat::Bmp => Some(image::ImageFormat::Bmp),
            SourceFormat::WebP => Some(image::ImageFormat::WebP),
            SourceFormat::Other => None,
        }
    }

    /// Map a MIME type such as `image/tiff` to a format hint.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.split(';').next().unwrap_or("").trim();
        image::ImageFormat::from_mime_type(mime).map(Self::from_image_format)
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg, // Lossy, smallest payload
    Tiff,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Tiff => "image/tiff",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// Same format family as the source when an encoder exists, PNG otherwise.
    pub fn from_source(source: SourceFormat) -> Self {
        match source {
            SourceFormat::Jpeg => OutputFormat::Jpeg,
            SourceFormat::Tiff => OutputFormat::Tiff,
            _ => OutputFormat::Png,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Tiff => write!(f, "TIFF"),
        }
    }
}

/// A decoded image for the duration of one normalization call.
///
/// Width and height always describe the first frame. Multi-page inputs keep
/// every page in `frames`; single-frame formats hold exactly one.
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    frames: Vec<DynamicImage>,
    format: SourceFormat,
}

impl RasterImage {
    pub fn new(frames: Vec<DynamicImage>, format: SourceFormat) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| Error::UnsupportedFormat("image contains no frames".to_string()))?;
        let (width, height) = (first.width(), first.height());
        if width == 0 || height == 0 {
            return Err(Error::UnsupportedFormat(format!(
                "zero-sized frame {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            frames,
            format,
        })
    }

    pub fn from_frame(frame: DynamicImage, format: SourceFormat) -> Result<Self> {
        Self::new(vec![frame], format)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[DynamicImage] {
        &self.frames
    }

    pub fn first_frame(&self) -> &DynamicImage {
        &self.frames[0]
    }

    pub fn into_frames(self) -> Vec<DynamicImage> {
        self.frames
    }

    /// Pixels summed over every frame.
    pub fn total_pixels(&self) -> u64 {
        self.frames
            .iter()
            .map(|f| f.width() as u64 * f.height() as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_rejects_empty_frames() {
        let err = RasterImage::new(vec![], SourceFormat::Png).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_raster_dimensions_follow_first_frame() {
        let frames = vec![
            DynamicImage::new_rgb8(30, 20),
            DynamicImage::new_rgb8(10, 10),
        ];
        let img = RasterImage::new(frames, SourceFormat::Tiff).unwrap();
        assert_eq!((img.width(), img.height()), (30, 20));
        assert_eq!(img.frame_count(), 2);
        assert_eq!(img.total_pixels(), 700);
    }

    #[test]
    fn test_mime_hint() {
        assert_eq!(SourceFormat::from_mime("image/tiff"), Some(SourceFormat::Tiff));
        assert_eq!(
            SourceFormat::from_mime("image/jpeg; charset=binary"),
            Some(SourceFormat::Jpeg)
        );
        assert_eq!(SourceFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn test_output_family() {
        assert_eq!(OutputFormat::from_source(SourceFormat::Tiff), OutputFormat::Tiff);
        assert_eq!(OutputFormat::from_source(SourceFormat::Gif), OutputFormat::Png);
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_tiers_ordered_most_aggressive_first() {
        assert!(ResolutionTier::Extreme < ResolutionTier::Default);
        assert!(ResolutionTier::Large.is_downscale());
        assert!(!ResolutionTier::Small.is_downscale());
    }
}
