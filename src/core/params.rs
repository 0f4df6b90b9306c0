use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{OutputFormat, ResizeStrategy, ResolutionTier};

/// DPI the intermediate page was rasterized at; tier factors are `RENDER_DPI / tier_dpi`
pub const DEFAULT_RENDER_DPI: f64 = 200.0;

/// One row of the tier table: a width/height bound and the DPI applied past it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBound {
    pub width: u32,
    pub height: u32,
    pub resolution: f64,
}

impl TierBound {
    pub const fn new(width: u32, height: u32, resolution: f64) -> Self {
        Self {
            width,
            height,
            resolution,
        }
    }

    pub fn exceeded_by(&self, width: u32, height: u32) -> bool {
        width > self.width || height > self.height
    }

    pub fn undercut_by(&self, width: u32, height: u32) -> bool {
        width < self.width || height < self.height
    }
}

/// Priority-ordered tier table.
///
/// `large` doubles as the max envelope and `small` as the min envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub extreme: TierBound,
    pub very_large: TierBound,
    pub large: TierBound,
    pub small: TierBound,
    pub default_resolution: f64,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            extreme: TierBound::new(8000, 8000, 700.0),
            very_large: TierBound::new(4000, 4000, 500.0),
            large: TierBound::new(1400, 2000, 300.0),
            small: TierBound::new(500, 600, 100.0),
            default_resolution: 50.0,
        }
    }
}

impl SizeThresholds {
    pub fn resolution(&self, tier: ResolutionTier) -> f64 {
        match tier {
            ResolutionTier::Extreme => self.extreme.resolution,
            ResolutionTier::VeryLarge => self.very_large.resolution,
            ResolutionTier::Large => self.large.resolution,
            ResolutionTier::Small => self.small.resolution,
            ResolutionTier::Default => self.default_resolution,
        }
    }

    /// Bounds must nest strictly (extreme > very_large > large > small on both
    /// axes) and every resolution must be positive.
    pub fn validate(&self) -> Result<()> {
        let chain = [
            ("very_large", &self.very_large, &self.extreme),
            ("large", &self.large, &self.very_large),
            ("small", &self.small, &self.large),
        ];
        for (name, inner, outer) in chain {
            if inner.width >= outer.width || inner.height >= outer.height {
                return Err(Error::InvalidArgument {
                    arg: "thresholds",
                    value: format!(
                        "{} bound {}x{} must be below {}x{}",
                        name, inner.width, inner.height, outer.width, outer.height
                    ),
                });
            }
        }
        if self.small.width == 0 || self.small.height == 0 {
            return Err(Error::ZeroSize { size: 0 });
        }
        for tier in ResolutionTier::ALL {
            let r = self.resolution(tier);
            if !(r.is_finite() && r > 0.0) {
                return Err(Error::InvalidArgument {
                    arg: "resolution",
                    value: format!("{}={}", tier, r),
                });
            }
        }
        Ok(())
    }
}

/// Guards applied before any pixel data is decoded or allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Pixels summed over all frames
    pub max_input_pixels: u64,
    pub max_frames: usize,
    pub max_output_pixels: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_pixels: 150_000_000,
            max_frames: 64,
            max_output_pixels: 100_000_000,
        }
    }
}

/// Normalization parameters suitable for config files and CLI presets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    pub strategy: ResizeStrategy,
    pub format: OutputFormat,
    pub thresholds: SizeThresholds,
    pub limits: InputLimits,
    pub render_dpi: f64,
    /// Fit tier-scaled output into the min/max envelope
    pub clamp_to_envelope: bool,
    /// JPEG quality, 1..=100
    pub jpeg_quality: u8,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            strategy: ResizeStrategy::Document,
            format: OutputFormat::Png,
            thresholds: SizeThresholds::default(),
            limits: InputLimits::default(),
            render_dpi: DEFAULT_RENDER_DPI,
            clamp_to_envelope: true,
            jpeg_quality: 90,
        }
    }
}

impl NormalizeParams {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if !(self.render_dpi.is_finite() && self.render_dpi > 0.0) {
            return Err(Error::InvalidArgument {
                arg: "render_dpi",
                value: self.render_dpi.to_string(),
            });
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::InvalidArgument {
                arg: "jpeg_quality",
                value: self.jpeg_quality.to_string(),
            });
        }
        if self.limits.max_frames == 0 {
            return Err(Error::ZeroSize { size: 0 });
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let params: NormalizeParams = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
