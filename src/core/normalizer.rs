//! The image normalizer: picks a target size for an input image from the tier
//! table (or the direct geometric fit), flattens its frames, and resamples the
//! first frame to that size.
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::core::params::{InputLimits, NormalizeParams};
use crate::core::processing::dimensions::{direct_fit_dimensions, tier_target_dimensions};
use crate::core::processing::flatten::first_frame_rgb;
use crate::core::processing::resize::{ResampleFilter, resize_rgb_image};
use crate::core::processing::tier::{select_tier, tier_scale_factor};
use crate::error::{Error, Result};
use crate::types::{RasterImage, ResizeStrategy, ResolutionTier};

/// Output size decided for an input, before any pixels are touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    /// Tier chosen by the document strategy; `None` for the direct strategy
    pub tier: Option<ResolutionTier>,
    pub width: u32,
    pub height: u32,
    pub filter: ResampleFilter,
}

/// Check frame count and pixel budgets for an input of the given frame sizes.
pub fn check_input_limits<I>(frame_dims: I, limits: &InputLimits) -> Result<()>
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut frames = 0usize;
    let mut pixels = 0u64;
    for (w, h) in frame_dims {
        frames += 1;
        pixels = pixels.saturating_add(w as u64 * h as u64);
        if frames > limits.max_frames {
            return Err(Error::Resource(format!(
                "more than {} frames",
                limits.max_frames
            )));
        }
        if pixels > limits.max_input_pixels {
            return Err(Error::Resource(format!(
                "input exceeds {} pixels across {} frame(s)",
                limits.max_input_pixels, frames
            )));
        }
    }
    Ok(())
}

/// Stateless image normalizer holding only immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    params: NormalizeParams,
}

impl ImageNormalizer {
    pub fn new(params: NormalizeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &NormalizeParams {
        &self.params
    }

    pub fn select_tier(&self, width: u32, height: u32) -> ResolutionTier {
        select_tier(width, height, &self.params.thresholds)
    }

    /// Decide the output size for a first frame of `width` x `height`.
    pub fn plan(&self, width: u32, height: u32) -> ResizePlan {
        let p = &self.params;
        let (tier, (w, h)) = match p.strategy {
            ResizeStrategy::Document => {
                let tier = self.select_tier(width, height);
                let factor = tier_scale_factor(tier, &p.thresholds, p.render_dpi);
                let dims =
                    tier_target_dimensions(width, height, factor, &p.thresholds, p.clamp_to_envelope);
                (Some(tier), dims)
            }
            ResizeStrategy::Direct => (None, direct_fit_dimensions(width, height, &p.thresholds)),
        };
        let filter = match p.strategy {
            ResizeStrategy::Document => ResampleFilter::for_scale((width, height), (w, h)),
            ResizeStrategy::Direct => ResampleFilter::Lanczos3,
        };
        ResizePlan {
            tier,
            width: w,
            height: h,
            filter,
        }
    }

    /// Normalize an image to a single frame sized by the configured strategy.
    ///
    /// Multi-frame inputs collapse to their first frame. Fails with
    /// `Error::Resource` when the input or the planned output exceeds the
    /// configured limits.
    pub fn normalize(&self, image: RasterImage) -> Result<RasterImage> {
        self.normalize_with_plan(image).map(|(img, _)| img)
    }

    /// Like [`normalize`](Self::normalize), also returning the plan that was applied.
    pub fn normalize_with_plan(&self, image: RasterImage) -> Result<(RasterImage, ResizePlan)> {
        let limits = &self.params.limits;
        check_input_limits(
            image.frames().iter().map(|f| (f.width(), f.height())),
            limits,
        )?;

        let (width, height) = (image.width(), image.height());
        let format = image.format();
        let frame_count = image.frame_count();
        let plan = self.plan(width, height);

        let out_pixels = plan.width as u64 * plan.height as u64;
        if out_pixels > limits.max_output_pixels {
            return Err(Error::Resource(format!(
                "output {}x{} exceeds {} pixels",
                plan.width, plan.height, limits.max_output_pixels
            )));
        }

        match plan.tier {
            Some(tier) => info!(
                "Normalizing {}x{} ({} frame(s)) via tier {} -> {}x{}",
                width, height, frame_count, tier, plan.width, plan.height
            ),
            None => info!(
                "Normalizing {}x{} ({} frame(s)) via direct fit -> {}x{}",
                width, height, frame_count, plan.width, plan.height
            ),
        }

        if frame_count > 1 && self.params.strategy == ResizeStrategy::Direct {
            warn!("Direct strategy keeps only the first of {} frames", frame_count);
        }
        let first = first_frame_rgb(image)?;
        debug!("Resampling with {:?}", plan.filter);
        let resized = resize_rgb_image(first, plan.width, plan.height, plan.filter)?;

        let out = RasterImage::from_frame(DynamicImage::ImageRgb8(resized), format)?;
        Ok((out, plan))
    }
}
