use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Resampling filter for a resize.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResampleFilter {
    /// Area averaging
    Area,
    Lanczos3,
}

impl ResampleFilter {
    /// Area averaging when shrinking, Lanczos3 when growing.
    pub fn for_scale(src: (u32, u32), dst: (u32, u32)) -> Self {
        if (dst.0 as u64 * dst.1 as u64) < (src.0 as u64 * src.1 as u64) {
            ResampleFilter::Area
        } else {
            ResampleFilter::Lanczos3
        }
    }

    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Area => FilterType::Box,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Reserve a zeroed pixel buffer, reporting allocation failure as a resource error.
pub fn alloc_pixels(width: u32, height: u32, channels: usize) -> Result<Vec<u8>> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| Error::Resource(format!("{}x{} overflows the address space", width, height)))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::Resource(format!("{}x{} pixel buffer: {}", width, height, e)))?;
    buf.resize(len, 0);
    Ok(buf)
}

pub fn resize_rgb8(
    data: Vec<u8>,
    original_cols: u32,
    original_rows: u32,
    target_cols: u32,
    target_rows: u32,
    filter: ResampleFilter,
) -> Result<Vec<u8>> {
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(filter.filter_type()));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(original_cols, original_rows, data, PixelType::U8x3)
        .map_err(|e| Error::Processing(format!("failed to create source image: {e}")))?;
    let dst_buf = alloc_pixels(target_cols, target_rows, 3)?;
    let mut dst_image = Image::from_vec_u8(target_cols, target_rows, dst_buf, PixelType::U8x3)
        .map_err(|e| Error::Processing(format!("failed to create target image: {e}")))?;
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(|e| Error::Processing(format!("resize failed: {e}")))?;

    Ok(dst_image.into_vec())
}

/// Resample an RGB frame to the target size; equal sizes are returned untouched.
pub fn resize_rgb_image(
    frame: RgbImage,
    target_cols: u32,
    target_rows: u32,
    filter: ResampleFilter,
) -> Result<RgbImage> {
    let (cols, rows) = frame.dimensions();
    if (cols, rows) == (target_cols, target_rows) {
        debug!("Target equals source size {}x{}, skipping resample", cols, rows);
        return Ok(frame);
    }

    info!(
        "Original size: {}x{}, New size: {}x{} ({:?})",
        cols, rows, target_cols, target_rows, filter
    );

    let resized = resize_rgb8(frame.into_raw(), cols, rows, target_cols, target_rows, filter)?;
    RgbImage::from_raw(target_cols, target_rows, resized)
        .ok_or_else(|| Error::Processing("failed to convert resized image".to_string()))
}
