use std::borrow::Cow;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tracing::{debug, info};

use crate::core::processing::resize::alloc_pixels;
use crate::error::{Error, Result};
use crate::types::RasterImage;

/// Convert one frame to 8-bit RGB into a freshly reserved buffer.
///
/// Alpha is dropped rather than composited, grayscale is expanded, and 16-bit
/// or float samples are reduced to 8 bits.
pub fn flatten_frame(frame: &DynamicImage) -> Result<RgbImage> {
    let (w, h) = frame.dimensions();
    let buf = alloc_pixels(w, h, 3)?;
    let mut out = RgbImage::from_raw(w, h, buf)
        .ok_or_else(|| Error::Processing(format!("failed to wrap {}x{} buffer", w, h)))?;
    match frame {
        DynamicImage::ImageRgb8(rgb) => out.copy_from_slice(rgb.as_raw()),
        other => {
            for (x, y, px) in other.pixels() {
                out.put_pixel(x, y, Rgb([px[0], px[1], px[2]]));
            }
        }
    }
    Ok(out)
}

/// Borrow the frame when it is already RGB8, otherwise flatten a copy.
pub fn rgb_view(frame: &DynamicImage) -> Result<Cow<'_, RgbImage>> {
    match frame {
        DynamicImage::ImageRgb8(rgb) => Ok(Cow::Borrowed(rgb)),
        other => flatten_frame(other).map(Cow::Owned),
    }
}

/// First-page collapse: keep only the first frame and flatten it to RGB8.
///
/// Trailing frames are dropped before any conversion; an RGB8 first frame is
/// moved without copying.
pub fn first_frame_rgb(image: RasterImage) -> Result<RgbImage> {
    let frame_count = image.frame_count();
    if frame_count > 1 {
        info!("Discarding {} trailing frame(s)", frame_count - 1);
    }
    let first = image
        .into_frames()
        .into_iter()
        .next()
        .ok_or_else(|| Error::Processing("no frames to flatten".to_string()))?;
    debug!(
        "Flattening first frame ({}x{}, {:?})",
        first.width(),
        first.height(),
        first.color()
    );
    match first {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        other => flatten_frame(&other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceFormat;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_flatten_gray_expands_channels() {
        let gray = GrayImage::from_pixel(4, 3, Luma([77]));
        let rgb = flatten_frame(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [77, 77, 77]);
    }

    #[test]
    fn test_flatten_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let rgb = flatten_frame(&DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(rgb.get_pixel(1, 1).0, [10, 20, 30]);
    }

    #[test]
    fn test_flatten_copies_rgb8() {
        let src = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let rgb = flatten_frame(&DynamicImage::ImageRgb8(src.clone())).unwrap();
        assert_eq!(rgb, src);
    }

    #[test]
    fn test_rgb_view_borrows_rgb8() {
        let frame = DynamicImage::new_rgb8(5, 5);
        assert!(matches!(rgb_view(&frame).unwrap(), Cow::Borrowed(_)));
        let gray = DynamicImage::new_luma8(5, 5);
        assert!(matches!(rgb_view(&gray).unwrap(), Cow::Owned(_)));
    }

    #[test]
    fn test_collapse_keeps_first_frame() {
        let frames = vec![
            DynamicImage::new_luma8(5, 6),
            DynamicImage::new_rgb8(7, 8),
            DynamicImage::new_rgba8(9, 10),
        ];
        let img = RasterImage::new(frames, SourceFormat::Tiff).unwrap();
        let first = first_frame_rgb(img).unwrap();
        assert_eq!(first.dimensions(), (5, 6));
    }
}
