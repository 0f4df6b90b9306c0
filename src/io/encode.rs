use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use tiff::encoder::{TiffEncoder, colortype};
use tracing::debug;

use crate::core::processing::flatten::rgb_view;
use crate::error::{Error, Result};
use crate::types::{OutputFormat, RasterImage};

/// Serialize the first frame of `image` as RGB8 in the requested format.
pub fn encode(image: &RasterImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let rgb = rgb_view(image.first_frame())?;
    let bytes = match format {
        OutputFormat::Png => encode_png(&rgb)?,
        OutputFormat::Jpeg => encode_jpeg(&rgb, jpeg_quality)?,
        OutputFormat::Tiff => encode_tiff(&rgb)?,
    };
    debug!(
        "Encoded {}x{} as {} ({} bytes)",
        rgb.width(),
        rgb.height(),
        format,
        bytes.len()
    );
    Ok(bytes)
}

pub fn encode_png(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| Error::Processing(format!("PNG encoding failed: {e}")))?;
    Ok(buf)
}

pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let (w, h) = rgb.dimensions();
    if w > u16::MAX as u32 || h > u16::MAX as u32 {
        return Err(Error::InvalidArgument {
            arg: "format",
            value: format!("JPEG cannot hold {}x{}", w, h),
        });
    }
    let mut buf = Vec::new();
    let encoder = Encoder::new(&mut buf, quality);
    encoder
        .encode(rgb.as_raw(), w as u16, h as u16, ColorType::Rgb)
        .map_err(|e| Error::Processing(format!("JPEG encoding failed: {e}")))?;
    Ok(buf)
}

pub fn encode_tiff(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)
            .map_err(|e| Error::Processing(format!("TIFF encoding failed: {e}")))?;
        encoder
            .write_image::<colortype::RGB8>(rgb.width(), rgb.height(), rgb.as_raw())
            .map_err(|e| Error::Processing(format!("TIFF encoding failed: {e}")))?;
    }
    Ok(cursor.into_inner())
}

/// Write `bytes` to `output` through a temporary file in the same directory.
pub fn write_atomic(output: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".imgnorm-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::InputLimits;
    use crate::io::decode::decode;
    use crate::types::SourceFormat;
    use image::{DynamicImage, Rgb};

    fn raster(w: u32, h: u32) -> RasterImage {
        let rgb = RgbImage::from_pixel(w, h, Rgb([10, 200, 30]));
        RasterImage::from_frame(DynamicImage::ImageRgb8(rgb), SourceFormat::Png).unwrap()
    }

    #[test]
    fn test_png_output_decodes_back() {
        let bytes = encode(&raster(12, 7), OutputFormat::Png, 90).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
        let back = decode(&bytes, &InputLimits::default()).unwrap();
        assert_eq!((back.width(), back.height()), (12, 7));
        assert_eq!(back.first_frame().to_rgb8().get_pixel(3, 3).0, [10, 200, 30]);
    }

    #[test]
    fn test_jpeg_and_tiff_magic() {
        let jpeg = encode(&raster(16, 16), OutputFormat::Jpeg, 80).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let tiff = encode(&raster(16, 16), OutputFormat::Tiff, 80).unwrap();
        assert_eq!(image::guess_format(&tiff).unwrap(), image::ImageFormat::Tiff);
    }

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_atomic(&path, b"abc").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        write_atomic(&path, b"xyz").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"xyz");
    }
}
