use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageReader, RgbImage};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, info};

use crate::core::normalizer::check_input_limits;
use crate::core::params::InputLimits;
use crate::error::{Error, Result};
use crate::types::{RasterImage, SourceFormat};

/// Decode an encoded image, guessing the container from its magic bytes.
///
/// TIFF input keeps every page as a frame; other formats decode to one frame.
/// Dimensions are checked against `limits` before pixel data is decoded.
pub fn decode(bytes: &[u8], limits: &InputLimits) -> Result<RasterImage> {
    if bytes.is_empty() {
        return Err(Error::UnsupportedFormat("empty buffer".to_string()));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| Error::UnsupportedFormat(format!("unrecognized image data: {e}")))?;
    decode_as(bytes, SourceFormat::from_image_format(format), limits)
}

/// Decode with a caller-supplied format hint instead of sniffing.
pub fn decode_with_hint(bytes: &[u8], hint: SourceFormat, limits: &InputLimits) -> Result<RasterImage> {
    if hint == SourceFormat::Other {
        return decode(bytes, limits);
    }
    if bytes.is_empty() {
        return Err(Error::UnsupportedFormat("empty buffer".to_string()));
    }
    decode_as(bytes, hint, limits)
}

fn decode_as(bytes: &[u8], format: SourceFormat, limits: &InputLimits) -> Result<RasterImage> {
    match format {
        SourceFormat::Tiff => decode_tiff_pages(bytes, limits),
        other => decode_single(bytes, other, limits),
    }
}

fn decode_single(bytes: &[u8], format: SourceFormat, limits: &InputLimits) -> Result<RasterImage> {
    let image_format = format
        .to_image_format()
        .ok_or_else(|| Error::UnsupportedFormat(format!("no decoder for {:?}", format)))?;

    let (w, h) = ImageReader::with_format(Cursor::new(bytes), image_format).into_dimensions()?;
    check_input_limits(std::iter::once((w, h)), limits)?;

    let frame = ImageReader::with_format(Cursor::new(bytes), image_format).decode()?;
    debug!("Decoded {:?} frame {}x{} ({:?})", format, w, h, frame.color());
    RasterImage::from_frame(frame, format)
}

/// Decode every page of a TIFF, checking the budget before each page is read.
pub fn decode_tiff_pages(bytes: &[u8], limits: &InputLimits) -> Result<RasterImage> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let mut dims: Vec<(u32, u32)> = Vec::new();
    let mut frames = Vec::new();

    loop {
        let (w, h) = decoder.dimensions()?;
        dims.push((w, h));
        check_input_limits(dims.iter().copied(), limits)?;

        let color = decoder.colortype()?;
        let data = decoder.read_image()?;
        frames.push(tiff_page_to_frame(w, h, color, data)?);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    info!("Decoded TIFF with {} page(s), first {}x{}", frames.len(), dims[0].0, dims[0].1);
    RasterImage::new(frames, SourceFormat::Tiff)
}

fn tiff_page_to_frame(w: u32, h: u32, color: ColorType, data: DecodingResult) -> Result<DynamicImage> {
    let mismatch = || {
        Error::UnsupportedFormat(format!(
            "TIFF sample buffer does not match {}x{} {:?}",
            w, h, color
        ))
    };
    let frame = match (color, data) {
        (ColorType::Gray(1), DecodingResult::U8(buf)) => {
            DynamicImage::ImageLuma8(unpack_bilevel(w, h, &buf).ok_or_else(mismatch)?)
        }
        (ColorType::Gray(8), DecodingResult::U8(buf)) => {
            DynamicImage::ImageLuma8(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::Gray(16), DecodingResult::U16(buf)) => {
            DynamicImage::ImageLuma16(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::GrayA(8), DecodingResult::U8(buf)) => {
            DynamicImage::ImageLumaA8(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::GrayA(16), DecodingResult::U16(buf)) => {
            DynamicImage::ImageLumaA16(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::RGB(8), DecodingResult::U8(buf)) => {
            DynamicImage::ImageRgb8(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::RGB(16), DecodingResult::U16(buf)) => {
            DynamicImage::ImageRgb16(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => {
            DynamicImage::ImageRgba8(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::RGBA(16), DecodingResult::U16(buf)) => {
            DynamicImage::ImageRgba16(ImageBuffer::from_raw(w, h, buf).ok_or_else(mismatch)?)
        }
        (ColorType::CMYK(8), DecodingResult::U8(buf)) => {
            DynamicImage::ImageRgb8(cmyk_to_rgb(w, h, &buf).ok_or_else(mismatch)?)
        }
        (color, _) => {
            return Err(Error::UnsupportedFormat(format!(
                "unsupported TIFF color type {:?}",
                color
            )));
        }
    };
    Ok(frame)
}

/// Expand 1-bit rows (byte-padded, MSB first, 1 = white) to 8-bit gray.
fn unpack_bilevel(w: u32, h: u32, packed: &[u8]) -> Option<image::GrayImage> {
    let row_bytes = (w as usize).div_ceil(8);
    if row_bytes == 0 || packed.len() < row_bytes * h as usize {
        return None;
    }
    let mut out = Vec::with_capacity(w as usize * h as usize);
    for row in packed.chunks_exact(row_bytes).take(h as usize) {
        for x in 0..w as usize {
            let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
            out.push(if bit == 1 { 255 } else { 0 });
        }
    }
    ImageBuffer::from_raw(w, h, out)
}

fn cmyk_to_rgb(w: u32, h: u32, cmyk: &[u8]) -> Option<RgbImage> {
    if cmyk.len() != w as usize * h as usize * 4 {
        return None;
    }
    let mut out = Vec::with_capacity(w as usize * h as usize * 3);
    for px in cmyk.chunks_exact(4) {
        let k = 255 - px[3] as u32;
        for &c in &px[..3] {
            out.push(((255 - c as u32) * k / 255) as u8);
        }
    }
    ImageBuffer::from_raw(w, h, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use tiff::encoder::{TiffEncoder, colortype};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([200, 100, 50])));
        let mut cur = Cursor::new(Vec::new());
        img.write_to(&mut cur, ImageFormat::Png).unwrap();
        cur.into_inner()
    }

    fn multipage_tiff(pages: &[(u32, u32)]) -> Vec<u8> {
        let mut cur = Cursor::new(Vec::new());
        {
            let mut enc = TiffEncoder::new(&mut cur).unwrap();
            for &(w, h) in pages {
                let data = vec![128u8; (w * h * 3) as usize];
                enc.write_image::<colortype::RGB8>(w, h, &data).unwrap();
            }
        }
        cur.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = decode(&png_bytes(30, 20), &InputLimits::default()).unwrap();
        assert_eq!((img.width(), img.height()), (30, 20));
        assert_eq!(img.format(), SourceFormat::Png);
        assert_eq!(img.frame_count(), 1);
    }

    #[test]
    fn test_decode_multipage_tiff_keeps_all_pages() {
        let bytes = multipage_tiff(&[(40, 30), (20, 20), (10, 50)]);
        let img = decode(&bytes, &InputLimits::default()).unwrap();
        assert_eq!(img.format(), SourceFormat::Tiff);
        assert_eq!(img.frame_count(), 3);
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_decode_gray_tiff() {
        let mut cur = Cursor::new(Vec::new());
        {
            let mut enc = TiffEncoder::new(&mut cur).unwrap();
            enc.write_image::<colortype::Gray8>(8, 4, &[9u8; 32]).unwrap();
        }
        let img = decode(&cur.into_inner(), &InputLimits::default()).unwrap();
        assert_eq!(img.first_frame().to_luma8().get_pixel(0, 0).0, [9]);
    }

    #[test]
    fn test_corrupt_bytes_unsupported() {
        let err = decode(b"definitely not an image", &InputLimits::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_truncated_png_unsupported() {
        let bytes = png_bytes(64, 64);
        let err = decode(&bytes[..40], &InputLimits::default()).unwrap_err();
        assert!(err.is_per_image());
    }

    #[test]
    fn test_empty_buffer() {
        assert!(matches!(
            decode(&[], &InputLimits::default()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_page_budget_checked_before_decode() {
        let bytes = multipage_tiff(&[(100, 100), (100, 100), (100, 100)]);
        let limits = InputLimits {
            max_input_pixels: 25_000,
            ..InputLimits::default()
        };
        assert!(matches!(decode(&bytes, &limits), Err(Error::Resource(_))));
    }

    #[test]
    fn test_hint_overrides_sniffing() {
        let bytes = png_bytes(5, 5);
        let img = decode_with_hint(&bytes, SourceFormat::Png, &InputLimits::default()).unwrap();
        assert_eq!(img.width(), 5);
        assert!(decode_with_hint(&bytes, SourceFormat::Jpeg, &InputLimits::default()).is_err());
    }

    #[test]
    fn test_unpack_bilevel() {
        let img = unpack_bilevel(10, 1, &[0b1010_0000, 0b1100_0000]).unwrap();
        let px: Vec<u8> = img.into_raw();
        assert_eq!(px, vec![255, 0, 255, 0, 0, 0, 0, 0, 255, 255]);
    }

    #[test]
    fn test_cmyk_conversion() {
        let rgb = cmyk_to_rgb(1, 1, &[0, 255, 255, 0]).unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
    }
}
