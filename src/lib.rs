#![doc = r#"
imgnorm: size-tiered image normalization for multimodal chat requests.

This crate turns arbitrary uploaded images (PNG, JPEG, GIF, BMP, WebP, multi-page
TIFF) into a single canonically-sized raster, re-encodes it, and wraps it as a
base64 data URL inside an `image_url` chat content part. It powers the `imgnorm`
CLI and can be embedded in a chat front-end.

How sizes are chosen
--------------------
The first frame's width and height select a resolution tier from a
priority-ordered table (first match wins):

| Tier | Condition | DPI | Scale at 200 DPI |
|---|---|---|---|
| `Extreme` | w > 8000 or h > 8000 | 700 | 0.29x |
| `VeryLarge` | w > 4000 or h > 4000 | 500 | 0.4x |
| `Large` | w > 1400 or h > 2000 | 300 | 0.67x |
| `Small` | w < 500 or h < 600 | 100 | 2x |
| `Default` | otherwise | 50 | 4x |

The scaled size is then fitted into the 500x600 .. 1400x2000 envelope unless
`clamp_to_envelope` is turned off. A purely geometric `Direct` strategy is
available as an alternative.

Quick start: normalize bytes for a chat message
-----------------------------------------------
```rust,no_run
use imgnorm::{NormalizeParams, normalize_or_skip};

fn attach(upload: &[u8]) -> Option<serde_json::Value> {
    // Logs and returns None when the upload can't be decoded or is too large
    normalize_or_skip(upload, &NormalizeParams::default()).and_then(|part| part.to_json().ok())
}
```

Working with decoded images
---------------------------
```rust,no_run
use imgnorm::{ImageNormalizer, NormalizeParams, OutputFormat, decode, encode};

fn main() -> imgnorm::Result<()> {
    let params = NormalizeParams::default();
    let bytes = std::fs::read("scan.tiff")?;
    let raster = decode(&bytes, &params.limits)?;
    let normalizer = ImageNormalizer::new(params.clone())?;
    let out = normalizer.normalize(raster)?;
    let png = encode(&out, OutputFormat::Png, params.jpeg_quality)?;
    std::fs::write("scan.png", png)?;
    Ok(())
}
```

Error handling
--------------
All public functions return `imgnorm::Result<T>`. `Error::UnsupportedFormat`
and `Error::Resource` are per-image failures; drop the image and carry on.

```rust,no_run
use imgnorm::{Error, NormalizeParams, normalize_bytes};

fn main() {
    match normalize_bytes(b"not an image", &NormalizeParams::default()) {
        Ok(img) => println!("{}x{}", img.width, img.height),
        Err(Error::UnsupportedFormat(e)) => eprintln!("skip: {e}"),
        Err(Error::Resource(e)) => eprintln!("too large: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`core`]: tier table, dimension math, resampling and `ImageNormalizer`.
- [`io`]: decoding, encoding and data URLs.
- [`types`]: enums and `RasterImage`.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::normalizer::{ImageNormalizer, ResizePlan};
pub use crate::core::params::{InputLimits, NormalizeParams, SizeThresholds, TierBound};
pub use error::{Error, Result};
pub use types::{OutputFormat, RasterImage, ResizeStrategy, ResolutionTier, SourceFormat};

// Codecs
pub use io::{ImageUrlPart, decode, decode_with_hint, encode, to_data_url};

// High-level API re-exports
pub use api::{
    BatchReport, NormalizedImage, iterate_image_files, normalize_bytes,
    normalize_bytes_with_mime, normalize_data_url, normalize_or_skip, normalize_path_to_path,
    normalize_to_content_part, process_directory_to_path,
};
