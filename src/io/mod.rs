//! I/O layer: decoding encoded bytes into `RasterImage` (multi-page TIFF
//! included), encoding PNG/JPEG/TIFF output, atomic file writes, and data URLs
//! for chat content parts.
pub mod data_url;
pub use data_url::{ImageUrl, ImageUrlPart, parse_data_url, to_data_url};

pub mod decode;
pub use decode::{decode, decode_with_hint};

pub mod encode;
pub use encode::{encode, write_atomic};
