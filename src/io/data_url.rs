//! Data URLs and the `image_url` chat content part that carries them.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded payload.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::UnsupportedFormat("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::UnsupportedFormat("data URL has no payload".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::UnsupportedFormat("data URL is not base64".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::UnsupportedFormat(format!("bad base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat message content part: `{"type":"image_url","image_url":{"url":...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrlPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: ImageUrl,
}

impl ImageUrlPart {
    pub fn new(url: String) -> Self {
        Self {
            kind: "image_url".to_string(),
            image_url: ImageUrl { url },
        }
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self::new(to_data_url(bytes, mime))
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
