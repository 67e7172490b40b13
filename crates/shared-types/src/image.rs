//! The signature image shared by every placement in a session

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("content type {0:?} is not an image")]
    NotImage(String),

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("signature image is empty")]
    Empty,
}

/// Raw signature image bytes plus their media type.
///
/// Placements never copy the image; they only record that it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    content_type: String,
    bytes: Vec<u8>,
}

impl SignatureImage {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(ImageError::NotImage(content_type));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self {
            content_type,
            bytes,
        })
    }

    /// Parse a `data:image/...;base64,...` URL as produced by `FileReader.readAsDataURL`
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
        let (meta, payload) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        let media = meta.strip_suffix(";base64").ok_or(ImageError::NotBase64)?;
        let content_type = media.split(';').next().unwrap_or_default();

        let bytes = STANDARD.decode(payload.trim())?;
        Self::new(content_type, bytes)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Upload file name, e.g. `signature.png` for `image/png`
    pub fn file_name(&self) -> String {
        let subtype = self
            .content_type
            .trim_start_matches("image/")
            .split(['+', ';'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("png");
        let ext = match subtype {
            "jpeg" => "jpg",
            other => other,
        };
        format!("signature.{}", ext)
    }

    /// Data URL for on-screen previews
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}
