use std::borrow::Cow;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend identifier of an uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id for a document built locally (e.g. from a dropped file)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of the signing user, read once from the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Signed,
    Rejected,
}

/// Errors raised when a document payload cannot be turned into raw bytes
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unrecognized payload representation: {0}")]
    Unrecognized(&'static str),

    #[error("document payload is empty")]
    Empty,
}

/// The representations a document's bytes arrive in.
///
/// The backend serializes binary content either as a plain JSON byte array or
/// as a Node `Buffer` object (`{"type":"Buffer","data":[...]}`); clients that
/// cached the viewer's transport encoding hold a base64 string instead.
/// Anything else deserializes into `Unrecognized` so that a single bad
/// document never fails the whole document list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    Bytes(Vec<u8>),
    Buffer {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        data: Vec<u8>,
    },
    Base64(String),
    Unrecognized(serde_json::Value),
}

impl DocumentContent {
    /// Raw bytes of the payload, decoding the transport encoding if needed
    pub fn decode(&self) -> Result<Cow<'_, [u8]>, PayloadError> {
        let bytes = match self {
            DocumentContent::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            DocumentContent::Buffer { data, .. } => Cow::Borrowed(data.as_slice()),
            DocumentContent::Base64(encoded) => Cow::Owned(decode_base64(encoded)?),
            DocumentContent::Unrecognized(value) => {
                return Err(PayloadError::Unrecognized(json_kind(value)))
            }
        };

        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(bytes)
    }
}

/// Decode base64, tolerating a `data:...;base64,` prefix
fn decode_base64(encoded: &str) -> Result<Vec<u8>, PayloadError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    Ok(STANDARD.decode(payload.trim())?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub data: DocumentContent,
    pub content_type: String,
}

/// A document as delivered by the backend document listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub user_id: UserId,
    pub file_name: String,
    pub file: DocumentFile,
    #[serde(default = "Utc::now")]
    pub upload_time: DateTime<Utc>,
    #[serde(default)]
    pub status: DocumentStatus,
    /// Base64 copy kept for the viewer's data URL
    #[serde(rename = "base64", default, skip_serializing_if = "Option::is_none")]
    pub cached_base64: Option<String>,
}

impl Document {
    /// Build a pending document from locally available bytes
    pub fn from_bytes(
        user_id: UserId,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            user_id,
            file_name: file_name.into(),
            file: DocumentFile {
                data: DocumentContent::Bytes(bytes),
                content_type: content_type.into(),
            },
            upload_time: Utc::now(),
            status: DocumentStatus::Pending,
            cached_base64: None,
        }
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = id;
        self
    }

    /// Raw document bytes from whichever representation is available.
    ///
    /// The binary payload wins; the cached base64 copy is only consulted when
    /// the binary payload cannot be decoded.
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>, PayloadError> {
        match self.file.data.decode() {
            Ok(bytes) => Ok(bytes),
            Err(err) => match &self.cached_base64 {
                Some(encoded) => {
                    let bytes = decode_base64(encoded)?;
                    if bytes.is_empty() {
                        return Err(PayloadError::Empty);
                    }
                    Ok(Cow::Owned(bytes))
                }
                None => Err(err),
            },
        }
    }

    /// Base64 transport encoding of the document, used for viewer data URLs
    pub fn to_base64(&self) -> Result<String, PayloadError> {
        match &self.cached_base64 {
            Some(encoded) => Ok(encoded.clone()),
            None => Ok(STANDARD.encode(self.bytes()?)),
        }
    }
}
