//! Data model shared between the signing core and its front ends.
//!
//! Documents are owned by the backend and treated as immutable input for the
//! duration of a signing session. The signature image is a single opaque blob
//! shared by every placement.

pub mod image;
pub mod types;

pub use image::{ImageError, SignatureImage};
pub use types::{
    Document, DocumentContent, DocumentFile, DocumentId, DocumentStatus, PayloadError, UserId,
};
