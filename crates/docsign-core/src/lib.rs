//! Signature placement core
//!
//! Maps pointer input onto page-relative coordinates, keeps the collection of
//! signature placements for every open document, drives drag and resize
//! gestures, and assembles the per-placement bundles handed to the uploader.
//!
//! Everything here is single-threaded and synchronous except the submission
//! run, which awaits the upload collaborator one bundle at a time.

pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod placement;
pub mod session;
pub mod submission;
pub mod tracker;

pub use config::{SessionConfig, SessionMode, SignatureSize};
pub use coords::{map_pointer, PageCoords, ScreenPoint, ScreenRect};
pub use error::{ConfigError, SubmitError, UploadError};
pub use geometry::{NormRect, OverlayBox, PagePoint, ResizeHandle};
pub use interaction::{GrabOffset, Interaction};
pub use placement::{Hit, Placement, PlacementId, PlacementStore};
pub use session::SigningSession;
pub use submission::{submit_all, BundleMetadata, SubmissionReport, Uploader};
pub use tracker::{PageTracker, PageTrackers};

pub use shared_types::{Document, DocumentId, SignatureImage, UserId};
