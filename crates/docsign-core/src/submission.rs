//! Submission assembly
//!
//! Builds one bundle per (document, placement) pair and hands the bundles to
//! the upload collaborator one at a time. The session stays editable while an
//! upload is outstanding, so each bundle's geometry is read at the moment it
//! is built rather than at the start of the run.

use std::cell::RefCell;

use async_trait::async_trait;
use serde::Serialize;
use shared_types::{DocumentId, SignatureImage, UserId};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{SubmitError, UploadError};
use crate::placement::PlacementId;
use crate::session::SigningSession;

/// Identifiers and geometry sent alongside each bundle's payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    pub document_id: DocumentId,
    pub user_id: UserId,
    pub file_name: String,
    pub placement: PlacementId,
    /// 1-based page number
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The upload collaborator: accepts or rejects a single bundle
#[async_trait(?Send)]
pub trait Uploader {
    async fn submit(
        &self,
        document: &[u8],
        image: &SignatureImage,
        metadata: &BundleMetadata,
    ) -> Result<(), UploadError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    /// Bundles accepted by the uploader
    pub submitted: usize,
    /// Documents whose payload could not be decoded; their placements were not sent
    pub skipped_documents: Vec<DocumentId>,
}

/// Submit every placement of every open document.
///
/// Refused up front, with no upload attempted, when no signature image is
/// loaded or no placement exists. Bundles go out sequentially and the first
/// failure stops the run; bundles already accepted stay accepted. A document
/// whose bytes cannot be decoded is skipped and the run continues.
///
/// The session is borrowed only while a bundle is being built, never across
/// an upload.
#[instrument(skip_all)]
pub async fn submit_all<U: Uploader + ?Sized>(
    session: &RefCell<SigningSession>,
    uploader: &U,
) -> Result<SubmissionReport, SubmitError> {
    let (image, document_ids) = {
        let session = session.borrow();
        let image = session
            .signature_image()
            .cloned()
            .ok_or(SubmitError::MissingSignatureImage)?;
        if session.placements().is_empty() {
            return Err(SubmitError::NoPlacements);
        }
        let ids: Vec<DocumentId> = session.documents().iter().map(|d| d.id.clone()).collect();
        (image, ids)
    };

    info!(
        documents = document_ids.len(),
        placements = session.borrow().placements().len(),
        "submission started"
    );

    let mut report = SubmissionReport::default();
    let mut attempt = 0;

    for document_id in document_ids {
        let (bytes, placement_ids) = {
            let session = session.borrow();
            let Some(document) = session.document(&document_id) else {
                warn!(document = %document_id, "document closed during submission, skipping");
                continue;
            };
            let placement_ids = session.placements().ids_for_document(&document_id);
            if placement_ids.is_empty() {
                continue;
            }
            match document.bytes() {
                Ok(bytes) => (bytes.into_owned(), placement_ids),
                Err(err) => {
                    warn!(document = %document_id, error = %err, "malformed document payload, skipping its signatures");
                    report.skipped_documents.push(document_id);
                    continue;
                }
            }
        };

        for placement_id in placement_ids {
            let Some(metadata) = build_metadata(&session.borrow(), &document_id, placement_id)
            else {
                warn!(placement = %placement_id, "placement removed during submission, skipping");
                continue;
            };

            attempt += 1;
            debug!(attempt, placement = %placement_id, page = metadata.page, "submitting bundle");

            if let Err(err) = uploader.submit(&bytes, &image, &metadata).await {
                error!(
                    attempt,
                    submitted = report.submitted,
                    document = %document_id,
                    reason = %err,
                    "submission failed, abandoning remaining bundles"
                );
                return Err(SubmitError::Upload {
                    attempt,
                    submitted: report.submitted,
                    reason: err.reason,
                });
            }
            report.submitted += 1;
        }
    }

    info!(
        submitted = report.submitted,
        skipped = report.skipped_documents.len(),
        "submission finished"
    );
    Ok(report)
}

/// Metadata for one placement as it stands right now
fn build_metadata(
    session: &SigningSession,
    document_id: &DocumentId,
    placement_id: PlacementId,
) -> Option<BundleMetadata> {
    let document = session.document(document_id)?;
    let placement = session
        .placement(placement_id)
        .filter(|p| &p.document_id == document_id)?;

    Some(BundleMetadata {
        document_id: document_id.clone(),
        user_id: session.user_id().clone(),
        file_name: document.file_name.clone(),
        placement: placement_id,
        page: placement.page,
        x: placement.rect.x,
        y: placement.rect.y,
        width: placement.rect.width,
        height: placement.rect.height,
    })
}
