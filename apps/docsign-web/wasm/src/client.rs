//! JS-facing signing session
//!
//! Wraps the core session in `Rc<RefCell<..>>` so a submission run can keep
//! going across `fetch` awaits while the page stays editable.

use std::cell::RefCell;
use std::rc::Rc;

use docsign_core::{
    submit_all, Document, DocumentId, PlacementId, SessionConfig, SessionMode, SignatureImage,
    SigningSession, SubmitError, UserId,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::DomRect;

use crate::dom::{self, js_error};
use crate::upload::FetchUploader;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlayInfo {
    id: u64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    current_page: u32,
    total_pages: u32,
    pdf_x: f64,
    pdf_y: f64,
    page_x: f64,
    page_y: f64,
    placements_on_page: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOutcome {
    success: bool,
    submitted: usize,
    skipped_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_attempt: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Signing session for the current user
#[wasm_bindgen]
pub struct SigningClient {
    session: Rc<RefCell<SigningSession>>,
    api_base: String,
}

#[wasm_bindgen]
impl SigningClient {
    /// Create a session for the signed-in user. `preview` opens it read-only.
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: &str, api_base: &str, preview: Option<bool>) -> SigningClient {
        let config = SessionConfig {
            mode: if preview.unwrap_or(false) {
                SessionMode::Preview
            } else {
                SessionMode::Interactive
            },
            ..SessionConfig::default()
        };
        SigningClient {
            session: Rc::new(RefCell::new(SigningSession::new(UserId::new(user_id), config))),
            api_base: api_base.to_string(),
        }
    }

    // ============ Documents ============

    /// Open a document from the backend listing JSON. Returns its id.
    #[wasm_bindgen(js_name = openDocument)]
    pub fn open_document(&self, document_json: &str) -> Result<String, JsValue> {
        let document: Document = serde_json::from_str(document_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid document: {}", e)))?;
        let id = document.id.to_string();
        self.session.borrow_mut().open_document(document);
        Ok(id)
    }

    /// Open a locally picked file. Returns the generated id.
    #[wasm_bindgen(js_name = openFile)]
    pub fn open_file(&self, file_name: &str, bytes: &[u8]) -> String {
        let mut session = self.session.borrow_mut();
        let document = Document::from_bytes(
            session.user_id().clone(),
            file_name,
            "application/pdf",
            bytes.to_vec(),
        );
        let id = document.id.to_string();
        session.open_document(document);
        id
    }

    #[wasm_bindgen(js_name = closeDocument)]
    pub fn close_document(&self, document_id: &str) -> bool {
        self.session
            .borrow_mut()
            .close_document(&DocumentId::new(document_id))
            .is_some()
    }

    /// Base64 of a document's bytes, for the viewer's data URL
    #[wasm_bindgen(js_name = documentBase64)]
    pub fn document_base64(&self, document_id: &str) -> Result<String, JsValue> {
        let session = self.session.borrow();
        let document = session
            .document(&DocumentId::new(document_id))
            .ok_or("Unknown document")?;
        document.to_base64().map_err(js_error)
    }

    // ============ Viewer events ============

    #[wasm_bindgen(js_name = onDocumentLoad)]
    pub fn on_document_load(&self, document_id: &str, total_pages: u32) -> bool {
        self.session
            .borrow_mut()
            .document_loaded(&DocumentId::new(document_id), total_pages)
    }

    /// Returns the new 1-based page
    #[wasm_bindgen(js_name = onPageChange)]
    pub fn on_page_change(&self, document_id: &str, zero_based: u32) -> Option<u32> {
        self.session
            .borrow_mut()
            .page_changed(&DocumentId::new(document_id), zero_based)
    }

    // ============ Signature image ============

    #[wasm_bindgen(js_name = loadSignatureDataUrl)]
    pub fn load_signature_data_url(&self, data_url: &str) -> Result<(), JsValue> {
        let image = SignatureImage::from_data_url(data_url).map_err(js_error)?;
        self.session.borrow_mut().load_signature_image(image);
        Ok(())
    }

    #[wasm_bindgen(js_name = loadSignatureBytes)]
    pub fn load_signature_bytes(&self, content_type: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let image = SignatureImage::new(content_type, bytes.to_vec()).map_err(js_error)?;
        self.session.borrow_mut().load_signature_image(image);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearSignatureImage)]
    pub fn clear_signature_image(&self) {
        self.session.borrow_mut().clear_signature_image();
    }

    #[wasm_bindgen(getter, js_name = hasSignatureImage)]
    pub fn has_signature_image(&self) -> bool {
        self.session.borrow().signature_image().is_some()
    }

    /// Data URL of the loaded image for placement previews
    #[wasm_bindgen(getter, js_name = signaturePreview)]
    pub fn signature_preview(&self) -> Option<String> {
        self.session
            .borrow()
            .signature_image()
            .map(SignatureImage::to_data_url)
    }

    /// Set the size of new placements; returns the applied `[width, height]`
    #[wasm_bindgen(js_name = setDefaultSize)]
    pub fn set_default_size(&self, width: f64, height: f64) -> Vec<f64> {
        let size = self.session.borrow_mut().set_default_size(width, height);
        vec![size.width, size.height]
    }

    // ============ Pointer events ============

    /// Returns true when a placement changed
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(
        &self,
        document_id: &str,
        client_x: f64,
        client_y: f64,
        page_rect: Option<DomRect>,
    ) -> bool {
        self.session
            .borrow_mut()
            .pointer_moved(
                &DocumentId::new(document_id),
                dom::pointer(client_x, client_y),
                dom::page_rect(page_rect).as_ref(),
            )
            .is_some()
    }

    /// Hit-test and start a gesture. Returns `"body"`, a handle name, or nothing.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &self,
        document_id: &str,
        client_x: f64,
        client_y: f64,
        page_rect: Option<DomRect>,
    ) -> Option<String> {
        self.session
            .borrow_mut()
            .pointer_down(
                &DocumentId::new(document_id),
                dom::pointer(client_x, client_y),
                dom::page_rect(page_rect).as_ref(),
            )
            .map(|hit| dom::hit_name(hit).to_string())
    }

    #[wasm_bindgen(js_name = pointerDownOnPlacement)]
    pub fn pointer_down_on_placement(
        &self,
        document_id: &str,
        placement: u64,
        client_x: f64,
        client_y: f64,
        page_rect: Option<DomRect>,
    ) -> bool {
        self.session.borrow_mut().pointer_down_on_placement(
            &DocumentId::new(document_id),
            PlacementId::from_raw(placement),
            dom::pointer(client_x, client_y),
            dom::page_rect(page_rect).as_ref(),
        )
    }

    #[wasm_bindgen(js_name = pointerDownOnHandle)]
    pub fn pointer_down_on_handle(&self, placement: u64, handle: &str) -> Result<bool, JsValue> {
        let handle = dom::parse_handle(handle)?;
        Ok(self
            .session
            .borrow_mut()
            .pointer_down_on_handle(PlacementId::from_raw(placement), handle))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) {
        self.session.borrow_mut().pointer_released();
    }

    /// Double click on a placement removes it
    #[wasm_bindgen(js_name = placementDoubleClick)]
    pub fn placement_double_click(&self, placement: u64) -> bool {
        self.session
            .borrow_mut()
            .placement_activated_twice(PlacementId::from_raw(placement))
            .is_some()
    }

    /// Double click on the page creates a placement; returns its id
    #[wasm_bindgen(js_name = backgroundDoubleClick)]
    pub fn background_double_click(
        &self,
        document_id: &str,
        client_x: f64,
        client_y: f64,
        page_rect: Option<DomRect>,
    ) -> Option<u64> {
        self.session
            .borrow_mut()
            .background_activated_twice(
                &DocumentId::new(document_id),
                dom::pointer(client_x, client_y),
                dom::page_rect(page_rect).as_ref(),
            )
            .map(PlacementId::get)
    }

    // ============ Placements ============

    #[wasm_bindgen(js_name = removePlacement)]
    pub fn remove_placement(&self, placement: u64) -> bool {
        self.session
            .borrow_mut()
            .remove_placement(PlacementId::from_raw(placement))
            .is_some()
    }

    #[wasm_bindgen(js_name = clearPlacements)]
    pub fn clear_placements(&self) -> usize {
        self.session.borrow_mut().clear_placements()
    }

    #[wasm_bindgen(getter, js_name = placementCount)]
    pub fn placement_count(&self) -> usize {
        self.session.borrow().placements().len()
    }

    /// Percentage boxes of the placements on the current page
    #[wasm_bindgen(js_name = getOverlays)]
    pub fn get_overlays(&self, document_id: &str) -> Result<JsValue, JsValue> {
        let overlays: Vec<OverlayInfo> = self
            .session
            .borrow()
            .overlay_boxes(&DocumentId::new(document_id))
            .into_iter()
            .map(|(id, overlay)| OverlayInfo {
                id: id.get(),
                left: overlay.left,
                top: overlay.top,
                width: overlay.width,
                height: overlay.height,
            })
            .collect();
        serde_wasm_bindgen::to_value(&overlays).map_err(js_error)
    }

    /// All placements as JSON (for debugging/persistence)
    #[wasm_bindgen(js_name = getPlacementsJson)]
    pub fn get_placements_json(&self) -> Result<String, JsValue> {
        let session = self.session.borrow();
        let placements: Vec<_> = session.placements().iter().collect();
        serde_json::to_string(&placements)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Page and pointer diagnostics for a loaded document
    #[wasm_bindgen(js_name = getPageInfo)]
    pub fn get_page_info(&self, document_id: &str) -> Result<JsValue, JsValue> {
        let session = self.session.borrow();
        let id = DocumentId::new(document_id);
        let tracker = session.tracker(&id).ok_or("Document not loaded")?;
        let info = PageInfo {
            current_page: tracker.current_page,
            total_pages: tracker.total_pages,
            pdf_x: tracker.pointer.pdf_x,
            pdf_y: tracker.pointer.pdf_y,
            page_x: tracker.pointer.page_x,
            page_y: tracker.pointer.page_y,
            placements_on_page: session.visible_placements(&id).count(),
        };
        serde_wasm_bindgen::to_value(&info).map_err(js_error)
    }

    // ============ Submission ============

    /// Upload one bundle per placement. Precondition failures reject; upload
    /// failures resolve with `success: false` and the failed attempt.
    pub async fn submit(&self) -> Result<JsValue, JsValue> {
        let session = Rc::clone(&self.session);
        let uploader = FetchUploader::new(&self.api_base);

        let outcome = match submit_all(&session, &uploader).await {
            Ok(report) => SubmitOutcome {
                success: true,
                submitted: report.submitted,
                skipped_documents: report
                    .skipped_documents
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
                failed_attempt: None,
                error: None,
            },
            Err(SubmitError::Upload {
                attempt,
                submitted,
                reason,
            }) => SubmitOutcome {
                success: false,
                submitted,
                skipped_documents: Vec::new(),
                failed_attempt: Some(attempt),
                error: Some(reason),
            },
            Err(err) => return Err(js_error(err)),
        };

        web_sys::console::log_1(
            &format!(
                "Submission finished: {} submitted, success={}",
                outcome.submitted, outcome.success
            )
            .into(),
        );
        serde_wasm_bindgen::to_value(&outcome).map_err(js_error)
    }
}
