//! Signing session facade
//!
//! Owns every piece of per-session state: the active document set, page
//! trackers, the placement store, the shared signature image and the single
//! interaction slot. Hosts forward viewer and pointer events here; all
//! mutations happen synchronously on the caller's thread.

use shared_types::{Document, DocumentId, SignatureImage, UserId};
use tracing::{debug, info, warn};

use crate::config::{SessionConfig, SessionMode, SignatureSize};
use crate::coords::{map_pointer, PageCoords, ScreenPoint, ScreenRect};
use crate::geometry::{NormRect, OverlayBox, ResizeHandle};
use crate::interaction::Interaction;
use crate::placement::{Hit, Placement, PlacementId, PlacementStore};
use crate::tracker::{PageTracker, PageTrackers};

#[derive(Debug)]
pub struct SigningSession {
    user_id: UserId,
    config: SessionConfig,
    default_size: SignatureSize,
    documents: Vec<Document>,
    trackers: PageTrackers,
    placements: PlacementStore,
    image: Option<SignatureImage>,
    interaction: Interaction,
}

impl SigningSession {
    /// Start a session for a user. The user id is read once and never re-checked.
    pub fn new(user_id: UserId, config: SessionConfig) -> Self {
        let default_size = config.default_size.clamped();
        Self {
            user_id,
            config,
            default_size,
            documents: Vec::new(),
            trackers: PageTrackers::new(),
            placements: PlacementStore::new(),
            image: None,
            interaction: Interaction::Idle,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_preview(&self) -> bool {
        self.config.mode == SessionMode::Preview
    }

    // ----- Active document set -----

    /// Add a document to the active set. Re-opening a document replaces its
    /// content and keeps its placements. Returns true if it was not open yet.
    pub fn open_document(&mut self, document: Document) -> bool {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.id == document.id) {
            debug!(document = %document.id, "document re-opened");
            *existing = document;
            return false;
        }
        info!(document = %document.id, name = %document.file_name, "document opened");
        self.documents.push(document);
        true
    }

    /// Remove a document with its tracker and placements. A gesture on one of
    /// its placements is cancelled.
    pub fn close_document(&mut self, document_id: &DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|d| &d.id == document_id)?;
        let document = self.documents.remove(index);

        if let Some(target) = self.interaction.target() {
            let on_document = self
                .placements
                .get(target)
                .map_or(true, |p| &p.document_id == document_id);
            if on_document {
                self.interaction.end();
            }
        }
        self.trackers.remove(document_id);
        let removed = self.placements.remove_document(document_id);
        info!(document = %document_id, placements = removed, "document closed");
        Some(document)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, document_id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == document_id)
    }

    pub fn is_open(&self, document_id: &DocumentId) -> bool {
        self.document(document_id).is_some()
    }

    // ----- Viewer events -----

    /// Viewer finished loading a document. Resets the page to 1.
    pub fn document_loaded(&mut self, document_id: &DocumentId, total_pages: u32) -> bool {
        if !self.is_open(document_id) {
            warn!(document = %document_id, "load reported for a document that is not open");
            return false;
        }
        let loaded = self.trackers.on_document_load(document_id, total_pages);
        if loaded {
            info!(document = %document_id, total_pages, "viewer loaded document");
        }
        loaded
    }

    /// Viewer moved to another page (0-based index). Returns the new 1-based page.
    pub fn page_changed(&mut self, document_id: &DocumentId, zero_based: u32) -> Option<u32> {
        if self.is_preview() {
            return None;
        }
        let page = self.trackers.on_page_change(document_id, zero_based)?;
        info!(document = %document_id, page, "page changed");
        Some(page)
    }

    pub fn tracker(&self, document_id: &DocumentId) -> Option<&PageTracker> {
        self.trackers.get(document_id)
    }

    pub fn current_page(&self, document_id: &DocumentId) -> Option<u32> {
        self.trackers.current_page(document_id)
    }

    // ----- Signature image -----

    /// Replace the shared signature image. Existing placements keep their geometry.
    pub fn load_signature_image(&mut self, image: SignatureImage) {
        info!(
            content_type = image.content_type(),
            bytes = image.bytes().len(),
            "signature image loaded"
        );
        self.image = Some(image);
    }

    pub fn clear_signature_image(&mut self) -> Option<SignatureImage> {
        let previous = self.image.take();
        if previous.is_some() {
            info!("signature image cleared");
        }
        previous
    }

    pub fn signature_image(&self) -> Option<&SignatureImage> {
        self.image.as_ref()
    }

    pub fn default_size(&self) -> SignatureSize {
        self.default_size
    }

    /// Size used for placements created from now on; existing ones are unchanged
    pub fn set_default_size(&mut self, width: f64, height: f64) -> SignatureSize {
        self.default_size = SignatureSize::new(width, height).clamped();
        debug!(
            width = self.default_size.width,
            height = self.default_size.height,
            "default size changed"
        );
        self.default_size
    }

    // ----- Pointer events -----

    /// Resolve a pointer against a document's rendered page. Preview sessions
    /// and documents the viewer has not loaded yet have no mapping.
    fn map(
        &self,
        document_id: &DocumentId,
        pointer: ScreenPoint,
        page: Option<&ScreenRect>,
    ) -> Option<PageCoords> {
        if self.is_preview() || !self.trackers.is_loaded(document_id) {
            return None;
        }
        map_pointer(pointer, page)
    }

    /// Pointer motion over a document's page.
    ///
    /// Updates the tracker's pointer and, when a gesture on one of this
    /// document's placements is active, applies it. Returns the committed
    /// geometry of the manipulated placement.
    pub fn pointer_moved(
        &mut self,
        document_id: &DocumentId,
        pointer: ScreenPoint,
        page: Option<&ScreenRect>,
    ) -> Option<NormRect> {
        let coords = self.map(document_id, pointer, page)?;
        self.trackers.record_pointer(document_id, coords);

        let target = self.interaction.target()?;
        let on_document = self
            .placements
            .get(target)
            .map_or(true, |p| &p.document_id == document_id);
        if !on_document {
            return None;
        }

        let committed = self
            .interaction
            .pointer_moved(&mut self.placements, coords.page_point());
        match committed {
            Some(rect) => debug!(placement = %target, ?rect, "gesture moved placement"),
            None => debug!(placement = %target, "gesture target gone, back to idle"),
        }
        committed
    }

    /// Pointer pressed over a placement's image: start dragging it
    pub fn pointer_down_on_placement(
        &mut self,
        document_id: &DocumentId,
        placement: PlacementId,
        pointer: ScreenPoint,
        page: Option<&ScreenRect>,
    ) -> bool {
        let Some(coords) = self.map(document_id, pointer, page) else {
            return false;
        };
        if !coords.within_page {
            return false;
        }
        let Some(target) = self
            .placements
            .get(placement)
            .filter(|p| &p.document_id == document_id)
            .filter(|p| self.trackers.current_page(document_id) == Some(p.page))
        else {
            return false;
        };
        let started = self.interaction.begin_drag(target, coords.page_point());
        if started {
            debug!(placement = %placement, x = coords.page_x, y = coords.page_y, "drag started");
        }
        started
    }

    /// Pointer pressed over one of a placement's corner handles: start resizing.
    /// Only placements shown on their document's current page can be resized.
    pub fn pointer_down_on_handle(&mut self, placement: PlacementId, handle: ResizeHandle) -> bool {
        if self.is_preview() {
            return false;
        }
        let Some(target) = self.placements.get(placement).filter(|p| {
            self.trackers.current_page(&p.document_id) == Some(p.page)
        }) else {
            return false;
        };
        let started = self.interaction.begin_resize(target, handle);
        if started {
            debug!(placement = %placement, %handle, "resize started");
        }
        started
    }

    /// Pointer pressed somewhere on a page: hit-test the current page's
    /// placements and start the matching gesture
    pub fn pointer_down(
        &mut self,
        document_id: &DocumentId,
        pointer: ScreenPoint,
        page: Option<&ScreenRect>,
    ) -> Option<Hit> {
        let coords = self.map(document_id, pointer, page)?;
        if !coords.within_page || !self.interaction.is_idle() {
            return None;
        }
        let current_page = self.trackers.current_page(document_id)?;
        let hit = self.placements.hit_test(
            document_id,
            current_page,
            coords.page_point(),
            self.config.handle_tolerance,
        )?;

        let started = match hit {
            Hit::Handle(id, handle) => self.pointer_down_on_handle(id, handle),
            Hit::Body(id) => self.pointer_down_on_placement(document_id, id, pointer, page),
        };
        started.then_some(hit)
    }

    /// Pointer released anywhere: end the active gesture
    pub fn pointer_released(&mut self) -> Option<PlacementId> {
        let ended = self.interaction.end();
        if let Some(id) = ended {
            debug!(placement = %id, "gesture ended");
        }
        ended
    }

    /// Double activation on a placement removes it while no gesture is active
    pub fn placement_activated_twice(&mut self, placement: PlacementId) -> Option<Placement> {
        if self.is_preview() || !self.interaction.is_idle() {
            return None;
        }
        self.remove_placement(placement)
    }

    /// Double activation on the page background creates a placement centered
    /// on the pointer.
    ///
    /// Requires an idle session, a loaded signature image and a pointer on the
    /// page. The vertical position is inverted here and only here.
    pub fn background_activated_twice(
        &mut self,
        document_id: &DocumentId,
        pointer: ScreenPoint,
        page: Option<&ScreenRect>,
    ) -> Option<PlacementId> {
        let coords = self.map(document_id, pointer, page)?;
        debug!(
            document = %document_id,
            pdf_x = coords.pdf_x,
            pdf_y = coords.pdf_y,
            page_x = coords.page_x,
            page_y = coords.page_y,
            "background activated"
        );
        if !coords.within_page || !self.interaction.is_idle() {
            return None;
        }
        if self.image.is_none() {
            debug!("no signature image loaded, nothing to place");
            return None;
        }
        let current_page = self.trackers.current_page(document_id)?;

        let size = self.default_size;
        let creation_y = 1.0 - coords.page_y;
        let rect = NormRect::new(
            coords.page_x - size.width / 2.0,
            creation_y - size.height / 2.0,
            size.width,
            size.height,
        );
        Some(self.insert_placement(document_id, current_page, rect))
    }

    /// Programmatic placement on a loaded document. Requires a signature image.
    pub fn add_placement(
        &mut self,
        document_id: &DocumentId,
        page: u32,
        rect: NormRect,
    ) -> Option<PlacementId> {
        if self.is_preview() || self.image.is_none() {
            return None;
        }
        let total_pages = self.trackers.get(document_id)?.total_pages;
        Some(self.insert_placement(document_id, page.clamp(1, total_pages), rect))
    }

    /// Programmatic move; the size is kept and the position pinned inside the page.
    /// A gesture on the same placement ends first so it cannot overwrite the move.
    pub fn move_placement(&mut self, placement: PlacementId, x: f64, y: f64) -> Option<NormRect> {
        if self.is_preview() {
            return None;
        }
        let rect = self.placements.update_position(placement, x, y)?;
        self.end_gesture_on(placement);
        Some(rect)
    }

    /// Programmatic resize keeping the top-left corner
    pub fn resize_placement(
        &mut self,
        placement: PlacementId,
        width: f64,
        height: f64,
    ) -> Option<NormRect> {
        if self.is_preview() {
            return None;
        }
        let rect = self.placements.update_size(placement, width, height)?;
        self.end_gesture_on(placement);
        Some(rect)
    }

    fn end_gesture_on(&mut self, placement: PlacementId) {
        if self.interaction.target() == Some(placement) {
            self.interaction.end();
            debug!(placement = %placement, "gesture ended by programmatic update");
        }
    }

    fn insert_placement(&mut self, document_id: &DocumentId, page: u32, rect: NormRect) -> PlacementId {
        let id = self.placements.add(document_id.clone(), page, rect);
        if let Some(placement) = self.placements.get(id) {
            info!(
                placement = %id,
                document = %document_id,
                page,
                rect = ?placement.rect,
                "placement added"
            );
        }
        id
    }

    // ----- Removal -----

    pub fn remove_placement(&mut self, placement: PlacementId) -> Option<Placement> {
        let removed = self.placements.remove(placement)?;
        self.after_removal(&removed);
        Some(removed)
    }

    /// Remove by position in insertion order
    pub fn remove_placement_at(&mut self, index: usize) -> Option<Placement> {
        let removed = self.placements.remove_at(index)?;
        self.after_removal(&removed);
        Some(removed)
    }

    fn after_removal(&mut self, removed: &Placement) {
        if self.interaction.target() == Some(removed.id) {
            self.interaction.end();
        }
        info!(placement = %removed.id, document = %removed.document_id, page = removed.page, "placement removed");
    }

    pub fn clear_placements(&mut self) -> usize {
        self.interaction.end();
        let removed = self.placements.clear();
        info!(removed, "placements cleared");
        removed
    }

    // ----- Queries -----

    pub fn placements(&self) -> &PlacementStore {
        &self.placements
    }

    pub fn placement(&self, placement: PlacementId) -> Option<&Placement> {
        self.placements.get(placement)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Placements on the page the viewer currently shows
    pub fn visible_placements<'a>(
        &'a self,
        document_id: &'a DocumentId,
    ) -> impl Iterator<Item = &'a Placement> + 'a {
        let page = self.trackers.current_page(document_id).unwrap_or(0);
        self.placements.on_page(document_id, page)
    }

    /// Overlay boxes for the visible placements, in drawing order
    pub fn overlay_boxes(&self, document_id: &DocumentId) -> Vec<(PlacementId, OverlayBox)> {
        self.visible_placements(document_id)
            .map(|p| (p.id, OverlayBox::from(p.rect)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: ScreenRect = ScreenRect {
        left: 100.0,
        top: 50.0,
        width: 600.0,
        height: 800.0,
    };

    fn at(page_x: f64, page_y: f64) -> ScreenPoint {
        ScreenPoint::new(
            PAGE.left + page_x * PAGE.width,
            PAGE.top + page_y * PAGE.height,
        )
    }

    fn image() -> SignatureImage {
        SignatureImage::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]).unwrap()
    }

    fn document(id: &str) -> Document {
        Document::from_bytes(
            UserId::new("user-1"),
            format!("{}.pdf", id),
            "application/pdf",
            b"%PDF-1.7".to_vec(),
        )
        .with_id(DocumentId::new(id))
    }

    fn ready_session() -> (SigningSession, DocumentId) {
        let mut session = SigningSession::new(UserId::new("user-1"), SessionConfig::default());
        let doc = document("contract");
        let id = doc.id.clone();
        session.open_document(doc);
        session.document_loaded(&id, 3);
        session.load_signature_image(image());
        (session, id)
    }

    #[test]
    fn test_creation_inverts_vertical_position() {
        let (mut session, doc) = ready_session();
        let id = session
            .background_activated_twice(&doc, at(0.5, 0.2), Some(&PAGE))
            .unwrap();

        let placement = session.placement(id).unwrap();
        assert_eq!(placement.page, 1);
        assert!((placement.rect.y - (1.0 - 0.2 - 0.08 / 2.0)).abs() < 1e-9);
        assert!((placement.rect.x - (0.5 - 0.15 / 2.0)).abs() < 1e-9);
        assert_eq!(placement.rect.width, 0.15);
        assert_eq!(placement.rect.height, 0.08);
    }

    #[test]
    fn test_creation_uses_current_page_and_default_size() {
        let (mut session, doc) = ready_session();
        session.page_changed(&doc, 2);
        session.set_default_size(0.2, 0.1);

        let id = session
            .background_activated_twice(&doc, at(0.5, 0.5), Some(&PAGE))
            .unwrap();
        let placement = session.placement(id).unwrap();
        assert_eq!(placement.page, 3);
        assert_eq!(placement.rect.width, 0.2);
        assert_eq!(placement.rect.height, 0.1);
    }

    #[test]
    fn test_creation_requires_image() {
        let (mut session, doc) = ready_session();
        session.clear_signature_image();
        assert!(session
            .background_activated_twice(&doc, at(0.5, 0.5), Some(&PAGE))
            .is_none());
        assert!(session.placements().is_empty());
    }

    #[test]
    fn test_creation_requires_loaded_viewer() {
        let mut session = SigningSession::new(UserId::new("u"), SessionConfig::default());
        let doc = document("contract");
        let id = doc.id.clone();
        session.open_document(doc);
        session.load_signature_image(image());

        assert!(session
            .background_activated_twice(&id, at(0.5, 0.5), Some(&PAGE))
            .is_none());
    }

    #[test]
    fn test_creation_ignores_clicks_off_page() {
        let (mut session, doc) = ready_session();
        assert!(session
            .background_activated_twice(&doc, at(1.2, 0.5), Some(&PAGE))
            .is_none());
        assert!(session
            .background_activated_twice(&doc, at(0.5, 0.5), None)
            .is_none());
    }

    #[test]
    fn test_creation_near_edge_is_pinned_inside() {
        let (mut session, doc) = ready_session();
        let id = session
            .background_activated_twice(&doc, at(0.99, 0.99), Some(&PAGE))
            .unwrap();
        let rect = session.placement(id).unwrap().rect;
        assert!(rect.is_valid());
        assert_eq!(rect.width, 0.15);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_drag_through_session() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.4, 0.4, 0.1, 0.1))
            .unwrap();

        assert!(session.pointer_down_on_placement(&doc, id, at(0.45, 0.42), Some(&PAGE)));
        let rect = session
            .pointer_moved(&doc, at(0.5, 0.5), Some(&PAGE))
            .unwrap();
        assert!((rect.x - 0.45).abs() < 1e-9);
        assert!((rect.y - 0.48).abs() < 1e-9);

        assert_eq!(session.pointer_released(), Some(id));
        assert!(session.interaction().is_idle());
        assert!(session
            .pointer_moved(&doc, at(0.9, 0.9), Some(&PAGE))
            .is_none());
    }

    #[test]
    fn test_drag_off_page_stays_inside() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.4, 0.4, 0.1, 0.1))
            .unwrap();
        session.pointer_down_on_placement(&doc, id, at(0.45, 0.45), Some(&PAGE));

        let rect = session
            .pointer_moved(&doc, at(1.5, -0.5), Some(&PAGE))
            .unwrap();
        assert!(rect.is_valid());
        assert_eq!(rect.width, 0.1);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_pointer_down_hit_tests_current_page() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.2, 0.2, 0.2, 0.1))
            .unwrap();

        assert_eq!(
            session.pointer_down(&doc, at(0.3, 0.25), Some(&PAGE)),
            Some(Hit::Body(id))
        );
        session.pointer_released();

        assert_eq!(
            session.pointer_down(&doc, at(0.4, 0.3), Some(&PAGE)),
            Some(Hit::Handle(id, ResizeHandle::SouthEast))
        );
        assert!(matches!(
            session.interaction(),
            Interaction::Resizing { handle: ResizeHandle::SouthEast, .. }
        ));
        session.pointer_released();

        session.page_changed(&doc, 1);
        assert_eq!(session.pointer_down(&doc, at(0.3, 0.25), Some(&PAGE)), None);
    }

    #[test]
    fn test_double_activation_removes_only_when_idle() {
        let (mut session, doc) = ready_session();
        let a = session
            .add_placement(&doc, 1, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .unwrap();
        let b = session
            .add_placement(&doc, 1, NormRect::new(0.5, 0.5, 0.1, 0.1))
            .unwrap();

        session.pointer_down_on_handle(b, ResizeHandle::NorthWest);
        assert!(session.placement_activated_twice(a).is_none());
        session.pointer_released();

        let removed = session.placement_activated_twice(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(session.visible_placements(&doc).count(), 1);
        assert!(session.placement(b).is_some());
    }

    #[test]
    fn test_removing_gesture_target_cancels_gesture() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .unwrap();
        session.pointer_down_on_handle(id, ResizeHandle::SouthEast);
        session.remove_placement_at(0);
        assert!(session.interaction().is_idle());
    }

    #[test]
    fn test_close_document_drops_its_state() {
        let (mut session, doc) = ready_session();
        let other = document("invoice");
        let other_id = other.id.clone();
        session.open_document(other);
        session.document_loaded(&other_id, 1);

        let id = session
            .add_placement(&doc, 2, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .unwrap();
        session
            .add_placement(&other_id, 1, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .unwrap();
        session.page_changed(&doc, 1);
        assert!(session.pointer_down_on_handle(id, ResizeHandle::SouthEast));

        assert!(session.close_document(&doc).is_some());
        assert!(session.interaction().is_idle());
        assert!(session.tracker(&doc).is_none());
        assert_eq!(session.placements().len(), 1);
        assert_eq!(session.documents().len(), 1);
        assert!(session.close_document(&doc).is_none());
    }

    #[test]
    fn test_reopen_keeps_placements() {
        let (mut session, doc) = ready_session();
        session
            .add_placement(&doc, 1, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .unwrap();
        assert!(!session.open_document(document("contract")));
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.placements().len(), 1);
    }

    #[test]
    fn test_clearing_image_keeps_geometry() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.3, 0.3, 0.1, 0.1))
            .unwrap();
        let before = session.placement(id).unwrap().clone();
        session.clear_signature_image();
        assert_eq!(session.placement(id).unwrap(), &before);
        session.load_signature_image(image());
        assert_eq!(session.placement(id).unwrap(), &before);
    }

    #[test]
    fn test_page_change_hides_but_keeps_placements() {
        let (mut session, doc) = ready_session();
        session
            .add_placement(&doc, 1, NormRect::new(0.3, 0.3, 0.1, 0.1))
            .unwrap();
        assert_eq!(session.overlay_boxes(&doc).len(), 1);

        session.page_changed(&doc, 1);
        assert_eq!(session.overlay_boxes(&doc).len(), 0);
        assert_eq!(session.placements().len(), 1);
    }

    #[test]
    fn test_pointer_tracked_for_diagnostics() {
        let (mut session, doc) = ready_session();
        session.pointer_moved(&doc, at(0.25, 0.75), Some(&PAGE));
        let tracker = session.tracker(&doc).unwrap();
        assert_eq!(tracker.pointer.pdf_x, 150.0);
        assert_eq!(tracker.pointer.pdf_y, 600.0);
        assert_eq!(tracker.pointer.page_x, 0.25);
        assert_eq!(tracker.pointer.page_y, 0.75);
    }

    #[test]
    fn test_preview_mode_is_read_only() {
        let config = SessionConfig {
            mode: SessionMode::Preview,
            ..SessionConfig::default()
        };
        let mut session = SigningSession::new(UserId::new("u"), config);
        let doc = document("contract");
        let id = doc.id.clone();
        session.open_document(doc);
        assert!(session.document_loaded(&id, 2));
        session.load_signature_image(image());

        assert_eq!(session.page_changed(&id, 1), None);
        assert!(session
            .background_activated_twice(&id, at(0.5, 0.5), Some(&PAGE))
            .is_none());
        assert!(session
            .add_placement(&id, 1, NormRect::new(0.1, 0.1, 0.1, 0.1))
            .is_none());
    }

    #[test]
    fn test_set_default_size_clamps() {
        let (mut session, _) = ready_session();
        assert_eq!(session.set_default_size(0.8, 0.0), SignatureSize::new(0.30, 0.03));
    }

    #[test]
    fn test_press_off_page_starts_no_gesture() {
        let (mut session, doc) = ready_session();
        let corner = session
            .add_placement(&doc, 1, NormRect::new(0.8, 0.9, 0.2, 0.1))
            .unwrap();
        let edge = session
            .add_placement(&doc, 1, NormRect::new(0.0, 0.4, 0.1, 0.1))
            .unwrap();

        let far_corner = ScreenPoint::new(5000.0, 5000.0);
        assert_eq!(session.pointer_down(&doc, far_corner, Some(&PAGE)), None);
        assert!(session.interaction().is_idle());

        let far_left = ScreenPoint::new(-3000.0, PAGE.top + 0.45 * PAGE.height);
        assert_eq!(session.pointer_down(&doc, far_left, Some(&PAGE)), None);
        assert!(!session.pointer_down_on_placement(&doc, edge, far_left, Some(&PAGE)));
        assert!(session.interaction().is_idle());

        assert_eq!(
            session.pointer_down(&doc, at(0.99, 0.99), Some(&PAGE)),
            Some(Hit::Handle(corner, ResizeHandle::SouthEast))
        );
    }

    #[test]
    fn test_hidden_placement_cannot_be_grabbed() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 2, NormRect::new(0.4, 0.4, 0.1, 0.1))
            .unwrap();

        assert!(!session.pointer_down_on_handle(id, ResizeHandle::SouthEast));
        assert!(!session.pointer_down_on_placement(&doc, id, at(0.45, 0.45), Some(&PAGE)));
        assert!(session.interaction().is_idle());

        session.page_changed(&doc, 1);
        assert!(session.pointer_down_on_handle(id, ResizeHandle::SouthEast));
    }

    #[test]
    fn test_programmatic_update_ends_active_resize() {
        let (mut session, doc) = ready_session();
        let id = session
            .add_placement(&doc, 1, NormRect::new(0.2, 0.2, 0.1, 0.1))
            .unwrap();
        assert!(session.pointer_down_on_handle(id, ResizeHandle::SouthEast));

        let moved = session.move_placement(id, 0.6, 0.6).unwrap();
        assert!(session.interaction().is_idle());
        assert!(session
            .pointer_moved(&doc, at(0.9, 0.9), Some(&PAGE))
            .is_none());
        assert_eq!(session.placement(id).unwrap().rect, moved);

        assert!(session.pointer_down_on_handle(id, ResizeHandle::SouthEast));
        let resized = session.resize_placement(id, 0.2, 0.1).unwrap();
        assert!(session.interaction().is_idle());
        session.pointer_moved(&doc, at(0.1, 0.1), Some(&PAGE));
        assert_eq!(session.placement(id).unwrap().rect, resized);
    }

    #[test]
    fn test_programmatic_update_keeps_other_gesture() {
        let (mut session, doc) = ready_session();
        let a = session
            .add_placement(&doc, 1, NormRect::new(0.2, 0.2, 0.1, 0.1))
            .unwrap();
        let b = session
            .add_placement(&doc, 1, NormRect::new(0.6, 0.6, 0.1, 0.1))
            .unwrap();
        assert!(session.pointer_down_on_handle(a, ResizeHandle::SouthEast));
        session.move_placement(b, 0.1, 0.7).unwrap();
        assert_eq!(session.interaction().target(), Some(a));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_viewer_events_logged_once() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let (mut session, doc) = ready_session();
            session.page_changed(&doc, 1);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("viewer loaded document").count(), 1);
        assert_eq!(output.matches("document loaded").count(), 0);
        assert_eq!(output.matches("page changed").count(), 1);
    }

    #[test]
    fn test_load_for_unopened_document_ignored() {
        let mut session = SigningSession::new(UserId::new("u"), SessionConfig::default());
        assert!(!session.document_loaded(&DocumentId::new("ghost"), 3));
    }
}
