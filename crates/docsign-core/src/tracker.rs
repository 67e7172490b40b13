//! Per-document page tracking
//!
//! One tracker per document that has finished loading in the viewer. It keeps
//! the page currently shown and the last pointer position seen over it.

use std::collections::HashMap;

use serde::Serialize;
use shared_types::DocumentId;
use tracing::warn;

use crate::coords::PageCoords;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTracker {
    pub document_id: DocumentId,
    /// 1-based, always within `1..=total_pages`
    pub current_page: u32,
    pub total_pages: u32,
    /// Last pointer position recorded over the page
    pub pointer: PageCoords,
}

impl PageTracker {
    /// Tracker for a freshly loaded document. `None` for a document with no pages.
    pub fn new(document_id: DocumentId, total_pages: u32) -> Option<Self> {
        if total_pages == 0 {
            return None;
        }
        Some(Self {
            document_id,
            current_page: 1,
            total_pages,
            pointer: PageCoords::default(),
        })
    }

    /// Apply a viewer page change. The viewer reports 0-based indices.
    pub fn change_page(&mut self, zero_based: u32) -> u32 {
        self.current_page = zero_based.saturating_add(1).min(self.total_pages);
        self.current_page
    }

    /// Remember the pointer when it lies on the page; returns whether it did
    pub fn record_pointer(&mut self, coords: PageCoords) -> bool {
        if coords.within_page {
            self.pointer = coords;
        }
        coords.within_page
    }
}

/// All page trackers of a session, keyed by document
#[derive(Debug, Clone, Default)]
pub struct PageTrackers {
    trackers: HashMap<DocumentId, PageTracker>,
}

impl PageTrackers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or reset a document's tracker when the viewer finishes loading it
    pub fn on_document_load(&mut self, document_id: &DocumentId, total_pages: u32) -> bool {
        match PageTracker::new(document_id.clone(), total_pages) {
            Some(tracker) => {
                self.trackers.insert(document_id.clone(), tracker);
                true
            }
            None => {
                warn!(document = %document_id, "ignoring load of document with no pages");
                false
            }
        }
    }

    /// Returns the new 1-based page, or `None` if the document has no tracker yet
    pub fn on_page_change(&mut self, document_id: &DocumentId, zero_based: u32) -> Option<u32> {
        let Some(tracker) = self.trackers.get_mut(document_id) else {
            warn!(document = %document_id, page = zero_based, "page change before document load");
            return None;
        };
        Some(tracker.change_page(zero_based))
    }

    pub fn record_pointer(&mut self, document_id: &DocumentId, coords: PageCoords) -> bool {
        self.trackers
            .get_mut(document_id)
            .map(|tracker| tracker.record_pointer(coords))
            .unwrap_or(false)
    }

    pub fn get(&self, document_id: &DocumentId) -> Option<&PageTracker> {
        self.trackers.get(document_id)
    }

    pub fn current_page(&self, document_id: &DocumentId) -> Option<u32> {
        self.get(document_id).map(|t| t.current_page)
    }

    pub fn is_loaded(&self, document_id: &DocumentId) -> bool {
        self.trackers.contains_key(document_id)
    }

    pub fn remove(&mut self, document_id: &DocumentId) -> Option<PageTracker> {
        self.trackers.remove(document_id)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
