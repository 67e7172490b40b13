//! Ordered store of signature placements
//!
//! Placements keep insertion order, and each one carries a [`PlacementId`]
//! that is never reused within a session. Gestures refer to placements by id;
//! positional indices are only resolved at the moment of a mutation.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::DocumentId;

use crate::geometry::{self, NormRect, PagePoint, ResizeHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(u64);

impl PlacementId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A signature image's position and size on one page of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub document_id: DocumentId,
    /// 1-based page number
    pub page: u32,
    pub rect: NormRect,
}

/// What a page point lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle(PlacementId, ResizeHandle),
    Body(PlacementId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementStore {
    next_id: u64,
    placements: Vec<Placement>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placement. Its size is bounded to the limits and its position
    /// is pinned inside the page without changing that size.
    pub fn add(&mut self, document_id: DocumentId, page: u32, rect: NormRect) -> PlacementId {
        let id = PlacementId(self.next_id);
        self.next_id += 1;

        self.placements.push(Placement {
            id,
            document_id,
            page: page.max(1),
            rect: geometry::shift_inside(rect, rect.x, rect.y),
        });
        id
    }

    pub fn remove(&mut self, id: PlacementId) -> Option<Placement> {
        let index = self.index_of(id)?;
        Some(self.placements.remove(index))
    }

    /// Remove by position; later placements shift down by one
    pub fn remove_at(&mut self, index: usize) -> Option<Placement> {
        if index < self.placements.len() {
            Some(self.placements.remove(index))
        } else {
            None
        }
    }

    /// Drop every placement of a document, returning how many were removed
    pub fn remove_document(&mut self, document_id: &DocumentId) -> usize {
        let before = self.placements.len();
        self.placements.retain(|p| &p.document_id != document_id);
        before - self.placements.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.placements.len();
        self.placements.clear();
        removed
    }

    pub fn get(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PlacementId) -> Option<usize> {
        self.placements.iter().position(|p| p.id == id)
    }

    /// Move a placement keeping its size; the position is pinned inside the page
    pub fn update_position(&mut self, id: PlacementId, x: f64, y: f64) -> Option<NormRect> {
        let placement = self.get_mut(id)?;
        placement.rect = geometry::shift_inside(placement.rect, x, y);
        Some(placement.rect)
    }

    /// Resize a placement in place; the size is capped by the space left from
    /// its position
    pub fn update_size(&mut self, id: PlacementId, width: f64, height: f64) -> Option<NormRect> {
        let placement = self.get_mut(id)?;
        let rect = placement.rect;
        placement.rect = geometry::clamp(NormRect::new(rect.x, rect.y, width, height));
        Some(placement.rect)
    }

    /// Replace position and size together, as a resize gesture does
    pub fn update_rect(&mut self, id: PlacementId, rect: NormRect) -> Option<NormRect> {
        let placement = self.get_mut(id)?;
        placement.rect = geometry::clamp(rect);
        Some(placement.rect)
    }

    fn get_mut(&mut self, id: PlacementId) -> Option<&mut Placement> {
        self.placements.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Live view of one document's placements, in insertion order
    pub fn by_document<'a>(
        &'a self,
        document_id: &'a DocumentId,
    ) -> impl Iterator<Item = &'a Placement> + 'a {
        self.placements
            .iter()
            .filter(move |p| &p.document_id == document_id)
    }

    /// Live view of the placements on one page of one document
    pub fn on_page<'a>(
        &'a self,
        document_id: &'a DocumentId,
        page: u32,
    ) -> impl Iterator<Item = &'a Placement> + 'a {
        self.by_document(document_id).filter(move |p| p.page == page)
    }

    /// Ids of a document's placements at this moment
    pub fn ids_for_document(&self, document_id: &DocumentId) -> Vec<PlacementId> {
        self.by_document(document_id).map(|p| p.id).collect()
    }

    /// Find the placement under a page point.
    ///
    /// Later placements are drawn on top, so they are tested first. Corner
    /// handles win over the body of the same placement; `tolerance` is the
    /// handle's half-extent in page-relative units.
    pub fn hit_test(
        &self,
        document_id: &DocumentId,
        page: u32,
        point: PagePoint,
        tolerance: f64,
    ) -> Option<Hit> {
        let candidates: Vec<&Placement> = self.on_page(document_id, page).collect();

        for placement in candidates.into_iter().rev() {
            for handle in ResizeHandle::ALL {
                let corner = placement.rect.corner(handle);
                if (corner.x - point.x).abs() <= tolerance && (corner.y - point.y).abs() <= tolerance
                {
                    return Some(Hit::Handle(placement.id, handle));
                }
            }
            if placement.rect.contains(point) {
                return Some(Hit::Body(placement.id));
            }
        }
        None
    }
}
