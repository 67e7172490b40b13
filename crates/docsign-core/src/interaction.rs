//! Drag and resize gesture state
//!
//! A single slot for the whole session: at most one placement is being moved
//! or resized at any time. Gestures start on pointer-down over a placement or
//! one of its corner handles and end on pointer-up anywhere.

use serde::Serialize;

use crate::geometry::{self, NormRect, PagePoint, ResizeHandle, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};
use crate::placement::{Placement, PlacementId, PlacementStore};

/// Offset between the grab point and the placement's position at drag start
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrabOffset {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        placement: PlacementId,
        grab_offset: GrabOffset,
    },
    Resizing {
        placement: PlacementId,
        handle: ResizeHandle,
        /// Geometry before the gesture; the corner opposite `handle` stays fixed
        origin: NormRect,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The placement being manipulated, if any
    pub fn target(&self) -> Option<PlacementId> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { placement, .. } | Interaction::Resizing { placement, .. } => {
                Some(*placement)
            }
        }
    }

    /// Start dragging from idle. Returns false if a gesture is already active.
    pub fn begin_drag(&mut self, placement: &Placement, pointer: PagePoint) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Interaction::Dragging {
            placement: placement.id,
            grab_offset: GrabOffset {
                dx: pointer.x - placement.rect.x,
                dy: pointer.y - placement.rect.y,
            },
        };
        true
    }

    /// Start resizing from idle. Returns false if a gesture is already active.
    pub fn begin_resize(&mut self, placement: &Placement, handle: ResizeHandle) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = Interaction::Resizing {
            placement: placement.id,
            handle,
            origin: placement.rect,
        };
        true
    }

    /// End the current gesture, returning the placement it targeted
    pub fn end(&mut self) -> Option<PlacementId> {
        let target = self.target();
        *self = Interaction::Idle;
        target
    }

    /// Apply pointer motion to the targeted placement.
    ///
    /// Returns the committed geometry, or `None` when idle. A gesture whose
    /// placement disappeared from the store falls back to idle.
    pub fn pointer_moved(
        &mut self,
        store: &mut PlacementStore,
        pointer: PagePoint,
    ) -> Option<NormRect> {
        let committed = match *self {
            Interaction::Idle => return None,
            Interaction::Dragging {
                placement,
                grab_offset,
            } => store.update_position(
                placement,
                pointer.x - grab_offset.dx,
                pointer.y - grab_offset.dy,
            ),
            Interaction::Resizing {
                placement,
                handle,
                origin,
            } => store.update_rect(placement, resize(origin, handle, pointer)),
        };

        if committed.is_none() {
            *self = Interaction::Idle;
        }
        committed
    }
}

/// Geometry after dragging `handle` of a placement that started at `origin`.
///
/// The edges opposite the handle stay where they were before the gesture; the
/// moving edges follow the pointer, bounded so the size stays within limits
/// and the placement stays on the page. Position and size are produced
/// together so the anchor corner never moves.
pub fn resize(origin: NormRect, handle: ResizeHandle, pointer: PagePoint) -> NormRect {
    let (x, width) = if handle.moves_left_edge() {
        let right = origin.right();
        let left = pointer
            .x
            .min(right - MIN_WIDTH)
            .max(right - MAX_WIDTH)
            .max(0.0);
        (left, right - left)
    } else {
        let width = (pointer.x - origin.x)
            .max(MIN_WIDTH)
            .min(MAX_WIDTH)
            .min(1.0 - origin.x);
        (origin.x, width)
    };

    let (y, height) = if handle.moves_top_edge() {
        let bottom = origin.bottom();
        let top = pointer
            .y
            .min(bottom - MIN_HEIGHT)
            .max(bottom - MAX_HEIGHT)
            .max(0.0);
        (top, bottom - top)
    } else {
        let height = (pointer.y - origin.y)
            .max(MIN_HEIGHT)
            .min(MAX_HEIGHT)
            .min(1.0 - origin.y);
        (origin.y, height)
    };

    geometry::clamp(NormRect::new(x, y, width, height))
}
