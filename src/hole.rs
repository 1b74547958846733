//! A single rectangular hole cut out of the overlay.
//!
//! The hole is drawn with a press/drag/release gesture. Points are expected
//! in window-relative coordinates; see [`crate::geometry::client_to_window`].

use crate::geometry::{Point, Rect};
use crate::platform::{HoleRegion, Surface, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hole {
    state: DragState,
    anchor: Point,
    current: Point,
    rect: Rect,
}

impl Hole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Current hole, always normalized.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Begin a new hole at `point`, discarding the previous one.
    pub fn start<S: Surface + ?Sized>(&mut self, surface: &S, window: WindowId, point: Point) {
        self.state = DragState::Dragging;
        self.anchor = point;
        self.current = point;
        self.rect = Rect::at(point);
        tracing::trace!(?point, "hole start");
        surface.invalidate(window);
    }

    pub fn drag<S: Surface + ?Sized>(&mut self, surface: &S, window: WindowId, point: Point) {
        if !self.is_dragging() {
            return;
        }
        self.extend_to(point);
        surface.invalidate(window);
    }

    /// Finish the gesture. The hole stays until the next [`Hole::start`].
    pub fn end<S: Surface + ?Sized>(&mut self, surface: &S, window: WindowId, point: Point) {
        if !self.is_dragging() {
            return;
        }
        self.extend_to(point);
        self.state = DragState::Idle;
        tracing::debug!(rect = ?self.rect, "hole defined");
        surface.invalidate(window);
    }

    fn extend_to(&mut self, point: Point) {
        self.current = point;
        self.rect = Rect::spanning(self.anchor, self.current);
    }

    /// Region for a window currently occupying `window_rect` on screen.
    pub fn region_for(&self, window_rect: Rect) -> HoleRegion {
        HoleRegion {
            width: window_rect.width(),
            height: window_rect.height(),
            hole: self.rect,
        }
    }

    /// Apply "window minus hole" as the window region. Call from the paint
    /// handler. Returns false when nothing was applied, in which case the
    /// previous region stays in effect.
    pub fn render<S: Surface + ?Sized>(&self, surface: &S, window: WindowId) -> bool {
        let Some(window_rect) = surface.window_rect(window) else {
            tracing::debug!(?window, "window rect unavailable, skipping hole render");
            return false;
        };
        let region = self.region_for(window_rect);
        let applied = surface.set_window_region(window, &region);
        if !applied {
            tracing::debug!(?window, ?region, "window region rejected");
        }
        applied
    }
}
