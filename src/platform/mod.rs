//! OS seam for the hole engine and the underlay tracker.
//!
//! The core never touches the windowing system directly; it goes through
//! [`Surface`] and [`WindowSystem`]. On Windows these are implemented by
//! [`Win32Desktop`]; tests provide an in-memory desktop.

use crate::geometry::{Placement, Rect};
use std::sync::Weak;

pub mod registry;
#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub use win32::Win32Desktop;

/// Non-owning window identifier.
///
/// Nothing here keeps the window alive; it can be destroyed by its owner at
/// any moment, so every use must tolerate a stale id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub isize);

impl WindowId {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Region to apply to the overlay: the whole window frame minus the hole.
/// All coordinates are window-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoleRegion {
    pub width: i32,
    pub height: i32,
    pub hole: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Topmost,
    /// Directly behind the given window.
    After(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopLevelWindow {
    pub id: WindowId,
    pub pid: u32,
    pub rect: Rect,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionScope {
    /// Location and size changes of objects owned by one process.
    Location { pid: u32 },
    /// Foreground changes anywhere on the desktop.
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    LocationChange,
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinEvent {
    pub kind: EventKind,
    /// `None` when the OS reported a null window.
    pub window: Option<WindowId>,
    /// The event is about the window itself rather than a child object
    /// (caret, cursor, scroll bar...).
    pub whole_window: bool,
}

impl WinEvent {
    pub fn foreground(window: WindowId) -> Self {
        Self {
            kind: EventKind::Foreground,
            window: (!window.is_null()).then_some(window),
            whole_window: true,
        }
    }

    pub fn location(window: WindowId) -> Self {
        Self {
            kind: EventKind::LocationChange,
            window: (!window.is_null()).then_some(window),
            whole_window: true,
        }
    }
}

/// Receiver of change notifications. May be called from a thread other
/// than the one that owns the overlay window.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: WinEvent);
}

/// Operations the hole engine needs from the overlay window.
pub trait Surface {
    /// Current window rectangle in screen coordinates, queried live.
    fn window_rect(&self, window: WindowId) -> Option<Rect>;

    /// Ask for the whole window to be repainted.
    fn invalidate(&self, window: WindowId);

    fn set_window_region(&self, window: WindowId, region: &HoleRegion) -> bool;
}

/// Everything the underlay tracker needs from the desktop.
pub trait WindowSystem: Surface + Send + Sync + 'static {
    /// Open process handle. Dropping it closes the handle.
    type Process: Send + Sync;

    fn is_window(&self, window: WindowId) -> bool;

    /// Height of a native caption bar.
    fn title_bar_height(&self) -> i32;

    /// Move, resize and restack without activating.
    fn place_window(&self, window: WindowId, placement: Placement, z_order: ZOrder) -> bool;

    /// Pid of the first process whose executable name is exactly `exe_name`.
    fn find_process(&self, exe_name: &str) -> Option<u32>;

    fn open_process(&self, pid: u32) -> Option<Self::Process>;

    fn top_level_windows(&self) -> Vec<TopLevelWindow>;

    fn subscribe(
        &self,
        scope: SubscriptionScope,
        sink: Weak<dyn NotificationSink>,
    ) -> Option<SubscriptionId>;

    fn unsubscribe(&self, id: SubscriptionId);
}
