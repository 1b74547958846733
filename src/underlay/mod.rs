//! Keeps the overlay stacked on top of another application's window.
//!
//! [`UnderlayTracker::start_monitor`] resolves the target process to its
//! largest visible window, snaps the overlay onto it and then follows OS
//! change notifications for as long as the session is active.

pub mod resolve;
pub mod subscriptions;

use crate::geometry::overlay_placement;
use crate::platform::{
    EventKind, NotificationSink, SubscriptionScope, WinEvent, WindowId, WindowSystem, ZOrder,
};
use resolve::{resolve_target, TargetDescriptor};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use subscriptions::SubscriptionSet;

pub use resolve::select_largest_window;

/// Generation value meaning "no active session".
const NO_SESSION: u64 = 0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("no running process named {0:?}")]
    ProcessNotFound(String),
    #[error("unable to open process {0}")]
    ProcessOpenDenied(u32),
    #[error("process {0} has no visible window")]
    NoWindow(u32),
    #[error("failed to subscribe to {0:?} notifications")]
    SubscriptionFailed(SubscriptionScope),
}

impl TrackerError {
    pub fn is_resolution_failure(&self) -> bool {
        !matches!(self, Self::SubscriptionFailed(_))
    }
}

/// Z-order for the overlay after `trigger` changed.
///
/// The overlay only floats to the top when the underlay or the overlay
/// itself is what the user is interacting with; otherwise it slides in
/// directly behind the window that just came forward.
pub fn z_order_for(trigger: WindowId, underlay: WindowId, overlay: WindowId) -> ZOrder {
    if trigger == underlay || trigger == overlay {
        ZOrder::Topmost
    } else {
        ZOrder::After(trigger)
    }
}

/// State shared with notification callbacks for one connect/disconnect cycle.
struct Session<P: WindowSystem> {
    platform: Arc<P>,
    overlay: WindowId,
    target: TargetDescriptor<P>,
    generation: u64,
    active_generation: Arc<AtomicU64>,
}

impl<P: WindowSystem> Session<P> {
    fn is_current(&self) -> bool {
        self.active_generation.load(Ordering::Acquire) == self.generation
    }

    fn reposition(&self, trigger: WindowId) {
        let underlay = self.target.window;
        if !self.platform.is_window(underlay) {
            tracing::debug!(?underlay, "underlay window is gone");
            return;
        }
        let Some(rect) = self.platform.window_rect(underlay) else {
            tracing::debug!(?underlay, "underlay rect unavailable");
            return;
        };
        let placement = overlay_placement(rect, self.platform.title_bar_height());
        let z_order = z_order_for(trigger, underlay, self.overlay);
        if !self.platform.place_window(self.overlay, placement, z_order) {
            tracing::debug!(?placement, ?z_order, "overlay placement rejected");
        }
    }
}

impl<P: WindowSystem> NotificationSink for Session<P> {
    fn notify(&self, event: WinEvent) {
        if !self.is_current() {
            tracing::trace!(generation = self.generation, "stale notification dropped");
            return;
        }
        let Some(trigger) = event.window else {
            return;
        };
        if event.kind == EventKind::LocationChange
            && (trigger != self.target.window || !event.whole_window)
        {
            return;
        }
        self.reposition(trigger);
    }
}

struct ActiveMonitor<P: WindowSystem> {
    // Declared first so hooks are removed before the session is released.
    subscriptions: SubscriptionSet<P>,
    session: Arc<Session<P>>,
}

pub struct UnderlayTracker<P: WindowSystem> {
    platform: Arc<P>,
    overlay: WindowId,
    current_process_name: String,
    active_generation: Arc<AtomicU64>,
    last_generation: u64,
    monitor: Option<ActiveMonitor<P>>,
}

impl<P: WindowSystem> UnderlayTracker<P> {
    pub fn new(platform: Arc<P>, overlay: WindowId) -> Self {
        Self {
            platform,
            overlay,
            current_process_name: String::new(),
            active_generation: Arc::new(AtomicU64::new(NO_SESSION)),
            last_generation: NO_SESSION,
            monitor: None,
        }
    }

    /// Track the largest window of `process_name`. Any active session is
    /// torn down first, even if the new one fails to start.
    pub fn start_monitor(&mut self, process_name: &str) -> Result<(), TrackerError> {
        self.stop_monitor();

        let target = resolve_target(self.platform.as_ref(), process_name)?;
        tracing::info!(process_name, pid = target.pid, window = ?target.window, area = target.window_area, "underlay resolved");

        self.last_generation += 1;
        let scopes = [
            SubscriptionScope::Location { pid: target.pid },
            SubscriptionScope::Foreground,
        ];
        let session = Arc::new(Session {
            platform: self.platform.clone(),
            overlay: self.overlay,
            target,
            generation: self.last_generation,
            active_generation: self.active_generation.clone(),
        });

        session.reposition(session.target.window);

        let sink: Arc<dyn NotificationSink> = session.clone();
        let subscriptions =
            SubscriptionSet::install(self.platform.clone(), &scopes, Arc::downgrade(&sink))?;

        self.active_generation
            .store(session.generation, Ordering::Release);
        self.monitor = Some(ActiveMonitor {
            subscriptions,
            session,
        });
        self.current_process_name = process_name.to_string();
        Ok(())
    }

    /// Drop every subscription and the process handle. Safe to call when
    /// nothing is being monitored.
    pub fn stop_monitor(&mut self) {
        self.active_generation.store(NO_SESSION, Ordering::Release);
        if let Some(monitor) = self.monitor.take() {
            tracing::info!(
                pid = monitor.session.target.pid,
                subscriptions = monitor.subscriptions.len(),
                "underlay monitor stopped"
            );
        }
    }

    pub fn current_process_name(&self) -> &str {
        &self.current_process_name
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_some()
    }

    pub fn underlay_window(&self) -> Option<WindowId> {
        self.monitor.as_ref().map(|m| m.session.target.window)
    }

    pub fn target_pid(&self) -> Option<u32> {
        self.monitor.as_ref().map(|m| m.session.target.pid)
    }

    pub fn subscription_count(&self) -> usize {
        self.monitor
            .as_ref()
            .map(|m| m.subscriptions.len())
            .unwrap_or(0)
    }
}

impl<P: WindowSystem> Drop for UnderlayTracker<P> {
    fn drop(&mut self) {
        self.stop_monitor();
    }
}
