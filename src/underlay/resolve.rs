use super::TrackerError;
use crate::platform::{TopLevelWindow, WindowId, WindowSystem};

/// The resolved underlay.
pub struct TargetDescriptor<P: WindowSystem> {
    pub pid: u32,
    /// Owned; closed when the descriptor drops.
    pub process: P::Process,
    /// Not owned. Never closed or destroyed by us.
    pub window: WindowId,
    pub window_area: i64,
}

impl<P: WindowSystem> std::fmt::Debug for TargetDescriptor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("pid", &self.pid)
            .field("window", &self.window)
            .field("window_area", &self.window_area)
            .finish_non_exhaustive()
    }
}

/// Largest visible window of `pid`. Ties keep the earliest window, and empty
/// windows are never picked.
pub fn select_largest_window<I>(windows: I, pid: u32) -> Option<(WindowId, i64)>
where
    I: IntoIterator<Item = TopLevelWindow>,
{
    let mut best: Option<(WindowId, i64)> = None;
    for window in windows {
        if window.pid != pid || !window.visible || window.id.is_null() {
            continue;
        }
        let area = window.rect.area();
        let current = best.map(|(_, a)| a).unwrap_or(0);
        if area > current {
            best = Some((window.id, area));
        }
    }
    best
}

pub fn resolve_target<P: WindowSystem>(
    platform: &P,
    process_name: &str,
) -> Result<TargetDescriptor<P>, TrackerError> {
    let pid = platform
        .find_process(process_name)
        .ok_or_else(|| TrackerError::ProcessNotFound(process_name.to_string()))?;
    let process = platform
        .open_process(pid)
        .ok_or(TrackerError::ProcessOpenDenied(pid))?;

    // `process` drops on this path, releasing the handle.
    let (window, window_area) = select_largest_window(platform.top_level_windows(), pid)
        .ok_or(TrackerError::NoWindow(pid))?;

    Ok(TargetDescriptor {
        pid,
        process,
        window,
        window_area,
    })
}

#[cfg(test)]
mod tests {
    use super::select_largest_window;
    use crate::geometry::Rect;
    use crate::platform::{TopLevelWindow, WindowId};

    fn window(id: isize, pid: u32, width: i32, height: i32) -> TopLevelWindow {
        TopLevelWindow {
            id: WindowId(id),
            pid,
            rect: Rect::new(0, 0, width, height),
            visible: true,
        }
    }

    #[test]
    fn picks_the_largest_of_three() {
        let windows = [window(1, 9, 10, 10), window(2, 9, 20, 20), window(3, 9, 25, 10)];
        assert_eq!(select_largest_window(windows, 9), Some((WindowId(2), 400)));
    }

    #[test]
    fn equal_area_keeps_the_first() {
        let windows = [window(1, 9, 10, 20), window(2, 9, 20, 10)];
        assert_eq!(select_largest_window(windows, 9), Some((WindowId(1), 200)));
    }

    #[test]
    fn skips_other_processes_hidden_and_empty_windows() {
        let mut hidden = window(2, 9, 100, 100);
        hidden.visible = false;
        let windows = [window(1, 4, 500, 500), hidden, window(3, 9, 0, 80)];
        assert_eq!(select_largest_window(windows, 9), None);
    }

    #[test]
    fn no_windows_resolves_nothing() {
        assert_eq!(select_largest_window(Vec::new(), 9), None);
    }
}
