use super::registry::HookRegistry;
use super::{
    EventKind, HoleRegion, NotificationSink, Surface, SubscriptionId, SubscriptionScope,
    TopLevelWindow, WinEvent, WindowId, WindowSystem, ZOrder,
};
use crate::geometry::{client_offset, Placement, Point, Rect};
use once_cell::sync::Lazy;
use std::sync::Weak;
use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, HMODULE, HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    ClientToScreen, CombineRgn, CreateRectRgn, DeleteObject, InvalidateRect, SetWindowRgn,
    RGN_DIFF,
};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetSystemMetrics, GetWindowRect, GetWindowThreadProcessId,
    IsWindow, IsWindowVisible, SetWindowPos, EVENT_OBJECT_LOCATIONCHANGE, EVENT_SYSTEM_FOREGROUND,
    HWND_TOPMOST, OBJID_WINDOW, SM_CYCAPTION, SWP_NOACTIVATE, WINEVENT_OUTOFCONTEXT,
};

const CHILDID_SELF: i32 = 0;

static HOOKS: Lazy<HookRegistry> = Lazy::new(HookRegistry::default);

impl WindowId {
    pub fn from_hwnd(hwnd: HWND) -> Self {
        Self(hwnd.0 as isize)
    }

    pub fn hwnd(self) -> HWND {
        HWND(self.0 as *mut core::ffi::c_void)
    }
}

impl From<RECT> for Rect {
    fn from(rc: RECT) -> Self {
        Rect::new(rc.left, rc.top, rc.right, rc.bottom)
    }
}

/// Open process handle, closed on drop.
#[derive(Debug)]
pub struct OwnedProcess {
    pid: u32,
    handle: isize,
}

impl OwnedProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for OwnedProcess {
    fn drop(&mut self) {
        if self.handle != 0 {
            unsafe {
                let _ = CloseHandle(HANDLE(self.handle as *mut core::ffi::c_void));
            }
            self.handle = 0;
        }
    }
}

/// The live Win32 desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Desktop;

impl Win32Desktop {
    /// Where client (0, 0) of `window` sits inside its window rectangle.
    pub fn client_offset(&self, window: WindowId) -> Option<Point> {
        let window_rect = self.window_rect(window)?;
        let mut origin = POINT::default();
        if !unsafe { ClientToScreen(window.hwnd(), &mut origin) }.as_bool() {
            return None;
        }
        Some(client_offset(window_rect, Point::new(origin.x, origin.y)))
    }
}

impl Surface for Win32Desktop {
    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        if window.is_null() {
            return None;
        }
        let mut rc = RECT::default();
        unsafe { GetWindowRect(window.hwnd(), &mut rc) }.ok()?;
        Some(rc.into())
    }

    fn invalidate(&self, window: WindowId) {
        unsafe {
            let _ = InvalidateRect(window.hwnd(), None, true);
        }
    }

    fn set_window_region(&self, window: WindowId, region: &HoleRegion) -> bool {
        unsafe {
            let frame = CreateRectRgn(0, 0, region.width, region.height);
            if frame.is_invalid() {
                return false;
            }
            let h = region.hole;
            let hole = CreateRectRgn(h.left, h.top, h.right, h.bottom);
            if hole.is_invalid() {
                let _ = DeleteObject(frame);
                return false;
            }
            let _ = CombineRgn(frame, frame, hole, RGN_DIFF);
            let _ = DeleteObject(hole);

            // On success the system owns `frame`. No redraw: this runs inside
            // the paint cycle that BeginPaint already started.
            if SetWindowRgn(window.hwnd(), frame, false) == 0 {
                let _ = DeleteObject(frame);
                return false;
            }
        }
        true
    }
}

impl WindowSystem for Win32Desktop {
    type Process = OwnedProcess;

    fn is_window(&self, window: WindowId) -> bool {
        !window.is_null() && unsafe { IsWindow(window.hwnd()) }.as_bool()
    }

    fn title_bar_height(&self) -> i32 {
        unsafe { GetSystemMetrics(SM_CYCAPTION) }
    }

    fn place_window(&self, window: WindowId, placement: Placement, z_order: ZOrder) -> bool {
        let insert_after = match z_order {
            ZOrder::Topmost => HWND_TOPMOST,
            ZOrder::After(other) => other.hwnd(),
        };
        unsafe {
            SetWindowPos(
                window.hwnd(),
                insert_after,
                placement.x,
                placement.y,
                placement.width,
                placement.height,
                SWP_NOACTIVATE,
            )
        }
        .is_ok()
    }

    fn find_process(&self, exe_name: &str) -> Option<u32> {
        crate::process::find_process_id(exe_name)
    }

    fn open_process(&self, pid: u32) -> Option<Self::Process> {
        match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
            Ok(handle) if !handle.is_invalid() => Some(OwnedProcess {
                pid,
                handle: handle.0 as isize,
            }),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(pid, ?err, "OpenProcess failed");
                None
            }
        }
    }

    fn top_level_windows(&self) -> Vec<TopLevelWindow> {
        unsafe extern "system" fn collect(hwnd: HWND, lparam: LPARAM) -> BOOL {
            let windows = unsafe { &mut *(lparam.0 as *mut Vec<TopLevelWindow>) };
            let mut pid = 0u32;
            let mut rc = RECT::default();
            unsafe {
                let _ = GetWindowThreadProcessId(hwnd, Some(&mut pid));
                if GetWindowRect(hwnd, &mut rc).is_err() {
                    rc = RECT::default();
                }
            }
            windows.push(TopLevelWindow {
                id: WindowId::from_hwnd(hwnd),
                pid,
                rect: rc.into(),
                visible: unsafe { IsWindowVisible(hwnd) }.as_bool(),
            });
            BOOL(1)
        }

        let mut windows = Vec::new();
        unsafe {
            let _ = EnumWindows(
                Some(collect),
                LPARAM(&mut windows as *mut Vec<TopLevelWindow> as isize),
            );
        }
        windows
    }

    fn subscribe(
        &self,
        scope: SubscriptionScope,
        sink: Weak<dyn NotificationSink>,
    ) -> Option<SubscriptionId> {
        let (event, pid) = match scope {
            SubscriptionScope::Location { pid } => (EVENT_OBJECT_LOCATIONCHANGE, pid),
            SubscriptionScope::Foreground => (EVENT_SYSTEM_FOREGROUND, 0),
        };
        let hook = unsafe {
            SetWinEventHook(
                event,
                event,
                HMODULE::default(),
                Some(win_event_proc),
                pid,
                0,
                WINEVENT_OUTOFCONTEXT,
            )
        };
        if hook.0.is_null() {
            return None;
        }
        let id = SubscriptionId(hook.0 as isize);
        HOOKS.insert(id, sink);
        tracing::debug!(?scope, hook = id.0, "win event hook installed");
        Some(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        HOOKS.remove(id);
        unsafe {
            let _ = UnhookWinEvent(HWINEVENTHOOK(id.0 as *mut core::ffi::c_void));
        }
        tracing::debug!(hook = id.0, "win event hook removed");
    }
}

unsafe extern "system" fn win_event_proc(
    hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    let kind = match event {
        EVENT_OBJECT_LOCATIONCHANGE => EventKind::LocationChange,
        EVENT_SYSTEM_FOREGROUND => EventKind::Foreground,
        _ => return,
    };
    // Unhooked already, or the owning session is gone.
    let Some(sink) = HOOKS.lookup(SubscriptionId(hook.0 as isize)) else {
        return;
    };
    let window = WindowId::from_hwnd(hwnd);
    sink.notify(WinEvent {
        kind,
        window: (!window.is_null()).then_some(window),
        whole_window: id_object == OBJID_WINDOW.0 && id_child == CHILDID_SELF,
    });
}
