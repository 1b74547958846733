//! The overlay window itself: class registration, window procedure and the
//! message loop. Pointer and paint messages are handed to the [`Hole`]; the
//! optional [`UnderlayTracker`] keeps the window on top of its target.
//!
//! [`Hole`]: crate::hole::Hole
//! [`UnderlayTracker`]: crate::underlay::UnderlayTracker

use crate::settings::Settings;
use anyhow::Result;

pub const WINDOW_CLASS_NAME: &str = "BlockoutOverlay";
pub const WINDOW_TITLE: &str = "Blockout";

/// Pack an `[r, g, b]` triple into a GDI `COLORREF` value.
pub fn colorref(rgb: [u8; 3]) -> u32 {
    (rgb[0] as u32) | ((rgb[1] as u32) << 8) | ((rgb[2] as u32) << 16)
}

pub fn window_title(target: Option<&str>) -> String {
    match target {
        Some(name) => format!("{WINDOW_TITLE} - {name}"),
        None => WINDOW_TITLE.to_string(),
    }
}

/// Create the overlay and run its message loop until the window closes.
pub fn run(settings: &Settings) -> Result<()> {
    #[cfg(windows)]
    {
        platform::run(settings)
    }

    #[cfg(not(windows))]
    {
        let _ = settings;
        Err(anyhow::anyhow!("the overlay is only implemented for Windows"))
    }
}

#[cfg(windows)]
mod platform {
    use super::{colorref, window_title, WINDOW_CLASS_NAME};
    use crate::geometry::{client_to_window, Point};
    use crate::hole::Hole;
    use crate::platform::{Win32Desktop, WindowId};
    use crate::settings::Settings;
    use crate::underlay::UnderlayTracker;
    use anyhow::{anyhow, Result};
    use once_cell::sync::Lazy;
    use std::mem;
    use std::sync::{Arc, Mutex};
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::Graphics::Gdi::{
        BeginPaint, CreateSolidBrush, EndPaint, UpdateWindow, PAINTSTRUCT,
    };
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, LoadCursorW,
        PostQuitMessage, RegisterClassExW, SetLayeredWindowAttributes, SetWindowTextW,
        ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW,
        LWA_ALPHA, MSG, SW_MAXIMIZE, WM_DESTROY, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
        WM_PAINT, WNDCLASSEXW, WS_EX_LAYERED, WS_MAXIMIZE, WS_OVERLAPPEDWINDOW,
    };

    static HOLE: Lazy<Mutex<Hole>> = Lazy::new(|| Mutex::new(Hole::new()));

    fn widestring(value: &str) -> Vec<u16> {
        use std::os::windows::ffi::OsStrExt;
        std::ffi::OsStr::new(value)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    fn pointer_point(window: WindowId, lparam: LPARAM) -> Point {
        let x = (lparam.0 & 0xffff) as i16 as i32;
        let y = ((lparam.0 >> 16) & 0xffff) as i16 as i32;
        let offset = Win32Desktop.client_offset(window).unwrap_or_else(|| {
            tracing::debug!(?window, "client offset unavailable");
            Point::default()
        });
        client_to_window(Point::new(x, y), offset)
    }

    fn with_hole<F: FnOnce(&mut Hole)>(f: F) {
        if let Ok(mut hole) = HOLE.lock() {
            f(&mut hole);
        }
    }

    unsafe extern "system" fn overlay_wndproc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        let window = WindowId::from_hwnd(hwnd);
        match msg {
            WM_PAINT => {
                let mut ps = PAINTSTRUCT::default();
                let _hdc = unsafe { BeginPaint(hwnd, &mut ps) };
                // Copy out so no lock is held across region calls.
                let hole = HOLE.lock().map(|h| *h).unwrap_or_default();
                hole.render(&Win32Desktop, window);
                unsafe {
                    let _ = EndPaint(hwnd, &ps);
                }
                LRESULT(0)
            }
            WM_LBUTTONDOWN => {
                let _ = unsafe { SetCapture(hwnd) };
                let point = pointer_point(window, lparam);
                with_hole(|hole| hole.start(&Win32Desktop, window, point));
                LRESULT(0)
            }
            WM_MOUSEMOVE => {
                let point = pointer_point(window, lparam);
                with_hole(|hole| hole.drag(&Win32Desktop, window, point));
                LRESULT(0)
            }
            WM_LBUTTONUP => {
                let _ = unsafe { ReleaseCapture() };
                let point = pointer_point(window, lparam);
                with_hole(|hole| hole.end(&Win32Desktop, window, point));
                LRESULT(0)
            }
            WM_DESTROY => {
                unsafe { PostQuitMessage(0) };
                LRESULT(0)
            }
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    fn create_window(settings: &Settings) -> Result<HWND> {
        let class_name = widestring(WINDOW_CLASS_NAME);
        let title = widestring(&window_title(None));
        let hinstance: HINSTANCE = unsafe { GetModuleHandleW(PCWSTR::null()) }?.into();

        let wc = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(overlay_wndproc),
            hInstance: hinstance,
            hCursor: unsafe { LoadCursorW(HINSTANCE::default(), IDC_ARROW) }.unwrap_or_default(),
            hbrBackground: unsafe { CreateSolidBrush(COLORREF(colorref(settings.overlay_color))) },
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };
        if unsafe { RegisterClassExW(&wc) } == 0 {
            return Err(anyhow!(
                "failed to register overlay window class: {}",
                windows::core::Error::from_win32()
            ));
        }

        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_LAYERED,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                WS_OVERLAPPEDWINDOW | WS_MAXIMIZE,
                CW_USEDEFAULT,
                0,
                CW_USEDEFAULT,
                0,
                HWND::default(),
                HMENU::default(),
                hinstance,
                None,
            )
        }
        .map_err(|err| anyhow!("failed to create overlay window: {err}"))?;

        unsafe { SetLayeredWindowAttributes(hwnd, COLORREF(0), settings.overlay_alpha(), LWA_ALPHA) }
            .map_err(|err| anyhow!("failed to set overlay opacity: {err}"))?;

        unsafe {
            let _ = ShowWindow(hwnd, SW_MAXIMIZE);
            let _ = UpdateWindow(hwnd);
        }
        Ok(hwnd)
    }

    fn pump_messages() {
        let mut msg = MSG::default();
        loop {
            let r = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
            if r.0 <= 0 {
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    pub(super) fn run(settings: &Settings) -> Result<()> {
        let hwnd = create_window(settings)?;
        let overlay = WindowId::from_hwnd(hwnd);
        tracing::info!(?overlay, alpha = settings.overlay_alpha(), "overlay window created");

        let mut tracker = UnderlayTracker::new(Arc::new(Win32Desktop), overlay);
        if let Some(target) = settings.target() {
            match tracker.start_monitor(target) {
                Ok(()) => {
                    let title = widestring(&window_title(Some(tracker.current_process_name())));
                    unsafe {
                        let _ = SetWindowTextW(hwnd, PCWSTR(title.as_ptr()));
                    }
                }
                Err(err) => {
                    tracing::warn!(process = target, %err, "underlay tracking unavailable");
                }
            }
        }

        pump_messages();
        tracker.stop_monitor();
        tracing::info!("overlay closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{colorref, window_title};

    #[test]
    fn colorref_packs_red_in_the_low_byte() {
        assert_eq!(colorref([0, 0, 0]), 0);
        assert_eq!(colorref([0xff, 0x00, 0xff]), 0x00ff00ff);
        assert_eq!(colorref([0x12, 0x34, 0x56]), 0x00563412);
    }

    #[test]
    fn title_names_the_tracked_process() {
        assert_eq!(window_title(None), "Blockout");
        assert_eq!(window_title(Some("notepad.exe")), "Blockout - notepad.exe");
    }
}
