// Full-screen popup window and message pump.

use anyhow::{bail, Context, Result};
use tracing::debug;
use windows::core::w;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, LoadCursorW,
    PeekMessageW, PostQuitMessage, RegisterClassExW, ShowWindow, TranslateMessage,
    UpdateWindow, CS_HREDRAW, CS_VREDRAW, IDC_ARROW, MSG, PM_REMOVE, SW_SHOW, WINDOW_EX_STYLE,
    WM_CLOSE, WM_DESTROY, WM_QUIT, WNDCLASSEXW, WS_POPUP,
};

use crate::layout::ScreenSize;

/// Borderless window covering the whole primary screen.
///
/// Destroyed on drop.
pub struct CalibrationWindow {
    hwnd: HWND,
    size: ScreenSize,
    destroyed: bool,
}

impl CalibrationWindow {
    /// Register the window class and show a `WS_POPUP` window of `size`
    /// at the screen origin.
    pub fn create(size: ScreenSize) -> Result<Self> {
        let instance: HINSTANCE = unsafe {
            GetModuleHandleW(None)
                .context("GetModuleHandleW failed")?
                .into()
        };

        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: instance,
            // SAFETY: IDC_ARROW is a predefined system cursor.
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: w!("HdrCalibClass"),
            ..Default::default()
        };

        // SAFETY: `class` is fully initialised and outlives the call.
        if unsafe { RegisterClassExW(&class) } == 0 {
            bail!("RegisterClassExW failed");
        }

        // SAFETY: class registered above; no creation parameter is passed.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                w!("HdrCalibClass"),
                w!("HDR Calibration"),
                WS_POPUP,
                0,
                0,
                size.width as i32,
                size.height as i32,
                None,
                None,
                Some(instance),
                None,
            )
        }
        .context("CreateWindowExW failed")?;

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
        }

        debug!(width = size.width, height = size.height, "window created");
        Ok(Self {
            hwnd,
            size,
            destroyed: false,
        })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    /// Dispatch every pending message.
    ///
    /// Returns `false` once `WM_QUIT` has been received.
    pub fn pump_messages(&mut self) -> bool {
        let mut msg = MSG::default();
        // SAFETY: standard message loop on the thread that owns the window.
        unsafe {
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    // the window is already gone after WM_DESTROY
                    self.destroyed = true;
                    return false;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        true
    }
}

impl Drop for CalibrationWindow {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        // SAFETY: hwnd was created by this struct on this thread.
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
