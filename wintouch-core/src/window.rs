//! Foreground window lookup via Win32.
//!
//! The gesture target is captured once, before injection starts.  Handles
//! leave this module as [`WindowHandle`], never as raw `HWND`s.

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use crate::point::WindowHandle;

pub(crate) fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut core::ffi::c_void)
}

/// Get the foreground (active) window handle.
///
/// Returns [`WindowHandle::NULL`] if no window is in the foreground.
pub fn foreground_window() -> WindowHandle {
    let hwnd = unsafe { GetForegroundWindow() };
    WindowHandle(hwnd.0 as isize)
}
