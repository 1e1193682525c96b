//! Synthetic pointer device: a process-owned virtual touch digitizer.
//!
//! The device handle is created by [`TouchSink::initialize`] and destroyed
//! exactly once, by [`TouchSink::release`] or on `Drop`, whichever comes
//! first.

use windows::Win32::UI::Controls::{
    CreateSyntheticPointerDevice, DestroySyntheticPointerDevice, InjectSyntheticPointerInput,
    HSYNTHETICPOINTERDEVICE, POINTER_FEEDBACK_INDIRECT, POINTER_TYPE_INFO, POINTER_TYPE_INFO_0,
};
use windows::Win32::UI::WindowsAndMessaging::PT_TOUCH;

use super::convert::touch_info;
use crate::errors::{LastError, Step, TouchError};
use crate::point::{TouchPoint, WindowHandle};
use crate::sink::{Backend, TouchSink};

/// [`TouchSink`] over `CreateSyntheticPointerDevice` /
/// `InjectSyntheticPointerInput`.
#[derive(Default)]
pub struct SyntheticPointerSink {
    device: Option<HSYNTHETICPOINTERDEVICE>,
    frame: Vec<POINTER_TYPE_INFO>,
}

impl SyntheticPointerSink {
    pub fn new() -> Self {
        Self::default()
    }
}

fn typed_touch(point: &TouchPoint) -> POINTER_TYPE_INFO {
    POINTER_TYPE_INFO {
        r#type: PT_TOUCH,
        Anonymous: POINTER_TYPE_INFO_0 {
            touchInfo: touch_info(point),
        },
    }
}

impl TouchSink for SyntheticPointerSink {
    fn backend(&self) -> Backend {
        Backend::Synthetic
    }

    fn initialize(&mut self, max_contacts: u32) -> Result<(), TouchError> {
        let device =
            unsafe { CreateSyntheticPointerDevice(PT_TOUCH, max_contacts, POINTER_FEEDBACK_INDIRECT) }
                .map_err(|e| TouchError::from_win32(Step::Device, &e))?;
        log::debug!("synthetic pointer device created for {max_contacts} contact(s)");
        self.device = Some(device);
        self.frame.reserve(max_contacts as usize);
        Ok(())
    }

    fn foreground_window(&mut self) -> WindowHandle {
        super::foreground_with_log()
    }

    fn inject(&mut self, step: Step, points: &[TouchPoint]) -> Result<(), TouchError> {
        let Some(device) = self.device else {
            return Err(TouchError::InjectionFailure {
                step,
                code: LastError(None),
            });
        };
        self.frame.clear();
        self.frame.extend(points.iter().map(typed_touch));
        unsafe { InjectSyntheticPointerInput(device, &self.frame) }
            .map_err(|e| TouchError::from_win32(step, &e))
    }

    fn release(&mut self) {
        if let Some(device) = self.device.take() {
            unsafe { DestroySyntheticPointerDevice(device) };
            log::debug!("synthetic pointer device destroyed");
        }
    }
}

impl Drop for SyntheticPointerSink {
    fn drop(&mut self) {
        self.release();
    }
}
