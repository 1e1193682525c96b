//! Legacy touch injection: a flat `POINTER_TOUCH_INFO` array per frame.

use windows::Win32::UI::Input::Pointer::{
    InitializeTouchInjection, InjectTouchInput, POINTER_TOUCH_INFO, TOUCH_FEEDBACK_NONE,
};

use super::convert::touch_info;
use crate::errors::{Step, TouchError};
use crate::point::{TouchPoint, WindowHandle};
use crate::sink::{Backend, TouchSink};

/// [`TouchSink`] over `InitializeTouchInjection` / `InjectTouchInput`.
#[derive(Default)]
pub struct LegacyTouchSink {
    frame: Vec<POINTER_TOUCH_INFO>,
}

impl LegacyTouchSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TouchSink for LegacyTouchSink {
    fn backend(&self) -> Backend {
        Backend::Legacy
    }

    fn initialize(&mut self, max_contacts: u32) -> Result<(), TouchError> {
        unsafe { InitializeTouchInjection(max_contacts, TOUCH_FEEDBACK_NONE) }
            .map_err(|e| TouchError::from_win32(Step::Initialize, &e))?;
        self.frame.reserve(max_contacts as usize);
        Ok(())
    }

    fn foreground_window(&mut self) -> WindowHandle {
        super::foreground_with_log()
    }

    fn inject(&mut self, step: Step, points: &[TouchPoint]) -> Result<(), TouchError> {
        self.frame.clear();
        self.frame.extend(points.iter().map(touch_info));
        unsafe { InjectTouchInput(&self.frame) }.map_err(|e| TouchError::from_win32(step, &e))
    }
}
