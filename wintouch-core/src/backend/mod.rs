//! Win32 injection backends.
//!
//! Both drive the same script; they differ only in the records they build
//! and the OS calls they make.
//!
//! | Sink | Initialize | Inject |
//! |------|------------|--------|
//! | [`LegacyTouchSink`] | `InitializeTouchInjection` | `InjectTouchInput` |
//! | [`SyntheticPointerSink`] | `CreateSyntheticPointerDevice` | `InjectSyntheticPointerInput` |

mod convert;
pub mod legacy;
pub mod synthetic;

pub use legacy::LegacyTouchSink;
pub use synthetic::SyntheticPointerSink;

use crate::point::WindowHandle;
use crate::sink::{Backend, TouchSink};
use crate::window;

/// Box the sink for `backend`.
pub fn open(backend: Backend) -> Box<dyn TouchSink> {
    match backend {
        Backend::Legacy => Box::new(LegacyTouchSink::new()),
        Backend::Synthetic => Box::new(SyntheticPointerSink::new()),
    }
}

fn foreground_with_log() -> WindowHandle {
    let handle = window::foreground_window();
    log::debug!("GetForegroundWindow -> 0x{:X}", handle.0);
    handle
}
