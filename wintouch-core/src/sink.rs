//! The injection boundary.
//!
//! [`TouchSink`] is the one capability the sequencer needs from the OS:
//! register as an injector, name the foreground window, and accept the
//! current state of the touch points.  The Win32 implementations live in
//! `crate::backend`; [`RecordingSink`] keeps everything in memory for tests
//! and dry runs.  Real-time pacing sits behind [`Pacer`] for the same reason.

use std::time::Duration;

use serde::Serialize;

use crate::errors::{LastError, Step, TouchError};
use crate::point::{ContactMask, PointDefaults, TouchPoint, WindowHandle};

/// Pause between the end of the animation and the release on the
/// synthetic-device path.
pub const SYNTHETIC_HOLD: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which OS injection path a sink drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// `InitializeTouchInjection` + `InjectTouchInput`.
    Legacy,
    /// `CreateSyntheticPointerDevice` + `InjectSyntheticPointerInput`.
    Synthetic,
}

impl Backend {
    /// Pressure, orientation and mask a freshly built point starts with.
    pub fn point_defaults(self) -> PointDefaults {
        match self {
            Backend::Legacy => PointDefaults {
                pressure: 512,
                orientation: 90,
                mask: ContactMask {
                    contact_area: true,
                    orientation: true,
                    pressure: true,
                },
            },
            Backend::Synthetic => PointDefaults {
                pressure: 1024,
                orientation: 90,
                mask: ContactMask {
                    contact_area: true,
                    orientation: false,
                    pressure: true,
                },
            },
        }
    }

    /// Pause inserted before the release step, if any.
    pub fn hold_before_release(self) -> Option<Duration> {
        match self {
            Backend::Legacy => None,
            Backend::Synthetic => Some(SYNTHETIC_HOLD),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Legacy => "legacy touch injection",
            Backend::Synthetic => "synthetic pointer device",
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A sink that accepts touch point states and reports success or failure.
pub trait TouchSink {
    fn backend(&self) -> Backend;

    /// Register the process as an injector for up to `max_contacts` points.
    fn initialize(&mut self, max_contacts: u32) -> Result<(), TouchError>;

    /// Window currently in the foreground, [`WindowHandle::NULL`] if none.
    fn foreground_window(&mut self) -> WindowHandle;

    /// Inject the current state of `points`.  `step` tags any failure.
    fn inject(&mut self, step: Step, points: &[TouchPoint]) -> Result<(), TouchError>;

    /// Free OS resources acquired by [`TouchSink::initialize`].
    fn release(&mut self) {}
}

impl<T: TouchSink + ?Sized> TouchSink for Box<T> {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    fn initialize(&mut self, max_contacts: u32) -> Result<(), TouchError> {
        (**self).initialize(max_contacts)
    }

    fn foreground_window(&mut self) -> WindowHandle {
        (**self).foreground_window()
    }

    fn inject(&mut self, step: Step, points: &[TouchPoint]) -> Result<(), TouchError> {
        (**self).inject(step, points)
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Blocking real-time delay between gesture steps.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// [`Pacer`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [`Pacer`] that only records the requested pauses.
#[derive(Debug, Default, Clone)]
pub struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

impl RecordingPacer {
    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Recording sink
// ---------------------------------------------------------------------------

/// One call to [`TouchSink::inject`] as seen by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Injection {
    pub step: Step,
    pub points: Vec<TouchPoint>,
}

/// In-memory [`TouchSink`]: records every injection attempt.
///
/// Can be told to fail initialization or the N-th injection (1-based) to
/// exercise the abort path.  The failing attempt is still recorded.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    backend: Backend,
    foreground: WindowHandle,
    fail_initialize: Option<u32>,
    fail_on: Option<(usize, u32)>,
    shift_foreground: bool,
    pub foreground_queries: usize,
    pub initialized: bool,
    pub released: usize,
    pub injections: Vec<Injection>,
}

impl RecordingSink {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            foreground: WindowHandle(0x0001_0000),
            fail_initialize: None,
            fail_on: None,
            shift_foreground: false,
            foreground_queries: 0,
            initialized: false,
            released: 0,
            injections: Vec::new(),
        }
    }

    /// Report `handle` as the foreground window.
    pub fn with_foreground(mut self, handle: WindowHandle) -> Self {
        self.foreground = handle;
        self
    }

    /// Report a different handle on every query: the first is the
    /// configured foreground, each later one is one higher.
    pub fn with_shifting_foreground(mut self) -> Self {
        self.shift_foreground = true;
        self
    }

    /// Fail initialization with last-error `code`.
    pub fn failing_initialize(mut self, code: u32) -> Self {
        self.fail_initialize = Some(code);
        self
    }

    /// Fail the `call`-th injection (1-based) with last-error `code`.
    pub fn failing_on(mut self, call: usize, code: u32) -> Self {
        self.fail_on = Some((call, code));
        self
    }

    pub fn calls(&self) -> usize {
        self.injections.len()
    }

    /// State of the first point after the last recorded injection.
    pub fn last_point(&self) -> Option<&TouchPoint> {
        self.injections.last().and_then(|i| i.points.first())
    }
}

impl TouchSink for RecordingSink {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn initialize(&mut self, max_contacts: u32) -> Result<(), TouchError> {
        if let Some(code) = self.fail_initialize {
            let step = match self.backend {
                Backend::Legacy => Step::Initialize,
                Backend::Synthetic => Step::Device,
            };
            return Err(TouchError::InjectionFailure {
                step,
                code: LastError(Some(code)),
            });
        }
        log::debug!("recording sink: initialized for {max_contacts} contact(s)");
        self.initialized = true;
        Ok(())
    }

    fn foreground_window(&mut self) -> WindowHandle {
        let handle = self.foreground;
        self.foreground_queries += 1;
        if self.shift_foreground {
            self.foreground = WindowHandle(handle.0 + 1);
        }
        handle
    }

    fn inject(&mut self, step: Step, points: &[TouchPoint]) -> Result<(), TouchError> {
        self.injections.push(Injection {
            step,
            points: points.to_vec(),
        });
        match self.fail_on {
            Some((call, code)) if call == self.injections.len() => {
                Err(TouchError::injection(step, code))
            }
            _ => Ok(()),
        }
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
