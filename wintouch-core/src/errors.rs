//! Error types for `wintouch_core`.
//!
//! Every OS call in the scripted gesture funnels its failure into
//! [`TouchError::InjectionFailure`], tagged with the [`Step`] that was
//! running and the platform's last-error code.  There is no recoverable
//! variant: callers abort on the first error.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The operation that was in flight when an OS call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Registering the process as a touch injector.
    Initialize,
    /// Creating or feeding the synthetic pointer device.
    Device,
    /// First injection of the freshly built point.
    Initial,
    Down,
    Origin,
    Move,
    Up,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Initialize => "initialize",
            Step::Device => "synthetic device",
            Step::Initial => "initial",
            Step::Down => "down",
            Step::Origin => "set origin",
            Step::Move => "move",
            Step::Up => "up",
        };
        f.write_str(name)
    }
}

/// Platform last-error code attached to a failure, if one was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastError(pub Option<u32>);

impl LastError {
    /// Extract the Win32 error code from an `HRESULT`.
    ///
    /// `windows-rs` wraps `GetLastError()` as `HRESULT_FROM_WIN32`, i.e.
    /// `0x8007xxxx`.  Any other failing `HRESULT` is surfaced verbatim; a
    /// success code means the OS reported failure without setting an error.
    pub fn from_hresult(hresult: u32) -> Self {
        if hresult & 0xFFFF_0000 == 0x8007_0000 {
            LastError(Some(hresult & 0xFFFF))
        } else if hresult & 0x8000_0000 != 0 {
            LastError(Some(hresult))
        } else {
            LastError(None)
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("unknown"),
        }
    }
}

/// Top-level error type for the `wintouch_core` library.
#[derive(Debug, Error)]
pub enum TouchError {
    /// An OS touch or pointer call reported failure.
    #[error("{step} step failed: last error {code}")]
    InjectionFailure { step: Step, code: LastError },

    /// No injection backend exists for this platform.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl TouchError {
    /// Shorthand for an [`TouchError::InjectionFailure`] with a known code.
    pub fn injection(step: Step, code: u32) -> Self {
        TouchError::InjectionFailure {
            step,
            code: LastError(Some(code)),
        }
    }

    /// Convert a `windows::core::Error` raised during `step`.
    #[cfg(windows)]
    pub fn from_win32(step: Step, err: &windows::core::Error) -> Self {
        TouchError::InjectionFailure {
            step,
            code: LastError::from_hresult(err.code().0 as u32),
        }
    }

    /// The step that failed, if this is an injection failure.
    pub fn step(&self) -> Option<Step> {
        match self {
            TouchError::InjectionFailure { step, .. } => Some(*step),
            TouchError::Unsupported(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
