//! `wintouch_core` -- scripted single-finger touch injection for Windows.
//!
//! Plays one fixed gesture (press, slide up, lift) into the foreground
//! window.  The script and flag model are platform neutral; only the
//! backends touch Win32.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `TouchError` enum via `thiserror` |
//! | [`flags`] | `PointerFlags` typed set with OR / AND-NOT updates |
//! | [`point`] | `TouchPoint` model: position, contact rect, flags, target |
//! | [`sink`] | `TouchSink` / `Pacer` seams, `RecordingSink` for tests and dry runs |
//! | [`sequencer`] | `TouchSequencer`: the down / move / up script |
//! | `backend` | `InjectTouchInput` and synthetic pointer device sinks (Windows only) |
//! | `window` | Foreground window lookup (Windows only) |

pub mod errors;
pub mod flags;
pub mod point;
pub mod sequencer;
pub mod sink;

#[cfg(windows)]
pub mod backend;
#[cfg(windows)]
pub mod window;
