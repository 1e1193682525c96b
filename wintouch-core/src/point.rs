//! The simulated finger.
//!
//! A [`TouchPoint`] is built once and then mutated in place for the whole
//! gesture.  It is platform neutral: the Windows backends convert it into
//! `POINTER_TOUCH_INFO` / `POINTER_TYPE_INFO` right before each injection.

use serde::Serialize;

use crate::flags::{PointerFlag, PointerFlags};

/// Side length of the contact rectangle in pixels.
pub const CONTACT_SIZE: i32 = 2;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Pixel location on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Contact area in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContactRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ContactRect {
    /// A [`CONTACT_SIZE`] square centered on `pos`.
    pub fn centered_on(pos: Position) -> Self {
        let half = CONTACT_SIZE / 2;
        Self {
            left: pos.x - half,
            top: pos.y - half,
            right: pos.x + half,
            bottom: pos.y + half,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Which optional touch fields the injected record reports as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContactMask {
    pub contact_area: bool,
    pub orientation: bool,
    pub pressure: bool,
}

/// Opaque handle of the window that receives the events.
///
/// Stored as `isize` so the model stays free of `windows` types.  `0` means
/// no window (nothing in the foreground, or not yet bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Backend-specific defaults applied when a point is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointDefaults {
    pub pressure: u32,
    pub orientation: u32,
    pub mask: ContactMask,
}

/// One simulated finger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouchPoint {
    pub pointer_id: u32,
    pub position: Position,
    pub contact: ContactRect,
    pub pressure: u32,
    pub orientation: u32,
    pub mask: ContactMask,
    pub flags: PointerFlags,
    pub target: WindowHandle,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl TouchPoint {
    /// Build a pressed finger at `pos` with flags `in-range|in-contact|down`.
    pub fn new(pointer_id: u32, pos: Position, defaults: PointDefaults) -> Self {
        Self {
            pointer_id,
            position: pos,
            contact: ContactRect::centered_on(pos),
            pressure: defaults.pressure,
            orientation: defaults.orientation,
            mask: defaults.mask,
            flags: PointerFlags::PRESSED,
            target: WindowHandle::NULL,
        }
    }

    /// Move the finger and its contact area to `(x, y)`.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
        self.contact = ContactRect::centered_on(self.position);
    }

    pub fn set_flags(&mut self, flags: impl Into<PointerFlags>) {
        self.flags.set(flags);
    }

    pub fn unset_flags(&mut self, flags: impl Into<PointerFlags>) {
        self.flags.unset(flags);
    }

    /// `down` and `up` are never both set in an emitted state.
    pub fn is_consistent(&self) -> bool {
        !(self.flags.contains(PointerFlag::Down) && self.flags.contains(PointerFlag::Up))
    }
}

/// Build `count` points at the same position with ids `0..count`.
pub fn build_points(count: u32, pos: Position, defaults: PointDefaults) -> Vec<TouchPoint> {
    (0..count).map(|id| TouchPoint::new(id, pos, defaults)).collect()
}

/// Store `target` on every point.
pub fn set_target(points: &mut [TouchPoint], target: WindowHandle) {
    for point in points.iter_mut() {
        point.target = target;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
