//! Marshal [`TouchPoint`]s into Win32 pointer records.

use windows::Win32::Foundation::{HANDLE, POINT, RECT};
use windows::Win32::UI::Input::Pointer::{
    POINTER_CHANGE_NONE, POINTER_FLAGS, POINTER_FLAG_DOWN, POINTER_FLAG_INCONTACT,
    POINTER_FLAG_INRANGE, POINTER_FLAG_NONE, POINTER_FLAG_UP, POINTER_FLAG_UPDATE, POINTER_INFO,
    POINTER_TOUCH_INFO, TOUCH_FLAG_NONE, TOUCH_MASK_CONTACTAREA, TOUCH_MASK_NONE,
    TOUCH_MASK_ORIENTATION, TOUCH_MASK_PRESSURE,
};
use windows::Win32::UI::WindowsAndMessaging::PT_TOUCH;

use crate::flags::{PointerFlag, PointerFlags};
use crate::point::{ContactMask, ContactRect, TouchPoint};
use crate::window::to_hwnd;

pub(crate) fn pointer_flags(flags: PointerFlags) -> POINTER_FLAGS {
    flags.iter().fold(POINTER_FLAG_NONE, |acc, flag| {
        acc | match flag {
            PointerFlag::InRange => POINTER_FLAG_INRANGE,
            PointerFlag::InContact => POINTER_FLAG_INCONTACT,
            PointerFlag::Down => POINTER_FLAG_DOWN,
            PointerFlag::Update => POINTER_FLAG_UPDATE,
            PointerFlag::Up => POINTER_FLAG_UP,
        }
    })
}

pub(crate) fn touch_mask(mask: ContactMask) -> u32 {
    let mut bits = TOUCH_MASK_NONE;
    if mask.contact_area {
        bits |= TOUCH_MASK_CONTACTAREA;
    }
    if mask.orientation {
        bits |= TOUCH_MASK_ORIENTATION;
    }
    if mask.pressure {
        bits |= TOUCH_MASK_PRESSURE;
    }
    bits
}

fn rect(r: ContactRect) -> RECT {
    RECT {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

/// Full `POINTER_TOUCH_INFO` for the current state of `point`.
pub(crate) fn touch_info(point: &TouchPoint) -> POINTER_TOUCH_INFO {
    let location = POINT {
        x: point.position.x,
        y: point.position.y,
    };
    let info = POINTER_INFO {
        pointerType: PT_TOUCH,
        pointerId: point.pointer_id,
        frameId: 0,
        pointerFlags: pointer_flags(point.flags),
        sourceDevice: HANDLE::default(),
        hwndTarget: to_hwnd(point.target),
        ptPixelLocation: location,
        ptPixelLocationRaw: location,
        dwTime: 0,
        historyCount: 0,
        dwKeyStates: 0,
        PerformanceCount: 0,
        ButtonChangeType: POINTER_CHANGE_NONE,
        ..Default::default()
    };

    POINTER_TOUCH_INFO {
        pointerInfo: info,
        touchFlags: TOUCH_FLAG_NONE,
        touchMask: touch_mask(point.mask),
        rcContact: rect(point.contact),
        rcContactRaw: rect(point.contact),
        orientation: point.orientation,
        pressure: point.pressure,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Position, WindowHandle};
    use crate::sink::Backend;

    #[test]
    fn test_pressed_flags_map() {
        let expected = POINTER_FLAG_INRANGE | POINTER_FLAG_INCONTACT | POINTER_FLAG_DOWN;
        assert_eq!(pointer_flags(PointerFlags::PRESSED).0, expected.0);
    }

    #[test]
    fn test_empty_flags_map_to_none() {
        assert_eq!(pointer_flags(PointerFlags::EMPTY).0, POINTER_FLAG_NONE.0);
    }

    #[test]
    fn test_legacy_mask_reports_all_fields() {
        let mask = touch_mask(Backend::Legacy.point_defaults().mask);
        assert_eq!(
            mask,
            TOUCH_MASK_CONTACTAREA | TOUCH_MASK_ORIENTATION | TOUCH_MASK_PRESSURE
        );
    }

    #[test]
    fn test_touch_info_fields() {
        let mut point = TouchPoint::new(0, Position::new(957, 1077), Backend::Legacy.point_defaults());
        point.target = WindowHandle(0x42);
        let info = touch_info(&point);
        assert_eq!(info.pointerInfo.pointerType, PT_TOUCH);
        assert_eq!(info.pointerInfo.ptPixelLocation.x, 957);
        assert_eq!(info.pointerInfo.ptPixelLocationRaw.y, 1077);
        assert_eq!(info.pointerInfo.hwndTarget.0 as isize, 0x42);
        assert_eq!(info.rcContact.left, 956);
        assert_eq!(info.rcContact.bottom, 1078);
        assert_eq!(info.pressure, 512);
        assert_eq!(info.orientation, 90);
    }
}
