//! Pointer state flags as a typed set.
//!
//! [`PointerFlags`] only ever changes through [`PointerFlags::set`] (OR) and
//! [`PointerFlags::unset`] (AND-NOT), so a transition never clobbers flags it
//! does not name.  The Windows backends translate the set into the Win32
//! `POINTER_FLAG_*` mask at injection time.

use std::fmt;
use std::ops::BitOr;

use serde::{Serialize, Serializer};

/// One named phase-of-contact flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerFlag {
    InRange,
    InContact,
    Down,
    Update,
    Up,
}

impl PointerFlag {
    pub const ALL: [PointerFlag; 5] = [
        PointerFlag::InRange,
        PointerFlag::InContact,
        PointerFlag::Down,
        PointerFlag::Update,
        PointerFlag::Up,
    ];

    const fn bit(self) -> u8 {
        match self {
            PointerFlag::InRange => 1 << 0,
            PointerFlag::InContact => 1 << 1,
            PointerFlag::Down => 1 << 2,
            PointerFlag::Update => 1 << 3,
            PointerFlag::Up => 1 << 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PointerFlag::InRange => "in-range",
            PointerFlag::InContact => "in-contact",
            PointerFlag::Down => "down",
            PointerFlag::Update => "update",
            PointerFlag::Up => "up",
        }
    }
}

/// Set of [`PointerFlag`]s backed by a private bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerFlags(u8);

impl PointerFlags {
    pub const EMPTY: PointerFlags = PointerFlags(0);

    /// `in-range | in-contact`: the finger is touching the surface.
    pub const CONTACT: PointerFlags =
        PointerFlags(PointerFlag::InRange.bit() | PointerFlag::InContact.bit());

    /// `in-range | in-contact | down`: state of a freshly pressed finger.
    pub const PRESSED: PointerFlags = PointerFlags(
        PointerFlag::InRange.bit() | PointerFlag::InContact.bit() | PointerFlag::Down.bit(),
    );

    pub const fn only(flag: PointerFlag) -> Self {
        PointerFlags(flag.bit())
    }

    /// Add every flag in `flags`, leaving the rest untouched.
    pub fn set(&mut self, flags: impl Into<PointerFlags>) {
        self.0 |= flags.into().0;
    }

    /// Remove every flag in `flags`, leaving the rest untouched.
    pub fn unset(&mut self, flags: impl Into<PointerFlags>) {
        self.0 &= !flags.into().0;
    }

    pub fn contains(self, flag: PointerFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = PointerFlag> {
        PointerFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<PointerFlag> for PointerFlags {
    fn from(flag: PointerFlag) -> Self {
        PointerFlags::only(flag)
    }
}

impl BitOr for PointerFlag {
    type Output = PointerFlags;

    fn bitor(self, rhs: PointerFlag) -> PointerFlags {
        PointerFlags(self.bit() | rhs.bit())
    }
}

impl BitOr<PointerFlag> for PointerFlags {
    type Output = PointerFlags;

    fn bitor(self, rhs: PointerFlag) -> PointerFlags {
        PointerFlags(self.0 | rhs.bit())
    }
}

impl BitOr for PointerFlags {
    type Output = PointerFlags;

    fn bitor(self, rhs: PointerFlags) -> PointerFlags {
        PointerFlags(self.0 | rhs.0)
    }
}

impl FromIterator<PointerFlag> for PointerFlags {
    fn from_iter<I: IntoIterator<Item = PointerFlag>>(iter: I) -> Self {
        let mut flags = PointerFlags::EMPTY;
        for flag in iter {
            flags.set(flag);
        }
        flags
    }
}

impl fmt::Display for PointerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let names: Vec<&str> = self.iter().map(PointerFlag::name).collect();
        write!(f, "{{{}}}", names.join("|"))
    }
}

impl fmt::Debug for PointerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointerFlags{self}")
    }
}

impl Serialize for PointerFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_preserves_other_flags() {
        let mut flags = PointerFlags::PRESSED;
        flags.set(PointerFlag::Update);
        assert!(flags.contains(PointerFlag::InRange));
        assert!(flags.contains(PointerFlag::InContact));
        assert!(flags.contains(PointerFlag::Down));
        assert!(flags.contains(PointerFlag::Update));
        assert!(!flags.contains(PointerFlag::Up));
    }

    #[test]
    fn test_unset_only_named_flags() {
        let mut flags = PointerFlags::PRESSED | PointerFlag::Update;
        flags.unset(PointerFlag::Down | PointerFlag::Up);
        assert_eq!(flags, PointerFlags::CONTACT | PointerFlag::Update);
    }

    #[test]
    fn test_unset_absent_flag_is_noop() {
        let mut flags = PointerFlags::CONTACT;
        flags.unset(PointerFlag::Up);
        assert_eq!(flags, PointerFlags::CONTACT);
    }

    #[test]
    fn test_iter_order_and_collect() {
        let flags: PointerFlags = [PointerFlag::Up, PointerFlag::InRange].into_iter().collect();
        let listed: Vec<PointerFlag> = flags.iter().collect();
        assert_eq!(listed, vec![PointerFlag::InRange, PointerFlag::Up]);
    }

    #[test]
    fn test_display() {
        assert_eq!(PointerFlags::PRESSED.to_string(), "{in-range|in-contact|down}");
        assert_eq!(PointerFlags::EMPTY.to_string(), "{}");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&PointerFlags::only(PointerFlag::Up)).unwrap();
        assert_eq!(json, r#"["up"]"#);
    }
}
