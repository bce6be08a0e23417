//! Result codes reported by the hardware layer

use std::fmt;

use crate::address::{fmt_four_cc, four_cc};

/// An `OSStatus` returned by a hardware call
///
/// Most HAL failures are four-character codes (`'who?'`, `'!obj'`), so the
/// `Display` impl prints them that way and falls back to the decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsStatus(pub i32);

impl OsStatus {
    /// `kAudioHardwareNoError`
    pub const NO_ERROR: Self = Self(0);
    /// `kAudioHardwareUnspecifiedError`
    pub const UNSPECIFIED: Self = Self(four_cc(b"what") as i32);
    /// `kAudioHardwareUnknownPropertyError`
    pub const UNKNOWN_PROPERTY: Self = Self(four_cc(b"who?") as i32);
    /// `kAudioHardwareBadPropertySizeError`
    pub const BAD_PROPERTY_SIZE: Self = Self(four_cc(b"!siz") as i32);
    /// `kAudioHardwareIllegalOperationError`
    pub const ILLEGAL_OPERATION: Self = Self(four_cc(b"nope") as i32);
    /// `kAudioHardwareBadObjectError`
    pub const BAD_OBJECT: Self = Self(four_cc(b"!obj") as i32);
    /// `kAudioHardwareUnsupportedOperationError`
    pub const UNSUPPORTED_OPERATION: Self = Self(four_cc(b"unop") as i32);

    pub fn is_ok(self) -> bool {
        self == Self::NO_ERROR
    }

    /// Convert a raw status into a `Result`
    pub fn check(self) -> Result<(), OsStatus> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Small negative values are classic OSStatus codes, not four-char codes
        if self.0 > 0xFFFF {
            fmt_four_cc(self.0 as u32, f)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<i32> for OsStatus {
    fn from(status: i32) -> Self {
        Self(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OsStatus::UNKNOWN_PROPERTY, "'who?'")]
    #[case(OsStatus::BAD_OBJECT, "'!obj'")]
    #[case(OsStatus::BAD_PROPERTY_SIZE, "'!siz'")]
    #[case(OsStatus::ILLEGAL_OPERATION, "'nope'")]
    #[case(OsStatus(-50), "-50")]
    #[case(OsStatus::NO_ERROR, "0")]
    fn test_display(#[case] status: OsStatus, #[case] expected: &str) {
        assert_eq!(status.to_string(), expected);
    }

    #[test]
    fn test_check() {
        assert!(OsStatus::NO_ERROR.check().is_ok());
        assert_eq!(
            OsStatus::ILLEGAL_OPERATION.check(),
            Err(OsStatus::ILLEGAL_OPERATION)
        );
    }
}
