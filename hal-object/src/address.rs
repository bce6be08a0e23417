//! Property addressing for HAL audio objects
//!
//! A property on a HAL object is identified by a `PropertyAddress`, the triple
//! of selector, scope and element. Selectors, scopes and class IDs are
//! four-character codes: a `u32` whose big-endian bytes spell ASCII characters.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pack a four-character code into a `u32`
pub const fn four_cc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Format a `u32` as `'abcd'` when all four bytes are printable ASCII, `0x…` otherwise
pub(crate) fn fmt_four_cc(value: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes = value.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        write!(f, "'")?;
        for b in bytes {
            write!(f, "{}", b as char)?;
        }
        write!(f, "'")
    } else {
        write!(f, "0x{:x}", value)
    }
}

/// Parse a four-character string such as `"sdrv"` into its code
fn parse_four_cc(s: &str) -> Option<u32> {
    let bytes: [u8; 4] = s.as_bytes().try_into().ok()?;
    Some(four_cc(&bytes))
}

// ============================================================================
// Selector
// ============================================================================

/// Identifies which property of an object an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertySelector(pub u32);

impl PropertySelector {
    /// `kAudioObjectPropertySelectorWildcard`
    pub const WILDCARD: Self = Self(four_cc(b"****"));

    /// `kAudioObjectPropertyClass`
    pub const CLASS: Self = Self(four_cc(b"clas"));
    /// `kAudioObjectPropertyBaseClass`
    pub const BASE_CLASS: Self = Self(four_cc(b"bcls"));
    /// `kAudioObjectPropertyOwner`
    pub const OWNER: Self = Self(four_cc(b"stdv"));

    /// `kAudioControlPropertyScope`
    pub const CONTROL_SCOPE: Self = Self(four_cc(b"cscp"));
    /// `kAudioControlPropertyElement`
    pub const CONTROL_ELEMENT: Self = Self(four_cc(b"celm"));

    /// `kAudioSliderControlPropertyValue`
    pub const SLIDER_VALUE: Self = Self(four_cc(b"sdrv"));
    /// `kAudioSliderControlPropertyRange`
    pub const SLIDER_RANGE: Self = Self(four_cc(b"sdrr"));

    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    pub fn is_wildcard(self) -> bool {
        self == Self::WILDCARD
    }
}

impl fmt::Display for PropertySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_four_cc(self.0, f)
    }
}

// ============================================================================
// Scope
// ============================================================================

/// The part of an object a property applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyScope {
    Global,
    Input,
    Output,
    Playthrough,
    Wildcard,
    /// A scope code outside the well-known set
    Other(u32),
}

impl PropertyScope {
    const GLOBAL: u32 = four_cc(b"glob");
    const INPUT: u32 = four_cc(b"inpt");
    const OUTPUT: u32 = four_cc(b"outp");
    const PLAYTHROUGH: u32 = four_cc(b"ptru");
    const WILDCARD: u32 = four_cc(b"****");

    pub const fn from_code(code: u32) -> Self {
        match code {
            Self::GLOBAL => Self::Global,
            Self::INPUT => Self::Input,
            Self::OUTPUT => Self::Output,
            Self::PLAYTHROUGH => Self::Playthrough,
            Self::WILDCARD => Self::Wildcard,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            Self::Global => Self::GLOBAL,
            Self::Input => Self::INPUT,
            Self::Output => Self::OUTPUT,
            Self::Playthrough => Self::PLAYTHROUGH,
            Self::Wildcard => Self::WILDCARD,
            Self::Other(code) => code,
        }
    }

    /// Whether a listener registered with `self` hears changes reported for `other`
    pub fn matches(self, other: Self) -> bool {
        self == other || self == Self::Wildcard || other == Self::Wildcard
    }
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Playthrough => write!(f, "playthrough"),
            Self::Wildcard => write!(f, "wildcard"),
            Self::Other(code) => fmt_four_cc(*code, f),
        }
    }
}

impl Serialize for PropertyScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = self.code().to_be_bytes();
        serializer.serialize_str(&String::from_utf8_lossy(&bytes))
    }
}

impl<'de> Deserialize<'de> for PropertyScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_four_cc(&s)
            .map(Self::from_code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid scope code: {:?}", s)))
    }
}

// ============================================================================
// Element
// ============================================================================

/// The element (channel) of a scope a property applies to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropertyElement(pub u32);

impl PropertyElement {
    /// `kAudioObjectPropertyElementMain`, formerly "master"
    pub const MAIN: Self = Self(0);
    /// `kAudioObjectPropertyElementWildcard`
    pub const WILDCARD: Self = Self(0xFFFF_FFFF);

    pub fn matches(self, other: Self) -> bool {
        self == other || self == Self::WILDCARD || other == Self::WILDCARD
    }
}

impl fmt::Display for PropertyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MAIN => write!(f, "main"),
            Self::WILDCARD => write!(f, "wildcard"),
            Self(n) => write!(f, "{}", n),
        }
    }
}

// ============================================================================
// Address
// ============================================================================

/// The (selector, scope, element) triple naming one property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyAddress {
    pub selector: PropertySelector,
    pub scope: PropertyScope,
    pub element: PropertyElement,
}

impl PropertyAddress {
    pub const fn new(
        selector: PropertySelector,
        scope: PropertyScope,
        element: PropertyElement,
    ) -> Self {
        Self {
            selector,
            scope,
            element,
        }
    }

    /// Address of `selector` in the global scope, main element
    pub const fn global(selector: PropertySelector) -> Self {
        Self::new(selector, PropertyScope::Global, PropertyElement::MAIN)
    }

    /// Whether a listener on `self` should hear a change reported at `changed`
    pub fn matches(&self, changed: &PropertyAddress) -> bool {
        (self.selector == changed.selector
            || self.selector.is_wildcard()
            || changed.selector.is_wildcard())
            && self.scope.matches(changed.scope)
            && self.element.matches(changed.element)
    }
}

impl fmt::Display for PropertyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.selector, self.scope, self.element)
    }
}

// ============================================================================
// Four-character code newtypes with serde support
// ============================================================================

/// The class of a HAL object, e.g. `'sldr'` for slider controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

impl ClassId {
    /// `kAudioObjectClassID`
    pub const OBJECT: Self = Self(four_cc(b"aobj"));
    /// `kAudioControlClassID`
    pub const CONTROL: Self = Self(four_cc(b"actl"));
    /// `kAudioSliderControlClassID`
    pub const SLIDER_CONTROL: Self = Self(four_cc(b"sldr"));
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_four_cc(self.0, f)
    }
}

impl Serialize for PropertySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        four_cc_serde::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for PropertySelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        four_cc_serde::deserialize(deserializer).map(Self)
    }
}

impl Serialize for ClassId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        four_cc_serde::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ClassId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        four_cc_serde::deserialize(deserializer).map(Self)
    }
}

/// Serde helpers for four-character codes written as 4-char strings
mod four_cc_serde {
    use super::parse_four_cc;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(code: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = code.to_be_bytes();
        serializer.serialize_str(&String::from_utf8_lossy(&bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_four_cc(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a four-character code, got {:?}", s))
        })
    }
}
