//! Closed selector sets for each control type
//!
//! Each control type names the properties it exposes with its own enum, and
//! each variant maps statically to one property selector. The address is
//! always the global scope and main element.

use std::fmt;

use hal_object::{PropertyAddress, PropertySelector};

/// A selector belonging to one control type
pub trait ObjectSelector: Copy + fmt::Debug {
    /// The HAL property selector this variant stands for
    fn selector(self) -> PropertySelector;

    /// Short stable name, used in logs
    fn name(self) -> &'static str;

    /// Global-scope, main-element address of the property
    fn address(self) -> PropertyAddress {
        PropertyAddress::global(self.selector())
    }
}

/// Properties of a slider control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderSelector {
    /// `kAudioSliderControlPropertyValue`: the current position
    Value,
    /// `kAudioSliderControlPropertyRange`: the legal positions
    Range,
}

impl SliderSelector {
    pub const ALL: [SliderSelector; 2] = [SliderSelector::Value, SliderSelector::Range];
}

impl ObjectSelector for SliderSelector {
    fn selector(self) -> PropertySelector {
        match self {
            SliderSelector::Value => PropertySelector::SLIDER_VALUE,
            SliderSelector::Range => PropertySelector::SLIDER_RANGE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SliderSelector::Value => "value",
            SliderSelector::Range => "range",
        }
    }
}

impl fmt::Display for SliderSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Properties every control carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSelector {
    /// `kAudioControlPropertyScope`
    Scope,
    /// `kAudioControlPropertyElement`
    Element,
}

impl ControlSelector {
    pub const ALL: [ControlSelector; 2] = [ControlSelector::Scope, ControlSelector::Element];
}

impl ObjectSelector for ControlSelector {
    fn selector(self) -> PropertySelector {
        match self {
            ControlSelector::Scope => PropertySelector::CONTROL_SCOPE,
            ControlSelector::Element => PropertySelector::CONTROL_ELEMENT,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ControlSelector::Scope => "scope",
            ControlSelector::Element => "element",
        }
    }
}

impl fmt::Display for ControlSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal_object::{PropertyElement, PropertyScope};

    #[test]
    fn test_slider_selectors_map_to_distinct_properties() {
        assert_eq!(SliderSelector::Value.selector().to_string(), "'sdrv'");
        assert_eq!(SliderSelector::Range.selector().to_string(), "'sdrr'");
        assert_ne!(
            SliderSelector::Value.address(),
            SliderSelector::Range.address()
        );
    }

    #[test]
    fn test_addresses_are_global_main() {
        for selector in SliderSelector::ALL {
            let address = selector.address();
            assert_eq!(address.scope, PropertyScope::Global);
            assert_eq!(address.element, PropertyElement::MAIN);
        }
        for selector in ControlSelector::ALL {
            let address = selector.address();
            assert_eq!(address.scope, PropertyScope::Global);
            assert_eq!(address.element, PropertyElement::MAIN);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(SliderSelector::Value.to_string(), "value");
        assert_eq!(ControlSelector::Element.to_string(), "element");
    }
}
