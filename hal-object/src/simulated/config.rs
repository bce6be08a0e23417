//! Configuration for the simulated hardware
//!
//! A `HardwareConfig` describes a fixed set of objects and their properties,
//! loaded from JSON:
//!
//! ```json
//! {
//!   "validate_ranges": true,
//!   "objects": [
//!     { "id": 42, "class": "sldr", "base_class": "actl", "owner": 1,
//!       "scope": "glob", "element": 0,
//!       "properties": [
//!         { "selector": "sdrv", "value": { "u32": 50 }, "settable": true },
//!         { "selector": "sdrr", "value": { "u32_array": [0, 25, 50, 75, 100] } }
//!       ] }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::{ClassId, PropertyAddress, PropertyElement, PropertyScope, PropertySelector};
use crate::codec::{PropertyCodec, U32ArrayCodec, U32Codec};
use crate::error::{HalError, Result};
use crate::object::AudioObjectId;
use crate::status::OsStatus;

/// Environment variable naming a config file for `SimulatedHardware::from_env`
pub const CONFIG_ENV_VAR: &str = "HAL_SIMULATOR_CONFIG";

/// A property value as the simulator stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    U32(u32),
    U32Array(Vec<u32>),
}

impl PropertyValue {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PropertyValue::U32(v) => U32Codec::encode(v),
            PropertyValue::U32Array(values) => U32ArrayCodec::encode(values),
        }
    }

    /// Decode `data` as a replacement for `self`, keeping the same shape
    pub(crate) fn replacement(&self, data: &[u8]) -> std::result::Result<Self, OsStatus> {
        match self {
            PropertyValue::U32(_) => U32Codec::decode(data)
                .map(PropertyValue::U32)
                .map_err(|_| OsStatus::BAD_PROPERTY_SIZE),
            PropertyValue::U32Array(_) => U32ArrayCodec::decode(data)
                .map(PropertyValue::U32Array)
                .map_err(|_| OsStatus::BAD_PROPERTY_SIZE),
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            PropertyValue::U32(v) => Some(*v),
            PropertyValue::U32Array(_) => None,
        }
    }

    pub fn as_u32_array(&self) -> Option<&[u32]> {
        match self {
            PropertyValue::U32(_) => None,
            PropertyValue::U32Array(values) => Some(values),
        }
    }
}

/// One property of a configured object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub selector: PropertySelector,

    #[serde(default = "global_scope")]
    pub scope: PropertyScope,

    #[serde(default)]
    pub element: PropertyElement,

    pub value: PropertyValue,

    #[serde(default)]
    pub settable: bool,
}

impl PropertyConfig {
    pub fn address(&self) -> PropertyAddress {
        PropertyAddress::new(self.selector, self.scope, self.element)
    }
}

/// One configured object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub id: AudioObjectId,

    pub class: ClassId,

    #[serde(default)]
    pub base_class: Option<ClassId>,

    #[serde(default)]
    pub owner: Option<AudioObjectId>,

    /// Control scope (`'cscp'`), for control objects
    #[serde(default)]
    pub scope: Option<PropertyScope>,

    /// Control element (`'celm'`), for control objects
    #[serde(default)]
    pub element: Option<PropertyElement>,

    #[serde(default)]
    pub properties: Vec<PropertyConfig>,
}

/// Configuration for a `SimulatedHardware`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// Reject slider value writes that are not members of the slider's range
    /// Default: true
    #[serde(default = "default_true")]
    pub validate_ranges: bool,

    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            validate_ranges: true,
            objects: Vec::new(),
        }
    }
}

impl HardwareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HardwareConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| HalError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Builder-style toggle for range validation
    pub fn with_validate_ranges(mut self, validate: bool) -> Self {
        self.validate_ranges = validate;
        self
    }

    pub fn with_object(mut self, object: ObjectConfig) -> Self {
        self.objects.push(object);
        self
    }

    /// Object ids must be unique and never `kAudioObjectUnknown`
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for object in &self.objects {
            if object.id.is_unknown() {
                return Err(HalError::Config(
                    "object id 0 (kAudioObjectUnknown) is reserved".to_string(),
                ));
            }
            if !seen.insert(object.id) {
                return Err(HalError::Config(format!("duplicate object id {}", object.id)));
            }
            let mut addresses = HashSet::new();
            for property in &object.properties {
                if !addresses.insert(property.address()) {
                    return Err(HalError::Config(format!(
                        "duplicate property {} on object {}",
                        property.address(),
                        object.id
                    )));
                }
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn global_scope() -> PropertyScope {
    PropertyScope::Global
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDER_JSON: &str = r#"{
        "objects": [
            { "id": 42, "class": "sldr", "base_class": "actl", "owner": 1,
              "scope": "outp", "element": 2,
              "properties": [
                { "selector": "sdrv", "value": { "u32": 50 }, "settable": true },
                { "selector": "sdrr", "value": { "u32_array": [0, 25, 50, 75, 100] } }
              ] }
        ]
    }"#;

    #[test]
    fn test_default_config() {
        let config = HardwareConfig::default();
        assert!(config.validate_ranges);
        assert!(config.objects.is_empty());
    }

    #[test]
    fn test_parse_slider_config() {
        let config = HardwareConfig::from_json_str(SLIDER_JSON).unwrap();

        assert!(config.validate_ranges);
        assert_eq!(config.objects.len(), 1);

        let object = &config.objects[0];
        assert_eq!(object.id, AudioObjectId(42));
        assert_eq!(object.class, ClassId::SLIDER_CONTROL);
        assert_eq!(object.base_class, Some(ClassId::CONTROL));
        assert_eq!(object.scope, Some(PropertyScope::Output));
        assert_eq!(object.element, Some(PropertyElement(2)));

        let value = &object.properties[0];
        assert_eq!(
            value.address(),
            PropertyAddress::global(PropertySelector::SLIDER_VALUE)
        );
        assert!(value.settable);
        assert_eq!(value.value, PropertyValue::U32(50));

        let range = &object.properties[1];
        assert!(!range.settable);
        assert_eq!(
            range.value.as_u32_array(),
            Some(&[0, 25, 50, 75, 100][..])
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{ "objects": [
            { "id": 5, "class": "sldr" },
            { "id": 5, "class": "sldr" }
        ] }"#;
        assert!(matches!(
            HardwareConfig::from_json_str(json),
            Err(HalError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_object_id_rejected() {
        let json = r#"{ "objects": [ { "id": 0, "class": "sldr" } ] }"#;
        assert!(HardwareConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            HardwareConfig::from_json_str("{ not json"),
            Err(HalError::Config(_))
        ));
    }

    #[test]
    fn test_replacement_keeps_shape() {
        let scalar = PropertyValue::U32(1);
        assert_eq!(
            scalar.replacement(&7u32.to_ne_bytes()),
            Ok(PropertyValue::U32(7))
        );
        assert_eq!(
            scalar.replacement(&[0; 8]),
            Err(OsStatus::BAD_PROPERTY_SIZE)
        );

        let array = PropertyValue::U32Array(vec![]);
        assert_eq!(array.replacement(&[]), Ok(PropertyValue::U32Array(vec![])));
    }
}
