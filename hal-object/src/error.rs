use thiserror::Error;

use crate::address::{ClassId, PropertyAddress};
use crate::object::AudioObjectId;
use crate::status::OsStatus;

/// Errors surfaced by HAL object property access
///
/// Every operation passes the hardware layer's failure to its caller
/// unchanged, tagged with the object and address it concerned.
#[derive(Debug, Error)]
pub enum HalError {
    /// The object does not expose the property at all
    #[error("property {address} is not available on object {object}")]
    PropertyUnavailable {
        object: AudioObjectId,
        address: PropertyAddress,
    },

    /// The hardware layer rejected a read or write
    ///
    /// This covers invalid objects, values the object refuses (out of range,
    /// not settable), payload size mismatches and transport failures.
    #[error("I/O error on object {object} property {address}: status {status}")]
    Io {
        object: AudioObjectId,
        address: PropertyAddress,
        status: OsStatus,
    },

    /// A change listener could not be attached or detached
    #[error("failed to register listener on object {object} property {address}: status {status}")]
    Registration {
        object: AudioObjectId,
        address: PropertyAddress,
        status: OsStatus,
    },

    /// The object is not of the class a typed wrapper requires
    #[error("object {object} has class {actual}, expected {expected}")]
    ClassMismatch {
        object: AudioObjectId,
        expected: ClassId,
        actual: ClassId,
    },

    /// Simulator configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl HalError {
    /// Map a failed get/set/is-settable status onto the taxonomy
    pub(crate) fn from_access(
        object: AudioObjectId,
        address: PropertyAddress,
        status: OsStatus,
    ) -> Self {
        if status == OsStatus::UNKNOWN_PROPERTY {
            HalError::PropertyUnavailable { object, address }
        } else {
            HalError::Io {
                object,
                address,
                status,
            }
        }
    }

    /// The hardware status behind this error, if there is one
    pub fn status(&self) -> Option<OsStatus> {
        match self {
            HalError::PropertyUnavailable { .. } => Some(OsStatus::UNKNOWN_PROPERTY),
            HalError::Io { status, .. } | HalError::Registration { status, .. } => Some(*status),
            HalError::ClassMismatch { .. } | HalError::Config(_) => None,
        }
    }

    pub fn is_property_unavailable(&self) -> bool {
        matches!(self, HalError::PropertyUnavailable { .. })
    }
}

impl From<serde_json::Error> for HalError {
    fn from(err: serde_json::Error) -> Self {
        HalError::Config(err.to_string())
    }
}

impl From<std::io::Error> for HalError {
    fn from(err: std::io::Error) -> Self {
        HalError::Config(err.to_string())
    }
}

/// Result type for HAL object operations
pub type Result<T> = std::result::Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::PropertySelector;

    fn value_address() -> PropertyAddress {
        PropertyAddress::global(PropertySelector::SLIDER_VALUE)
    }

    #[test]
    fn test_unknown_property_maps_to_unavailable() {
        let err = HalError::from_access(
            AudioObjectId(42),
            value_address(),
            OsStatus::UNKNOWN_PROPERTY,
        );
        assert!(err.is_property_unavailable());
        assert_eq!(err.status(), Some(OsStatus::UNKNOWN_PROPERTY));
    }

    #[test]
    fn test_other_status_maps_to_io() {
        let err = HalError::from_access(
            AudioObjectId(42),
            value_address(),
            OsStatus::ILLEGAL_OPERATION,
        );
        assert!(matches!(
            err,
            HalError::Io {
                status: OsStatus::ILLEGAL_OPERATION,
                ..
            }
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = HalError::PropertyUnavailable {
            object: AudioObjectId(0x2a),
            address: value_address(),
        };
        assert_eq!(
            err.to_string(),
            "property ('sdrv', global, main) is not available on object 0x2a"
        );
    }
}
