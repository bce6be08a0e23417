//! Generic property access on a HAL object
//!
//! `AudioObject` pairs an object id with the hardware that owns it and turns
//! byte-level `AudioHardware` calls into typed reads and writes. It holds no
//! property values of its own; every read goes to the hardware. The only
//! state it keeps is which change listeners this instance has registered, so
//! they can be replaced, removed, and cleaned up on drop.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::address::{ClassId, PropertyAddress, PropertySelector};
use crate::codec::{ClassIdCodec, ObjectIdCodec, PropertyCodec};
use crate::error::{HalError, Result};
use crate::hardware::{AudioHardware, ListenerToken, PropertyListener};
use crate::status::OsStatus;

/// Opaque identifier of a hardware-owned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioObjectId(pub u32);

impl AudioObjectId {
    /// `kAudioObjectUnknown`
    pub const UNKNOWN: Self = Self(0);
    /// `kAudioObjectSystemObject`
    pub const SYSTEM: Self = Self(1);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl fmt::Display for AudioObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A HAL audio object
pub struct AudioObject {
    id: AudioObjectId,
    hardware: Arc<dyn AudioHardware>,
    listeners: Mutex<HashMap<PropertyAddress, ListenerToken>>,
}

impl AudioObject {
    pub fn new(id: AudioObjectId, hardware: Arc<dyn AudioHardware>) -> Self {
        Self {
            id,
            hardware,
            listeners: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> AudioObjectId {
        self.id
    }

    pub fn hardware(&self) -> &Arc<dyn AudioHardware> {
        &self.hardware
    }

    /// Whether the object exposes the property at `address`
    ///
    /// Never fails; anything the hardware cannot answer counts as absent.
    pub fn has_property(&self, address: &PropertyAddress) -> bool {
        self.hardware.has_property(self.id, address)
    }

    /// Whether the property at `address` can be written
    ///
    /// Fails with `PropertyUnavailable` if the object has no such property.
    pub fn is_property_settable(&self, address: &PropertyAddress) -> Result<bool> {
        self.hardware
            .is_property_settable(self.id, address)
            .map_err(|status| HalError::from_access(self.id, *address, status))
    }

    /// Read the property at `address`, decoding it with codec `C`
    pub fn get_property<C: PropertyCodec>(&self, address: &PropertyAddress) -> Result<C::Value> {
        let bytes = self
            .hardware
            .property_data(self.id, address)
            .map_err(|status| HalError::from_access(self.id, *address, status))?;

        trace!(object = %self.id, %address, len = bytes.len(), "read property");

        C::decode(&bytes).map_err(|e| {
            debug!(object = %self.id, %address, "undecodable property payload: {}", e);
            HalError::Io {
                object: self.id,
                address: *address,
                status: OsStatus::BAD_PROPERTY_SIZE,
            }
        })
    }

    /// Write `value` to the property at `address`, encoding it with codec `C`
    pub fn set_property<C: PropertyCodec>(
        &self,
        address: &PropertyAddress,
        value: &C::Value,
    ) -> Result<()> {
        let bytes = C::encode(value);
        trace!(object = %self.id, %address, len = bytes.len(), "write property");

        self.hardware
            .set_property_data(self.id, address, &bytes)
            .map_err(|status| HalError::from_access(self.id, *address, status))
    }

    /// Register `listener` for changes to the property at `address`
    ///
    /// Each object instance holds at most one listener per address: a new
    /// listener replaces the previous one, and `None` removes it. Removing
    /// when nothing is registered does nothing.
    pub fn when_property_changes(
        &self,
        address: &PropertyAddress,
        listener: Option<PropertyListener>,
    ) -> Result<()> {
        let registration_error = |status: OsStatus| HalError::Registration {
            object: self.id,
            address: *address,
            status,
        };

        let mut listeners = self.listeners.lock();

        if let Some(token) = listeners.get(address).copied() {
            self.hardware
                .remove_listener(self.id, address, token)
                .map_err(registration_error)?;
            listeners.remove(address);
            debug!(object = %self.id, %address, %token, "removed property listener");
        }

        if let Some(listener) = listener {
            let token = self
                .hardware
                .add_listener(self.id, address, listener)
                .map_err(registration_error)?;
            listeners.insert(*address, token);
            debug!(object = %self.id, %address, %token, "added property listener");
        }

        Ok(())
    }

    /// Whether this instance currently has a listener on `address`
    pub fn is_listening(&self, address: &PropertyAddress) -> bool {
        self.listeners.lock().contains_key(address)
    }

    /// `kAudioObjectPropertyClass`
    pub fn class_id(&self) -> Result<ClassId> {
        self.get_property::<ClassIdCodec>(&PropertyAddress::global(PropertySelector::CLASS))
    }

    /// `kAudioObjectPropertyBaseClass`
    pub fn base_class_id(&self) -> Result<ClassId> {
        self.get_property::<ClassIdCodec>(&PropertyAddress::global(PropertySelector::BASE_CLASS))
    }

    /// `kAudioObjectPropertyOwner`
    pub fn owner(&self) -> Result<AudioObjectId> {
        self.get_property::<ObjectIdCodec>(&PropertyAddress::global(PropertySelector::OWNER))
    }

    /// Whether the object's class or base class is `class`
    pub fn is_kind_of(&self, class: ClassId) -> Result<bool> {
        if self.class_id()? == class {
            return Ok(true);
        }
        match self.base_class_id() {
            Ok(base) => Ok(base == class),
            Err(e) if e.is_property_unavailable() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The description used when nothing more specific can be produced
    pub fn generic_description(&self, type_name: &str) -> String {
        format!("<{}: {}>", type_name, self.id)
    }
}

impl Drop for AudioObject {
    fn drop(&mut self) {
        for (address, token) in self.listeners.get_mut().drain() {
            if let Err(status) = self.hardware.remove_listener(self.id, &address, token) {
                warn!(
                    object = %self.id,
                    %address,
                    %token,
                    "failed to remove property listener on drop: status {}",
                    status
                );
            }
        }
    }
}

impl fmt::Debug for AudioObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.generic_description("AudioObject"))
    }
}

impl PartialEq for AudioObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AudioObject {}

impl Hash for AudioObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
