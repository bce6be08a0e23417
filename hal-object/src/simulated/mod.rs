//! In-memory audio hardware
//!
//! `SimulatedHardware` implements `AudioHardware` over a table of objects
//! held in memory. It behaves like the HAL where it matters to callers:
//! the same status codes for missing objects and properties, write
//! rejection for read-only properties and out-of-range slider values, and
//! change notifications delivered to registered listeners.
//!
//! Listeners run synchronously on the thread that caused the change, after
//! every internal lock has been released, so a listener may call back into
//! the hardware. A listener removed while a notification is being delivered
//! is skipped for the rest of that delivery.

mod config;

pub use config::{HardwareConfig, ObjectConfig, PropertyConfig, PropertyValue, CONFIG_ENV_VAR};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::address::{ClassId, PropertyAddress, PropertyElement, PropertyScope, PropertySelector};
use crate::error::Result;
use crate::hardware::{AudioHardware, ListenerToken, PropertyListener};
use crate::object::AudioObjectId;
use crate::status::OsStatus;

#[derive(Debug, Clone)]
struct StoredProperty {
    value: PropertyValue,
    settable: bool,
}

#[derive(Debug, Default)]
struct SimulatedObject {
    properties: HashMap<PropertyAddress, StoredProperty>,
}

struct Registration {
    object: AudioObjectId,
    address: PropertyAddress,
    listener: PropertyListener,
    /// Cleared on removal; checked before every call
    active: AtomicBool,
}

/// An `AudioHardware` backed by in-memory objects
pub struct SimulatedHardware {
    objects: DashMap<AudioObjectId, SimulatedObject>,
    listeners: DashMap<ListenerToken, Arc<Registration>>,
    next_token: AtomicU64,
    validate_ranges: AtomicBool,
    fail_listener_registration: AtomicBool,
    fail_listener_removal: AtomicBool,
}

impl SimulatedHardware {
    /// An empty simulator with range validation enabled
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            listeners: DashMap::new(),
            next_token: AtomicU64::new(1),
            validate_ranges: AtomicBool::new(true),
            fail_listener_registration: AtomicBool::new(false),
            fail_listener_removal: AtomicBool::new(false),
        }
    }

    /// Build a simulator populated from `config`
    pub fn from_config(config: &HardwareConfig) -> Result<Self> {
        config.validate()?;

        let hardware = Self::new();
        hardware.set_validate_ranges(config.validate_ranges);

        for object in &config.objects {
            hardware.add_object(object.id, object.class, object.base_class, object.owner);
            if let Some(scope) = object.scope {
                hardware.insert_property(
                    object.id,
                    PropertyAddress::global(PropertySelector::CONTROL_SCOPE),
                    PropertyValue::U32(scope.code()),
                    false,
                );
            }
            if let Some(element) = object.element {
                hardware.insert_property(
                    object.id,
                    PropertyAddress::global(PropertySelector::CONTROL_ELEMENT),
                    PropertyValue::U32(element.0),
                    false,
                );
            }
            for property in &object.properties {
                hardware.insert_property(
                    object.id,
                    property.address(),
                    property.value.clone(),
                    property.settable,
                );
            }
        }

        debug!(objects = config.objects.len(), "simulated hardware configured");
        Ok(hardware)
    }

    /// Build a simulator from the file named by `HAL_SIMULATOR_CONFIG`
    ///
    /// Returns an empty simulator when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_config(&HardwareConfig::from_path(path)?),
            Err(_) => Ok(Self::new()),
        }
    }

    pub fn set_validate_ranges(&self, validate: bool) {
        self.validate_ranges.store(validate, Ordering::SeqCst);
    }

    /// Make every subsequent `add_listener` fail, as on resource exhaustion
    pub fn set_fail_listener_registration(&self, fail: bool) {
        self.fail_listener_registration.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `remove_listener` fail and leave the listener in place
    pub fn set_fail_listener_removal(&self, fail: bool) {
        self.fail_listener_removal.store(fail, Ordering::SeqCst);
    }

    /// Add an object carrying the standard class and owner properties
    pub fn add_object(
        &self,
        id: AudioObjectId,
        class: ClassId,
        base_class: Option<ClassId>,
        owner: Option<AudioObjectId>,
    ) {
        let mut object = SimulatedObject::default();
        let mut put = |selector, value| {
            object.properties.insert(
                PropertyAddress::global(selector),
                StoredProperty {
                    value: PropertyValue::U32(value),
                    settable: false,
                },
            );
        };
        put(PropertySelector::CLASS, class.0);
        put(
            PropertySelector::BASE_CLASS,
            base_class.unwrap_or(ClassId::OBJECT).0,
        );
        put(PropertySelector::OWNER, owner.unwrap_or(AudioObjectId::SYSTEM).0);

        self.objects.insert(id, object);
    }

    /// Add a global-scope slider control with a settable value and a fixed range
    pub fn add_slider(&self, id: AudioObjectId, value: u32, range: &[u32]) {
        self.add_object(
            id,
            ClassId::SLIDER_CONTROL,
            Some(ClassId::CONTROL),
            Some(AudioObjectId::SYSTEM),
        );
        self.insert_property(
            id,
            PropertyAddress::global(PropertySelector::CONTROL_SCOPE),
            PropertyValue::U32(PropertyScope::Global.code()),
            false,
        );
        self.insert_property(
            id,
            PropertyAddress::global(PropertySelector::CONTROL_ELEMENT),
            PropertyValue::U32(PropertyElement::MAIN.0),
            false,
        );
        self.insert_property(
            id,
            PropertyAddress::global(PropertySelector::SLIDER_VALUE),
            PropertyValue::U32(value),
            true,
        );
        self.insert_property(
            id,
            PropertyAddress::global(PropertySelector::SLIDER_RANGE),
            PropertyValue::U32Array(range.to_vec()),
            false,
        );
    }

    /// Remove an object, invalidating every handle to it
    pub fn remove_object(&self, id: AudioObjectId) -> bool {
        self.objects.remove(&id).is_some()
    }

    /// Create or replace a property without notifying listeners
    ///
    /// Does nothing if the object does not exist.
    pub fn insert_property(
        &self,
        id: AudioObjectId,
        address: PropertyAddress,
        value: PropertyValue,
        settable: bool,
    ) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            object
                .properties
                .insert(address, StoredProperty { value, settable });
        }
    }

    /// Remove a property without notifying listeners
    pub fn remove_property(&self, id: AudioObjectId, address: &PropertyAddress) -> bool {
        self.objects
            .get_mut(&id)
            .map(|mut object| object.properties.remove(address).is_some())
            .unwrap_or(false)
    }

    /// Change whether an existing property may be written
    pub fn set_settable(&self, id: AudioObjectId, address: &PropertyAddress, settable: bool) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            if let Some(property) = object.properties.get_mut(address) {
                property.settable = settable;
            }
        }
    }

    /// Current stored value, bypassing the `AudioHardware` interface
    pub fn property_value(
        &self,
        id: AudioObjectId,
        address: &PropertyAddress,
    ) -> Option<PropertyValue> {
        self.objects
            .get(&id)?
            .properties
            .get(address)
            .map(|p| p.value.clone())
    }

    /// Change a value the way a driver would, then notify listeners
    ///
    /// Skips settability and range checks, and creates the property if it
    /// does not exist. Listeners are notified even when the value is the same.
    pub fn inject_change(
        &self,
        id: AudioObjectId,
        address: PropertyAddress,
        value: PropertyValue,
    ) -> std::result::Result<(), OsStatus> {
        {
            let mut object = self.objects.get_mut(&id).ok_or(OsStatus::BAD_OBJECT)?;
            let settable = object
                .properties
                .get(&address)
                .map(|p| p.settable)
                .unwrap_or(false);
            object
                .properties
                .insert(address, StoredProperty { value, settable });
        }

        self.notify(id, &[address]);
        Ok(())
    }

    /// Number of listeners registered on `id`
    pub fn listener_count(&self, id: AudioObjectId) -> usize {
        self.listeners.iter().filter(|r| r.object == id).count()
    }

    /// Deliver a change notification for `changed` to every matching listener
    fn notify(&self, id: AudioObjectId, changed: &[PropertyAddress]) {
        let targets: Vec<Arc<Registration>> = self
            .listeners
            .iter()
            .filter(|r| r.object == id && changed.iter().any(|a| r.address.matches(a)))
            .map(|r| Arc::clone(r.value()))
            .collect();

        trace!(object = %id, listeners = targets.len(), "dispatching property change");

        for registration in targets {
            // An earlier listener in this delivery may have removed this one
            if registration.active.load(Ordering::SeqCst) {
                (registration.listener)(id, changed);
            }
        }
    }

    /// Slider value writes must be members of the range at the same scope/element
    fn check_range(
        object: &SimulatedObject,
        address: &PropertyAddress,
        value: &PropertyValue,
    ) -> std::result::Result<(), OsStatus> {
        if address.selector != PropertySelector::SLIDER_VALUE {
            return Ok(());
        }
        let range_address = PropertyAddress {
            selector: PropertySelector::SLIDER_RANGE,
            ..*address
        };
        let range = object
            .properties
            .get(&range_address)
            .and_then(|p| p.value.as_u32_array());

        match (range, value.as_u32()) {
            (Some(range), Some(v)) if !range.contains(&v) => Err(OsStatus::ILLEGAL_OPERATION),
            _ => Ok(()),
        }
    }
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHardware for SimulatedHardware {
    fn has_property(&self, object: AudioObjectId, address: &PropertyAddress) -> bool {
        self.objects
            .get(&object)
            .map(|o| o.properties.contains_key(address))
            .unwrap_or(false)
    }

    fn is_property_settable(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> std::result::Result<bool, OsStatus> {
        let object = self.objects.get(&object).ok_or(OsStatus::BAD_OBJECT)?;
        object
            .properties
            .get(address)
            .map(|p| p.settable)
            .ok_or(OsStatus::UNKNOWN_PROPERTY)
    }

    fn property_data_size(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> std::result::Result<usize, OsStatus> {
        self.property_data(object, address).map(|data| data.len())
    }

    fn property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> std::result::Result<Vec<u8>, OsStatus> {
        let object = self.objects.get(&object).ok_or(OsStatus::BAD_OBJECT)?;
        object
            .properties
            .get(address)
            .map(|p| p.value.to_bytes())
            .ok_or(OsStatus::UNKNOWN_PROPERTY)
    }

    fn set_property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        data: &[u8],
    ) -> std::result::Result<(), OsStatus> {
        let changed = {
            let mut entry = self.objects.get_mut(&object).ok_or(OsStatus::BAD_OBJECT)?;
            let current = entry
                .properties
                .get(address)
                .ok_or(OsStatus::UNKNOWN_PROPERTY)?;

            if !current.settable {
                return Err(OsStatus::ILLEGAL_OPERATION);
            }

            let value = current.value.replacement(data)?;

            if self.validate_ranges.load(Ordering::SeqCst) {
                Self::check_range(&entry, address, &value)?;
            }

            let property = entry
                .properties
                .get_mut(address)
                .ok_or(OsStatus::UNKNOWN_PROPERTY)?;
            let changed = property.value != value;
            property.value = value;
            changed
        };

        if changed {
            self.notify(object, &[*address]);
        }
        Ok(())
    }

    fn add_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        listener: PropertyListener,
    ) -> std::result::Result<ListenerToken, OsStatus> {
        if self.fail_listener_registration.load(Ordering::SeqCst) {
            return Err(OsStatus::UNSPECIFIED);
        }
        if !self.objects.contains_key(&object) {
            return Err(OsStatus::BAD_OBJECT);
        }

        let token = ListenerToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.listeners.insert(
            token,
            Arc::new(Registration {
                object,
                address: *address,
                listener,
                active: AtomicBool::new(true),
            }),
        );
        Ok(token)
    }

    fn remove_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        token: ListenerToken,
    ) -> std::result::Result<(), OsStatus> {
        if self.fail_listener_removal.load(Ordering::SeqCst) {
            return Err(OsStatus::UNSPECIFIED);
        }
        let (_, registration) = self
            .listeners
            .remove_if(&token, |_, r| r.object == object && r.address == *address)
            .ok_or(OsStatus::ILLEGAL_OPERATION)?;
        registration.active.store(false, Ordering::SeqCst);
        Ok(())
    }
}
