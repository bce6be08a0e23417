//! Base for HAL control objects

use std::sync::Arc;

use hal_object::codec::{ElementCodec, ScopeCodec};
use hal_object::{
    AudioHardware, AudioObject, AudioObjectId, PropertyElement, PropertyListener, PropertyScope,
    Result,
};
use tracing::debug;

use crate::selector::{ControlSelector, ObjectSelector};

/// A HAL control object
///
/// Corresponds to objects whose base class is `kAudioControlClassID`.
/// Every control reports which scope and element of its owning device it
/// controls.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioControl {
    object: AudioObject,
}

impl AudioControl {
    pub fn new(object: AudioObject) -> Self {
        Self { object }
    }

    pub fn from_id(id: AudioObjectId, hardware: Arc<dyn AudioHardware>) -> Self {
        Self::new(AudioObject::new(id, hardware))
    }

    pub fn object(&self) -> &AudioObject {
        &self.object
    }

    pub fn id(&self) -> AudioObjectId {
        self.object.id()
    }

    /// The scope of the device this control applies to
    pub fn scope(&self) -> Result<PropertyScope> {
        self.object
            .get_property::<ScopeCodec>(&ControlSelector::Scope.address())
    }

    /// The element of the device this control applies to
    pub fn element(&self) -> Result<PropertyElement> {
        self.object
            .get_property::<ElementCodec>(&ControlSelector::Element.address())
    }

    /// Returns `true` if the control has `selector`
    pub fn has_selector(&self, selector: ControlSelector) -> bool {
        self.has(selector)
    }

    /// Returns `true` if `selector` is settable
    ///
    /// Fails with `PropertyUnavailable` if the control lacks the property.
    pub fn is_selector_settable(&self, selector: ControlSelector) -> Result<bool> {
        self.settable(selector)
    }

    /// Registers `listener` for changes to `selector`, or removes it with `None`
    pub fn when_selector_changes(
        &self,
        selector: ControlSelector,
        listener: Option<PropertyListener>,
    ) -> Result<()> {
        self.listen(selector, listener)
    }

    pub(crate) fn has<S: ObjectSelector>(&self, selector: S) -> bool {
        self.object.has_property(&selector.address())
    }

    pub(crate) fn settable<S: ObjectSelector>(&self, selector: S) -> Result<bool> {
        self.object.is_property_settable(&selector.address())
    }

    pub(crate) fn listen<S: ObjectSelector>(
        &self,
        selector: S,
        listener: Option<PropertyListener>,
    ) -> Result<()> {
        let registering = listener.is_some();
        self.object
            .when_property_changes(&selector.address(), listener)?;
        debug!(
            object = %self.id(),
            selector = selector.name(),
            registering,
            "updated change handler"
        );
        Ok(())
    }
}
