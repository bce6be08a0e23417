//! Slider controls
//!
//! A slider is a control whose position is one of a fixed set of integer
//! values. [`SliderControl`] exposes the position and the legal set as typed
//! properties; every call goes straight to the hardware, nothing is cached.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use hal_object::{
    AudioHardware, AudioObject, AudioObjectId, ClassId, HalError, PropertyListener, Result,
    U32ArrayCodec, U32Codec,
};
use tracing::trace;

use crate::control::AudioControl;
use crate::selector::{ObjectSelector, SliderSelector};

/// A HAL slider control (`kAudioSliderControlClassID`)
///
/// Dereferences to [`AudioControl`] for the scope and element the slider
/// applies to.
///
/// ```rust
/// use std::sync::Arc;
/// use hal_controls::{SliderControl, SliderSelector};
/// use hal_object::AudioObjectId;
/// use hal_object::simulated::SimulatedHardware;
///
/// let hardware = Arc::new(SimulatedHardware::new());
/// hardware.add_slider(AudioObjectId(42), 50, &[0, 25, 50, 75, 100]);
///
/// let slider = SliderControl::from_id(AudioObjectId(42), hardware);
/// assert!(slider.has_selector(SliderSelector::Value));
/// slider.set_value(75)?;
/// assert_eq!(slider.value()?, 75);
/// assert_eq!(format!("{:?}", slider), "<SliderControl: 0x2a, (global, main), 75>");
/// # Ok::<(), hal_object::HalError>(())
/// ```
#[derive(PartialEq, Eq)]
pub struct SliderControl {
    control: AudioControl,
}

impl SliderControl {
    const TYPE_NAME: &'static str = "SliderControl";

    /// Wrap `object` without checking its class
    pub fn new(object: AudioObject) -> Self {
        Self {
            control: AudioControl::new(object),
        }
    }

    pub fn from_id(id: AudioObjectId, hardware: Arc<dyn AudioHardware>) -> Self {
        Self::new(AudioObject::new(id, hardware))
    }

    /// Wrap `object` if its class or base class is the slider class
    pub fn try_from_object(object: AudioObject) -> Result<Self> {
        if object.is_kind_of(ClassId::SLIDER_CONTROL)? {
            return Ok(Self::new(object));
        }
        Err(HalError::ClassMismatch {
            object: object.id(),
            expected: ClassId::SLIDER_CONTROL,
            actual: object.class_id()?,
        })
    }

    pub fn object(&self) -> &AudioObject {
        self.control.object()
    }

    pub fn id(&self) -> AudioObjectId {
        self.control.id()
    }

    /// The slider's current position
    pub fn value(&self) -> Result<u32> {
        self.object()
            .get_property::<U32Codec>(&SliderSelector::Value.address())
    }

    /// Move the slider to `value`
    ///
    /// The value is passed through as-is; whether it must lie in
    /// [`range`](Self::range) is up to the hardware.
    pub fn set_value(&self, value: u32) -> Result<()> {
        trace!(object = %self.id(), value, "setting slider value");
        self.object()
            .set_property::<U32Codec>(&SliderSelector::Value.address(), &value)
    }

    /// The positions the slider can take, in hardware order
    pub fn range(&self) -> Result<Vec<u32>> {
        self.object()
            .get_property::<U32ArrayCodec>(&SliderSelector::Range.address())
    }

    pub fn has_selector(&self, selector: SliderSelector) -> bool {
        self.control.has(selector)
    }

    pub fn is_selector_settable(&self, selector: SliderSelector) -> Result<bool> {
        self.control.settable(selector)
    }

    /// Register `listener` for changes to `selector`
    ///
    /// Replaces any listener this instance already holds for `selector`;
    /// `None` removes it. The listener runs on whichever thread the hardware
    /// delivers notifications on. Listeners are removed when the slider is
    /// dropped.
    pub fn when_selector_changes(
        &self,
        selector: SliderSelector,
        listener: Option<PropertyListener>,
    ) -> Result<()> {
        self.control.listen(selector, listener)
    }

    /// `<SliderControl: 0xID, (scope, element), value>`
    ///
    /// Falls back to `<SliderControl: 0xID>` if any of the three properties
    /// cannot be read.
    pub fn debug_description(&self) -> String {
        self.describe().unwrap_or_else(|e| {
            trace!(object = %self.id(), error = %e, "falling back to generic description");
            self.object().generic_description(Self::TYPE_NAME)
        })
    }

    fn describe(&self) -> Result<String> {
        Ok(format!(
            "<{}: {}, ({}, {}), {}>",
            Self::TYPE_NAME,
            self.id(),
            self.scope()?,
            self.element()?,
            self.value()?
        ))
    }
}

impl Deref for SliderControl {
    type Target = AudioControl;

    fn deref(&self) -> &AudioControl {
        &self.control
    }
}

impl fmt::Debug for SliderControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_description())
    }
}

impl TryFrom<AudioObject> for SliderControl {
    type Error = HalError;

    fn try_from(object: AudioObject) -> Result<Self> {
        Self::try_from_object(object)
    }
}
