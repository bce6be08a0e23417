//! # HAL Audio Controls - typed access to control objects
//!
//! Wraps HAL control objects in types whose properties are named by a
//! closed selector enum instead of raw four-character codes:
//!
//! ```rust
//! use std::sync::Arc;
//! use hal_controls::{SliderControl, SliderSelector};
//! use hal_object::{listener, AudioObjectId};
//! use hal_object::simulated::SimulatedHardware;
//!
//! let hardware = Arc::new(SimulatedHardware::new());
//! hardware.add_slider(AudioObjectId(42), 50, &[0, 25, 50, 75, 100]);
//!
//! let slider = SliderControl::from_id(AudioObjectId(42), hardware);
//!
//! let range = slider.range()?;                      // legal positions
//! slider.set_value(range[3])?;                      // hardware decides validity
//! slider.when_selector_changes(
//!     SliderSelector::Value,
//!     Some(listener(|id, changed| println!("{id}: {} changed", changed.len()))),
//! )?;
//!
//! println!("{:?}", slider);                         // <SliderControl: 0x2a, (global, main), 75>
//! # Ok::<(), hal_object::HalError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! SliderControl (value / set_value / range)
//!     ↓ Deref
//! AudioControl (scope / element)
//!     ↓
//! hal_object::AudioObject (typed property access, listener registry)
//!     ↓
//! dyn AudioHardware
//! ```
//!
//! No values are cached: every read goes to the hardware, and change
//! listeners receive the changed addresses rather than the new values.

pub use control::AudioControl;
pub use selector::{ControlSelector, ObjectSelector, SliderSelector};
pub use slider::SliderControl;

pub use hal_object::{AudioObject, AudioObjectId, HalError, PropertyListener, Result};

mod control;
mod selector;
mod slider;
