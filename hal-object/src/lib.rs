//! # HAL Audio Objects
//!
//! Typed property access over Hardware Abstraction Layer audio objects.
//!
//! ```rust
//! use std::sync::Arc;
//! use hal_object::{AudioObject, AudioObjectId, PropertyAddress, PropertySelector, U32Codec};
//! use hal_object::simulated::SimulatedHardware;
//!
//! let hardware = Arc::new(SimulatedHardware::new());
//! hardware.add_slider(AudioObjectId(42), 50, &[0, 25, 50, 75, 100]);
//!
//! let object = AudioObject::new(AudioObjectId(42), hardware);
//! let value = PropertyAddress::global(PropertySelector::SLIDER_VALUE);
//!
//! assert_eq!(object.get_property::<U32Codec>(&value)?, 50);
//! object.set_property::<U32Codec>(&value, &75)?;
//! assert_eq!(object.get_property::<U32Codec>(&value)?, 75);
//! # Ok::<(), hal_object::HalError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! AudioObject (typed get/set, listener registry)
//!     ↓ codecs
//! dyn AudioHardware (raw bytes + OsStatus)
//!     ├── SimulatedHardware (in memory)
//!     └── CoreAudioHardware (macOS)
//! ```

pub mod address;
pub mod codec;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod object;
pub mod simulated;
pub mod status;

#[cfg(target_os = "macos")]
pub mod coreaudio;

pub use address::{four_cc, ClassId, PropertyAddress, PropertyElement, PropertyScope, PropertySelector};
pub use codec::{CodecError, PropertyCodec, U32ArrayCodec, U32Codec};
pub use error::{HalError, Result};
pub use hardware::{listener, AudioHardware, ListenerToken, PropertyListener};
pub use object::{AudioObject, AudioObjectId};
pub use status::OsStatus;

#[cfg(target_os = "macos")]
pub use coreaudio::CoreAudioHardware;
