//! The seam between typed objects and the audio subsystem
//!
//! `AudioHardware` is the raw, byte-level property interface every backend
//! implements. `AudioObject` and the typed controls built on it never talk to
//! the OS directly; they go through a shared `Arc<dyn AudioHardware>`.

use std::fmt;
use std::sync::Arc;

use crate::address::PropertyAddress;
use crate::object::AudioObjectId;
use crate::status::OsStatus;

/// Callback invoked when one or more properties of an object change
///
/// Receives the object and the addresses the subsystem reported. The thread
/// it runs on is chosen by the backend.
pub type PropertyListener = Arc<dyn Fn(AudioObjectId, &[PropertyAddress]) + Send + Sync>;

/// Identifies one listener registration within a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

impl fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte-level property access on hardware-owned objects
///
/// Implementations report failures as raw `OsStatus` codes; mapping those
/// onto `HalError` is done by `AudioObject`, which knows which operation and
/// address a status belongs to.
pub trait AudioHardware: Send + Sync {
    /// Whether `object` exposes the property at `address`
    fn has_property(&self, object: AudioObjectId, address: &PropertyAddress) -> bool;

    /// Whether the property can currently be written
    fn is_property_settable(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<bool, OsStatus>;

    /// Size in bytes of the property's current value
    fn property_data_size(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<usize, OsStatus>;

    /// The property's current value as raw bytes
    fn property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<Vec<u8>, OsStatus>;

    /// Replace the property's value
    fn set_property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        data: &[u8],
    ) -> Result<(), OsStatus>;

    /// Attach `listener` to changes of the property at `address`
    fn add_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        listener: PropertyListener,
    ) -> Result<ListenerToken, OsStatus>;

    /// Detach a listener previously returned by `add_listener`
    fn remove_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        token: ListenerToken,
    ) -> Result<(), OsStatus>;
}

/// Wrap a closure as a `PropertyListener`
pub fn listener<F>(f: F) -> PropertyListener
where
    F: Fn(AudioObjectId, &[PropertyAddress]) + Send + Sync + 'static,
{
    Arc::new(f)
}
