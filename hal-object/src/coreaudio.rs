//! `AudioHardware` over the macOS Core Audio HAL
//!
//! Thin, unsafe-contained wrappers around the `AudioObject*` C functions.
//! Property payloads are passed through as native-endian bytes, which is the
//! layout the in-process HAL uses.

use std::collections::HashMap;
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};

use coreaudio_sys::{
    AudioObjectAddPropertyListener, AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize,
    AudioObjectHasProperty, AudioObjectID, AudioObjectIsPropertySettable,
    AudioObjectPropertyAddress, AudioObjectRemovePropertyListener, AudioObjectSetPropertyData,
    Boolean, OSStatus,
};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::address::{PropertyAddress, PropertyElement, PropertyScope, PropertySelector};
use crate::hardware::{AudioHardware, ListenerToken, PropertyListener};
use crate::object::AudioObjectId;
use crate::status::OsStatus;

fn to_raw(address: &PropertyAddress) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: address.selector.code(),
        mScope: address.scope.code(),
        mElement: address.element.0,
    }
}

fn from_raw(address: &AudioObjectPropertyAddress) -> PropertyAddress {
    PropertyAddress::new(
        PropertySelector::new(address.mSelector),
        PropertyScope::from_code(address.mScope),
        PropertyElement(address.mElement),
    )
}

/// Heap-pinned state handed to the HAL as the listener's client data
struct ListenerContext {
    listener: PropertyListener,
    address: AudioObjectPropertyAddress,
}

/// Called by the HAL on its notification thread
unsafe extern "C" fn listener_proc(
    object: AudioObjectID,
    count: u32,
    addresses: *const AudioObjectPropertyAddress,
    client_data: *mut c_void,
) -> OSStatus {
    if client_data.is_null() || addresses.is_null() {
        return 0;
    }

    // SAFETY: client_data is the Box<ListenerContext> registered in add_listener,
    // kept alive in CoreAudioHardware::contexts until the listener is removed.
    let context = &*(client_data as *const ListenerContext);
    let raw = std::slice::from_raw_parts(addresses, count as usize);
    let changed: Vec<PropertyAddress> = raw.iter().map(from_raw).collect();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        (context.listener)(AudioObjectId(object), &changed)
    }));
    if result.is_err() {
        error!(object = %AudioObjectId(object), "property listener panicked");
    }
    0
}

/// The system's Core Audio HAL
pub struct CoreAudioHardware {
    contexts: Mutex<HashMap<ListenerToken, Box<ListenerContext>>>,
    next_token: AtomicU64,
}

impl CoreAudioHardware {
    pub fn new() -> Self {
        Self {
            contexts: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }
}

impl Default for CoreAudioHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHardware for CoreAudioHardware {
    fn has_property(&self, object: AudioObjectId, address: &PropertyAddress) -> bool {
        let raw = to_raw(address);
        // SAFETY: raw outlives the call; the HAL only reads it.
        unsafe { AudioObjectHasProperty(object.0, &raw) != 0 }
    }

    fn is_property_settable(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<bool, OsStatus> {
        let raw = to_raw(address);
        let mut settable: Boolean = 0;
        // SAFETY: both pointers refer to live locals.
        let status = unsafe { AudioObjectIsPropertySettable(object.0, &raw, &mut settable) };
        OsStatus(status).check()?;
        Ok(settable != 0)
    }

    fn property_data_size(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<usize, OsStatus> {
        let raw = to_raw(address);
        let mut size: u32 = 0;
        // SAFETY: no qualifier; size is a live local.
        let status = unsafe {
            AudioObjectGetPropertyDataSize(object.0, &raw, 0, ptr::null(), &mut size)
        };
        OsStatus(status).check()?;
        Ok(size as usize)
    }

    fn property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
    ) -> Result<Vec<u8>, OsStatus> {
        let raw = to_raw(address);
        let mut size = self.property_data_size(object, address)? as u32;
        let mut data = vec![0u8; size as usize];
        // SAFETY: data has room for `size` bytes; the HAL writes back the
        // number of bytes it actually produced.
        let status = unsafe {
            AudioObjectGetPropertyData(
                object.0,
                &raw,
                0,
                ptr::null(),
                &mut size,
                data.as_mut_ptr() as *mut c_void,
            )
        };
        OsStatus(status).check()?;
        data.truncate(size as usize);
        Ok(data)
    }

    fn set_property_data(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        data: &[u8],
    ) -> Result<(), OsStatus> {
        let raw = to_raw(address);
        // SAFETY: data is valid for data.len() bytes for the duration of the call.
        let status = unsafe {
            AudioObjectSetPropertyData(
                object.0,
                &raw,
                0,
                ptr::null(),
                data.len() as u32,
                data.as_ptr() as *const c_void,
            )
        };
        OsStatus(status).check()
    }

    fn add_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        listener: PropertyListener,
    ) -> Result<ListenerToken, OsStatus> {
        let context = Box::new(ListenerContext {
            listener,
            address: to_raw(address),
        });
        let client_data = &*context as *const ListenerContext as *mut c_void;

        // SAFETY: client_data points into the boxed context, which is stored
        // below and only freed after the HAL registration is removed.
        let status = unsafe {
            AudioObjectAddPropertyListener(
                object.0,
                &context.address,
                Some(listener_proc),
                client_data,
            )
        };
        OsStatus(status).check()?;

        let token = ListenerToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.contexts.lock().insert(token, context);
        debug!(object = %object, %address, %token, "core audio listener added");
        Ok(token)
    }

    fn remove_listener(
        &self,
        object: AudioObjectId,
        address: &PropertyAddress,
        token: ListenerToken,
    ) -> Result<(), OsStatus> {
        let mut contexts = self.contexts.lock();
        let context = contexts.get(&token).ok_or(OsStatus::ILLEGAL_OPERATION)?;
        if from_raw(&context.address) != *address {
            return Err(OsStatus::ILLEGAL_OPERATION);
        }
        let client_data = &**context as *const ListenerContext as *mut c_void;

        // SAFETY: same address and client data as the matching add call.
        let status = unsafe {
            AudioObjectRemovePropertyListener(
                object.0,
                &context.address,
                Some(listener_proc),
                client_data,
            )
        };
        OsStatus(status).check()?;

        contexts.remove(&token);
        Ok(())
    }
}

impl Drop for CoreAudioHardware {
    fn drop(&mut self) {
        let remaining = self.contexts.get_mut().len();
        if remaining > 0 {
            // Contexts still registered with the HAL must not be freed
            error!(remaining, "core audio hardware dropped with live listeners; leaking them");
            for (_, context) in self.contexts.get_mut().drain() {
                std::mem::forget(context);
            }
        }
    }
}
