//! Binding to the board vendor's `libwave8channelselect` shared library.

use libc::c_char;
use libc::c_int;
use std::ffi::CStr;

use crate::channel_types::Pin;
use crate::facility::HardwareFacility;

#[link(name = "wave8channelselect")]
extern "C" {
    #[link_name = "getChannelState"]
    fn get_channel_state(pin: c_int) -> c_int;

    #[link_name = "setChannelState"]
    fn set_channel_state(pin: c_int, state: bool) -> c_int;

    #[link_name = "getLastError"]
    fn get_last_error() -> *const c_char;
}

/// Pin access through `libwave8channelselect.so`.
///
/// The library keeps a single process-wide error slot, so callers should go
/// through one [`ChannelControl`](crate::ChannelControl) per process.
#[derive(Debug, Default)]
pub struct FfiFacility;

impl FfiFacility {
    pub fn new() -> FfiFacility {
        FfiFacility
    }
}

// Registry pins are all below 32, so the conversion cannot truncate.
fn raw_pin(pin: Pin) -> c_int {
    pin.number() as c_int
}

impl HardwareFacility for FfiFacility {
    fn query_pin(&mut self, pin: Pin) -> c_int {
        unsafe { get_channel_state(raw_pin(pin)) }
    }

    fn write_pin(&mut self, pin: Pin, state: bool) -> c_int {
        unsafe { set_channel_state(raw_pin(pin), state) }
    }

    fn last_error_message(&self) -> Option<String> {
        // The returned buffer is owned by the library and stays valid until
        // its next failing call.
        let message = unsafe { get_last_error() };
        if message.is_null() {
            return None;
        }
        let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
        match message.is_empty() {
            true => None,
            false => Some(message.into_owned()),
        }
    }
}
