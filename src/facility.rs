use libc::c_int;

use crate::channel_types::Pin;

/// Return value signalling that a facility call could not be completed.
pub const SENTINEL_FAILURE: c_int = -1;

/// Low-level pin access as exposed by the relay board's C library.
///
/// `query_pin` answers `1` (high), `0` (low) or [`SENTINEL_FAILURE`];
/// `write_pin` answers `0` or [`SENTINEL_FAILURE`]. After a failure the cause
/// is available from `last_error_message` until the next failure replaces it.
/// The error slot is shared by every caller of the facility.
pub trait HardwareFacility {
    fn query_pin(&mut self, pin: Pin) -> c_int;

    fn write_pin(&mut self, pin: Pin, state: bool) -> c_int;

    fn last_error_message(&self) -> Option<String>;
}

impl<F: HardwareFacility + ?Sized> HardwareFacility for Box<F> {
    fn query_pin(&mut self, pin: Pin) -> c_int {
        (**self).query_pin(pin)
    }

    fn write_pin(&mut self, pin: Pin, state: bool) -> c_int {
        (**self).write_pin(pin, state)
    }

    fn last_error_message(&self) -> Option<String> {
        (**self).last_error_message()
    }
}
