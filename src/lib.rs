//! Channel registry and control facade for the Waveshare 8-channel relay board.
//!
//! ```no_run
//! use channel_select::CdevFacility;
//! use channel_select::Channel;
//! use channel_select::ChannelControl;
//!
//! # fn main() -> Result<(), channel_select::ChannelError> {
//! let ctl = ChannelControl::new(CdevFacility::default());
//! let on = ctl.get_channel_state(Channel::Channel1)?;
//! ctl.set_channel_state(Channel::Channel1, !on)?;
//! # Ok(())
//! # }
//! ```

mod cdev;
mod channel_ctl;
mod channel_types;
mod error;
mod facility;
#[cfg(feature = "wave8ch-lib")]
mod ffi;

pub use cdev::CdevConfig;
pub use cdev::CdevFacility;
pub use channel_ctl::ChannelControl;
pub use channel_types::Channel;
pub use channel_types::ChannelStates;
pub use channel_types::Pin;
pub use error::ChannelError;
pub use error::Diagnostic;
pub use error::GpioError;
pub use facility::HardwareFacility;
pub use facility::SENTINEL_FAILURE;
#[cfg(feature = "wave8ch-lib")]
pub use ffi::FfiFacility;
