use log::debug;
use log::info;
use log::warn;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::channel_types::Channel;
use crate::channel_types::ChannelStates;
use crate::error::ChannelError;
use crate::facility::HardwareFacility;
use crate::facility::SENTINEL_FAILURE;

/// Reads and switches the relay channels through a [`HardwareFacility`].
///
/// Every facility call and the error lookup that follows a failed call run
/// under one lock, so a diagnostic always belongs to the call that failed.
pub struct ChannelControl<F> {
    facility: Mutex<F>,
    invert_outputs: bool,
}

impl<F: HardwareFacility> ChannelControl<F> {
    pub fn new(facility: F) -> ChannelControl<F> {
        Self::with_inverted_outputs(facility, false)
    }

    /// With `invert_outputs` a logical "on" is driven as a low pin, for
    /// active-low relay boards.
    pub fn with_inverted_outputs(facility: F, invert_outputs: bool) -> ChannelControl<F> {
        ChannelControl {
            facility: Mutex::new(facility),
            invert_outputs,
        }
    }

    pub fn get_channel_state(&self, channel: Channel) -> Result<bool, ChannelError> {
        let pin = channel.pin();
        let mut facility = self.lock();

        let result = facility.query_pin(pin);
        debug!("Query of '{:?}' ({}) returned {}", channel, pin, result);

        let state = match result {
            0 => false,
            1 => true,
            SENTINEL_FAILURE => {
                let message = last_error(&*facility);
                warn!("Failed to get state of '{:?}': {:?}", channel, message);
                return Err(ChannelError::query_failure(channel, message));
            }
            unexpected => {
                return Err(ChannelError::query_failure(
                    channel,
                    Some(format!("Unexpected pin state '{}'", unexpected)),
                ))
            }
        };

        Ok(state ^ self.invert_outputs)
    }

    /// Reads all channels in declaration order, stopping at the first failure.
    pub fn get_all_channel_states(&self) -> Result<ChannelStates, ChannelError> {
        let mut states = ChannelStates::default();
        for channel in Channel::ALL {
            states.insert(channel, self.get_channel_state(channel)?);
        }
        Ok(states)
    }

    pub fn set_channel_state(&self, channel: Channel, state: bool) -> Result<(), ChannelError> {
        info!("Set '{:?}' to '{}'", channel, on_off(state));

        let pin = channel.pin();
        let mut facility = self.lock();

        let result = facility.write_pin(pin, state ^ self.invert_outputs);
        debug!("Write of '{:?}' ({}) returned {}", channel, pin, result);

        if result == SENTINEL_FAILURE {
            let message = last_error(&*facility);
            warn!("Failed to set state of '{:?}': {:?}", channel, message);
            return Err(ChannelError::write_failure(channel, message));
        }
        Ok(())
    }

    /// Switches all channels in declaration order, stopping at the first failure.
    pub fn set_all_channel_states(&self, state: bool) -> Result<(), ChannelError> {
        for channel in Channel::ALL {
            self.set_channel_state(channel, state)?;
        }
        Ok(())
    }

    /// Diagnostic of the facility's most recent failure. Empty messages count
    /// as absent.
    pub fn last_error_message(&self) -> Option<String> {
        last_error(&*self.lock())
    }

    pub fn into_inner(self) -> F {
        self.facility
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // The facility keeps no invariants a panicking caller could break.
    fn lock(&self) -> MutexGuard<'_, F> {
        self.facility
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn last_error<F: HardwareFacility>(facility: &F) -> Option<String> {
    facility
        .last_error_message()
        .filter(|message| !message.is_empty())
}

pub(crate) fn on_off(state: bool) -> &'static str {
    match state {
        true => "ON",
        false => "OFF",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_types::Pin;
    use libc::c_int;

    #[derive(Default)]
    struct Recorder {
        queried: Vec<Pin>,
        written: Vec<(Pin, bool)>,
        reply: c_int,
        error: Option<String>,
    }

    impl HardwareFacility for Recorder {
        fn query_pin(&mut self, pin: Pin) -> c_int {
            self.queried.push(pin);
            self.reply
        }

        fn write_pin(&mut self, pin: Pin, state: bool) -> c_int {
            self.written.push((pin, state));
            self.reply
        }

        fn last_error_message(&self) -> Option<String> {
            self.error.clone()
        }
    }

    #[test]
    fn query_uses_bound_pin() {
        let ctl = ChannelControl::new(Recorder {
            reply: 1,
            ..Default::default()
        });
        assert!(ctl.get_channel_state(Channel::Channel4).unwrap());
        assert_eq!(ctl.into_inner().queried, vec![Channel::Channel4.pin()]);
    }

    #[test]
    fn write_uses_bound_pin() {
        let ctl = ChannelControl::new(Recorder::default());
        ctl.set_channel_state(Channel::Channel8, true).unwrap();
        assert_eq!(
            ctl.into_inner().written,
            vec![(Channel::Channel8.pin(), true)]
        );
    }

    #[test]
    fn inverted_outputs_negate_both_directions() {
        let ctl = ChannelControl::with_inverted_outputs(
            Recorder {
                reply: 0,
                ..Default::default()
            },
            true,
        );
        assert!(ctl.get_channel_state(Channel::Channel1).unwrap());
        ctl.set_channel_state(Channel::Channel1, true).unwrap();
        assert_eq!(
            ctl.into_inner().written,
            vec![(Channel::Channel1.pin(), false)]
        );
    }

    #[test]
    fn unexpected_query_value_is_a_failure() {
        let ctl = ChannelControl::new(Recorder {
            reply: 7,
            error: Some("stale".into()),
            ..Default::default()
        });
        let err = ctl.get_channel_state(Channel::Channel2).unwrap_err();
        assert_eq!(err.message(), Some("Unexpected pin state '7'"));
    }

    #[test]
    fn only_sentinel_fails_a_write() {
        let ctl = ChannelControl::new(Recorder {
            reply: 3,
            ..Default::default()
        });
        assert!(ctl.set_channel_state(Channel::Channel2, false).is_ok());
    }

    #[test]
    fn empty_error_message_is_absent() {
        let ctl = ChannelControl::new(Recorder {
            error: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(ctl.last_error_message(), None);
    }

    #[test]
    fn set_all_stops_at_first_failure() {
        let ctl = ChannelControl::new(Recorder {
            reply: SENTINEL_FAILURE,
            error: Some("busy".into()),
            ..Default::default()
        });
        let err = ctl.set_all_channel_states(true).unwrap_err();
        assert!(matches!(
            err,
            ChannelError::HardwareWriteFailure {
                channel: Channel::Channel1,
                ..
            }
        ));
        assert_eq!(ctl.into_inner().written.len(), 1);
    }
}
