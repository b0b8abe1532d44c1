use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use thiserror::Error;

use crate::channel_types::Channel;
use crate::channel_types::Pin;

/// Diagnostic reported by the hardware facility, if it supplied one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic(pub Option<String>);

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.0 {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "no diagnostic available"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Failed to get state of {channel} ({pin}): {message}")]
    HardwareQueryFailure {
        channel: Channel,
        pin: Pin,
        message: Diagnostic,
    },

    #[error("Failed to set state of {channel} ({pin}): {message}")]
    HardwareWriteFailure {
        channel: Channel,
        pin: Pin,
        message: Diagnostic,
    },

    #[error("Invalid channel number '{0}', expected 1 to 8")]
    InvalidChannel(u8),
}

impl ChannelError {
    pub fn query_failure(channel: Channel, message: Option<String>) -> Self {
        Self::HardwareQueryFailure {
            channel,
            pin: channel.pin(),
            message: Diagnostic(message),
        }
    }

    pub fn write_failure(channel: Channel, message: Option<String>) -> Self {
        Self::HardwareWriteFailure {
            channel,
            pin: channel.pin(),
            message: Diagnostic(message),
        }
    }

    /// The facility's diagnostic, verbatim.
    pub fn message(&self) -> Option<&str> {
        match self {
            ChannelError::HardwareQueryFailure { message, .. }
            | ChannelError::HardwareWriteFailure { message, .. } => message.0.as_deref(),
            ChannelError::InvalidChannel(_) => None,
        }
    }

    pub fn channel(&self) -> Option<Channel> {
        match self {
            ChannelError::HardwareQueryFailure { channel, .. }
            | ChannelError::HardwareWriteFailure { channel, .. } => Some(*channel),
            ChannelError::InvalidChannel(_) => None,
        }
    }
}

/// Failures inside the character-device backend, before they are flattened
/// into the facility's last-error slot.
#[derive(Debug, Error)]
pub enum GpioError {
    #[error(transparent)]
    Cdev(#[from] gpio_cdev::errors::Error),

    #[error("No line named '{line_name}' on '{chip}'")]
    LineNotFound { chip: String, line_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_names_channel_and_pin() {
        let err = ChannelError::query_failure(Channel::Channel3, Some("permission denied".into()));
        assert_eq!(
            err.to_string(),
            "Failed to get state of Channel 3 (GPIO13): permission denied"
        );
        assert_eq!(err.message(), Some("permission denied"));
        assert_eq!(err.channel(), Some(Channel::Channel3));
    }

    #[test]
    fn missing_diagnostic_is_still_reported() {
        let err = ChannelError::write_failure(Channel::Channel8, None);
        assert_eq!(
            err.to_string(),
            "Failed to set state of Channel 8 (GPIO26): no diagnostic available"
        );
        assert_eq!(err.message(), None);
    }
}
