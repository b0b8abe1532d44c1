use anyhow::Result;
use channel_select::CdevConfig;
use channel_select::Channel;
use channel_select::ChannelStates;
use clap::ArgAction;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Controls the relay channels of a Waveshare 8-channel relay board",
    after_help = "Examples:\n    \
        channel-select -e -123    enable channels 1, 2 and 3\n    \
        channel-select -d -528    disable channels 5, 2 and 8\n    \
        channel-select -L         read the states of all channels\n\n\
        Permission denied? Is your user in the gpio group? (usermod -aG gpio <user>)"
)]
pub struct Args {
    #[arg(short = '1', long)]
    pub channel1: bool,
    #[arg(short = '2', long)]
    pub channel2: bool,
    #[arg(short = '3', long)]
    pub channel3: bool,
    #[arg(short = '4', long)]
    pub channel4: bool,
    #[arg(short = '5', long)]
    pub channel5: bool,
    #[arg(short = '6', long)]
    pub channel6: bool,
    #[arg(short = '7', long)]
    pub channel7: bool,
    #[arg(short = '8', long)]
    pub channel8: bool,

    /// Select all channels
    #[arg(short, long)]
    pub all: bool,

    /// Switch the selected channels on
    #[arg(short, long, group = "action")]
    pub enable: bool,

    /// Switch the selected channels off
    #[arg(short, long, group = "action")]
    pub disable: bool,

    /// Read the state of the selected channels (default)
    #[arg(short, long, group = "action")]
    pub read_state: bool,

    /// List all channels and their current state
    #[arg(short = 'L', long)]
    pub list_all: bool,

    /// Print results as JSON
    #[arg(short, long)]
    pub json_out: bool,

    /// Invert channel states (for active-low boards)
    #[arg(short, long)]
    pub invert: bool,

    /// GPIO chip carrying the relay lines
    #[arg(long, value_name = "PATH", default_value = "/dev/gpiochip4")]
    pub gpio_chip: PathBuf,

    /// GPIO chip tried when the relay lines are not found on --gpio-chip
    #[arg(long, value_name = "PATH", default_value = "/dev/gpiochip0")]
    pub fallback_gpio_chip: PathBuf,

    /// Use libwave8channelselect.so instead of the GPIO character device
    #[cfg(feature = "wave8ch-lib")]
    #[arg(long)]
    pub use_lib: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
    Read,
}

impl Args {
    /// Selected channels in declaration order.
    pub fn channels(&self) -> Vec<Channel> {
        if self.all || self.list_all {
            return Channel::ALL.to_vec();
        }
        let flags = [
            self.channel1,
            self.channel2,
            self.channel3,
            self.channel4,
            self.channel5,
            self.channel6,
            self.channel7,
            self.channel8,
        ];
        Channel::ALL
            .iter()
            .zip(flags)
            .filter(|(_, selected)| *selected)
            .map(|(channel, _)| *channel)
            .collect()
    }

    pub fn action(&self) -> Action {
        if self.list_all || self.read_state {
            Action::Read
        } else if self.enable {
            Action::Enable
        } else if self.disable {
            Action::Disable
        } else {
            Action::Read
        }
    }

    pub fn cdev_config(&self) -> CdevConfig {
        CdevConfig {
            chip: self.gpio_chip.clone(),
            fallback_chip: self.fallback_gpio_chip.clone(),
            ..CdevConfig::default()
        }
    }
}

pub fn render(states: &ChannelStates, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(states)?);
    }
    let lines: Vec<String> = states
        .iter()
        .map(|(channel, state)| {
            format!(
                "{} (GPIO pin {}) set to {}",
                channel,
                channel.pin().number(),
                if state { "ON" } else { "OFF" }
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
