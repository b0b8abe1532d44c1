use serde::Serialize;
use serde::Serializer;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::error::ChannelError;

/// The eight relay channels of the board.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Channel {
    Channel1,
    Channel2,
    Channel3,
    Channel4,
    Channel5,
    Channel6,
    Channel7,
    Channel8,
}

/// GPIO line driving a channel (BCM numbering, line name `GPIO<n>`).
///
/// Only the registry hands these out, so a `Pin` always belongs to one of
/// the eight channels.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pin(u32);

// Index i holds the pin of `Channel::ALL[i]`.
const PINS: [Pin; 8] = [
    Pin(5),
    Pin(6),
    Pin(13),
    Pin(16),
    Pin(19),
    Pin(20),
    Pin(21),
    Pin(26),
];

impl Channel {
    /// All channels in declaration order.
    pub const ALL: [Channel; 8] = [
        Channel::Channel1,
        Channel::Channel2,
        Channel::Channel3,
        Channel::Channel4,
        Channel::Channel5,
        Channel::Channel6,
        Channel::Channel7,
        Channel::Channel8,
    ];

    fn index(&self) -> usize {
        match self {
            Channel::Channel1 => 0,
            Channel::Channel2 => 1,
            Channel::Channel3 => 2,
            Channel::Channel4 => 3,
            Channel::Channel5 => 4,
            Channel::Channel6 => 5,
            Channel::Channel7 => 6,
            Channel::Channel8 => 7,
        }
    }

    pub fn pin(&self) -> Pin {
        PINS[self.index()]
    }

    /// 1-based channel number as printed on the board.
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Channel> {
        match number {
            1..=8 => Some(Channel::ALL[usize::from(number) - 1]),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = ChannelError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Channel::from_number(number).ok_or(ChannelError::InvalidChannel(number))
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Channel {}", self.number())
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl Pin {
    pub fn number(&self) -> u32 {
        self.0
    }
}

impl Display for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "GPIO{}", self.0)
    }
}

impl Serialize for Pin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

/// Point-in-time on/off state of every channel, keyed in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelStates(BTreeMap<Channel, bool>);

#[derive(Serialize)]
struct ChannelStateEntry {
    channel: Channel,
    gpio_pin: Pin,
    state: bool,
}

impl ChannelStates {
    pub(crate) fn insert(&mut self, channel: Channel, state: bool) {
        self.0.insert(channel, state);
    }

    pub fn get(&self, channel: Channel) -> Option<bool> {
        self.0.get(&channel).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, bool)> + '_ {
        self.0.iter().map(|(channel, state)| (*channel, *state))
    }
}

impl IntoIterator for ChannelStates {
    type Item = (Channel, bool);
    type IntoIter = btree_map::IntoIter<Channel, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(Channel, bool)> for ChannelStates {
    fn from_iter<T: IntoIterator<Item = (Channel, bool)>>(iter: T) -> Self {
        ChannelStates(iter.into_iter().collect())
    }
}

// Serialized as `[{ "channel": 1, "gpio_pin": 5, "state": true }, ...]`.
impl Serialize for ChannelStates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(channel, state)| ChannelStateEntry {
            channel,
            gpio_pin: channel.pin(),
            state,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pin_table_matches_board_wiring() {
        let pins: Vec<u32> = Channel::ALL.iter().map(|c| c.pin().number()).collect();
        assert_eq!(pins, vec![5, 6, 13, 16, 19, 20, 21, 26]);
    }

    #[test]
    fn pins_are_unique() {
        let pins: HashSet<Pin> = Channel::ALL.iter().map(|c| c.pin()).collect();
        assert_eq!(pins.len(), 8);
    }

    #[test]
    fn channel_numbers_round_trip() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.number() as usize, i + 1);
            assert_eq!(Channel::from_number(channel.number()), Some(*channel));
        }
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(Channel::from_number(0), None);
        assert_eq!(Channel::from_number(9), None);
        assert!(matches!(
            Channel::try_from(12),
            Err(ChannelError::InvalidChannel(12))
        ));
    }

    #[test]
    fn display() {
        assert_eq!(Channel::Channel3.to_string(), "Channel 3");
        assert_eq!(Channel::Channel3.pin().to_string(), "GPIO13");
    }

    #[test]
    fn states_serialize_as_board_entries() {
        let states: ChannelStates = [(Channel::Channel2, false), (Channel::Channel1, true)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&states).unwrap();
        assert_eq!(
            json,
            r#"[{"channel":1,"gpio_pin":5,"state":true},{"channel":2,"gpio_pin":6,"state":false}]"#
        );
    }
}
