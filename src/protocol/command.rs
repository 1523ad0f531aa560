//! Literal control commands.
//!
//! Every command is a fixed 8-byte sequence captured from the controller's
//! own keypad traffic. Nothing here is computed; the trailing check bytes
//! are copied as-is.

use std::fmt;
use std::str::FromStr;

use crate::error::DeskError;

/// Size of every command on the wire.
pub const COMMAND_LEN: usize = 8;

const WAKE_UP: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x00, 0x00, 0x6c, 0xa1, 0x9d];
const UP: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x01, 0x00, 0xfc, 0xa0, 0x9d];
const DOWN: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x02, 0x00, 0x0c, 0xa0, 0x9d];
const PRESET_1: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x04, 0x00, 0xac, 0xa3, 0x9d];
const PRESET_2: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x08, 0x00, 0xac, 0xa6, 0x9d];
const PRESET_3: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x10, 0x00, 0xac, 0xac, 0x9d];
const PRESET_4: [u8; COMMAND_LEN] = [0x9b, 0x06, 0x02, 0x00, 0x01, 0xac, 0x60, 0x9d];

/// A command the desk understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeskCommand {
    /// Wakes the display; the controller answers with a height report.
    WakeUp,
    /// One step up. Hold-to-move is done by repeating it.
    Up,
    /// One step down.
    Down,
    /// Memory preset 1.
    Preset1,
    /// Memory preset 2.
    Preset2,
    /// Memory preset 3.
    Preset3,
    /// Memory preset 4.
    Preset4,
}

impl DeskCommand {
    /// All commands, in keypad order.
    pub const ALL: [DeskCommand; 7] = [
        DeskCommand::WakeUp,
        DeskCommand::Up,
        DeskCommand::Down,
        DeskCommand::Preset1,
        DeskCommand::Preset2,
        DeskCommand::Preset3,
        DeskCommand::Preset4,
    ];

    /// The memory preset with the given number (1-4).
    pub fn preset(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Preset1),
            2 => Some(Self::Preset2),
            3 => Some(Self::Preset3),
            4 => Some(Self::Preset4),
            _ => None,
        }
    }

    /// The bytes sent on the wire.
    pub fn as_bytes(&self) -> &'static [u8; COMMAND_LEN] {
        match self {
            Self::WakeUp => &WAKE_UP,
            Self::Up => &UP,
            Self::Down => &DOWN,
            Self::Preset1 => &PRESET_1,
            Self::Preset2 => &PRESET_2,
            Self::Preset3 => &PRESET_3,
            Self::Preset4 => &PRESET_4,
        }
    }

    /// Kebab-case name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WakeUp => "wake-up",
            Self::Up => "up",
            Self::Down => "down",
            Self::Preset1 => "preset-1",
            Self::Preset2 => "preset-2",
            Self::Preset3 => "preset-3",
            Self::Preset4 => "preset-4",
        }
    }
}

impl fmt::Display for DeskCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeskCommand {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DeskError::InvalidCommand(s.to_string()))
    }
}
