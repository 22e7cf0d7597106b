//! Parameter addressing modes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Word;

/// How a parameter's raw word becomes an operand
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// The parameter is an address
    #[default]
    Position = 0,
    /// The parameter is the operand itself (never a destination)
    Immediate = 1,
    /// The parameter is an offset from the relative base
    Relative = 2,
}

impl Mode {
    /// Convert from a single decimal mode digit
    pub fn from_digit(digit: Word) -> Option<Self> {
        match digit {
            0 => Some(Mode::Position),
            1 => Some(Mode::Immediate),
            2 => Some(Mode::Relative),
            _ => None,
        }
    }

    #[inline]
    pub const fn digit(self) -> Word {
        self as u8 as Word
    }

    /// Check if a parameter in this mode can be written through
    #[inline]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Mode::Immediate)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Position => "position",
            Mode::Immediate => "immediate",
            Mode::Relative => "relative",
        };
        f.write_str(name)
    }
}
