//! # Instruction Word Decoding
//!
//! An instruction word packs the opcode and the parameter modes in decimal:
//!
//! ```text
//!   ABCDE
//!    1002
//!
//!   DE  - two-digit opcode           (02 = mul)
//!    C  - mode of 1st parameter      (0 = position)
//!    B  - mode of 2nd parameter      (1 = immediate)
//!    A  - mode of 3rd parameter      (0 = position, omitted leading zero)
//! ```
//!
//! Only the mode digits of parameters the opcode actually takes are
//! validated; any higher digits are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SpecError};
use crate::{Mode, Opcode, Word, MAX_PARAMS};

/// Decoded instruction word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    opcode: Opcode,
    modes: [Mode; MAX_PARAMS],
}

/// Divisor isolating the mode digit of a 1-based parameter
#[inline]
const fn mode_divisor(param: usize) -> Word {
    match param {
        1 => 100,
        2 => 1_000,
        _ => 10_000,
    }
}

impl Instruction {
    /// Instruction with every parameter in position mode
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            modes: [Mode::Position; MAX_PARAMS],
        }
    }

    /// Builder-style mode override for a 1-based parameter
    ///
    /// Parameters outside `1..=param_count` are ignored.
    pub fn with_mode(mut self, param: usize, mode: Mode) -> Self {
        if (1..=self.opcode.param_count()).contains(&param) {
            self.modes[param - 1] = mode;
        }
        self
    }

    /// Decode a raw instruction word
    pub fn decode(word: Word) -> Result<Self> {
        let opcode = Opcode::from_word(word).ok_or(SpecError::InvalidOpcode {
            word,
            opcode: word % Opcode::RADIX,
        })?;

        let mut modes = [Mode::Position; MAX_PARAMS];
        for param in 1..=opcode.param_count() {
            let digit = (word / mode_divisor(param)) % 10;
            let mode = Mode::from_digit(digit).ok_or(SpecError::InvalidMode {
                word,
                param,
                digit,
            })?;

            if mode == Mode::Immediate && opcode.writes_param(param) {
                return Err(SpecError::ImmediateWriteTarget { word, param });
            }
            modes[param - 1] = mode;
        }

        Ok(Self { opcode, modes })
    }

    /// Rebuild the canonical instruction word
    pub fn encode(&self) -> Word {
        (1..=self.opcode.param_count()).fold(self.opcode.code(), |word, param| {
            word + self.modes[param - 1].digit() * mode_divisor(param)
        })
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Addressing mode of the 1-based parameter `param`
    #[inline]
    pub fn mode(&self, param: usize) -> Mode {
        debug_assert!((1..=MAX_PARAMS).contains(&param));
        self.modes[param - 1]
    }

    /// Modes of the parameters this instruction takes
    pub fn modes(&self) -> &[Mode] {
        &self.modes[..self.opcode.param_count()]
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.opcode.width()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, mode) in self.modes().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{mode}")?;
        }
        Ok(())
    }
}
