//! Resolved operand locations
//!
//! Every parameter resolves to a [`Location`] once, after which an
//! instruction reads or writes it without looking at the mode again.

use intcode_spec::{Address, Mode, Word};
use thiserror::Error;

use crate::error::RuntimeError;
use crate::memory::{to_address, Memory};

/// Where an operand lives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Memory cell (position and relative modes)
    Cell(Address),
    /// Literal operand (immediate mode), read-only
    Immediate(Word),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("negative address {0}")]
    NegativeAddress(Word),

    #[error("address computation overflowed")]
    Overflow,

    #[error("immediate operand is read-only")]
    ReadOnly,
}

impl LocationError {
    /// Attach instruction context
    pub fn at(self, pc: Address, param: usize) -> RuntimeError {
        match self {
            LocationError::NegativeAddress(address) => RuntimeError::NegativeAddress { pc, address },
            LocationError::Overflow => RuntimeError::ArithmeticOverflow { pc },
            LocationError::ReadOnly => RuntimeError::InvalidWriteTarget { pc, param },
        }
    }
}

impl Location {
    /// Resolve a raw parameter word under `mode`
    pub fn resolve(mode: Mode, raw: Word, relative_base: Word) -> Result<Self, LocationError> {
        let address = match mode {
            Mode::Immediate => return Ok(Location::Immediate(raw)),
            Mode::Position => raw,
            Mode::Relative => raw
                .checked_add(relative_base)
                .ok_or(LocationError::Overflow)?,
        };
        to_address(address)
            .map(Location::Cell)
            .ok_or(LocationError::NegativeAddress(address))
    }

    #[inline]
    pub fn get(&self, memory: &Memory) -> Word {
        match *self {
            Location::Cell(addr) => memory.read(addr),
            Location::Immediate(value) => value,
        }
    }

    /// Write through the location; immediate operands refuse
    #[inline]
    pub fn set(&self, memory: &mut Memory, value: Word) -> Result<(), LocationError> {
        match *self {
            Location::Cell(addr) => {
                memory.write(addr, value);
                Ok(())
            }
            Location::Immediate(_) => Err(LocationError::ReadOnly),
        }
    }
}
