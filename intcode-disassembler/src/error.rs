//! Disassembler errors

use intcode_spec::{Address, SpecError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Invalid instruction at {address}: {source}")]
    InvalidInstruction { address: Address, source: SpecError },

    #[error("Truncated instruction at {address}: needs {width} words, {available} available")]
    Truncated {
        address: Address,
        width: usize,
        available: usize,
    },

    #[error("Address {0} is past the end of the program")]
    OutOfRange(Address),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
