//! Instruction decoder over a word slice

use std::fmt;

use intcode_spec::{Address, Instruction, Word};

use crate::error::{DisassemblerError, Result};
use crate::formatter::format;

/// One decoded instruction together with its raw words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub address: Address,
    pub instruction: Instruction,
    /// Instruction word followed by its parameter words
    pub words: Vec<Word>,
}

impl Decoded {
    /// Raw parameter words
    pub fn params(&self) -> &[Word] {
        &self.words[1..]
    }

    /// Address of the next instruction in a linear sweep
    pub fn next_address(&self) -> Address {
        self.address + self.words.len() as Address
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(&self.instruction, self.params()))
    }
}

/// Decode the instruction starting at `address`
pub fn decode_at(words: &[Word], address: Address) -> Result<Decoded> {
    let start = usize::try_from(address)
        .ok()
        .filter(|&start| start < words.len())
        .ok_or(DisassemblerError::OutOfRange(address))?;

    let instruction = Instruction::decode(words[start])
        .map_err(|source| DisassemblerError::InvalidInstruction { address, source })?;

    let width = instruction.width();
    let available = words.len() - start;
    if available < width {
        return Err(DisassemblerError::Truncated {
            address,
            width,
            available,
        });
    }

    Ok(Decoded {
        address,
        instruction,
        words: words[start..start + width].to_vec(),
    })
}
