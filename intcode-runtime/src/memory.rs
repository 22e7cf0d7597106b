//! Memory subsystem
//!
//! Sparse, zero-filled word storage. Unwritten cells read as 0, writes
//! never fail and push the high-water mark (`extent`) outward. Memory
//! never shrinks.

use std::collections::HashMap;

use intcode_spec::{Address, Program, Word};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    /// Non-zero cells only
    data: HashMap<Address, Word>,
    /// One past the highest address ever written
    extent: Address,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory holding `words` at addresses 0, 1, 2, ...
    pub fn from_words(words: &[Word]) -> Self {
        let mut memory = Self::new();
        memory.load(words);
        memory
    }

    /// Append-load `words` starting at address 0
    pub fn load(&mut self, words: &[Word]) {
        for (addr, &word) in words.iter().enumerate() {
            self.write(addr as Address, word);
        }
    }

    #[inline]
    pub fn read(&self, addr: Address) -> Word {
        self.data.get(&addr).copied().unwrap_or(0)
    }

    #[inline]
    pub fn write(&mut self, addr: Address, value: Word) {
        if value == 0 {
            self.data.remove(&addr);
        } else {
            self.data.insert(addr, value);
        }
        self.extent = self.extent.max(addr.saturating_add(1));
    }

    /// One past the highest address ever written
    pub fn extent(&self) -> Address {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.extent as usize
    }

    pub fn is_empty(&self) -> bool {
        self.extent == 0
    }

    /// Dense copy of addresses `0..extent`
    pub fn to_vec(&self) -> Vec<Word> {
        (0..self.extent).map(|addr| self.read(addr)).collect()
    }

    /// Dense copy of `len` cells starting at `start`
    pub fn slice(&self, start: Address, len: usize) -> Vec<Word> {
        (0..len as Address)
            .map(|offset| self.read(start.saturating_add(offset)))
            .collect()
    }
}

impl From<&Program> for Memory {
    fn from(program: &Program) -> Self {
        Self::from_words(program.words())
    }
}

/// Interpret a word as an address; negative words are not addresses
#[inline]
pub fn to_address(raw: Word) -> Option<Address> {
    Address::try_from(raw).ok()
}
