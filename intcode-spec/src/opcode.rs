//! # Intcode Opcode Definitions
//!
//! The opcode is the instruction word modulo 100. The set is closed: any
//! other value is an invalid instruction.
//!
//! ## Opcode Table
//! - 1, 2: Arithmetic (ADD, MUL)
//! - 3, 4: I/O (IN, OUT)
//! - 5, 6: Jump (JT, JF)
//! - 7, 8: Compare (LT, EQ)
//! - 9: Relative base adjustment (ARB)
//! - 99: HALT

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Word;

/// Instruction opcode
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== Arithmetic ==========
    /// ADD: dst = a + b
    Add = 1,
    /// MUL: dst = a * b
    Mul = 2,

    // ========== I/O ==========
    /// IN: dst = next value from the input port
    Input = 3,
    /// OUT: send a to the output port
    Output = 4,

    // ========== Jump ==========
    /// JT: if cond != 0 { pc = target }
    JumpIfTrue = 5,
    /// JF: if cond == 0 { pc = target }
    JumpIfFalse = 6,

    // ========== Compare ==========
    /// LT: dst = (a < b) ? 1 : 0
    LessThan = 7,
    /// EQ: dst = (a == b) ? 1 : 0
    Equals = 8,

    // ========== System ==========
    /// ARB: relative_base += a
    AdjustRelativeBase = 9,
    /// HALT: stop execution
    Halt = 99,
}

impl Opcode {
    /// Divisor separating the opcode digits from the mode digits
    pub const RADIX: Word = 100;

    /// All opcodes, in numeric order
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Mul,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    /// Try to convert from the two-digit opcode value
    pub fn from_code(code: Word) -> Option<Self> {
        match code {
            1 => Some(Opcode::Add),
            2 => Some(Opcode::Mul),
            3 => Some(Opcode::Input),
            4 => Some(Opcode::Output),
            5 => Some(Opcode::JumpIfTrue),
            6 => Some(Opcode::JumpIfFalse),
            7 => Some(Opcode::LessThan),
            8 => Some(Opcode::Equals),
            9 => Some(Opcode::AdjustRelativeBase),
            99 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// Extract the opcode from a full instruction word
    #[inline]
    pub fn from_word(word: Word) -> Option<Self> {
        Self::from_code(word % Self::RADIX)
    }

    /// Numeric opcode value
    #[inline]
    pub const fn code(self) -> Word {
        self as u8 as Word
    }

    /// Number of parameters following the instruction word
    #[inline]
    pub const fn param_count(self) -> usize {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// Total width in words, instruction word included
    #[inline]
    pub const fn width(self) -> usize {
        1 + self.param_count()
    }

    /// Check if the 1-based parameter `param` is a destination
    #[inline]
    pub const fn writes_param(self, param: usize) -> bool {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::LessThan | Opcode::Equals => param == 3,
            Opcode::Input => param == 1,
            _ => false,
        }
    }

    /// Check if this opcode may set the program counter itself
    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(self, Opcode::JumpIfTrue | Opcode::JumpIfFalse)
    }

    /// Check if this opcode talks to an I/O port
    #[inline]
    pub const fn is_io(self) -> bool {
        matches!(self, Opcode::Input | Opcode::Output)
    }

    /// Assembly mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Mul => "mul",
            Opcode::Input => "in",
            Opcode::Output => "out",
            Opcode::JumpIfTrue => "jt",
            Opcode::JumpIfFalse => "jf",
            Opcode::LessThan => "lt",
            Opcode::Equals => "eq",
            Opcode::AdjustRelativeBase => "arb",
            Opcode::Halt => "halt",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
