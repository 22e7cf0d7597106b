//! # Intcode Instruction Set
//!
//! Core types shared by the Intcode toolchain.
//!
//! ## Key Features
//! - 64-bit signed data words
//! - Instruction words carry the opcode in their two low decimal digits and
//!   one addressing mode digit per parameter above that
//! - Three addressing modes: position, immediate, relative
//! - Closed instruction set of ten opcodes
//! - Comma-separated program text and a checksummed binary image format

pub mod error;
pub mod opcode;
pub mod mode;
pub mod instruction;
pub mod lexer;
pub mod program;

pub use error::{SpecError, Result};
pub use opcode::Opcode;
pub use mode::Mode;
pub use instruction::Instruction;
pub use program::Program;

/// Magic number for program images: "ICDE" = 0x49434445
pub const MAGIC: u32 = 0x4943_4445;

/// Image format version: v1.0 = 0x00010000
pub const VERSION: u32 = 0x0001_0000;

/// Data word. Every memory cell, operand and I/O value is one word.
pub type Word = i64;

/// Memory address. Negative words never become addresses.
pub type Address = u64;

/// Maximum number of parameters any instruction takes
pub const MAX_PARAMS: usize = 3;
