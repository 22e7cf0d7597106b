//! # Intcode Disassembler
//!
//! Turn Intcode memory images into human-readable assembly.
//!
//! The same formatter backs the runtime's per-instruction trace log, so a
//! listing and a trace of the same program read identically.
//!
//! ## Example
//!
//! ```rust
//! use intcode_spec::Program;
//! use intcode_disassembler::disassemble;
//!
//! let program = Program::parse("109,1,204,-1,99").unwrap();
//! let asm = disassemble(&program);
//! assert!(asm.contains("out [rb-1]"));
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::disassemble;
pub use decoder::{decode_at, Decoded};
pub use formatter::{format, format_operand};
