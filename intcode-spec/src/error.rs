//! # Error Types for Intcode

use crate::Word;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    // Instruction errors
    #[error("Invalid opcode {opcode} in instruction word {word}")]
    InvalidOpcode { word: Word, opcode: Word },

    #[error("Invalid addressing mode {digit} for parameter {param} in instruction word {word}")]
    InvalidMode { word: Word, param: usize, digit: Word },

    #[error("Immediate mode used for destination parameter {param} in instruction word {word}")]
    ImmediateWriteTarget { word: Word, param: usize },

    // Program text errors
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Program text is empty")]
    EmptyProgram,

    // Program image errors
    #[error("Invalid program image: {0}")]
    InvalidFormat(String),

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(String),
}

impl SpecError {
    /// Check if this error was raised while decoding an instruction word
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            SpecError::InvalidOpcode { .. }
                | SpecError::InvalidMode { .. }
                | SpecError::ImmediateWriteTarget { .. }
        )
    }
}

impl From<std::io::Error> for SpecError {
    fn from(err: std::io::Error) -> Self {
        SpecError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
