//! Runtime error types for Intcode

use intcode_spec::{Address, SpecError, Word};
use thiserror::Error;

/// Failure reported by an I/O port
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port is not wired")]
    Unwired,

    #[error("input exhausted")]
    Exhausted,

    #[error("{0}")]
    Rejected(String),
}

/// Fatal machine fault. Every variant except `Spec` names the program
/// counter of the faulting instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Program error: {0}")]
    Spec(#[from] SpecError),

    #[error("Bad opcode {opcode} at pc {pc} (word {word})")]
    InvalidOpcode { pc: Address, word: Word, opcode: Word },

    #[error("Unsupported mode {digit} for parameter {param} at pc {pc}")]
    InvalidMode { pc: Address, param: usize, digit: Word },

    #[error("Immediate-mode destination for parameter {param} at pc {pc}")]
    InvalidWriteTarget { pc: Address, param: usize },

    #[error("Negative address {address} at pc {pc}")]
    NegativeAddress { pc: Address, address: Word },

    #[error("Arithmetic overflow at pc {pc}")]
    ArithmeticOverflow { pc: Address },

    #[error("Input failed at pc {pc}: {source}")]
    Input { pc: Address, source: PortError },

    #[error("Output of {value} failed at pc {pc}: {source}")]
    Output {
        pc: Address,
        value: Word,
        source: PortError,
    },
}

impl RuntimeError {
    /// Attach the faulting program counter to an instruction decode error
    pub fn decode(pc: Address, err: SpecError) -> Self {
        match err {
            SpecError::InvalidOpcode { word, opcode } => RuntimeError::InvalidOpcode { pc, word, opcode },
            SpecError::InvalidMode { param, digit, .. } => RuntimeError::InvalidMode { pc, param, digit },
            SpecError::ImmediateWriteTarget { param, .. } => {
                RuntimeError::InvalidWriteTarget { pc, param }
            }
            other => RuntimeError::Spec(other),
        }
    }

    /// Program counter of the faulting instruction, if any
    pub fn pc(&self) -> Option<Address> {
        match self {
            RuntimeError::Spec(_) => None,
            RuntimeError::InvalidOpcode { pc, .. }
            | RuntimeError::InvalidMode { pc, .. }
            | RuntimeError::InvalidWriteTarget { pc, .. }
            | RuntimeError::NegativeAddress { pc, .. }
            | RuntimeError::ArithmeticOverflow { pc }
            | RuntimeError::Input { pc, .. }
            | RuntimeError::Output { pc, .. } => Some(*pc),
        }
    }

    /// Check if this fault came from an unwired port
    pub fn is_unwired(&self) -> bool {
        matches!(
            self,
            RuntimeError::Input { source: PortError::Unwired, .. }
                | RuntimeError::Output { source: PortError::Unwired, .. }
        )
    }
}

/// Failure of a multi-machine topology
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Topology has no stages")]
    NoStages,

    #[error("Worker {index} faulted: {source}")]
    WorkerFaulted { index: usize, source: RuntimeError },

    #[error("Worker {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("Failed to spawn worker {index}: {message}")]
    Spawn { index: usize, message: String },

    #[error("Workers disconnected before reporting")]
    Disconnected,

    #[error("No signal on the output channel")]
    NoSignal,

    #[error("A feedback ring cannot run sequentially")]
    SequentialRing,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
