//! Machine lifecycle state

use crate::error::RuntimeError;

/// `Running` until the machine halts or faults; both are terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MachineState {
    #[default]
    Running,
    /// Halt opcode reached
    Halted,
    /// Fatal error; the fault is kept for inspection
    Faulted(RuntimeError),
}

impl MachineState {
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, MachineState::Running)
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        matches!(self, MachineState::Halted)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }

    pub fn fault(&self) -> Option<&RuntimeError> {
        match self {
            MachineState::Faulted(err) => Some(err),
            _ => None,
        }
    }
}
