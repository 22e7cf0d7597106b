//! Instruction execution

use intcode_spec::{Address, Instruction, Opcode, Word};

use crate::error::{Result, RuntimeError};
use crate::location::Location;
use crate::machine::Machine;
use crate::memory::to_address;
use crate::state::MachineState;

impl Machine {
    /// Execute a decoded instruction located at `pc`
    pub(crate) fn execute_instruction(&mut self, pc: Address, instr: Instruction) -> Result<()> {
        let mut next_pc = pc + instr.width() as Address;

        match instr.opcode() {
            // ========== Arithmetic ==========
            Opcode::Add => {
                let a = self.load(pc, &instr, 1)?;
                let b = self.load(pc, &instr, 2)?;
                let sum = a
                    .checked_add(b)
                    .ok_or(RuntimeError::ArithmeticOverflow { pc })?;
                self.store(pc, &instr, 3, sum)?;
            }

            Opcode::Mul => {
                let a = self.load(pc, &instr, 1)?;
                let b = self.load(pc, &instr, 2)?;
                let product = a
                    .checked_mul(b)
                    .ok_or(RuntimeError::ArithmeticOverflow { pc })?;
                self.store(pc, &instr, 3, product)?;
            }

            // ========== I/O ==========
            Opcode::Input => {
                let dst = self.location(pc, &instr, 1)?;
                let value = self
                    .input
                    .read()
                    .map_err(|source| RuntimeError::Input { pc, source })?;
                dst.set(&mut self.memory, value)
                    .map_err(|e| e.at(pc, 1))?;
            }

            Opcode::Output => {
                let value = self.load(pc, &instr, 1)?;
                self.output
                    .write(value)
                    .map_err(|source| RuntimeError::Output { pc, value, source })?;
            }

            // ========== Jump ==========
            Opcode::JumpIfTrue => {
                if self.load(pc, &instr, 1)? != 0 {
                    next_pc = jump_target(pc, self.load(pc, &instr, 2)?)?;
                }
            }

            Opcode::JumpIfFalse => {
                if self.load(pc, &instr, 1)? == 0 {
                    next_pc = jump_target(pc, self.load(pc, &instr, 2)?)?;
                }
            }

            // ========== Compare ==========
            Opcode::LessThan => {
                let a = self.load(pc, &instr, 1)?;
                let b = self.load(pc, &instr, 2)?;
                self.store(pc, &instr, 3, Word::from(a < b))?;
            }

            Opcode::Equals => {
                let a = self.load(pc, &instr, 1)?;
                let b = self.load(pc, &instr, 2)?;
                self.store(pc, &instr, 3, Word::from(a == b))?;
            }

            // ========== System ==========
            Opcode::AdjustRelativeBase => {
                let delta = self.load(pc, &instr, 1)?;
                self.relative_base = self
                    .relative_base
                    .checked_add(delta)
                    .ok_or(RuntimeError::ArithmeticOverflow { pc })?;
            }

            Opcode::Halt => {
                self.state = MachineState::Halted;
                return Ok(());
            }
        }

        self.pc = next_pc;
        Ok(())
    }

    /// Resolve the 1-based parameter `param` of the instruction at `pc`
    fn location(&self, pc: Address, instr: &Instruction, param: usize) -> Result<Location> {
        let raw = self.memory.read(pc + param as Address);
        Location::resolve(instr.mode(param), raw, self.relative_base)
            .map_err(|e| e.at(pc, param))
    }

    fn load(&self, pc: Address, instr: &Instruction, param: usize) -> Result<Word> {
        Ok(self.location(pc, instr, param)?.get(&self.memory))
    }

    fn store(&mut self, pc: Address, instr: &Instruction, param: usize, value: Word) -> Result<()> {
        self.location(pc, instr, param)?
            .set(&mut self.memory, value)
            .map_err(|e| e.at(pc, param))
    }
}

fn jump_target(pc: Address, target: Word) -> Result<Address> {
    to_address(target).ok_or(RuntimeError::NegativeAddress { pc, address: target })
}
