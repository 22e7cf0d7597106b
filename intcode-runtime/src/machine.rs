//! Intcode virtual machine

use std::fmt;
use std::io::Read;

use intcode_disassembler::format;
use intcode_spec::{Address, Instruction, Program, Word};
use tracing::{debug, trace};

use crate::error::{Result, RuntimeError};
use crate::io::{InputSource, OutputSink, Unwired};
use crate::memory::Memory;
use crate::state::MachineState;

/// Machine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Log every executed instruction at `trace` level
    pub trace: bool,

    /// Name used in log events and worker thread names
    pub label: Option<String>,
}

impl MachineConfig {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Summary of a run that reached the halt opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Instructions executed, halt included
    pub steps: u64,

    /// Address of the halt instruction
    pub pc: Address,
}

/// Intcode Virtual Machine
pub struct Machine {
    pub(crate) memory: Memory,
    pub(crate) pc: Address,
    pub(crate) relative_base: Word,
    pub(crate) state: MachineState,
    pub(crate) steps: u64,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) output: Box<dyn OutputSink>,
    config: MachineConfig,
}

impl Machine {
    /// Create a machine whose memory holds `program`
    pub fn new(program: &Program) -> Self {
        Self::with_memory(Memory::from(program))
    }

    pub fn from_words(words: &[Word]) -> Self {
        Self::with_memory(Memory::from_words(words))
    }

    /// Parse program text into a new machine
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self::new(&Program::parse(source)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(&Program::from_reader(reader)?))
    }

    fn with_memory(memory: Memory) -> Self {
        Self {
            memory,
            pc: 0,
            relative_base: 0,
            state: MachineState::Running,
            steps: 0,
            input: Box::new(Unwired),
            output: Box::new(Unwired),
            config: MachineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MachineConfig {
        &mut self.config
    }

    // ========== Ports ==========

    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.input = Box::new(input);
    }

    pub fn set_output(&mut self, output: impl OutputSink + 'static) {
        self.output = Box::new(output);
    }

    pub fn reset_input(&mut self) {
        self.input = Box::new(Unwired);
    }

    pub fn reset_output(&mut self) {
        self.output = Box::new(Unwired);
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.set_input(input);
        self
    }

    pub fn with_output(mut self, output: impl OutputSink + 'static) -> Self {
        self.set_output(output);
        self
    }

    // ========== Memory access ==========

    /// Read a memory cell; unwritten cells are 0
    pub fn peek(&self, addr: Address) -> Word {
        self.memory.read(addr)
    }

    /// Write a memory cell, growing memory as needed
    pub fn poke(&mut self, addr: Address, value: Word) {
        self.memory.write(addr, value);
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    // ========== Execution ==========

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    pub fn relative_base(&self) -> Word {
        self.relative_base
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run until halt or fault
    ///
    /// A halted machine returns at once; a faulted one returns its fault
    /// again.
    pub fn execute(&mut self) -> Result<ExecutionResult> {
        while self.state.is_running() {
            self.step()?;
        }
        match &self.state {
            MachineState::Faulted(err) => Err(err.clone()),
            _ => Ok(ExecutionResult {
                steps: self.steps,
                pc: self.pc,
            }),
        }
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<&MachineState> {
        if let MachineState::Faulted(err) = &self.state {
            return Err(err.clone());
        }
        if self.state.is_halted() {
            return Ok(&self.state);
        }

        let pc = self.pc;
        let outcome = self
            .fetch_and_decode(pc)
            .and_then(|instr| {
                if self.config.trace {
                    self.trace_instruction(pc, &instr);
                }
                self.execute_instruction(pc, instr)
            });
        self.steps += 1;

        match outcome {
            Ok(()) => {
                if self.state.is_halted() {
                    debug!(
                        label = self.config.label.as_deref(),
                        steps = self.steps,
                        pc,
                        "machine halted"
                    );
                }
                Ok(&self.state)
            }
            Err(err) => {
                debug!(
                    label = self.config.label.as_deref(),
                    steps = self.steps,
                    pc,
                    error = %err,
                    "machine faulted"
                );
                self.state = MachineState::Faulted(err.clone());
                Err(err)
            }
        }
    }

    fn fetch_and_decode(&self, pc: Address) -> Result<Instruction> {
        let word = self.memory.read(pc);
        Instruction::decode(word).map_err(|e| RuntimeError::decode(pc, e))
    }

    fn trace_instruction(&self, pc: Address, instr: &Instruction) {
        let params = self.memory.slice(pc + 1, instr.opcode().param_count());
        trace!(
            label = self.config.label.as_deref(),
            pc,
            relative_base = self.relative_base,
            "{}",
            format(instr, &params)
        );
    }
}

impl Clone for Machine {
    /// Copy memory and configuration into a fresh machine
    ///
    /// The clone starts at pc 0 with relative base 0 in the `Running` state,
    /// and both of its ports are unwired.
    fn clone(&self) -> Self {
        Self::with_memory(self.memory.clone()).with_config(self.config.clone())
    }
}

impl From<Program> for Machine {
    fn from(program: Program) -> Self {
        Self::new(&program)
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("pc", &self.pc)
            .field("relative_base", &self.relative_base)
            .field("state", &self.state)
            .field("steps", &self.steps)
            .field("memory_len", &self.memory.len())
            .field("config", &self.config)
            .finish()
    }
}
