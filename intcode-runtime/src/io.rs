//! I/O ports
//!
//! A machine talks to the outside world only through one [`InputSource`]
//! (opcode 3) and one [`OutputSink`] (opcode 4). Both default to
//! [`Unwired`], which fails the instruction instead of inventing a value.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use intcode_spec::Word;

use crate::error::PortError;

/// Supplies values to the input instruction. May block.
pub trait InputSource: Send {
    fn read(&mut self) -> Result<Word, PortError>;
}

/// Consumes values from the output instruction
pub trait OutputSink: Send {
    fn write(&mut self, value: Word) -> Result<(), PortError>;
}

/// Port that is not connected to anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Unwired;

impl InputSource for Unwired {
    fn read(&mut self) -> Result<Word, PortError> {
        Err(PortError::Unwired)
    }
}

impl OutputSink for Unwired {
    fn write(&mut self, _value: Word) -> Result<(), PortError> {
        Err(PortError::Unwired)
    }
}

/// Fixed queue of input values; fails with `Exhausted` once empty
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    values: VecDeque<Word>,
}

impl ScriptedInput {
    pub fn new(values: impl IntoIterator<Item = Word>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// One input value per byte of `text`
    pub fn ascii(text: &str) -> Self {
        Self::new(text.bytes().map(Word::from))
    }

    pub fn push(&mut self, value: Word) {
        self.values.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl InputSource for ScriptedInput {
    fn read(&mut self) -> Result<Word, PortError> {
        self.values.pop_front().ok_or(PortError::Exhausted)
    }
}

/// Records every output value
///
/// Clones share the record, so a handle kept by the caller sees what the
/// machine wrote even after the machine was moved to another thread.
#[derive(Debug, Clone, Default)]
pub struct OutputRecorder {
    values: Arc<Mutex<Vec<Word>>>,
}

impl OutputRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Word>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn values(&self) -> Vec<Word> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Word> {
        std::mem::take(&mut *self.lock())
    }

    pub fn last(&self) -> Option<Word> {
        self.lock().last().copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Recorded values as text; values outside ASCII are skipped
    pub fn ascii(&self) -> String {
        self.lock()
            .iter()
            .filter_map(|&v| u8::try_from(v).ok().filter(u8::is_ascii))
            .map(char::from)
            .collect()
    }
}

impl OutputSink for OutputRecorder {
    fn write(&mut self, value: Word) -> Result<(), PortError> {
        self.lock().push(value);
        Ok(())
    }
}

/// Input port backed by a closure
pub struct FnInput<F>(F);

/// Output port backed by a closure
pub struct FnOutput<F>(F);

pub fn input_fn<F>(f: F) -> FnInput<F>
where
    F: FnMut() -> Result<Word, PortError> + Send,
{
    FnInput(f)
}

pub fn output_fn<F>(f: F) -> FnOutput<F>
where
    F: FnMut(Word) -> Result<(), PortError> + Send,
{
    FnOutput(f)
}

impl<F> InputSource for FnInput<F>
where
    F: FnMut() -> Result<Word, PortError> + Send,
{
    fn read(&mut self) -> Result<Word, PortError> {
        (self.0)()
    }
}

impl<F> OutputSink for FnOutput<F>
where
    F: FnMut(Word) -> Result<(), PortError> + Send,
{
    fn write(&mut self, value: Word) -> Result<(), PortError> {
        (self.0)(value)
    }
}
