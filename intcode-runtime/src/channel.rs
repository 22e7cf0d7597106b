//! Blocking FIFO channel between machines
//!
//! Unbounded: `write` never blocks. `read` parks the caller until a value
//! arrives. There is no close; a reader with no writer waits forever.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use intcode_spec::Word;

use crate::error::PortError;
use crate::io::{InputSource, OutputSink};

#[derive(Default)]
struct Shared {
    queue: Mutex<VecDeque<Word>>,
    available: Condvar,
}

/// Cloneable handle to one shared queue
#[derive(Clone, Default)]
pub struct Channel {
    shared: Arc<Shared>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel pre-loaded with `values`
    pub fn with_values(values: impl IntoIterator<Item = Word>) -> Self {
        let channel = Self::new();
        for value in values {
            channel.write(value);
        }
        channel
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Word>> {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self, value: Word) {
        self.queue().push_back(value);
        self.shared.available.notify_one();
    }

    /// Blocks until a value is available
    pub fn read(&self) -> Word {
        let mut queue = self.queue();
        loop {
            if let Some(value) = queue.pop_front() {
                return value;
            }
            queue = self
                .shared
                .available
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn try_read(&self) -> Option<Word> {
        self.queue().pop_front()
    }

    /// Remove and return everything currently queued
    pub fn drain(&self) -> Vec<Word> {
        self.queue().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    /// Check if two handles share one queue
    pub fn same_channel(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel").field("len", &self.len()).finish()
    }
}

impl InputSource for Channel {
    fn read(&mut self) -> Result<Word, PortError> {
        Ok(Channel::read(self))
    }
}

impl OutputSink for Channel {
    fn write(&mut self, value: Word) -> Result<(), PortError> {
        Channel::write(self, value);
        Ok(())
    }
}
