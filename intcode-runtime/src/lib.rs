//! # Intcode Runtime
//!
//! Execute Intcode programs, alone or as a network of machines.
//!
//! ## Features
//!
//! - **Sparse memory**: Zero-filled, grows on write, 64-bit signed words
//! - **Three addressing modes**: Position, immediate and relative
//! - **Pluggable ports**: Scripted input, recorded output, closures or channels
//! - **Topologies**: Amplifier chains and feedback rings, one thread per machine
//!
//! ## Example
//!
//! ```rust
//! use intcode_runtime::{Machine, OutputRecorder, ScriptedInput};
//!
//! // Echo one value
//! let output = OutputRecorder::new();
//! let mut machine = Machine::parse("3,0,4,0,99")
//!     .unwrap()
//!     .with_input(ScriptedInput::new([42]))
//!     .with_output(output.clone());
//! machine.execute().unwrap();
//! assert_eq!(output.values(), vec![42]);
//! ```

pub mod channel;
pub mod error;
pub mod execute;
pub mod io;
pub mod location;
pub mod machine;
pub mod memory;
pub mod state;
pub mod topology;

pub use channel::Channel;
pub use error::{PortError, Result, RuntimeError, TopologyError};
pub use io::{input_fn, output_fn, InputSource, OutputRecorder, OutputSink, ScriptedInput, Unwired};
pub use location::Location;
pub use machine::{ExecutionResult, Machine, MachineConfig};
pub use memory::Memory;
pub use state::MachineState;
pub use topology::{search_phases, PhaseSearch, Topology, TopologyKind};

use intcode_spec::{Program, Word};

/// Simple execution helper
///
/// Runs a program with the given inputs and returns the outputs.
pub fn run(program: &Program, inputs: impl IntoIterator<Item = Word>) -> Result<Vec<Word>> {
    let output = OutputRecorder::new();
    let mut machine = Machine::new(program)
        .with_input(ScriptedInput::new(inputs))
        .with_output(output.clone());
    machine.execute()?;
    Ok(output.take())
}
