//! # Multi-machine topologies
//!
//! N clones of a base machine wired together through [`Channel`]s:
//!
//! ```text
//! Chain:  ch0 -> M0 -> ch1 -> M1 -> ... -> M(n-1) -> ch(n)      result: ch(n)
//! Ring:   ch0 -> M0 -> ch1 -> M1 -> ... -> M(n-1) -> ch0        result: ch0
//! ```
//!
//! Channel `i` is seeded with the phase of machine `i`; channel 0 then
//! receives the seed signal. Every machine runs on its own worker thread.
//! The orchestrator returns as soon as any worker faults: workers still
//! blocked on a channel read are left detached.
//!
//! The final signal is the oldest value the last stage wrote that nobody
//! consumed. Phases or seed left unread on the result channel never count.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use intcode_spec::Word;
use itertools::Itertools;
use tracing::{debug, info, info_span, warn};

use crate::channel::Channel;
use crate::error::{PortError, TopologyError};
use crate::io::OutputSink;
use crate::machine::{ExecutionResult, Machine};

/// How stages are connected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    /// Linear pipeline; the last stage writes to a dedicated channel
    Chain,
    /// Feedback loop; the last stage writes back into the first channel
    Ring,
}

/// Topology description: one stage per phase value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    kind: TopologyKind,
    phases: Vec<Word>,
    seed: Word,
}

/// Best result of a phase permutation search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseSearch {
    pub signal: Word,
    pub phases: Vec<Word>,
}

/// Output port of the last stage: forwards to the result channel and
/// counts what the stage produced
#[derive(Clone)]
struct SignalTap {
    channel: Channel,
    written: Arc<AtomicUsize>,
}

impl OutputSink for SignalTap {
    fn write(&mut self, value: Word) -> Result<(), PortError> {
        self.channel.write(value);
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Machines with their ports attached, plus every channel between them
struct Wiring {
    machines: Vec<Machine>,
    channels: Vec<Channel>,
    result: SignalTap,
}

impl Topology {
    pub fn new(kind: TopologyKind, phases: impl Into<Vec<Word>>) -> Self {
        Self {
            kind,
            phases: phases.into(),
            seed: 0,
        }
    }

    pub fn chain(phases: impl Into<Vec<Word>>) -> Self {
        Self::new(TopologyKind::Chain, phases)
    }

    pub fn ring(phases: impl Into<Vec<Word>>) -> Self {
        Self::new(TopologyKind::Ring, phases)
    }

    /// Signal written to the first channel after its phase (default 0)
    pub fn with_seed(mut self, seed: Word) -> Self {
        self.seed = seed;
        self
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub fn phases(&self) -> &[Word] {
        &self.phases
    }

    pub fn seed(&self) -> Word {
        self.seed
    }

    fn wire(&self, base: &Machine) -> Result<Wiring, TopologyError> {
        let stages = self.phases.len();
        if stages == 0 {
            return Err(TopologyError::NoStages);
        }

        let channel_count = match self.kind {
            TopologyKind::Chain => stages + 1,
            TopologyKind::Ring => stages,
        };
        let channels: Vec<Channel> = (0..channel_count).map(|_| Channel::new()).collect();

        for (channel, &phase) in channels.iter().zip(&self.phases) {
            channel.write(phase);
        }
        channels[0].write(self.seed);

        let result = SignalTap {
            channel: match self.kind {
                TopologyKind::Chain => channels[stages].clone(),
                TopologyKind::Ring => channels[0].clone(),
            },
            written: Arc::new(AtomicUsize::new(0)),
        };

        let machines = (0..stages)
            .map(|index| {
                let mut machine = base.clone();
                if machine.config().label.is_none() {
                    machine.config_mut().label = Some(format!("stage-{index}"));
                }
                machine.set_input(channels[index].clone());
                if index + 1 == stages {
                    machine.set_output(result.clone());
                } else {
                    machine.set_output(channels[index + 1].clone());
                }
                machine
            })
            .collect();

        Ok(Wiring {
            machines,
            channels,
            result,
        })
    }

    /// Run every stage concurrently and return the final signal
    ///
    /// Fails with `NoSignal` when every stage halted but the last one left
    /// nothing unconsumed on the result channel.
    pub fn run(&self, base: &Machine) -> Result<Word, TopologyError> {
        let wiring = self.wire(base)?;
        info!(
            kind = ?self.kind,
            stages = wiring.machines.len(),
            phases = ?self.phases,
            "starting topology"
        );

        run_workers(wiring.machines, &self.phases)?;
        final_signal(&wiring.result)
    }

    /// Run a chain one stage at a time on the calling thread
    ///
    /// Each stage drains its upstream channel before the next starts, so a
    /// chain needs no concurrency. A ring does.
    pub fn run_sequential(&self, base: &Machine) -> Result<Word, TopologyError> {
        if self.kind == TopologyKind::Ring {
            return Err(TopologyError::SequentialRing);
        }
        let wiring = self.wire(base)?;

        for (index, mut machine) in wiring.machines.into_iter().enumerate() {
            let result = machine
                .execute()
                .map_err(|source| TopologyError::WorkerFaulted { index, source })?;
            debug!(index, steps = result.steps, "stage halted");
        }
        debug!(leftover = ?wiring.channels.iter().map(Channel::len).collect::<Vec<_>>());
        final_signal(&wiring.result)
    }
}

type WorkerReport = (usize, Result<Result<ExecutionResult, crate::error::RuntimeError>, ()>);

/// One thread per machine; returns after all halt or on the first failure
///
/// After a failure, and after a spawn error, threads that are still blocked
/// on a channel read stay parked and are never joined.
fn run_workers(machines: Vec<Machine>, phases: &[Word]) -> Result<(), TopologyError> {
    let count = machines.len();
    let (tx, rx) = mpsc::channel::<WorkerReport>();
    let mut handles = Vec::with_capacity(count);

    for (index, mut machine) in machines.into_iter().enumerate() {
        let tx = tx.clone();
        let span = info_span!("worker", index, phase = phases.get(index).copied());
        let name = match machine.config().label.as_deref() {
            Some(label) => format!("intcode-{label}"),
            None => format!("intcode-worker-{index}"),
        };

        let handle = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let _entered = span.enter();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| machine.execute()))
                    .map_err(|_| ());
                // The orchestrator may already have given up on this run
                let _ = tx.send((index, outcome));
            })
            .map_err(|e| TopologyError::Spawn {
                index,
                message: e.to_string(),
            })?;
        handles.push(handle);
    }
    drop(tx);

    for _ in 0..count {
        let (index, outcome) = rx.recv().map_err(|_| TopologyError::Disconnected)?;
        match outcome {
            Ok(Ok(result)) => debug!(index, steps = result.steps, "worker halted"),
            Ok(Err(source)) => {
                warn!(index, error = %source, "worker faulted");
                return Err(TopologyError::WorkerFaulted { index, source });
            }
            Err(()) => {
                warn!(index, "worker panicked");
                return Err(TopologyError::WorkerPanicked { index });
            }
        }
    }

    for handle in handles {
        // Every worker has reported, so joins return promptly
        let _ = handle.join();
    }
    Ok(())
}

/// Oldest unconsumed value written by the last stage
///
/// The result channel may still hold phases or the seed in front of the
/// last stage's output. Reads pop from the front, so the last stage's
/// unconsumed writes are always the tail of the queue.
fn final_signal(result: &SignalTap) -> Result<Word, TopologyError> {
    let queued = result.channel.drain();
    let written = result.written.load(Ordering::SeqCst);
    let produced = &queued[queued.len() - written.min(queued.len())..];
    if produced.len() < queued.len() {
        debug!(discarded = queued.len() - produced.len(), "unread orchestrator values");
    }
    produced.first().copied().ok_or(TopologyError::NoSignal)
}

/// Try every ordering of `candidates` and keep the strongest signal
///
/// Orderings are visited in lexicographic order; ties keep the first.
/// The search stops at the first failing ordering. If that ordering
/// faulted, its sibling workers may stay blocked on their channels for the
/// rest of the process, as described for [`Topology::run`].
pub fn search_phases(
    base: &Machine,
    kind: TopologyKind,
    candidates: &[Word],
) -> Result<PhaseSearch, TopologyError> {
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable();

    let mut best: Option<PhaseSearch> = None;
    for phases in sorted.iter().copied().permutations(sorted.len()) {
        let signal = Topology::new(kind, phases.clone()).run(base)?;
        if best.as_ref().map_or(true, |b| signal > b.signal) {
            best = Some(PhaseSearch { signal, phases });
        }
    }

    let best = best.ok_or(TopologyError::NoStages)?;
    info!(signal = best.signal, phases = ?best.phases, "phase search finished");
    Ok(best)
}
