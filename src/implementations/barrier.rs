use std::sync::{Barrier, Condvar, Mutex, PoisonError};

/// Reusable per-generation rendezvous for exactly `parties` workers.
///
/// Release happens-after every party's arrival, so writes made before
/// `wait()` are visible to all parties after it returns.
#[derive(Debug)]
pub struct GenerationBarrier {
    inner: Barrier,
    parties: usize,
}

impl GenerationBarrier {
    pub fn new(parties: usize) -> Self {
        GenerationBarrier {
            inner: Barrier::new(parties),
            parties,
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Block until all parties arrived. Returns `true` for exactly one of them.
    pub fn wait(&self) -> bool {
        self.inner.wait().is_leader()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// One-shot latch holding workers until the driver has created all of them.
#[derive(Debug)]
pub struct StartGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    pub fn new() -> Self {
        StartGate {
            state: Mutex::new(GateState::Closed),
            cond: Condvar::new(),
        }
    }

    pub fn open(&self) {
        self.settle(GateState::Open);
    }

    pub fn abort(&self) {
        self.settle(GateState::Aborted);
    }

    fn settle(&self, to: GateState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == GateState::Closed {
            *state = to;
        }
        self.cond.notify_all();
    }

    /// Block until opened (`true`) or aborted (`false`).
    pub fn wait(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .cond
            .wait_while(state, |s| *s == GateState::Closed)
            .unwrap_or_else(PoisonError::into_inner);
        *state == GateState::Open
    }
}
