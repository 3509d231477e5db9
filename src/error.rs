//! Errors returned by the simulation entry points.

use thiserror::Error;

/// Everything that can stop a run before or during worker start-up.
///
/// Once every worker is running there is no error path: a run either
/// finishes all generations or never returns.
#[derive(Error, Debug)]
pub enum LifeError {
    /// Zero rows or zero columns.
    #[error("invalid grid dimensions: {rows} rows x {cols} cols")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Row pitch shorter than a logical row.
    #[error("stride {stride} is smaller than column count {cols}")]
    StrideTooSmall { stride: usize, cols: usize },

    /// The two boards disagree on shape.
    #[error("outboard and inboard have different shapes")]
    ShapeMismatch,

    /// A buffer is shorter or longer than `stride * rows`.
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// `worker_count` was zero.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// The OS refused to create a worker thread. No generation has run.
    #[error("failed to spawn worker {worker}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked and `join` observed it.
    ///
    /// Only reported when `worker_count == 1` or the panic happens after the
    /// last barrier. Otherwise the remaining workers block in the barrier
    /// forever and the run never returns.
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}
