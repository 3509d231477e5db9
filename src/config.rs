//! Run-time knobs for the parallel kernels.

use tracing::warn;

/// Worker count used when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Environment variable read by [`SimulationConfig::from_env`].
pub const THREADS_ENV: &str = "LIFE_THREADS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of worker threads, and therefore barrier parties.
    pub worker_count: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            worker_count: DEFAULT_WORKERS,
        }
    }
}

impl SimulationConfig {
    /// Set an explicit worker count. Zero is kept as-is and rejected at run time.
    pub fn worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }

    /// Default config, with `LIFE_THREADS` overriding the worker count.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(THREADS_ENV).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        let config = SimulationConfig::default();
        let Some(raw) = value else {
            return config;
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => config.worker_count(n),
            _ => {
                warn!(value = raw, "ignoring invalid {THREADS_ENV}, using {DEFAULT_WORKERS} workers");
                config
            }
        }
    }
}
