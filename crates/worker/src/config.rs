use std::time::Duration;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Time between due-reminder sweeps (default: 300 seconds).
    pub sweep_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl WorkerConfig {
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `REMINDER_SWEEP_INTERVAL_SECS` | `300`   |
    ///
    /// # Panics
    ///
    /// Panics if the interval is not a positive integer.
    pub fn from_env() -> Self {
        let secs: u64 = std::env::var("REMINDER_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("REMINDER_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(secs > 0, "REMINDER_SWEEP_INTERVAL_SECS must be positive");

        Self {
            sweep_interval: Duration::from_secs(secs),
        }
    }
}
