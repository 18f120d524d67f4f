//! Downstream execution of approved payloads

use super::types::Payload;
use thiserror::Error;

/// Failure reported by an executor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Execution failed: {0}")]
pub struct ExecutionError(pub String);

/// Runs a payload once its proposal reaches quorum
///
/// The account only observes success or failure.
pub trait Executor {
    fn execute(&mut self, payload: &Payload) -> Result<(), ExecutionError>;
}

impl<F> Executor for F
where
    F: FnMut(&Payload) -> Result<(), ExecutionError>,
{
    fn execute(&mut self, payload: &Payload) -> Result<(), ExecutionError> {
        self(payload)
    }
}

/// Executor that accepts every payload and keeps a log of what it ran
#[derive(Debug, Default, Clone)]
pub struct LoggingExecutor {
    executed: Vec<Payload>,
}

impl LoggingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads dispatched so far, oldest first
    pub fn executed(&self) -> &[Payload] {
        &self.executed
    }
}

impl Executor for LoggingExecutor {
    fn execute(&mut self, payload: &Payload) -> Result<(), ExecutionError> {
        log::info!(
            "Executing payload {} ({} bytes)",
            payload.type_url,
            payload.value.len()
        );
        self.executed.push(payload.clone());
        Ok(())
    }
}
