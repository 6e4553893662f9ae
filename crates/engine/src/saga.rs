//! Step tracking for multi-write operations.
//!
//! The store has no transactions, so a posting or reversal that fails
//! partway leaves earlier writes in place. `Saga` takes the planned step
//! list up front and, on failure, reports exactly which steps completed,
//! which step failed, and which never ran, so callers can log and
//! reconcile instead of guessing.

use std::future::Future;

use tracing::error;

use crate::error::EngineError;

/// Tracks one multi-write operation against its planned steps.
pub struct Saga {
    document: String,
    planned: Vec<&'static str>,
    completed: Vec<&'static str>,
}

impl Saga {
    /// Starts a saga for one document, named by its user-facing number,
    /// with its planned step names.
    #[must_use]
    pub fn new(document: impl Into<String>, planned: Vec<&'static str>) -> Self {
        Self {
            document: document.into(),
            planned,
            completed: Vec::new(),
        }
    }

    /// Runs the next planned step, recording it on success and wrapping
    /// the error with the step trail on failure.
    pub async fn run<T, E, F>(&mut self, step: &'static str, fut: F) -> Result<T, EngineError>
    where
        E: Into<EngineError>,
        F: Future<Output = Result<T, E>>,
    {
        match fut.await {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(err) => {
                let source = err.into();
                let remaining = self
                    .planned
                    .get(self.completed.len() + 1..)
                    .unwrap_or_default()
                    .to_vec();
                error!(
                    document = %self.document,
                    step,
                    completed = ?self.completed,
                    ?remaining,
                    error = %source,
                    "saga step failed, earlier writes remain"
                );
                Err(EngineError::PartialFailure {
                    document: self.document.clone(),
                    completed: std::mem::take(&mut self.completed),
                    failed_step: step,
                    remaining,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Steps finished so far.
    #[must_use]
    pub fn completed(&self) -> &[&'static str] {
        &self.completed
    }
}
