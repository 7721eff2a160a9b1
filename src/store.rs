//! Reference-data store interface and partial-failure bookkeeping
//!
//! The engine reads components, prices and games through [`ComponentStore`].
//! Store failures never abort an analysis: each failed call is recorded as a
//! [`PartialFailure`] with a matching warning, and the computation continues
//! with whatever data was available.
//!
//! Every call runs on its own worker thread through [`guarded`], so a call
//! that hangs is abandoned once its timeout passes.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;
use crate::models::{Component, ComponentKind, Game};

pub trait ComponentStore: Send + Sync {
    /// Fetch a single component by id
    fn get_component(&self, kind: ComponentKind, id: &str) -> Result<Component, StoreError>;

    /// Components of `kind` scoring strictly above `min_score`, ascending by score
    fn components_above(&self, kind: ComponentKind, min_score: u32) -> Result<Vec<Component>, StoreError>;

    /// Every component of `kind`, ascending by score
    fn list_components(&self, kind: ComponentKind) -> Result<Vec<Component>, StoreError>;

    /// Lowest known price per component id; ids without a price are absent
    fn lowest_prices(&self, ids: &[String], in_stock_only: bool) -> Result<HashMap<String, f64>, StoreError>;

    fn games_by_ids(&self, ids: &[String]) -> Result<Vec<Game>, StoreError>;
}

/// Store handle that store calls can carry onto worker threads
pub type SharedStore = Arc<dyn ComponentStore>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialFailure {
    pub operation: String,
    pub error: String,
}

/// A result annotated with everything that went wrong producing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T> {
    pub data: T,
    pub warnings: Vec<String>,
    pub partial_failures: Vec<PartialFailure>,
}

impl<T> OperationResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            partial_failures: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn fail(&mut self, operation: &str, error: impl fmt::Display) {
        let error = error.to_string();
        warn!(operation, %error, "store operation failed");
        self.warnings.push(format!("{} failed: {}", operation, error));
        self.partial_failures.push(PartialFailure {
            operation: operation.to_string(),
            error,
        });
    }

    /// Move the annotations of `other` into `self` and return its data
    pub fn absorb<U>(&mut self, other: OperationResult<U>) -> U {
        self.warnings.extend(other.warnings);
        self.partial_failures.extend(other.partial_failures);
        other.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            data: f(self.data),
            warnings: self.warnings,
            partial_failures: self.partial_failures,
        }
    }
}

/// Run a store call on a worker thread and wait at most `timeout` for it
///
/// Errors, panics and calls still running when the timeout passes are
/// recorded on `result` and yield `None`. A timed-out worker is left to
/// finish on its own and its answer is dropped; nothing is retried.
pub fn guarded<T, U>(
    result: &mut OperationResult<U>,
    operation: &str,
    timeout: Duration,
    call: impl FnOnce() -> Result<T, StoreError> + Send + 'static,
) -> Option<T>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let started = Instant::now();
    let spawned = thread::Builder::new()
        .name("store-query".to_string())
        .spawn(move || {
            // The receiver is gone once the caller has given up
            let _ = tx.send(call());
        });
    if let Err(e) = spawned {
        result.fail(
            operation,
            StoreError::Worker {
                operation: operation.to_string(),
                reason: e.to_string(),
            },
        );
        return None;
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            result.fail(operation, e);
            None
        }
        Err(RecvTimeoutError::Timeout) => {
            result.fail(
                operation,
                StoreError::Timeout {
                    operation: operation.to_string(),
                    elapsed_ms: started.elapsed().as_millis(),
                },
            );
            None
        }
        Err(RecvTimeoutError::Disconnected) => {
            result.fail(
                operation,
                StoreError::Worker {
                    operation: operation.to_string(),
                    reason: "worker stopped without an answer".to_string(),
                },
            );
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Complete,
    Partial,
    Degraded,
}

impl DataQuality {
    pub fn from_failures(count: usize) -> Self {
        match count {
            0 => DataQuality::Complete,
            1..=2 => DataQuality::Partial,
            _ => DataQuality::Degraded,
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataQuality::Complete => "complete",
            DataQuality::Partial => "partial",
            DataQuality::Degraded => "degraded",
        })
    }
}
