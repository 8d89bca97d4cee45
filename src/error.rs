//! Error taxonomy for parsing and evaluation.

use thiserror::Error;

/// Top-level error for parsing and evaluating a workflow document.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The document could not be parsed at all. Fatal, no partial output.
    #[error("malformed workflow document: {0}")]
    Malformed(#[source] anyhow::Error),

    /// The document parsed but a block is semantically incomplete,
    /// e.g. an activity block without a name.
    #[error("invalid block: {0}")]
    InvalidBlock(String),

    /// A dispatch failed. Propagated untouched from the dispatcher;
    /// the interpreter never reinterprets task failures.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Error returned by a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler is registered under the requested name.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// The task ran and failed (or timed out).
    #[error(transparent)]
    Failure(#[from] TaskFailure),
}

/// A task-level failure with a retryable classification.
///
/// The retry policy lives in the execution substrate, not in the
/// interpreter; the flag tells the substrate whether another attempt
/// can possibly succeed.
#[derive(Debug, Error)]
#[error("task failed ({}): {source}", if *.retryable { "retryable" } else { "non-retryable" })]
pub struct TaskFailure {
    pub retryable: bool,
    #[source]
    pub source: anyhow::Error,
}

impl TaskFailure {
    /// A transient failure worth another attempt.
    pub fn retryable(source: impl Into<anyhow::Error>) -> Self {
        Self {
            retryable: true,
            source: source.into(),
        }
    }

    /// A permanent failure; retrying cannot help.
    pub fn fatal(source: impl Into<anyhow::Error>) -> Self {
        Self {
            retryable: false,
            source: source.into(),
        }
    }
}
