//! Task dispatcher boundary.
//!
//! The interpreter is polymorphic over task identity purely by name:
//! it hands a name, an argument list, and a timeout to a [`Dispatcher`]
//! and gets back a string result or a classified failure. Everything
//! else about task execution (the real behavior, durability, retry
//! policy) belongs to the hosting runtime.
//!
//! [`TaskRegistry`] is the in-process stand-in for that runtime: a
//! name-to-handler map resolved once at startup, with per-dispatch
//! timeout enforcement and an optional attempt budget for retryable
//! failures.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DispatchError, TaskFailure};

/// Invokes a named task through the execution substrate.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(
        &self,
        name: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, DispatchError>;
}

/// A single task implementation.
///
/// Handlers receive string arguments and return a string result; the
/// interpreter never looks inside.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn invoke(&self, args: &[String]) -> Result<String, TaskFailure>;
}

/// Adapter so plain async closures can act as handlers.
struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> TaskHandler for FnHandler<F>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, TaskFailure>> + Send,
{
    async fn invoke(&self, args: &[String]) -> Result<String, TaskFailure> {
        (self.0)(args.to_vec()).await
    }
}

/// Name-to-handler registry implementing [`Dispatcher`].
pub struct TaskRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
    max_attempts: u32,
}

impl TaskRegistry {
    /// Create an empty registry with no retry budget (one attempt).
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            max_attempts: 1,
        }
    }

    /// Allow retryable failures up to `max_attempts` total attempts.
    ///
    /// Non-retryable failures are never re-invoked regardless of the
    /// budget.
    pub fn with_retry(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Register a handler under a task name.
    pub fn register(&mut self, name: &str, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(name.to_string(), handler);
    }

    /// Register an async closure under a task name.
    pub fn register_fn<F, Fut>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, TaskFailure>> + Send + 'static,
    {
        self.register(name, Arc::new(FnHandler(f)));
    }

    /// Names of all registered tasks.
    pub fn task_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for TaskRegistry {
    async fn dispatch(
        &self,
        name: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, DispatchError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTask(name.to_string()))?;

        let mut attempt = 1u32;
        loop {
            tracing::debug!(task = name, attempt, "Dispatching task");

            let outcome = match tokio::time::timeout(timeout, handler.invoke(args)).await {
                Ok(result) => result,
                Err(_) => Err(TaskFailure::retryable(anyhow::anyhow!(
                    "task {name} timed out after {timeout:?}"
                ))),
            };

            match outcome {
                Ok(value) => {
                    tracing::debug!(task = name, attempt, "Task completed");
                    return Ok(value);
                }
                Err(failure) if failure.retryable && attempt < self.max_attempts => {
                    tracing::warn!(task = name, attempt, error = %failure, "Retrying task");
                    attempt += 1;
                }
                Err(failure) => return Err(failure.into()),
            }
        }
    }
}
