//! Block interpreter.
//!
//! Walks a parsed [`Document`] and drives the [`Dispatcher`] for every
//! activity leaf, composing sequential and parallel semantics and
//! threading each step's result into the next step's arguments when
//! data flow is on. Pure over the document model; every side effect
//! goes through the dispatcher.

use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};

use crate::dispatch::Dispatcher;
use crate::document::{ActivityInvocation, Block, Document};
use crate::error::WorkflowError;
use crate::record::{render, ResultRecord};

/// Default per-activity dispatch timeout.
pub const DEFAULT_ACTIVITY_TIMEOUT: Duration = Duration::from_secs(30);

/// Evaluates documents against a dispatcher.
pub struct Interpreter<'a> {
    dispatcher: &'a dyn Dispatcher,
    activity_timeout: Duration,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with the default activity timeout.
    pub fn new(dispatcher: &'a dyn Dispatcher) -> Self {
        Self {
            dispatcher,
            activity_timeout: DEFAULT_ACTIVITY_TIMEOUT,
        }
    }

    /// Override the per-activity dispatch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.activity_timeout = timeout;
        self
    }

    /// Run a document to completion and render the report.
    ///
    /// The legacy activity list evaluates as a sequential chain with
    /// data flow off for every step. An empty document yields `""`.
    pub async fn run(&self, document: &Document) -> Result<String, WorkflowError> {
        tracing::info!("Starting workflow run");

        let records = match document {
            Document::LegacyActivityList(invocations) => self.run_legacy(invocations).await?,
            Document::ExecutionBlock(block) => self.evaluate(block, None).await?,
            Document::Empty => Vec::new(),
        };

        tracing::info!(records = records.len(), "Workflow run completed");
        Ok(render(&records))
    }

    async fn run_legacy(
        &self,
        invocations: &[ActivityInvocation],
    ) -> Result<Vec<ResultRecord>, WorkflowError> {
        let mut records = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            records.push(
                self.dispatch_activity(&invocation.name, &invocation.args, None)
                    .await?,
            );
        }
        Ok(records)
    }

    /// Evaluate one block, producing its ordered result records.
    ///
    /// `inbound` is the value carried from the preceding sequential
    /// step; only activity blocks consume it.
    pub fn evaluate<'b>(
        &'b self,
        block: &'b Block,
        inbound: Option<&'b str>,
    ) -> BoxFuture<'b, Result<Vec<ResultRecord>, WorkflowError>> {
        async move {
            match block {
                Block::Activity {
                    name,
                    args,
                    use_data_flow,
                } => {
                    let inbound = if *use_data_flow { inbound } else { None };
                    let record = self.dispatch_activity(name, args, inbound).await?;
                    Ok(vec![record])
                }

                Block::Sequential { children } => {
                    let mut records = Vec::new();
                    // Single inbound channel: the last record of each
                    // child feeds the next child when that child is an
                    // activity. Composites recurse with a fresh channel.
                    let mut carried: Option<String> = None;

                    for child in children {
                        let child_inbound = match child {
                            Block::Activity { .. } => carried.as_deref(),
                            _ => None,
                        };
                        let child_records = self.evaluate(child, child_inbound).await?;
                        if let Some(last) = child_records.last() {
                            carried = Some(last.forwarded());
                        }
                        records.extend(child_records);
                    }

                    Ok(records)
                }

                Block::Parallel { children } => {
                    tracing::debug!(children = children.len(), "Evaluating parallel block");

                    // One future per child, joined in document order:
                    // results land in per-child slots regardless of
                    // completion order, and the first failure drops the
                    // surviving siblings at the join.
                    let per_child = future::try_join_all(
                        children.iter().map(|child| self.evaluate(child, None)),
                    )
                    .await?;

                    Ok(per_child.into_iter().flatten().collect())
                }

                Block::Unknown { kind } => {
                    tracing::warn!(kind = %kind, "Skipping unknown block type");
                    Ok(vec![ResultRecord::unknown_block(kind)])
                }
            }
        }
        .boxed()
    }

    async fn dispatch_activity(
        &self,
        name: &str,
        args: &[String],
        inbound: Option<&str>,
    ) -> Result<ResultRecord, WorkflowError> {
        if name.is_empty() {
            return Err(WorkflowError::InvalidBlock(
                "activity block has an empty name".to_string(),
            ));
        }

        // The inbound value always becomes the first positional
        // argument; explicit args keep their order after it.
        let args: Vec<String> = match inbound {
            Some(value) => std::iter::once(value.to_string())
                .chain(args.iter().cloned())
                .collect(),
            None => args.to_vec(),
        };

        tracing::debug!(activity = name, args = ?args, "Dispatching activity");

        let result = self
            .dispatcher
            .dispatch(name, &args, self.activity_timeout)
            .await?;

        Ok(ResultRecord::activity(name, result))
    }
}

/// Run a document with the default timeout. Convenience wrapper around
/// [`Interpreter`].
pub async fn execute(
    document: &Document,
    dispatcher: &dyn Dispatcher,
) -> Result<String, WorkflowError> {
    Interpreter::new(dispatcher).run(document).await
}
