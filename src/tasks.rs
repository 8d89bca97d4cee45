//! Sample task handlers.
//!
//! Stand-ins for the services a real deployment would call: a policy
//! engine, a human-in-the-loop approval service, an agent runner, and
//! a cleanup step. Useful for demos and as fixtures in tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::dispatch::{TaskHandler, TaskRegistry};
use crate::error::TaskFailure;

/// Out-of-band decision delivered to a waiting approval task.
#[derive(Debug, Clone)]
pub struct Decision {
    pub approved: bool,
    pub reason: Option<String>,
}

/// Signal channel for human approval decisions.
///
/// The host side keeps the gate and calls [`approve`](Self::approve) or
/// [`reject`](Self::reject); the `RequestHumanApproval` handler waits
/// on it, bounded by the dispatch timeout.
#[derive(Debug, Clone)]
pub struct ApprovalGate {
    tx: Arc<watch::Sender<Option<Decision>>>,
}

impl Default for ApprovalGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn approve(&self) {
        self.tx.send_replace(Some(Decision {
            approved: true,
            reason: None,
        }));
    }

    pub fn reject(&self, reason: &str) {
        self.tx.send_replace(Some(Decision {
            approved: false,
            reason: Some(reason.to_string()),
        }));
    }

    fn subscribe(&self) -> watch::Receiver<Option<Decision>> {
        self.tx.subscribe()
    }
}

/// Waits for a human decision delivered through an [`ApprovalGate`].
struct ApprovalTask {
    gate: ApprovalGate,
}

#[async_trait]
impl TaskHandler for ApprovalTask {
    async fn invoke(&self, args: &[String]) -> Result<String, TaskFailure> {
        let description = args.join(" ");
        tracing::info!(task = %description, "Waiting for human approval");

        let mut rx = self.gate.subscribe();
        let decision = loop {
            if let Some(decision) = rx.borrow_and_update().clone() {
                break decision;
            }
            rx.changed().await.map_err(|_| {
                TaskFailure::fatal(anyhow::anyhow!("approval channel closed"))
            })?;
        };

        if decision.approved {
            Ok(format!("approval-granted: {description}"))
        } else {
            Err(TaskFailure::fatal(anyhow::anyhow!(
                "approval rejected: {}",
                decision.reason.unwrap_or_default()
            )))
        }
    }
}

/// Fails with a retryable error for a fixed number of invocations,
/// then succeeds. Attempt state is injected per instance, scoped to a
/// single run.
pub struct FlakyTask {
    failures_left: AtomicU32,
}

impl FlakyTask {
    pub fn failing(times: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(times),
        }
    }
}

#[async_trait]
impl TaskHandler for FlakyTask {
    async fn invoke(&self, _args: &[String]) -> Result<String, TaskFailure> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if failed {
            Err(TaskFailure::retryable(anyhow::anyhow!(
                "simulated transient failure"
            )))
        } else {
            Ok("SUCCESS".to_string())
        }
    }
}

/// Registry preloaded with the sample handlers.
///
/// `CheckPolicy` denies any description containing "forbidden";
/// `RequestHumanApproval` waits on the given gate; `ExecuteAgentTask`
/// and `CleanupTask` simulate the main work and teardown.
pub fn sample_registry(gate: &ApprovalGate) -> TaskRegistry {
    let mut registry = TaskRegistry::new();

    registry.register_fn("CheckPolicy", |args| async move {
        let description = args.join(" ");
        if description.to_lowercase().contains("forbidden") {
            tracing::warn!(task = %description, "Policy check denied");
            Ok("deny".to_string())
        } else {
            tracing::info!(task = %description, "Policy check approved");
            Ok("approve".to_string())
        }
    });

    registry.register(
        "RequestHumanApproval",
        Arc::new(ApprovalTask { gate: gate.clone() }),
    );

    registry.register_fn("ExecuteAgentTask", |args| async move {
        tracing::info!(task = %args.join(" "), "Executing agent task");
        Ok("SUCCESS".to_string())
    });

    registry.register_fn("CleanupTask", |args| async move {
        tracing::info!(task = %args.join(" "), "Cleaning up resources");
        Ok("cleaned".to_string())
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_check_policy_approves_and_denies() {
        let registry = sample_registry(&ApprovalGate::new());

        let verdict = registry
            .dispatch("CheckPolicy", &["routine deploy".to_string()], TIMEOUT)
            .await
            .unwrap();
        assert_eq!(verdict, "approve");

        let verdict = registry
            .dispatch("CheckPolicy", &["Forbidden request".to_string()], TIMEOUT)
            .await
            .unwrap();
        assert_eq!(verdict, "deny");
    }

    #[tokio::test]
    async fn test_approval_gate_delivers_approval() {
        let gate = ApprovalGate::new();
        let registry = sample_registry(&gate);

        let waiter = gate.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waiter.approve();
        });

        let result = registry
            .dispatch("RequestHumanApproval", &["deploy".to_string()], TIMEOUT)
            .await
            .unwrap();

        assert_eq!(result, "approval-granted: deploy");
    }

    #[tokio::test]
    async fn test_approval_gate_rejection_is_non_retryable() {
        let gate = ApprovalGate::new();
        gate.reject("not authorized");
        let registry = sample_registry(&gate);

        let err = registry
            .dispatch("RequestHumanApproval", &[], TIMEOUT)
            .await
            .unwrap_err();

        match err {
            crate::error::DispatchError::Failure(failure) => {
                assert!(!failure.retryable);
                assert!(failure.to_string().contains("not authorized"));
            }
            other => panic!("expected task failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_approval_wait_is_bounded_by_dispatch_timeout() {
        let gate = ApprovalGate::new();
        let registry = sample_registry(&gate);

        let err = registry
            .dispatch("RequestHumanApproval", &[], Duration::from_millis(20))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::DispatchError::Failure(f) if f.retryable
        ));
    }

    #[tokio::test]
    async fn test_flaky_task_recovers_within_retry_budget() {
        let mut registry = TaskRegistry::new().with_retry(3);
        registry.register("Flaky", Arc::new(FlakyTask::failing(2)));

        let result = registry.dispatch("Flaky", &[], TIMEOUT).await.unwrap();
        assert_eq!(result, "SUCCESS");
    }

    #[tokio::test]
    async fn test_flaky_task_exceeding_budget_fails() {
        let mut registry = TaskRegistry::new().with_retry(2);
        registry.register("Flaky", Arc::new(FlakyTask::failing(5)));

        let err = registry.dispatch("Flaky", &[], TIMEOUT).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::DispatchError::Failure(f) if f.retryable
        ));
    }
}
