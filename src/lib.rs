//! # blockflow
//!
//! Block-tree workflow interpretation for durable task runtimes.
//!
//! Describe a unit of work as a declarative document (a tree of named
//! blocks) and have it interpreted into a sequence/parallel mix of
//! task dispatches, with results from earlier steps flowing into later
//! steps' inputs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blockflow::{parse_yaml, Interpreter, TaskRegistry};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut registry = TaskRegistry::new();
//! registry.register_fn("Extract", |args| async move {
//!     Ok(format!("extracted from {}", args.join(",")))
//! });
//! registry.register_fn("Transform", |args| async move {
//!     Ok(format!("transformed {}", args.join(",")))
//! });
//!
//! let document = parse_yaml(
//!     r#"
//! execution:
//!   type: sequential
//!   blocks:
//!     - activityName: Extract
//!       args: [src]
//!     - activityName: Transform
//! "#,
//! )?;
//!
//! let report = Interpreter::new(&registry).run(&document).await?;
//! println!("{report}");
//! # Ok::<(), blockflow::WorkflowError>(())
//! # });
//! ```
//!
//! ## Document Format
//!
//! Either the legacy flat list (no data flow between steps):
//!
//! ```yaml
//! activities:
//!   - activityName: CheckPolicy
//!     args: [deploy service]
//!   - activityName: CleanupTask
//! ```
//!
//! or a block tree:
//!
//! ```yaml
//! execution:
//!   type: sequential
//!   blocks:
//!     - activityName: Extract
//!       args: [src]
//!     - type: parallel
//!       blocks:
//!         - activityName: Transform
//!         - activityName: Audit
//!           useDataFlow: false
//! ```
//!
//! Task behavior, durability, and retry policy live behind the
//! [`Dispatcher`] trait; [`TaskRegistry`] is an in-process
//! implementation for tests and demos.

mod dispatch;
mod document;
mod error;
mod interpreter;
mod parse;
mod record;
pub mod tasks;

pub use dispatch::{Dispatcher, TaskHandler, TaskRegistry};
pub use document::{ActivityInvocation, Block, Document};
pub use error::{DispatchError, TaskFailure, WorkflowError};
pub use interpreter::{execute, Interpreter, DEFAULT_ACTIVITY_TIMEOUT};
pub use parse::{load_file, parse_json, parse_yaml};
pub use record::{render, ResultRecord};
