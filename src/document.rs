//! Parsed workflow document model.
//!
//! A [`Document`] is the validated form of a configuration document,
//! built once by the parser and then walked by the interpreter. The
//! raw wire shape lives in [`crate::parse`]; this module only holds
//! the typed tree.

/// A parsed workflow document.
///
/// Exactly one of the two payloads is populated. A document carrying
/// the legacy flat activity list ignores any execution block (legacy
/// wins for backward compatibility); a document carrying neither is
/// valid and evaluates to empty output.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Legacy flat list of activity invocations, no data flow.
    LegacyActivityList(Vec<ActivityInvocation>),

    /// A single root execution block.
    ExecutionBlock(Block),

    /// Neither key was present. Evaluates to an empty result set.
    Empty,
}

/// A node in the execution tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Leaf: dispatch one named task.
    Activity {
        name: String,
        args: Vec<String>,
        /// When true, an inbound value from the preceding sequential
        /// step is prepended to `args` before dispatch.
        use_data_flow: bool,
    },

    /// Ordered composite: children run strictly one after another.
    Sequential { children: Vec<Block> },

    /// Concurrent composite: children run concurrently, results keep
    /// document order.
    Parallel { children: Vec<Block> },

    /// Unrecognized block type. Degrades to a single warning record at
    /// evaluation time; never dispatches, never fails the run.
    Unknown { kind: String },
}

impl Block {
    /// Create an activity block with data flow enabled.
    pub fn activity(name: &str, args: &[&str]) -> Self {
        Block::Activity {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            use_data_flow: true,
        }
    }

    /// Create a sequential block.
    pub fn sequential(children: Vec<Block>) -> Self {
        Block::Sequential { children }
    }

    /// Create a parallel block.
    pub fn parallel(children: Vec<Block>) -> Self {
        Block::Parallel { children }
    }
}

/// One entry in the legacy flat activity list.
///
/// Equivalent in effect to an activity block with data flow disabled:
/// the legacy format never threads data between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityInvocation {
    pub name: String,
    pub args: Vec<String>,
}
