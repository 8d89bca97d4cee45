//! Workflow document parser.
//!
//! Accepts the YAML (or JSON-equivalent) configuration shape and
//! produces a typed [`Document`]. The raw wire structs here are the
//! only place untyped key/value data is touched; everything downstream
//! walks the validated tree.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::document::{ActivityInvocation, Block, Document};
use crate::error::WorkflowError;

/// Raw top-level document shape.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    activities: Option<Vec<RawInvocation>>,
    #[serde(default)]
    execution: Option<RawBlock>,
}

/// Raw legacy activity entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInvocation {
    #[serde(default)]
    activity_name: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

/// Raw block node, before type resolution.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    activity_name: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_true")]
    use_data_flow: bool,
    #[serde(default)]
    blocks: Vec<RawBlock>,
}

fn default_true() -> bool {
    true
}

/// Parse a workflow document from YAML.
///
/// # Example
///
/// ```rust
/// use blockflow::parse_yaml;
///
/// let yaml = r#"
/// execution:
///   type: sequential
///   blocks:
///     - activityName: Extract
///       args: [src]
///     - activityName: Transform
/// "#;
///
/// let document = parse_yaml(yaml).unwrap();
/// ```
pub fn parse_yaml(input: &str) -> Result<Document, WorkflowError> {
    let raw: RawDocument = serde_yaml::from_str(input)
        .map_err(|e| WorkflowError::Malformed(anyhow::Error::new(e)))?;
    convert(raw)
}

/// Parse a workflow document from JSON. Same shape as the YAML form.
pub fn parse_json(input: &str) -> Result<Document, WorkflowError> {
    let raw: RawDocument = serde_json::from_str(input)
        .map_err(|e| WorkflowError::Malformed(anyhow::Error::new(e)))?;
    convert(raw)
}

/// Load and parse a workflow document from a file.
///
/// Files ending in `.json` parse as JSON, everything else as YAML.
pub fn load_file(path: impl AsRef<Path>) -> Result<Document, WorkflowError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read workflow file: {}", path.display()))
        .map_err(WorkflowError::Malformed)?;

    if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(&content)
    } else {
        parse_yaml(&content)
    }
}

fn convert(raw: RawDocument) -> Result<Document, WorkflowError> {
    // Legacy wins: a document with both keys evaluates only the flat list.
    if let Some(invocations) = raw.activities {
        let invocations = invocations
            .into_iter()
            .map(convert_invocation)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Document::LegacyActivityList(invocations));
    }

    match raw.execution {
        Some(block) => Ok(Document::ExecutionBlock(convert_block(block)?)),
        None => Ok(Document::Empty),
    }
}

fn convert_invocation(raw: RawInvocation) -> Result<ActivityInvocation, WorkflowError> {
    let name = require_name(raw.activity_name)?;
    Ok(ActivityInvocation {
        name,
        args: raw.args,
    })
}

fn convert_block(raw: RawBlock) -> Result<Block, WorkflowError> {
    // A mapping with an activity name but no explicit type is an
    // activity; otherwise the type defaults to sequential.
    let kind = match raw.kind {
        Some(kind) => kind,
        None if raw.activity_name.is_some() => "activity".to_string(),
        None => "sequential".to_string(),
    };

    match kind.as_str() {
        "activity" => Ok(Block::Activity {
            name: require_name(raw.activity_name)?,
            args: raw.args,
            use_data_flow: raw.use_data_flow,
        }),
        "sequential" => Ok(Block::Sequential {
            children: convert_children(raw.blocks)?,
        }),
        "parallel" => Ok(Block::Parallel {
            children: convert_children(raw.blocks)?,
        }),
        // Unrecognized types are preserved and surfaced as a runtime
        // warning record rather than rejected here. Missing activity
        // names stay fatal; the asymmetry is intentional.
        other => Ok(Block::Unknown {
            kind: other.to_string(),
        }),
    }
}

fn convert_children(blocks: Vec<RawBlock>) -> Result<Vec<Block>, WorkflowError> {
    blocks.into_iter().map(convert_block).collect()
}

fn require_name(name: Option<String>) -> Result<String, WorkflowError> {
    name.filter(|n| !n.is_empty()).ok_or_else(|| {
        WorkflowError::InvalidBlock("activity block is missing activityName".to_string())
    })
}
