//! Result records and the final report formatter.

use std::fmt;

/// Prefix that closes every activity label. Forwarding strips it to
/// recover the raw task result.
const RESULT_LABEL_SUFFIX: &str = "Result: ";

/// One line of run output: an evaluated activity or a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Human-readable label, e.g. `"Activity CheckPolicy Result: "`.
    pub label: String,

    /// The raw value: a task result, or the offending block type for a
    /// warning record.
    pub value: String,
}

impl ResultRecord {
    /// Record for a successful activity dispatch.
    pub fn activity(name: &str, value: impl Into<String>) -> Self {
        Self {
            label: format!("Activity {name} {RESULT_LABEL_SUFFIX}"),
            value: value.into(),
        }
    }

    /// Warning record for an unrecognized block type.
    pub fn unknown_block(kind: &str) -> Self {
        Self {
            label: "Warning: Unknown block type ".to_string(),
            value: kind.to_string(),
        }
    }

    /// The value this record feeds forward in a sequential chain.
    ///
    /// Activity records forward their raw result. Anything without a
    /// result label (a warning) forwards its full rendered line,
    /// matching the observed behavior of the reference system.
    pub fn forwarded(&self) -> String {
        if self.label.ends_with(RESULT_LABEL_SUFFIX) {
            self.value.clone()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.value)
    }
}

/// Join records into the final report, one line per record.
///
/// An empty record set yields an empty string, not an error.
pub fn render(records: &[ResultRecord]) -> String {
    records
        .iter()
        .map(ResultRecord::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
