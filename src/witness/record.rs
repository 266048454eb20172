use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Record schema version.
pub const WITNESS_VERSION: &str = "witness.v0";

/// Tool name stamped on records; other tools may share the ledger.
pub const TOOL: &str = "reqgate";

/// One reqgate invocation as appended to the witness ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WitnessRecord {
    pub version: String,
    pub tool: String,
    pub command: String,
    pub outcome: String,
    /// Id of the judged manifest; `None` when the input was refused.
    pub manifest_id: Option<String>,
    pub timestamp: String,
}

impl WitnessRecord {
    pub fn new(command: &str, outcome: &str, manifest_id: Option<String>) -> Self {
        Self {
            version: WITNESS_VERSION.to_string(),
            tool: TOOL.to_string(),
            command: command.to_string(),
            outcome: outcome.to_string(),
            manifest_id,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn is_ours(&self) -> bool {
        self.tool == TOOL
    }
}
