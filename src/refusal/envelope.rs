use serde::{Deserialize, Serialize};

use super::RefusalCode;

/// Envelope schema version.
pub const ENVELOPE_VERSION: &str = "reqgate.v0";

/// Detail payload within a refusal envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefusalDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    pub next_command: Option<String>,
}

/// The full refusal envelope emitted on stdout (exit 2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefusalEnvelope {
    pub version: String,
    pub outcome: String,
    pub refusal: RefusalDetail,
}

impl RefusalEnvelope {
    /// Build a refusal envelope from a code, optional message override, and optional detail.
    pub fn new(
        code: RefusalCode,
        message: Option<String>,
        detail: Option<serde_json::Value>,
    ) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            outcome: "REFUSAL".to_string(),
            refusal: RefusalDetail {
                code: code.as_str().to_string(),
                message: message.unwrap_or_else(|| code.default_message().to_string()),
                detail,
                next_command: code.next_command(),
            },
        }
    }

    /// Serialize to deterministic JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("refusal envelope serialization cannot fail")
    }

    pub fn to_human(&self, command: &str) -> String {
        let mut lines = vec![
            format!("reqgate {command}: REFUSAL"),
            format!("  {}: {}", self.refusal.code, self.refusal.message),
        ];
        if let Some(next) = &self.refusal.next_command {
            lines.push(format!("  next: {next}"));
        }
        lines.join("\n")
    }

    pub fn render(&self, command: &str, json_output: bool) -> String {
        if json_output {
            self.to_json()
        } else {
            self.to_human(command)
        }
    }
}
