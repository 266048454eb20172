//! Refusal codes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reasons reqgate declines to produce a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefusalCode {
    /// Cannot read the input manifest
    #[serde(rename = "E_IO")]
    Io,

    /// Input bytes are not UTF-8 text
    #[serde(rename = "E_BAD_INPUT")]
    BadInput,

    /// Config file unreadable or invalid
    #[serde(rename = "E_CONFIG")]
    Config,
}

impl RefusalCode {
    pub const ALL: [RefusalCode; 3] = [RefusalCode::Io, RefusalCode::BadInput, RefusalCode::Config];

    pub fn as_str(&self) -> &'static str {
        match self {
            RefusalCode::Io => "E_IO",
            RefusalCode::BadInput => "E_BAD_INPUT",
            RefusalCode::Config => "E_CONFIG",
        }
    }

    /// Human-readable message used when the caller gives none
    pub fn default_message(&self) -> &'static str {
        match self {
            RefusalCode::Io => "Cannot read manifest",
            RefusalCode::BadInput => "Manifest is not UTF-8 text",
            RefusalCode::Config => "Invalid reqgate config",
        }
    }

    /// Suggested next action
    pub fn next_command(&self) -> Option<String> {
        match self {
            RefusalCode::Io => Some("Check paths/permissions".to_string()),
            RefusalCode::BadInput => Some("Re-save the manifest as UTF-8".to_string()),
            RefusalCode::Config => Some("Fix or remove the file given by --config / REQGATE_CONFIG".to_string()),
        }
    }
}

impl fmt::Display for RefusalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_code_serialization() {
        assert_eq!(serde_json::to_string(&RefusalCode::Io).unwrap(), "\"E_IO\"");
        assert_eq!(
            serde_json::to_string(&RefusalCode::BadInput).unwrap(),
            "\"E_BAD_INPUT\""
        );
        let parsed: RefusalCode = serde_json::from_str("\"E_CONFIG\"").unwrap();
        assert_eq!(parsed, RefusalCode::Config);
    }

    #[test]
    fn test_every_code_has_message_and_next_command() {
        for code in RefusalCode::ALL {
            assert!(!code.default_message().is_empty());
            assert!(code.next_command().is_some());
            assert_eq!(code.to_string(), code.as_str());
        }
    }
}
