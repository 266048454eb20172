use serde::{Deserialize, Serialize};

/// Report schema version.
pub const CHECK_VERSION: &str = "reqgate.check.v0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    OK,
    INVALID,
    REFUSAL,
}

impl CheckOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckOutcome::OK => 0,
            CheckOutcome::INVALID => 1,
            CheckOutcome::REFUSAL => 2,
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::OK => write!(f, "OK"),
            CheckOutcome::INVALID => write!(f, "INVALID"),
            CheckOutcome::REFUSAL => write!(f, "REFUSAL"),
        }
    }
}

/// Status of a check that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

impl CheckStatus {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckChecks {
    pub manifest_parse: bool,
    pub entries_parse: bool,
    pub options_known: bool,
    pub unique_names: CheckStatus,
    pub constraints_satisfiable: bool,
    pub license_annotations: CheckStatus,
}

impl Default for CheckChecks {
    fn default() -> Self {
        Self {
            manifest_parse: false,
            entries_parse: false,
            options_known: false,
            unique_names: CheckStatus::Skipped,
            constraints_satisfiable: false,
            license_annotations: CheckStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Finding {
    pub fn new(code: &str, line: usize) -> Self {
        Self {
            code: code.to_string(),
            line,
            package: None,
            message: None,
            actual: None,
        }
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub version: String,
    pub outcome: CheckOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_id: Option<String>,
    pub entry_count: usize,
    pub checks: CheckChecks,
    pub invalid: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<serde_json::Value>,
}

impl CheckReport {
    pub fn ok(source: String, manifest_id: String, entry_count: usize, checks: CheckChecks) -> Self {
        Self {
            version: CHECK_VERSION.to_string(),
            outcome: CheckOutcome::OK,
            source: Some(source),
            manifest_id: Some(manifest_id),
            entry_count,
            checks,
            invalid: vec![],
            refusal: None,
        }
    }

    pub fn invalid(
        source: String,
        manifest_id: String,
        entry_count: usize,
        checks: CheckChecks,
        findings: Vec<Finding>,
    ) -> Self {
        Self {
            version: CHECK_VERSION.to_string(),
            outcome: CheckOutcome::INVALID,
            source: Some(source),
            manifest_id: Some(manifest_id),
            entry_count,
            checks,
            invalid: findings,
            refusal: None,
        }
    }

    pub fn refusal(reason: serde_json::Value) -> Self {
        Self {
            version: CHECK_VERSION.to_string(),
            outcome: CheckOutcome::REFUSAL,
            source: None,
            manifest_id: None,
            entry_count: 0,
            checks: CheckChecks::default(),
            invalid: vec![],
            refusal: Some(reason),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("check report serialization cannot fail")
    }

    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("reqgate check: {}", self.outcome));
        if let Some(source) = &self.source {
            lines.push(format!("  source: {source}"));
        }
        if let Some(id) = &self.manifest_id {
            lines.push(format!("  manifest_id: {id}"));
            lines.push(format!("  entries: {}", self.entry_count));
        }
        if !self.invalid.is_empty() {
            lines.push("  findings:".to_string());
            for f in &self.invalid {
                let mut entry = format!("    - line {}: {}", f.line, f.code);
                if let Some(p) = &f.package {
                    entry.push_str(&format!(" ({p})"));
                }
                if let Some(m) = &f.message {
                    entry.push_str(&format!(": {m}"));
                }
                lines.push(entry);
            }
        }
        if let Some(r) = &self.refusal {
            let code = r["code"].as_str().unwrap_or("E_UNKNOWN");
            let message = r["message"].as_str().unwrap_or_default();
            lines.push(format!("  refusal: {code}: {message}"));
        }
        lines.join("\n")
    }

    pub fn render(&self, json_output: bool) -> String {
        if json_output {
            self.to_json()
        } else {
            self.to_human()
        }
    }
}
