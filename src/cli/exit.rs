/// Exit codes used across reqgate subcommands.
///
/// Mapping:
///   0: success (OK, NO_CHANGES, listing printed)
///   1: domain failure (INVALID, CHANGES)
///   2: refusal (REFUSAL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Invalid = 1,
    Refusal = 2,
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> u8 {
        code as u8
    }
}

/// Rendered output of one subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
    pub exit_code: u8,
    /// Id of the manifest the command judged, for the witness record.
    pub manifest_id: Option<String>,
}

impl CommandResult {
    pub fn new(output: String, exit_code: u8, manifest_id: Option<String>) -> Self {
        Self {
            output,
            exit_code,
            manifest_id,
        }
    }

    /// Witness outcome label for this exit code.
    pub fn outcome(&self, success: &'static str, failure: &'static str) -> &'static str {
        match self.exit_code {
            0 => success,
            1 => failure,
            _ => "REFUSAL",
        }
    }
}
